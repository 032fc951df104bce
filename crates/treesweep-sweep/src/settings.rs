//! Sweep configuration: evaluation settings and the tree-count sweep.

use std::collections::HashSet;

use crate::SweepError;

/// Reduction scale used when none is given, in map units.
pub const DEFAULT_SCALE: f64 = 30.0;

/// Tree counts swept when none are given.
pub const DEFAULT_TREE_COUNTS: [usize; 6] = [10, 50, 100, 200, 300, 500];

/// Attributes and resolution shared by every evaluation of a sweep.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `scale`   | 30.0    |
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSettings {
    label: String,
    inputs: Vec<String>,
    scale: f64,
}

impl EvaluationSettings {
    /// Create settings that train on `inputs` to predict `label`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SweepError::EmptyLabel`] | `label` is empty |
    /// | [`SweepError::NoInputs`] | `inputs` is empty |
    /// | [`SweepError::EmptyInput`] | An input name is empty |
    /// | [`SweepError::DuplicateInput`] | An input appears twice |
    /// | [`SweepError::LabelAmongInputs`] | `label` is one of `inputs` |
    pub fn new(label: impl Into<String>, inputs: Vec<String>) -> Result<Self, SweepError> {
        let label = label.into();
        if label.is_empty() {
            return Err(SweepError::EmptyLabel);
        }
        if inputs.is_empty() {
            return Err(SweepError::NoInputs);
        }
        let mut seen = HashSet::new();
        for (index, input) in inputs.iter().enumerate() {
            if input.is_empty() {
                return Err(SweepError::EmptyInput { index });
            }
            if *input == label {
                return Err(SweepError::LabelAmongInputs { label });
            }
            if !seen.insert(input.as_str()) {
                return Err(SweepError::DuplicateInput {
                    input: input.clone(),
                });
            }
        }
        Ok(Self {
            label,
            inputs,
            scale: DEFAULT_SCALE,
        })
    }

    /// Set the reduction scale.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidScale`] unless `scale` is positive and finite.
    pub fn with_scale(mut self, scale: f64) -> Result<Self, SweepError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SweepError::InvalidScale { scale });
        }
        self.scale = scale;
        Ok(self)
    }

    /// Return the label attribute.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the input attributes, in training column order.
    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Return the reduction scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// The sweep parameter: strictly increasing, positive tree counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeCounts(Vec<usize>);

impl TreeCounts {
    /// Validate a list of tree counts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SweepError::EmptyTreeCounts`] | `counts` is empty |
    /// | [`SweepError::ZeroTreeCount`] | A count is zero |
    /// | [`SweepError::UnorderedTreeCounts`] | Counts are not strictly increasing |
    pub fn new(counts: Vec<usize>) -> Result<Self, SweepError> {
        if counts.is_empty() {
            return Err(SweepError::EmptyTreeCounts);
        }
        if let Some(index) = counts.iter().position(|&n| n == 0) {
            return Err(SweepError::ZeroTreeCount { index });
        }
        if let Some(pair) = counts.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SweepError::UnorderedTreeCounts {
                previous: pair[0],
                value: pair[1],
            });
        }
        Ok(Self(counts))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TreeCounts {
    fn default() -> Self {
        Self(DEFAULT_TREE_COUNTS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn settings_defaults() {
        let s = EvaluationSettings::new("landcover", names(&["B2", "B3", "B4"])).unwrap();
        assert_eq!(s.label(), "landcover");
        assert_eq!(s.inputs(), ["B2", "B3", "B4"]);
        assert!((s.scale() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn settings_reject_placeholders() {
        assert!(matches!(
            EvaluationSettings::new("", names(&["B2"])),
            Err(SweepError::EmptyLabel)
        ));
        assert!(matches!(
            EvaluationSettings::new("landcover", Vec::new()),
            Err(SweepError::NoInputs)
        ));
        assert!(matches!(
            EvaluationSettings::new("landcover", names(&["B2", ""])),
            Err(SweepError::EmptyInput { index: 1 })
        ));
        assert!(matches!(
            EvaluationSettings::new("landcover", names(&["B2", "B2"])),
            Err(SweepError::DuplicateInput { .. })
        ));
        assert!(matches!(
            EvaluationSettings::new("landcover", names(&["B2", "landcover"])),
            Err(SweepError::LabelAmongInputs { .. })
        ));
    }

    #[test]
    fn settings_scale() {
        let s = EvaluationSettings::new("lc", names(&["B2"])).unwrap();
        assert!((s.clone().with_scale(10.0).unwrap().scale() - 10.0).abs() < f64::EPSILON);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.clone().with_scale(bad),
                Err(SweepError::InvalidScale { .. })
            ));
        }
    }

    #[test]
    fn default_tree_counts() {
        assert_eq!(TreeCounts::default().as_slice(), &[10, 50, 100, 200, 300, 500]);
        assert_eq!(TreeCounts::default().len(), 6);
    }

    #[test]
    fn tree_counts_validation() {
        assert!(matches!(TreeCounts::new(Vec::new()), Err(SweepError::EmptyTreeCounts)));
        assert!(matches!(
            TreeCounts::new(vec![0, 10]),
            Err(SweepError::ZeroTreeCount { index: 0 })
        ));
        assert!(matches!(
            TreeCounts::new(vec![10, 50, 50]),
            Err(SweepError::UnorderedTreeCounts { previous: 50, value: 50 })
        ));
        assert!(TreeCounts::new(vec![1]).is_ok());
    }
}
