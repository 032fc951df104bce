//! Validated names used across the pipeline.

use std::fmt;

use crate::IoError;

/// Identifier of a geospatial asset, such as `users/me/classified_image`.
///
/// Slash-separated segments, each matching `[A-Za-z0-9_.-]+` and neither
/// `.` nor `..`, so an id always maps to a path below an asset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Parse and validate an asset identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidAssetId`] if the id is empty, has an empty
    /// segment, a `.`/`..` segment, or a character outside `[A-Za-z0-9_.-]`.
    pub fn new(id: impl Into<String>) -> Result<Self, IoError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            });
        if !valid {
            return Err(IoError::InvalidAssetId { id });
        }
        Ok(Self(id))
    }

    /// Derive a child id, e.g. `image/classified-10t`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidAssetId`] if `segment` is not a valid segment.
    pub fn child(&self, segment: &str) -> Result<Self, IoError> {
        Self::new(format!("{}/{segment}", self.0))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_accepts_nested_paths() {
        let id = AssetId::new("users/your_account/classified_image").unwrap();
        assert_eq!(id.as_str(), "users/your_account/classified_image");
        assert_eq!(id.to_string(), "users/your_account/classified_image");
    }

    #[test]
    fn asset_id_rejects_traversal_and_junk() {
        for bad in ["", "/abs", "a//b", "a/../b", "./a", "a/b/", "has space", "a\\b"] {
            assert!(
                matches!(AssetId::new(bad), Err(IoError::InvalidAssetId { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn asset_id_child() {
        let id = AssetId::new("users/me/img").unwrap();
        assert_eq!(id.child("classified-10t").unwrap().as_str(), "users/me/img/classified-10t");
        assert!(id.child("..").is_err());
    }

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("kosi-sweep_01".to_string());
        assert_eq!(name.unwrap().as_str(), "kosi-sweep_01");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("my sweep!".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }
}
