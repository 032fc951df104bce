use rand::Rng;

/// Gini impurity `1 - sum(p_i^2)` of a class histogram.
///
/// Returns 0.0 for an empty node.
pub(crate) fn gini(class_counts: &[usize], population: usize) -> f64 {
    if population == 0 {
        return 0.0;
    }
    let n = population as f64;
    1.0 - class_counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Count how many of `indices` fall in each class.
pub(crate) fn class_counts(labels: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

/// A chosen split and the partition it induces.
#[derive(Debug)]
pub(crate) struct Split {
    pub(crate) variable: usize,
    pub(crate) threshold: f64,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}

/// Search `variables_per_split` randomly drawn variables for the split with
/// the largest weighted Gini decrease.
///
/// `columns` is column-major: `columns[variable][sample]`. Returns `None`
/// when every candidate variable is constant over `indices` or every
/// boundary leaves fewer than `min_leaf_population` samples on one side.
pub(crate) fn best_split(
    columns: &[Vec<f64>],
    labels: &[usize],
    indices: &[usize],
    n_classes: usize,
    variables_per_split: usize,
    min_leaf_population: usize,
    rng: &mut impl Rng,
) -> Option<Split> {
    let n_variables = columns.len();
    let population = indices.len();
    if population < 2 || n_variables == 0 {
        return None;
    }

    let parent_counts = class_counts(labels, indices, n_classes);
    let parent_impurity = gini(&parent_counts, population);

    // Partial Fisher-Yates over the variable order.
    let mut order: Vec<usize> = (0..n_variables).collect();
    let take = variables_per_split.min(n_variables);
    for i in 0..take {
        let j = rng.gen_range(i..n_variables);
        order.swap(i, j);
    }

    let mut best: Option<(usize, f64, f64)> = None;

    for &variable in &order[..take] {
        let column = &columns[variable];
        let mut sorted: Vec<(f64, usize)> = indices.iter().map(|&i| (column[i], labels[i])).collect();
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_counts = vec![0usize; n_classes];
        let mut right_counts = parent_counts.clone();

        for k in 0..population - 1 {
            let (value, class) = sorted[k];
            left_counts[class] += 1;
            right_counts[class] -= 1;

            let next = sorted[k + 1].0;
            if value == next {
                continue;
            }
            let n_left = k + 1;
            let n_right = population - n_left;
            if n_left < min_leaf_population || n_right < min_leaf_population {
                continue;
            }

            let decrease = population as f64 * parent_impurity
                - n_left as f64 * gini(&left_counts, n_left)
                - n_right as f64 * gini(&right_counts, n_right);

            if best.is_none_or(|(_, _, d)| decrease > d) {
                best = Some((variable, (value + next) / 2.0, decrease));
            }
        }
    }

    let (variable, threshold, _) = best?;
    let column = &columns[variable];
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.iter().partition(|&&i| column[i] <= threshold);

    Some(Split {
        variable,
        threshold,
        left,
        right,
    })
}
