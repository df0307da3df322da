use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use super::criteria::{CriteriaValues, CRITERIA_COUNT};

/// Closeness reported when an alternative coincides with both ideal points.
pub const DEGENERATE_CLOSENESS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedAlternative {
    pub index: usize,
    pub closeness: f64,
}

/// TOPSIS closeness coefficient per alternative, in input order.
///
/// Criteria are already normalized, so the decision matrix is only weighted.
/// Every criterion is a benefit: the ideal is the column maximum.
pub fn rank(alternatives: &[CriteriaValues], weights: &CriteriaValues) -> Vec<f64> {
    match alternatives.len() {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let matrix = Array2::from_shape_fn((alternatives.len(), CRITERIA_COUNT), |(row, col)| {
        alternatives[row].to_array()[col]
    });
    let weights = Array1::from(weights.to_array().to_vec());
    let weighted = &matrix * &weights;

    let ideal_best = weighted.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));
    let ideal_worst = weighted.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));

    weighted
        .outer_iter()
        .map(|row| {
            let d_best = euclidean(&(&row - &ideal_best));
            let d_worst = euclidean(&(&row - &ideal_worst));
            let total = d_best + d_worst;
            if total == 0.0 {
                DEGENERATE_CLOSENESS
            } else {
                d_worst / total
            }
        })
        .collect()
}

/// Alternatives ordered from most to least preferred; ties keep input order.
pub fn rank_alternatives(
    alternatives: &[CriteriaValues],
    weights: &CriteriaValues,
) -> Vec<RankedAlternative> {
    let mut ranked: Vec<RankedAlternative> = rank(alternatives, weights)
        .into_iter()
        .enumerate()
        .map(|(index, closeness)| RankedAlternative { index, closeness })
        .collect();
    ranked.sort_by(|a, b| b.closeness.total_cmp(&a.closeness));
    ranked
}

fn euclidean(diff: &Array1<f64>) -> f64 {
    diff.mapv(|d| d * d).sum().sqrt()
}
