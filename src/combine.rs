//! Weighted-sum combination of weights and scores into a final ranking.

use std::collections::HashMap;

use crate::model::{Alternative, RankedAlternative, ScoreMatrix, WeightVector};

/// Compute `Σ_c weight[c] · score[a][c]` per alternative and sort descending.
///
/// Criteria absent from an alternative's score row contribute 0. The sort is
/// stable, so alternatives tying on the final score keep their input order —
/// no other tie-break exists upstream. Pure and deterministic: identical
/// inputs give bit-identical output.
pub fn combine(
    alternatives: &[Alternative],
    scores: &ScoreMatrix,
    weights: &WeightVector,
) -> Vec<RankedAlternative> {
    let mut ranked: Vec<RankedAlternative> = alternatives
        .iter()
        .map(|alt| {
            let mut contributions = HashMap::new();
            let mut final_score = 0.0;
            if let Some(row) = scores.row(&alt.id) {
                // Accumulate in sorted criterion order so the float sum is
                // bit-identical for equal inputs, whatever the map's
                // internal ordering.
                let mut entries: Vec<(&String, f64)> =
                    row.iter().map(|(c, s)| (c, *s)).collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                for (criterion, s) in entries {
                    let term = weights.get(criterion) * s;
                    final_score += term;
                    contributions.insert(criterion.clone(), term);
                }
            }
            RankedAlternative {
                alternative: alt.clone(),
                final_score,
                contributions,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    ranked
}
