//! Weighted scoring, deterministic ordering, permission filtering.

use std::cmp::Ordering;

use tracing::warn;

use taskpulse_core::{ItemRef, RankedResult, RankingCriteria, TaskPulseError};

/// Scores rounding to the same epsilon-width bucket are treated as tied
/// and broken by relevance, then date proximity.
pub const SCORE_EPSILON: f64 = 0.0001;

/// Criteria presets: date-weighted when a target date is present,
/// relevance-only otherwise.
pub fn ranking_criteria(has_date: bool, max_results: usize) -> RankingCriteria {
    if has_date {
        RankingCriteria {
            semantic_weight: 0.3,
            date_weight: 0.7,
            max_results,
        }
    } else {
        RankingCriteria {
            semantic_weight: 1.0,
            date_weight: 0.0,
            max_results,
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp raw scores into [0, 1] and compute the weighted combined score,
/// clamped again to guard weight configurations summing above one.
/// Idempotent on its own output.
pub fn combine_scores<P>(
    results: Vec<RankedResult<P>>,
    criteria: &RankingCriteria,
) -> Vec<RankedResult<P>> {
    results
        .into_iter()
        .map(|mut result| {
            result.relevance_score = clamp_score(result.relevance_score);
            result.date_proximity_score = clamp_score(result.date_proximity_score);
            result.combined_score = clamp_score(
                result.relevance_score * criteria.semantic_weight
                    + result.date_proximity_score * criteria.date_weight,
            );
            result
        })
        .collect()
}

/// Stable descending sort by combined score with the three-level epsilon
/// tie-break.
pub fn order_by_score<P>(mut results: Vec<RankedResult<P>>) -> Vec<RankedResult<P>> {
    results.sort_by(compare_ranked);
    results
}

/// Quantize a score into its epsilon bucket. Pairwise "within epsilon"
/// comparisons are not transitive and would hand `sort_by` a comparison
/// cycle; bucketing yields a genuine total order with the same tie
/// semantics. Scores are clamped to [0, 1] before sorting, so the cast
/// cannot overflow.
fn epsilon_bucket(score: f64) -> i64 {
    (score / SCORE_EPSILON).round() as i64
}

fn compare_ranked<P>(a: &RankedResult<P>, b: &RankedResult<P>) -> Ordering {
    epsilon_bucket(b.combined_score)
        .cmp(&epsilon_bucket(a.combined_score))
        .then_with(|| epsilon_bucket(b.relevance_score).cmp(&epsilon_bucket(a.relevance_score)))
        .then_with(|| {
            epsilon_bucket(b.date_proximity_score).cmp(&epsilon_bucket(a.date_proximity_score))
        })
}

/// Keep only items the user may see: existing non-empty id, not archived,
/// valid creation timestamp. One bad item never fails the batch.
pub async fn check_permissions<P: ItemRef>(
    results: Vec<RankedResult<P>>,
    user_id: &str,
) -> Result<Vec<RankedResult<P>>, TaskPulseError> {
    if user_id.trim().is_empty() {
        return Err(TaskPulseError::Validation(
            "user_id must not be blank".to_string(),
        ));
    }

    let mut allowed = Vec::with_capacity(results.len());
    for result in results {
        match item_visible(&result.page) {
            Ok(true) => allowed.push(result),
            Ok(false) => {}
            Err(err) => {
                warn!(item = %result.page.id(), error = %err, "permission check failed, excluding item");
            }
        }
    }

    Ok(allowed)
}

fn item_visible<P: ItemRef>(page: &P) -> anyhow::Result<bool> {
    if page.id().trim().is_empty() {
        return Ok(false);
    }
    if page.is_archived()? {
        return Ok(false);
    }
    Ok(page.created_time()?.is_some())
}
