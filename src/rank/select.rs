//! Minimum and smallest-k selection over scored candidates.
//!
//! Ties always go to the candidate listed first.

use crate::rank::DistanceResult;
use crate::util::{InkMatchError, InkMatchResult};

/// Index of the smallest distance among entries not yet taken.
fn position_of_min(results: &[DistanceResult], taken: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, result) in results.iter().enumerate() {
        if taken[idx] {
            continue;
        }
        match best {
            Some(b) if results[b].distance <= result.distance => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Returns the entry with the smallest distance.
pub fn select_min(results: &[DistanceResult]) -> Option<&DistanceResult> {
    let taken = vec![false; results.len()];
    position_of_min(results, &taken).map(|idx| &results[idx])
}

/// Returns the `k` smallest entries in ascending distance order.
///
/// Uses repeated linear extraction, `O(n * k)`. `k == 0` yields an empty
/// vector; `k` larger than the number of entries is an error.
pub fn select_smallest_k(
    results: &[DistanceResult],
    k: usize,
) -> InkMatchResult<Vec<DistanceResult>> {
    if k > results.len() {
        return Err(InkMatchError::invalid_parameter(
            "k",
            format!("requested {k} results from {} candidates", results.len()),
        ));
    }
    let mut taken = vec![false; results.len()];
    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let Some(idx) = position_of_min(results, &taken) else {
            break;
        };
        taken[idx] = true;
        out.push(results[idx].clone());
    }
    Ok(out)
}
