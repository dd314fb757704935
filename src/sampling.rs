// --- File: sampling.rs ---
use crate::constants::POISSON_NORMAL_THRESHOLD;
use crate::error::{Result, SimError};
use rand::Rng;
use std::f64::consts::TAU;

/// Draw `count` positions from `weights`.
///
/// Weights are normalized to sum to one. Each draw takes a uniform value in
/// `[0, 1)` and walks the cumulative distribution in input order; the
/// first index whose running sum reaches the draw wins. Without replacement
/// the chosen index is zeroed and excluded before the next draw.
pub fn weighted_sample_indices<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[f64],
    count: usize,
    with_replacement: bool,
) -> Result<Vec<usize>> {
    if !with_replacement && count > weights.len() {
        return Err(SimError::InvalidArgument(format!(
            "cannot draw {} items without replacement from {}",
            count,
            weights.len()
        )));
    }
    if count > 0 && weights.is_empty() {
        return Err(SimError::InvalidArgument(
            "cannot draw from an empty distribution".into(),
        ));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(SimError::InvalidArgument(format!(
            "weights must be finite and non-negative, got {}",
            bad
        )));
    }

    let mut remaining: Vec<f64> = weights.to_vec();
    let mut excluded = vec![false; weights.len()];
    let mut picks = Vec::with_capacity(count);

    for _ in 0..count {
        let total: f64 = remaining.iter().sum();
        let draw = rng.gen_range(0.0..1.0);
        let pick = if total > 0.0 {
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (index, weight) in remaining.iter().enumerate() {
                if excluded[index] {
                    continue;
                }
                cumulative += weight / total;
                if cumulative >= draw {
                    chosen = Some(index);
                    break;
                }
            }
            // Rounding can leave the running sum a hair below the draw.
            chosen.unwrap_or_else(|| last_live_index(&remaining, &excluded))
        } else {
            // Only zero weights left: every live item is equally likely.
            log::warn!("weighted draw over an all-zero distribution, falling back to uniform");
            let live: Vec<usize> = (0..remaining.len()).filter(|&i| !excluded[i]).collect();
            live[((draw * live.len() as f64) as usize).min(live.len() - 1)]
        };

        picks.push(pick);
        if !with_replacement {
            remaining[pick] = 0.0;
            excluded[pick] = true;
        }
    }
    Ok(picks)
}

fn last_live_index(weights: &[f64], excluded: &[bool]) -> usize {
    (0..weights.len())
        .rev()
        .find(|&i| !excluded[i] && weights[i] > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Like [`weighted_sample_indices`], returning the items themselves.
pub fn weighted_sample<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    items: &[T],
    weights: &[f64],
    count: usize,
    with_replacement: bool,
) -> Result<Vec<T>> {
    if items.len() != weights.len() {
        return Err(SimError::InvalidArgument(format!(
            "{} items but {} weights",
            items.len(),
            weights.len()
        )));
    }
    let picks = weighted_sample_indices(rng, weights, count, with_replacement)?;
    Ok(picks.into_iter().map(|i| items[i].clone()).collect())
}

/// Poisson-distributed count with mean `lambda`.
///
/// Knuth's product method for small means; a rounded normal approximation
/// (Box-Muller) above `POISSON_NORMAL_THRESHOLD`, where `exp(-lambda)`
/// gets too small to multiply against.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    if lambda <= POISSON_NORMAL_THRESHOLD {
        let limit = (-lambda).exp();
        let mut count = 0;
        let mut product: f64 = rng.gen_range(0.0..1.0);
        while product > limit {
            count += 1;
            product *= rng.gen_range(0.0..1.0);
        }
        return count;
    }
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    (lambda + z * lambda.sqrt()).round().max(0.0) as u64
}
