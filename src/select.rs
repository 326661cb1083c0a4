//! Turning scores into recommendations.
//!
//! Both modes keep ties in the order the scores were given, which is pool
//! order everywhere the engine calls them.

use itertools::Itertools;

/// Sorts `scored` by descending score and keeps the first `k`.
pub fn top_k<T>(scored: impl IntoIterator<Item = (T, f64)>, k: usize) -> Vec<(T, f64)> {
    scored
        .into_iter()
        .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
        .take(k)
        .collect()
}

/// Normalizes `scores` into probabilities with a numerically stable
/// softmax.
///
/// The maximum is subtracted before exponentiating, so adding a constant to
/// every score leaves the result unchanged. Returns an empty vector for
/// empty input.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = match scores.iter().copied().max_by(f64::total_cmp) {
        Some(max) => max,
        None => return Vec::new(),
    };

    let exps = scores.iter().map(|s| (s - max).exp()).collect_vec();
    let sum: f64 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Converts scores to probabilities, then keeps the `k` most probable.
///
/// The probabilities are normalized over all of `scored` before the cut,
/// so the returned ones sum to at most one.
pub fn rank_by_probability<T>(scored: Vec<(T, f64)>, k: usize) -> Vec<(T, f64)> {
    let (items, scores): (Vec<T>, Vec<f64>) = scored.into_iter().unzip();
    let probs = softmax(&scores);

    top_k(items.into_iter().zip(probs), k)
}
