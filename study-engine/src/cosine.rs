/// Sum of `terms` in ascending order, skipping zeros. Rows that hold the same
/// weights in different columns produce bit-identical sums, which keeps equal
/// scores equal when ranking.
fn ordered_sum(terms: impl Iterator<Item = f64>) -> f64 {
	let mut terms: Vec<f64> = terms.filter(|t| *t != 0.0).collect();
	terms.sort_by(|a, b| a.total_cmp(b));
	terms.into_iter().fold(0.0, |acc, t| acc + t)
}

/// L2 norm of a weight vector.
pub fn magnitude(v: &[f32]) -> f64 {
	ordered_sum(v.iter().map(|&x| (x as f64) * (x as f64))).sqrt()
}

/// Scale `v` to unit length in place. A zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) {
	let norm = magnitude(v);
	if norm == 0.0 || !norm.is_finite() {
		return;
	}
	for x in v.iter_mut() {
		*x = (*x as f64 / norm) as f32;
	}
}

/// Cosine similarity between two weight vectors.
///
/// Returns 0.0 when either vector has zero magnitude or the dimensions
/// differ. Result clamped to [-1.0, 1.0].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let denom = magnitude(a) * magnitude(b);
	if denom == 0.0 {
		return 0.0;
	}

	let dot = ordered_sum(a.iter().zip(b).map(|(&x, &y)| (x as f64) * (y as f64)));

	let result = dot / denom;
	if !result.is_finite() {
		return 0.0;
	}
	result.clamp(-1.0, 1.0)
}
