// ---------------------------------------------------------------------------
// User Similarity: Pearson's correlation over co-rated items
// ---------------------------------------------------------------------------
//
// Similarity is `None` (undefined) rather than zero when it cannot be
// computed: fewer than two co-rated items, or no variance in either rating
// vector. Consumers must exclude undefined pairs, never treat them as zero
// correlation.
// ---------------------------------------------------------------------------

use crate::store::RatingStore;
use crate::types::UserId;

/// Minimum number of co-rated items for a defined correlation.
const MIN_CO_RATED: usize = 2;

/// Pairwise user similarity. Implementations must be pure and symmetric:
/// `similarity(a, b) == similarity(b, a)`.
pub trait UserSimilarity: Send + Sync {
	fn similarity(&self, store: &RatingStore, a: UserId, b: UserId) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonCorrelation;

impl UserSimilarity for PearsonCorrelation {
	fn similarity(&self, store: &RatingStore, a: UserId, b: UserId) -> Option<f64> {
		// Always accumulate in the same user order so both argument orders
		// produce bit-identical results.
		let (first, second) = if a <= b { (a, b) } else { (b, a) };
		let first_ratings = store.user_ratings(first)?;
		let second_ratings = store.user_ratings(second)?;

		let (xs, ys): (Vec<f64>, Vec<f64>) = first_ratings
			.iter()
			.filter_map(|(item, &x)| second_ratings.get(item).map(|&y| (x, y)))
			.unzip();

		pearson(&xs, &ys)
	}
}

/// Pearson's correlation coefficient of two paired sequences.
///
/// Returns `None` for mismatched lengths, fewer than two pairs, or a
/// constant sequence. The result is clamped to [-1.0, 1.0].
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
	if xs.len() != ys.len() || xs.len() < MIN_CO_RATED {
		return None;
	}
	if is_constant(xs) || is_constant(ys) {
		return None;
	}

	// The coefficient is invariant under positive scaling. Normalizing by the
	// largest magnitude keeps sums and squares finite for extreme ratings.
	let xs = normalized(xs);
	let ys = normalized(ys);

	let n = xs.len() as f64;
	let mean_x = xs.iter().sum::<f64>() / n;
	let mean_y = ys.iter().sum::<f64>() / n;

	let mut covariance = 0.0;
	let mut var_x = 0.0;
	let mut var_y = 0.0;
	for (&x, &y) in xs.iter().zip(&ys) {
		let dx = x - mean_x;
		let dy = y - mean_y;
		covariance += dx * dy;
		var_x += dx * dx;
		var_y += dy * dy;
	}

	let denom = var_x.sqrt() * var_y.sqrt();
	if denom == 0.0 {
		return None;
	}

	let result = covariance / denom;
	if !result.is_finite() {
		return None;
	}
	Some(result.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
	values.windows(2).all(|w| w[0] == w[1])
}

fn normalized(values: &[f64]) -> Vec<f64> {
	let scale = values.iter().fold(0.0_f64, |max, v| max.max(v.abs()));
	values.iter().map(|v| v / scale).collect()
}
