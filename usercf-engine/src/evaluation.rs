// ---------------------------------------------------------------------------
// Evaluator: hold-out mean absolute error
// ---------------------------------------------------------------------------
//
// One trial:
//
// 1. Each user joins the run with probability `evaluation_fraction`; users
//    not drawn are left out of both splits.
// 2. Each rating of a drawn user goes to training with probability
//    `training_fraction`, otherwise to the test split.
// 3. A fresh recommender is built over the training ratings and asked to
//    estimate every test rating. Estimates are clamped to the rating range
//    of the full store.
// 4. The score is the mean |estimate - actual| over the points that could
//    be estimated. Points without an estimate (no neighbor weight, or a
//    user with no training ratings) are counted but excluded.
//
// The split is random: repeated trials on the same store differ unless the
// caller passes identically seeded generators.
// ---------------------------------------------------------------------------

use rand::Rng;

use crate::error::CfError;
use crate::recommender::RecommenderBuilder;
use crate::store::RatingStore;
use crate::types::{Evaluation, EvaluationScore, Rating};

#[derive(Debug, Clone, Copy)]
pub struct EvaluationOptions {
	pub training_fraction: f64,
	pub evaluation_fraction: f64,
}

impl Default for EvaluationOptions {
	fn default() -> Self {
		Self {
			training_fraction: 0.9,
			evaluation_fraction: 1.0,
		}
	}
}

impl EvaluationOptions {
	pub fn validate(&self) -> Result<(), CfError> {
		if !(0.0..=1.0).contains(&self.training_fraction) {
			return Err(CfError::InvalidArgument(format!(
				"training fraction must be within [0, 1], got {}",
				self.training_fraction
			)));
		}
		if !(0.0..=1.0).contains(&self.evaluation_fraction) || self.evaluation_fraction == 0.0 {
			return Err(CfError::InvalidArgument(format!(
				"evaluation fraction must be within (0, 1], got {}",
				self.evaluation_fraction
			)));
		}
		Ok(())
	}
}

/// Random train/test partition of a store.
#[derive(Debug, Clone, Default)]
pub struct Split {
	pub training: Vec<Rating>,
	pub test: Vec<Rating>,
}

pub fn split<R: Rng>(store: &RatingStore, options: &EvaluationOptions, rng: &mut R) -> Split {
	let mut split = Split::default();
	for user in store.users() {
		if rng.random::<f64>() >= options.evaluation_fraction {
			continue;
		}
		for (item, value) in store.ratings_for_user(user) {
			let rating = Rating::new(user, item, value);
			if rng.random::<f64>() < options.training_fraction {
				split.training.push(rating);
			} else {
				split.test.push(rating);
			}
		}
	}
	split
}

/// Run one evaluation trial and report the mean absolute error.
pub fn evaluate<B, R>(
	builder: &B,
	store: &RatingStore,
	options: &EvaluationOptions,
	rng: &mut R,
) -> Result<Evaluation, CfError>
where
	B: RecommenderBuilder + ?Sized,
	R: Rng,
{
	options.validate()?;
	if store.is_empty() {
		return Err(CfError::InsufficientData("rating store is empty".into()));
	}

	let range = store.rating_range();
	let Split { training, test } = split(store, options, rng);
	let training_ratings = training.len();
	let training_store = RatingStore::from_ratings(training);
	let recommender = builder.build(&training_store);

	let mut total_error = 0.0;
	let mut evaluated = 0;
	let mut unpredictable = 0;

	for point in &test {
		match recommender.estimate(point.user, point.item) {
			Ok(Some(estimate)) => {
				let estimate = match range {
					Some((lo, hi)) => estimate.clamp(lo, hi),
					None => estimate,
				};
				total_error += (estimate - point.value).abs();
				evaluated += 1;
			}
			Ok(None) | Err(CfError::UnknownUser(_)) => unpredictable += 1,
			Err(e) => return Err(e),
		}
	}

	let score = if evaluated == 0 {
		EvaluationScore::InsufficientData
	} else {
		EvaluationScore::MeanAbsoluteError(total_error / evaluated as f64)
	};

	tracing::info!(
		training = training_ratings,
		test = test.len(),
		evaluated,
		unpredictable,
		score = %score,
		"Evaluation trial finished"
	);

	Ok(Evaluation {
		score,
		evaluated,
		unpredictable,
		training_ratings,
		test_ratings: test.len(),
	})
}
