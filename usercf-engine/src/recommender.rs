// ---------------------------------------------------------------------------
// Recommender: user-based collaborative filtering
// ---------------------------------------------------------------------------
//
// The score of an unrated item is the similarity-weighted average of the
// neighbors' ratings for it:
//
//   score(u, i) = Σ sim(u, v) · r(v, i) / Σ |sim(u, v)|
//
// over neighbors v that rated i. Items whose weight sum is zero get no
// score and are left out rather than reported as zero.
// ---------------------------------------------------------------------------

use std::collections::BTreeSet;

use crate::error::CfError;
use crate::neighborhood::{Neighbor, Neighborhood, ThresholdNeighborhood, UserNeighborhood};
use crate::similarity::{PearsonCorrelation, UserSimilarity};
use crate::store::RatingStore;
use crate::types::{ItemId, Recommendation, UserId};

pub trait Recommender {
	/// Top `how_many` unrated items for `user`, best first, ties broken by
	/// ascending item id. Empty when the user has no neighbors.
	fn recommend(&self, user: UserId, how_many: usize) -> Result<Vec<Recommendation>, CfError>;

	/// Predicted rating of a single item, `None` when no neighbor weight is
	/// available. An item the user already rated returns that rating.
	fn estimate(&self, user: UserId, item: ItemId) -> Result<Option<f64>, CfError>;
}

/// Builds a recommender over a given store. Evaluation uses this to
/// construct a fresh recommender for every training split.
pub trait RecommenderBuilder {
	fn build<'a>(&self, store: &'a RatingStore) -> Box<dyn Recommender + 'a>;
}

// ---------------------------------------------------------------------------
// User-based recommender
// ---------------------------------------------------------------------------

pub struct UserBasedRecommender<'a, S = PearsonCorrelation, N = ThresholdNeighborhood> {
	store: &'a RatingStore,
	similarity: S,
	neighborhood: N,
}

impl<'a> UserBasedRecommender<'a> {
	/// Pearson similarity with a threshold neighborhood.
	pub fn pearson(store: &'a RatingStore, threshold: f64) -> Self {
		Self::new(store, PearsonCorrelation, ThresholdNeighborhood::new(threshold))
	}
}

impl<'a, S, N> UserBasedRecommender<'a, S, N>
where
	S: UserSimilarity,
	N: UserNeighborhood,
{
	pub fn new(store: &'a RatingStore, similarity: S, neighborhood: N) -> Self {
		Self {
			store,
			similarity,
			neighborhood,
		}
	}

	pub fn store(&self) -> &'a RatingStore {
		self.store
	}

	pub fn neighborhood_of(&self, user: UserId) -> Neighborhood {
		self.neighborhood.neighbors(self.store, &self.similarity, user)
	}

	fn require_user(&self, user: UserId) -> Result<(), CfError> {
		if self.store.contains_user(user) {
			Ok(())
		} else {
			Err(CfError::UnknownUser(user))
		}
	}
}

impl<S, N> Recommender for UserBasedRecommender<'_, S, N>
where
	S: UserSimilarity,
	N: UserNeighborhood,
{
	fn recommend(&self, user: UserId, how_many: usize) -> Result<Vec<Recommendation>, CfError> {
		self.require_user(user)?;

		let neighborhood = self.neighborhood_of(user);
		if neighborhood.is_empty() || how_many == 0 {
			return Ok(Vec::new());
		}

		let candidates: BTreeSet<ItemId> = neighborhood
			.iter()
			.flat_map(|n| self.store.ratings_for_user(n.user).map(|(item, _)| item))
			.filter(|&item| self.store.rating(user, item).is_none())
			.collect();

		let mut scored: Vec<Recommendation> = candidates
			.iter()
			.filter_map(|&item| {
				weighted_average(neighborhood.iter(), self.store, item)
					.map(|score| Recommendation { item, score })
			})
			.collect();

		tracing::debug!(
			user,
			neighbors = neighborhood.len(),
			candidates = candidates.len(),
			scored = scored.len(),
			"Recommendations scored"
		);

		scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.item.cmp(&b.item)));
		scored.truncate(how_many);
		Ok(scored)
	}

	fn estimate(&self, user: UserId, item: ItemId) -> Result<Option<f64>, CfError> {
		self.require_user(user)?;

		if let Some(actual) = self.store.rating(user, item) {
			return Ok(Some(actual));
		}

		let neighborhood = self.neighborhood_of(user);
		Ok(weighted_average(neighborhood.iter(), self.store, item))
	}
}

fn weighted_average<'n>(
	neighbors: impl Iterator<Item = &'n Neighbor>,
	store: &RatingStore,
	item: ItemId,
) -> Option<f64> {
	let mut weighted_sum = 0.0;
	let mut weight_total = 0.0;
	for neighbor in neighbors {
		if let Some(rating) = store.rating(neighbor.user, item) {
			weighted_sum += neighbor.similarity * rating;
			weight_total += neighbor.similarity.abs();
		}
	}
	if weight_total == 0.0 {
		return None;
	}
	Some(weighted_sum / weight_total)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds [`UserBasedRecommender`]s from a fixed similarity and neighborhood.
#[derive(Debug, Clone, Default)]
pub struct UserBasedBuilder<S = PearsonCorrelation, N = ThresholdNeighborhood> {
	pub similarity: S,
	pub neighborhood: N,
}

impl UserBasedBuilder {
	pub fn pearson(threshold: f64) -> Self {
		Self {
			similarity: PearsonCorrelation,
			neighborhood: ThresholdNeighborhood::new(threshold),
		}
	}
}

impl<S, N> RecommenderBuilder for UserBasedBuilder<S, N>
where
	S: UserSimilarity + Clone + 'static,
	N: UserNeighborhood + Clone + 'static,
{
	fn build<'a>(&self, store: &'a RatingStore) -> Box<dyn Recommender + 'a> {
		Box::new(UserBasedRecommender::new(
			store,
			self.similarity.clone(),
			self.neighborhood.clone(),
		))
	}
}
