// ---------------------------------------------------------------------------
// Neighborhood Selector: users similar enough to a target user
// ---------------------------------------------------------------------------

use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::similarity::UserSimilarity;
use crate::store::RatingStore;
use crate::types::UserId;

/// Default similarity threshold for [`ThresholdNeighborhood`].
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// A neighbor of the target user and its (defined) similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
	pub user: UserId,
	pub similarity: f64,
}

/// The neighbors of one target user, ordered by user id.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
	target: UserId,
	members: Vec<Neighbor>,
}

impl Neighborhood {
	pub fn target(&self) -> UserId {
		self.target
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
		self.members.iter()
	}

	pub fn user_ids(&self) -> BTreeSet<UserId> {
		self.members.iter().map(|n| n.user).collect()
	}

	pub fn contains(&self, user: UserId) -> bool {
		self.members.binary_search_by_key(&user, |n| n.user).is_ok()
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}
}

pub trait UserNeighborhood: Send + Sync {
	/// Never contains `target` itself. An empty neighborhood is valid.
	fn neighbors(
		&self,
		store: &RatingStore,
		similarity: &dyn UserSimilarity,
		target: UserId,
	) -> Neighborhood;
}

/// Every other user whose similarity to the target is defined and at least
/// `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdNeighborhood {
	pub threshold: f64,
}

impl ThresholdNeighborhood {
	pub fn new(threshold: f64) -> Self {
		Self { threshold }
	}
}

impl Default for ThresholdNeighborhood {
	fn default() -> Self {
		Self::new(DEFAULT_THRESHOLD)
	}
}

impl UserNeighborhood for ThresholdNeighborhood {
	fn neighbors(
		&self,
		store: &RatingStore,
		similarity: &dyn UserSimilarity,
		target: UserId,
	) -> Neighborhood {
		let candidates: Vec<UserId> = store.users().filter(|&u| u != target).collect();

		// Indexed parallel collect keeps the user-id order of `candidates`.
		let members: Vec<Neighbor> = candidates
			.par_iter()
			.filter_map(|&user| {
				similarity
					.similarity(store, target, user)
					.filter(|&s| s >= self.threshold)
					.map(|similarity| Neighbor { user, similarity })
			})
			.collect();

		tracing::debug!(
			user = target,
			threshold = self.threshold,
			candidates = candidates.len(),
			neighbors = members.len(),
			"Neighborhood computed"
		);

		Neighborhood { target, members }
	}
}
