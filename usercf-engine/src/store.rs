// ---------------------------------------------------------------------------
// Rating Store: in-memory (user, item) -> rating map
// ---------------------------------------------------------------------------
//
// Ratings are indexed twice, by user and by item, so that both lookup
// directions are a single map access. Both indexes are ordered maps: every
// iteration over users or items is deterministic, which keeps similarity
// sums, neighborhoods and recommendation lists reproducible across reloads.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::dataset::{self, LoadPolicy};
use crate::error::CfError;
use crate::types::{ItemId, Rating, UserId};

#[derive(Debug, Clone, Default)]
pub struct RatingStore {
	by_user: BTreeMap<UserId, BTreeMap<ItemId, f64>>,
	by_item: BTreeMap<ItemId, BTreeMap<UserId, f64>>,
	len: usize,
}

impl RatingStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a store from ratings in order. A later rating for the same
	/// (user, item) pair replaces the earlier one.
	pub fn from_ratings<I>(ratings: I) -> Self
	where
		I: IntoIterator<Item = Rating>,
	{
		let mut store = Self::new();
		for rating in ratings {
			store.insert(rating);
		}
		store
	}

	/// Load a dataset file with the strict policy: the first malformed
	/// record fails the whole load.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, CfError> {
		Ok(dataset::load_path(path, LoadPolicy::Strict)?.store)
	}

	pub(crate) fn insert(&mut self, rating: Rating) -> Option<f64> {
		let previous = self
			.by_user
			.entry(rating.user)
			.or_default()
			.insert(rating.item, rating.value);
		self.by_item
			.entry(rating.item)
			.or_default()
			.insert(rating.user, rating.value);
		if previous.is_none() {
			self.len += 1;
		}
		previous
	}

	// -- lookups --------------------------------------------------------------

	/// All (item, value) pairs rated by `user`, ordered by item. Empty for an
	/// unknown user.
	pub fn ratings_for_user(&self, user: UserId) -> impl Iterator<Item = (ItemId, f64)> + '_ {
		self.by_user
			.get(&user)
			.into_iter()
			.flat_map(|items| items.iter().map(|(&item, &value)| (item, value)))
	}

	/// All (user, value) pairs for `item`, ordered by user. Empty for an
	/// unknown item.
	pub fn ratings_for_item(&self, item: ItemId) -> impl Iterator<Item = (UserId, f64)> + '_ {
		self.by_item
			.get(&item)
			.into_iter()
			.flat_map(|users| users.iter().map(|(&user, &value)| (user, value)))
	}

	pub(crate) fn user_ratings(&self, user: UserId) -> Option<&BTreeMap<ItemId, f64>> {
		self.by_user.get(&user)
	}

	pub fn rating(&self, user: UserId, item: ItemId) -> Option<f64> {
		self.by_user.get(&user)?.get(&item).copied()
	}

	pub fn all_users(&self) -> BTreeSet<UserId> {
		self.by_user.keys().copied().collect()
	}

	pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
		self.by_user.keys().copied()
	}

	pub fn contains_user(&self, user: UserId) -> bool {
		self.by_user.contains_key(&user)
	}

	/// Every rating, ordered by user then item.
	pub fn iter(&self) -> impl Iterator<Item = Rating> + '_ {
		self.by_user.iter().flat_map(|(&user, items)| {
			items
				.iter()
				.map(move |(&item, &value)| Rating::new(user, item, value))
		})
	}

	/// Smallest and largest rating value in the store.
	pub fn rating_range(&self) -> Option<(f64, f64)> {
		self.iter().map(|r| r.value).fold(None, |acc, v| match acc {
			None => Some((v, v)),
			Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
		})
	}

	pub fn num_users(&self) -> usize {
		self.by_user.len()
	}

	pub fn num_items(&self) -> usize {
		self.by_item.len()
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> RatingStore {
		RatingStore::from_ratings([
			Rating::new(1, 10, 1.0),
			Rating::new(1, 11, 2.0),
			Rating::new(2, 10, 1.0),
			Rating::new(2, 11, 2.0),
			Rating::new(2, 12, 5.0),
		])
	}

	#[test]
	fn indexes_by_user_and_item() {
		let store = sample();
		assert_eq!(store.len(), 5);
		assert_eq!(store.num_users(), 2);
		assert_eq!(store.num_items(), 3);

		let user2: Vec<_> = store.ratings_for_user(2).collect();
		assert_eq!(user2, vec![(10, 1.0), (11, 2.0), (12, 5.0)]);

		let item10: Vec<_> = store.ratings_for_item(10).collect();
		assert_eq!(item10, vec![(1, 1.0), (2, 1.0)]);
	}

	#[test]
	fn unknown_ids_yield_empty_sequences() {
		let store = sample();
		assert_eq!(store.ratings_for_user(99).count(), 0);
		assert_eq!(store.ratings_for_item(99).count(), 0);
		assert_eq!(store.rating(99, 10), None);
		assert!(!store.contains_user(99));
	}

	#[test]
	fn later_duplicates_overwrite() {
		let store = RatingStore::from_ratings([
			Rating::new(1, 10, 1.0),
			Rating::new(1, 10, 4.5),
		]);
		assert_eq!(store.len(), 1);
		assert_eq!(store.rating(1, 10), Some(4.5));
		assert_eq!(store.ratings_for_item(10).collect::<Vec<_>>(), vec![(1, 4.5)]);
	}

	#[test]
	fn all_users_is_a_set() {
		let store = sample();
		let users: Vec<_> = store.all_users().into_iter().collect();
		assert_eq!(users, vec![1, 2]);
	}

	#[test]
	fn iter_is_ordered_by_user_then_item() {
		let store = RatingStore::from_ratings([
			Rating::new(2, 5, 1.0),
			Rating::new(1, 9, 2.0),
			Rating::new(1, 3, 3.0),
		]);
		let keys: Vec<_> = store.iter().map(|r| (r.user, r.item)).collect();
		assert_eq!(keys, vec![(1, 3), (1, 9), (2, 5)]);
	}

	#[test]
	fn rating_range_spans_all_values() {
		assert_eq!(sample().rating_range(), Some((1.0, 5.0)));
		assert_eq!(RatingStore::new().rating_range(), None);
	}
}
