use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = u64;
pub type ItemId = u64;

/// A single preference: `user` rated `item` with `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
	pub user: UserId,
	pub item: ItemId,
	pub value: f64,
}

impl Rating {
	pub fn new(user: UserId, item: ItemId, value: f64) -> Self {
		Self { user, item, value }
	}
}

/// An unrated item together with its predicted score for one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub item: ItemId,
	pub score: f64,
}

impl fmt::Display for Recommendation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RecommendedItem[item:{}, value:{:.4}]", self.item, self.score)
	}
}

/// Outcome of one evaluation trial. A trial in which no held-out point could
/// be predicted has no meaningful error and is reported as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum EvaluationScore {
	MeanAbsoluteError(f64),
	InsufficientData,
}

impl fmt::Display for EvaluationScore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MeanAbsoluteError(mae) => write!(f, "{mae:.6}"),
			Self::InsufficientData => write!(f, "insufficient data"),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
	pub score: EvaluationScore,
	/// Held-out points that received a prediction.
	pub evaluated: usize,
	/// Held-out points skipped because no prediction could be made.
	pub unpredictable: usize,
	#[serde(rename = "trainingRatings")]
	pub training_ratings: usize,
	#[serde(rename = "testRatings")]
	pub test_ratings: usize,
}

impl Evaluation {
	pub fn mae(&self) -> Option<f64> {
		match self.score {
			EvaluationScore::MeanAbsoluteError(mae) => Some(mae),
			EvaluationScore::InsufficientData => None,
		}
	}
}
