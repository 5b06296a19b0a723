use clap::Parser;

use crate::dataset::LoadPolicy;
use crate::evaluation::EvaluationOptions;
use crate::types::UserId;

#[derive(Parser, Debug)]
#[command(
	name = "usercf-engine",
	about = "User-based collaborative filtering: recommend items and score the recommender"
)]
pub struct CliArgs {
	/// Ratings file with `userID,itemID,value` records
	#[arg(long, default_value = "dataset.csv", env = "USERCF_DATASET")]
	pub dataset: String,

	/// User to recommend items for
	#[arg(long, default_value = "2", env = "USERCF_USER")]
	pub user: UserId,

	/// Number of items to recommend
	#[arg(long, default_value = "3")]
	pub how_many: usize,

	/// Minimum Pearson correlation for a user to count as a neighbor
	#[arg(long, default_value = "0.1", env = "USERCF_THRESHOLD", allow_hyphen_values = true)]
	pub threshold: f64,

	/// Probability that a rating goes to the training split
	#[arg(long, default_value = "0.9")]
	pub training_fraction: f64,

	/// Probability that a user takes part in an evaluation trial
	#[arg(long, default_value = "1.0")]
	pub evaluation_fraction: f64,

	/// Number of evaluation trials (0 skips evaluation)
	#[arg(long, default_value = "10")]
	pub trials: usize,

	/// Seed for the train/test splits; omit for a fresh seed per run
	#[arg(long, env = "USERCF_SEED")]
	pub seed: Option<u64>,

	/// Skip malformed records with a warning instead of failing the load
	#[arg(long)]
	pub lenient: bool,

	/// Emit newline-delimited JSON instead of text
	#[arg(long)]
	pub json: bool,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "USERCF_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn load_policy(&self) -> LoadPolicy {
		if self.lenient {
			LoadPolicy::Lenient
		} else {
			LoadPolicy::Strict
		}
	}

	pub fn evaluation_options(&self) -> EvaluationOptions {
		EvaluationOptions {
			training_fraction: self.training_fraction,
			evaluation_fraction: self.evaluation_fraction,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_example_program() {
		let args = CliArgs::try_parse_from(["usercf-engine"]).unwrap();
		assert_eq!(args.dataset, "dataset.csv");
		assert_eq!(args.user, 2);
		assert_eq!(args.how_many, 3);
		assert!((args.threshold - 0.1).abs() < 1e-12);
		assert_eq!(args.trials, 10);
		assert_eq!(args.seed, None);
		assert_eq!(args.load_policy(), LoadPolicy::Strict);
		let options = args.evaluation_options();
		assert!((options.training_fraction - 0.9).abs() < 1e-12);
		assert!((options.evaluation_fraction - 1.0).abs() < 1e-12);
	}

	#[test]
	fn parses_overrides() {
		let args = CliArgs::try_parse_from([
			"usercf-engine",
			"--dataset",
			"ratings.tsv",
			"--user",
			"7",
			"--threshold",
			"-0.25",
			"--seed",
			"99",
			"--lenient",
			"--json",
		])
		.unwrap();
		assert_eq!(args.dataset, "ratings.tsv");
		assert_eq!(args.user, 7);
		assert!((args.threshold + 0.25).abs() < 1e-12);
		assert_eq!(args.seed, Some(99));
		assert_eq!(args.load_policy(), LoadPolicy::Lenient);
		assert!(args.json);
	}

	#[test]
	fn rejects_negative_user() {
		assert!(CliArgs::try_parse_from(["usercf-engine", "--user", "-1"]).is_err());
	}
}
