use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use usercf_engine::config::CliArgs;
use usercf_engine::dataset;
use usercf_engine::error::CfError;
use usercf_engine::evaluation::evaluate;
use usercf_engine::recommender::{Recommender, UserBasedBuilder, UserBasedRecommender};

fn main() {
	let args = CliArgs::parse();

	// Logs go to stderr; stdout carries program output only
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	if let Err(e) = run(&args) {
		tracing::error!("{:#}", e);
		if args.json {
			if let Some(err) = e.downcast_ref::<CfError>() {
				println!("{}", serde_json::json!({ "error": err.to_json() }));
			}
		}
		std::process::exit(1);
	}
}

fn run(args: &CliArgs) -> Result<()> {
	let options = args.evaluation_options();
	options.validate()?;

	let loaded = dataset::load_path(&args.dataset, args.load_policy())?;
	let store = loaded.store;

	let recommender = UserBasedRecommender::pearson(&store, args.threshold);
	let recommendations = recommender.recommend(args.user, args.how_many)?;

	if args.json {
		println!(
			"{}",
			serde_json::json!({
				"user": args.user,
				"recommendations": recommendations,
			})
		);
	} else {
		println!("Recommendations for user #{}:", args.user);
		for recommendation in &recommendations {
			println!("\t{}", recommendation);
		}
	}

	let builder = UserBasedBuilder::pearson(args.threshold);
	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	for trial in 0..args.trials {
		let evaluation = evaluate(&builder, &store, &options, &mut rng)?;
		if args.json {
			println!(
				"{}",
				serde_json::json!({
					"trial": trial,
					"evaluation": evaluation,
				})
			);
		} else {
			println!("Score {}: {}", trial, evaluation.score);
		}
	}

	Ok(())
}
