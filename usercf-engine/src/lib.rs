pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod neighborhood;
pub mod recommender;
pub mod similarity;
pub mod store;
pub mod types;
