//! Local Random Forest classifier used by the offline engine.
//!
//! Bagged CART trees with Gini splits, grown in parallel via rayon and
//! seeded through ChaCha8 for reproducible sweeps. Parameters mirror the
//! hosted `smileRandomForest` classifier.

mod config;
mod error;
mod forest;
mod node;
mod split;
mod tree;

pub use config::ForestConfig;
pub use error::ForestError;
pub use forest::RandomForest;
