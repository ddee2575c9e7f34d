//! Scan session state - deduplicated event store and display evaluation

mod evaluator;
mod store;

pub use evaluator::{Counters, Identity, SessionEvaluator};
pub use store::EventStore;
