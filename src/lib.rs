pub mod cli;
pub mod collection;
pub mod complaints;
pub mod error;
pub mod listing;
pub mod normalize;
pub mod plan;
pub mod profit;
pub mod record;
pub mod report;
pub mod resolve;
pub mod score;
pub mod store;

pub use error::{ProspectError, Result};
