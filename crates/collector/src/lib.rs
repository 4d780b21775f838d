pub mod fetcher;
pub mod service;

pub use service::{ActivitySet, Aggregate, Collector, HackathonSnapshot};
