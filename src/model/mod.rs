//! Domain types for presence searches
//!
//! Streams and participants are transient crawl values; `MatchRecord` and
//! `SearchReport` are the serializable output.

mod category;
mod participant;
mod report;
mod stream;

pub use category::Category;
pub use participant::{Credits, Participant, Role};
pub use report::{MatchRecord, ProfileLinks, SearchReport};
pub use stream::{StreamRef, TargetSet};
