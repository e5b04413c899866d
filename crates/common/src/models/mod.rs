//! Canonical work model shared by the pipeline, the grapher and the HTTP layer

mod work;

pub use work::{join_authors, SeedWork, SourceRecord, Work};
