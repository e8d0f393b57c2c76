//! Configuration module

mod corpus;

pub use corpus::CorpusConfig;
pub use corpus::HighlightConfig;
