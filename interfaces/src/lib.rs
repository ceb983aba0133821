pub mod defs;

pub use defs::{LocationMention, PageMode, SearchRequest, SearchResponse, SearchResultItem};
