//! Network-facing ingestion stages for the weekly news digest.
//!
//! Data flows strictly forward: a [`ListingSource`] yields candidates, the
//! [`ContentResolver`] fetches each page's description with per-item failure
//! isolation, the [`Normalizer`] cleans text, the [`Deduplicator`] and
//! [`WindowFilter`] bound the record set, and the [`Pipeline`] sequences
//! them per topic and hands each topic to a [`Summarizer`].

pub mod dedup;
pub mod error;
pub mod extract;
pub mod listing;
pub mod normalize;
pub mod pipeline;
pub mod relevance;
pub mod resolve;
pub mod summary;
pub mod window;

mod retry;

pub use dedup::Deduplicator;
pub use error::IngestError;
pub use extract::extract_description;
pub use listing::{
    parse_published_at, ConfiguredListing, GoogleNewsRssListing, ListingSource, NewsPageListing,
    SerpApiListing,
};
pub use normalize::{polish_summary, Normalizer};
pub use pipeline::Pipeline;
pub use relevance::{AcceptAll, KeywordFilter, RelevanceFilter};
pub use resolve::ContentResolver;
pub use summary::{ChatSummarizer, DigestSummarizer, LeadSummarizer, Summarizer};
pub use window::WindowFilter;
