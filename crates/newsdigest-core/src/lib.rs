//! Shared configuration and data model for the weekly news digest.
//!
//! Everything here is synchronous and I/O-free apart from loading `.env`
//! and the company list; the network-facing stages live in
//! `newsdigest-ingest`.

pub mod app_config;
pub mod companies;
pub mod config;
pub mod error;
pub mod records;

pub use app_config::{AppConfig, ListingProvider, SimilarityMetric};
pub use companies::{load_companies, resolve_companies, CompaniesFile, CompanyConfig};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with};
pub use error::ConfigError;
pub use records::{
    CandidateItem, DigestReport, FetchErrorKind, NormalizedItem, Record, ResolvedItem,
    TopicDigest, TopicKind, TopicStatus, NO_MATERIAL_DEVELOPMENTS,
};
