use thiserror::Error;

/// Failures that abort a single listing call or summarizer call.
///
/// Per-item page failures never surface here; they are recorded on the
/// item as a [`newsdigest_core::FetchErrorKind`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("listing provider error: {0}")]
    Provider(String),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("summarizer error: {0}")]
    Summarizer(String),
}
