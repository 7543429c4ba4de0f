//! Google News RSS search listing.

use std::time::Duration;

use newsdigest_core::CandidateItem;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

use super::{into_candidates, ListingSource, RawListing};
use crate::error::IngestError;
use crate::retry::retry_with_backoff;

const SOURCE: &str = "google_news_rss";

/// Google News RSS client. Items are never locked.
pub struct GoogleNewsRssListing {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GoogleNewsRssListing {
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn search_url(&self, term: &str) -> String {
        let encoded = utf8_percent_encode(term, NON_ALPHANUMERIC).to_string();
        format!(
            "{}/rss/search?q={encoded}&hl=en-US&gl=US&ceid=US:en",
            self.base_url
        )
    }

    async fn fetch_feed(&self, url: &str) -> Result<String, IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl ListingSource for GoogleNewsRssListing {
    async fn fetch_listing(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, IngestError> {
        let url = self.search_url(term);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_feed(&url)
        })
        .await?;
        let candidates = into_candidates(parse_rss_items(&body)?, limit, SOURCE);
        tracing::debug!(term, count = candidates.len(), "google news rss listing parsed");
        Ok(candidates)
    }
}

/// Parse `<item>` `title`/`link`/`pubDate` triples out of an RSS document.
///
/// # Errors
///
/// Returns [`IngestError::Xml`] if the XML is malformed.
pub(crate) fn parse_rss_items(xml: &str) -> Result<Vec<RawListing>, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    pub_date.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    rows.push(RawListing {
                        title: title.clone(),
                        published_raw: pub_date.clone(),
                        link: link.clone(),
                        locked: false,
                    });
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    assign_field(&current_tag, text, &mut title, &mut link, &mut pub_date);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&current_tag, text, &mut title, &mut link, &mut pub_date);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(IngestError::Xml(e)),
            _ => {}
        }
    }

    Ok(rows)
}

fn assign_field(tag: &str, text: String, title: &mut String, link: &mut String, date: &mut String) {
    match tag {
        "title" => *title = text,
        "link" => *link = text,
        "pubDate" => *date = text,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Google News</title>
    <item>
      <title>Clariant opens surfactant plant in Dahej</title>
      <link>https://news.example.com/clariant-dahej</link>
      <pubDate>Sun, 10 Mar 2024 08:00:00 GMT</pubDate>
      <description>&lt;a href="x"&gt;Clariant&lt;/a&gt;</description>
    </item>
    <item>
      <title><![CDATA[Evonik & partners expand EO capacity]]></title>
      <link>https://news.example.com/evonik-eo</link>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_in_order() {
        let rows = parse_rss_items(SAMPLE_RSS).expect("should parse valid RSS");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Clariant opens surfactant plant in Dahej");
        assert_eq!(rows[0].link, "https://news.example.com/clariant-dahej");
        assert_eq!(rows[0].published_raw, "Sun, 10 Mar 2024 08:00:00 GMT");
        assert_eq!(rows[1].title, "Evonik & partners expand EO capacity");
    }

    #[test]
    fn unparseable_pub_date_is_dropped_by_candidate_conversion() {
        let rows = parse_rss_items(SAMPLE_RSS).unwrap();
        let candidates = into_candidates(rows, 10, SOURCE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].link, "https://news.example.com/clariant-dahej");
    }

    #[test]
    fn channel_title_is_not_an_item() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Feed</title></channel></rss>"#;
        assert!(parse_rss_items(xml).unwrap().is_empty());
    }

    #[test]
    fn search_url_encodes_term() {
        let listing = GoogleNewsRssListing::new("https://news.google.com/", 5, "test").unwrap();
        let url = listing.search_url("ethylene oxide");
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=ethylene%20oxide&hl=en-US&gl=US&ceid=US:en"
        );
    }
}
