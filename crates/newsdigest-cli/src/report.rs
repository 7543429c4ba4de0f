//! Digest rendering for the `run` command.

use std::fmt::{self, Write as _};

use anyhow::Context;
use newsdigest_core::{DigestReport, TopicDigest, TopicStatus};

pub(crate) fn render_json(report: &DigestReport) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).context("serializing digest report")
}

/// Markdown rendering: run header, then the industry topic, then each
/// company in configured order.
pub(crate) fn render_text(report: &DigestReport) -> anyhow::Result<String> {
    let mut out = String::new();
    write_report(&mut out, report).context("rendering digest text")?;
    Ok(out.trim_end().to_string())
}

fn write_report(out: &mut String, report: &DigestReport) -> fmt::Result {
    let generated = report.generated_at.format("%Y-%m-%d %H:%M UTC");

    writeln!(out, "# Weekly Industry Digest")?;
    writeln!(out)?;
    writeln!(out, "**Generated**: {generated}")?;
    writeln!(out, "**Run**: {}", report.run_id)?;
    writeln!(out)?;

    write_topic(out, "Industry", &report.industry)?;
    for company in &report.companies {
        write_topic(out, "Company", company)?;
    }
    Ok(())
}

fn write_topic(out: &mut String, label: &str, topic: &TopicDigest) -> fmt::Result {
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "## {label}: {}", topic.topic)?;
    writeln!(out)?;
    writeln!(out, "{}", topic.summary)?;
    writeln!(out)?;

    if let TopicStatus::ListingUnavailable(reason) = &topic.status {
        writeln!(out, "_Listing unavailable: {reason}_")?;
        writeln!(out)?;
    }

    for record in &topic.records {
        writeln!(out, "- **{}** ({})", record.heading, record.date)?;
        writeln!(out, "  {}", record.content)?;
        writeln!(out, "  <{}>", record.link)?;
    }
    if !topic.records.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use newsdigest_core::{Record, TopicKind, NO_MATERIAL_DEVELOPMENTS};

    use super::*;

    fn sample_report() -> DigestReport {
        DigestReport {
            run_id: "2f1c9a52-8d55-4c6e-9d7f-0c5b1a3e4d21".parse().unwrap(),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap(),
            industry: TopicDigest {
                topic: "specialty chemicals".to_string(),
                kind: TopicKind::Industry,
                status: TopicStatus::Ok,
                records: vec![Record {
                    heading: "BASF plans new EO plant in Antwerp".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                    link: "https://news.example.com/basf-eo".to_string(),
                    content: "BASF plans new EO plant in Antwerp.".to_string(),
                }],
                summary: "BASF is adding EO capacity.".to_string(),
            },
            companies: vec![TopicDigest::empty(
                "Dow",
                TopicKind::Company,
                TopicStatus::ListingUnavailable("quota exhausted".to_string()),
            )],
        }
    }

    #[test]
    fn text_lists_topics_in_order_with_records() {
        let text = render_text(&sample_report()).unwrap();

        assert!(text.starts_with("# Weekly Industry Digest"));
        assert!(text.contains("**Generated**: 2024-03-10 08:00 UTC"));
        let industry = text.find("## Industry: specialty chemicals").unwrap();
        let dow = text.find("## Company: Dow").unwrap();
        assert!(industry < dow);
        assert!(text.contains("- **BASF plans new EO plant in Antwerp** (2024-03-10)"));
        assert!(text.contains("  <https://news.example.com/basf-eo>"));
    }

    #[test]
    fn text_shows_placeholder_and_listing_failure() {
        let text = render_text(&sample_report()).unwrap();
        assert!(text.contains(NO_MATERIAL_DEVELOPMENTS));
        assert!(text.contains("_Listing unavailable: quota exhausted_"));
    }

    #[test]
    fn text_separates_each_topic_and_trims_trailing_newlines() {
        let text = render_text(&sample_report()).unwrap();
        assert_eq!(text.matches("\n---\n").count(), 2);
        assert!(text.ends_with("_Listing unavailable: quota exhausted_"));
    }

    #[test]
    fn json_keeps_stable_shape() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["industry"]["kind"], "industry");
        assert_eq!(value["industry"]["status"]["state"], "ok");
        assert_eq!(value["industry"]["records"][0]["date"], "2024-03-10");
        assert_eq!(
            value["companies"][0]["status"],
            serde_json::json!({ "state": "listing_unavailable", "reason": "quota exhausted" })
        );
        assert_eq!(value["companies"][0]["summary"], NO_MATERIAL_DEVELOPMENTS);
    }
}
