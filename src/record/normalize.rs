//! Record normalization — raw type-tagged fields into canonical entries.
//!
//! Extraction never fails: a missing property, a mismatched type tag, or an
//! unparseable date all degrade to the field's zero value. Every raw record
//! produces a `LogEntry`.

use crate::record::types::{LogEntry, RawField, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Convert a raw record into the canonical normalized form.
pub fn normalize(raw: &RawRecord) -> LogEntry {
    LogEntry {
        id: raw.id.clone(),
        log_entry: text(raw, "Log Entry"),
        date: parse_instant(&date_start(raw, "Date")),
        project_name: text(raw, "Project Name"),
        version: text(raw, "Version"),
        platform: select(raw, "Platform"),
        release_type: select(raw, "Release Type"),
        previous_status: select(raw, "Previous Status"),
        new_status: select(raw, "New Status"),
        team: select(raw, "Team"),
        sub_team: select(raw, "Sub-team"),
        changed_by: people(raw, "Changed By"),
        whats_new: text(raw, "What's New"),
        automation_source: checkbox(raw, "Automation Source"),
        project_link: relation_ids(raw, "Project Link"),
        created_time: raw.created_time.clone(),
        last_edited_time: raw.last_edited_time.clone(),
    }
}

/// Parse an instant string to a timezone-naive timestamp.
///
/// Offsets are stripped, not converted: `2025-01-15T10:00:00+03:00` keeps
/// the 10:00 wall-clock reading. Date-only strings become midnight.
/// Anything unparseable is `None`.
pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// First fragment's plain text from a title or rich-text field.
fn text(raw: &RawRecord, name: &str) -> String {
    match raw.properties.get(name) {
        Some(RawField::Title { title }) => first_plain_text(title),
        Some(RawField::RichText { rich_text }) => first_plain_text(rich_text),
        _ => String::new(),
    }
}

fn first_plain_text(fragments: &[crate::record::types::TextFragment]) -> String {
    fragments
        .first()
        .map(|f| f.plain_text.clone())
        .unwrap_or_default()
}

/// Selected option name from a select or status field.
fn select(raw: &RawRecord, name: &str) -> String {
    match raw.properties.get(name) {
        Some(RawField::Select { select: Some(v) }) => v.name.clone(),
        Some(RawField::Status { status: Some(v) }) => v.name.clone(),
        _ => String::new(),
    }
}

/// Start instant string from a date field, empty when unset.
fn date_start(raw: &RawRecord, name: &str) -> String {
    match raw.properties.get(name) {
        Some(RawField::Date { date: Some(v) }) => v.start.clone(),
        _ => String::new(),
    }
}

fn checkbox(raw: &RawRecord, name: &str) -> bool {
    match raw.properties.get(name) {
        Some(RawField::Checkbox { checkbox }) => *checkbox,
        _ => false,
    }
}

/// Display names from a people field, upstream order kept.
fn people(raw: &RawRecord, name: &str) -> Vec<String> {
    match raw.properties.get(name) {
        Some(RawField::People { people }) => people.iter().map(|p| p.name.clone()).collect(),
        _ => Vec::new(),
    }
}

fn relation_ids(raw: &RawRecord, name: &str) -> Vec<String> {
    match raw.properties.get(name) {
        Some(RawField::Relation { relation }) => relation.iter().map(|r| r.id.clone()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::types::RawField;
    use chrono::Timelike;
    use std::collections::BTreeMap;

    fn record_with(fields: Vec<(&str, RawField)>) -> RawRecord {
        RawRecord {
            id: "rec-1".to_string(),
            created_time: "2025-01-10T08:00:00.000Z".to_string(),
            last_edited_time: "2025-01-15T09:30:00.000Z".to_string(),
            properties: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_normalize_full_record() {
        let raw = record_with(vec![
            ("Log Entry", RawField::title("Snake Run - QA → LIVE")),
            ("Date", RawField::date("2025-01-15T10:00:00")),
            ("Project Name", RawField::rich_text("Snake Run: Crawl Chase")),
            ("Version", RawField::rich_text("1.4.2")),
            ("Platform", RawField::select("GP")),
            ("Release Type", RawField::select("Update")),
            ("Previous Status", RawField::status("QA")),
            ("New Status", RawField::status("LIVE")),
            ("Team", RawField::select("AMZ Growth Team")),
            ("Sub-team", RawField::select("TOKYO")),
            ("Changed By", RawField::people(["Ada Park", "Leo Moss"])),
            ("What's New", RawField::rich_text("Fixed crash on iOS 17")),
            ("Automation Source", RawField::checkbox(true)),
            ("Project Link", RawField::relation(["proj-9"])),
        ]);

        let entry = normalize(&raw);
        assert_eq!(entry.id, "rec-1");
        assert_eq!(entry.log_entry, "Snake Run - QA → LIVE");
        assert_eq!(entry.project_name, "Snake Run: Crawl Chase");
        assert_eq!(entry.version, "1.4.2");
        assert_eq!(entry.platform, "GP");
        assert_eq!(entry.release_type, "Update");
        assert_eq!(entry.previous_status, "QA");
        assert_eq!(entry.new_status, "LIVE");
        assert_eq!(entry.team, "AMZ Growth Team");
        assert_eq!(entry.sub_team, "TOKYO");
        assert_eq!(entry.changed_by, vec!["Ada Park", "Leo Moss"]);
        assert_eq!(entry.whats_new, "Fixed crash on iOS 17");
        assert!(entry.automation_source);
        assert_eq!(entry.project_link, vec!["proj-9"]);
        assert_eq!(entry.created_time, "2025-01-10T08:00:00.000Z");

        let date = entry.date.unwrap();
        assert_eq!(date.to_string(), "2025-01-15 10:00:00");
    }

    #[test]
    fn test_missing_fields_degrade_to_zero_values() {
        let raw = record_with(vec![]);
        let entry = normalize(&raw);

        assert_eq!(entry.project_name, "");
        assert_eq!(entry.team, "");
        assert_eq!(entry.new_status, "");
        assert!(entry.changed_by.is_empty());
        assert!(entry.project_link.is_empty());
        assert!(!entry.automation_source);
        assert!(entry.date.is_none());
    }

    #[test]
    fn test_mismatched_type_tag_degrades() {
        // Team declared as rich text instead of select; date as a checkbox.
        let raw = record_with(vec![
            ("Team", RawField::rich_text("AMZ Growth Team")),
            ("Date", RawField::checkbox(true)),
        ]);
        let entry = normalize(&raw);
        assert_eq!(entry.team, "");
        assert!(entry.date.is_none());
    }

    #[test]
    fn test_empty_select_and_empty_text_array() {
        let raw = record_with(vec![
            ("Team", RawField::Select { select: None }),
            ("Project Name", RawField::RichText { rich_text: vec![] }),
        ]);
        let entry = normalize(&raw);
        assert_eq!(entry.team, "");
        assert_eq!(entry.project_name, "");
    }

    #[test]
    fn test_parse_instant_strips_offset() {
        let dt = parse_instant("2025-01-15T10:00:00.000+03:00").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.to_string(), "2025-01-15 10:00:00");

        let utc = parse_instant("2025-01-15T10:00:00Z").unwrap();
        assert_eq!(utc.hour(), 10);
    }

    #[test]
    fn test_parse_instant_naive_and_date_only() {
        assert_eq!(
            parse_instant("2025-01-15T23:59:59").unwrap().to_string(),
            "2025-01-15 23:59:59"
        );
        assert_eq!(
            parse_instant("2025-01-15").unwrap().to_string(),
            "2025-01-15 00:00:00"
        );
    }

    #[test]
    fn test_parse_instant_garbage_is_none() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("   ").is_none());
        assert!(parse_instant("not a date").is_none());
        assert!(parse_instant("2025-13-40").is_none());
    }
}
