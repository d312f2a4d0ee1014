use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct RegisterRecord {
    pub(crate) line: u64,
    pub(crate) row: RegisterRow,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RegisterRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: RegisterRow = record.deserialize(Some(&headers))?;
        records.push(RegisterRecord { line, row });
    }

    Ok(records)
}

/// One line of a compliance register export. A line describes either a compliance item or
/// a corrective action; store attributes repeat on every line.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRow {
    pub(crate) store_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) store_name: Option<String>,
    pub(crate) zone: String,
    pub(crate) store_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) high_foot_traffic: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) repeat_offender: Option<String>,
    pub(crate) updated_at: String,
    pub(crate) record: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) has_evidence: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) expiry_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) verification_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) severity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) action_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) due_date: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Some(false),
        Some(raw) => match raw.as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_datetime_supports_rfc3339_and_plain_dates() {
        assert_eq!(
            parse_datetime("2025-09-24T10:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2025, 9, 24, 8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_datetime("2025-09-30"),
            Some(Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap())
        );
        assert!(parse_datetime("  ").is_none());
        assert!(parse_datetime("next tuesday").is_none());
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag(None), Some(false));
        assert_eq!(parse_flag(Some("Yes")), Some(true));
        assert_eq!(parse_flag(Some("0")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
    }
}
