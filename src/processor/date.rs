//! Date processor

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

use super::{processor_error, Processor};
use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::Result;

/// Normalizes date strings in front-matter to RFC 3339
///
/// Front-matter dates come in many shapes (`2024-01-15`, `2024/01/15 10:30`,
/// ...). Rewriting them to RFC 3339 lets model types use
/// `chrono::DateTime` fields directly.
pub struct DateProcessor {
    properties: Vec<String>,
}

impl DateProcessor {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DateProcessor {
    fn default() -> Self {
        Self::new(["date", "updated"])
    }
}

impl Processor for DateProcessor {
    fn process(&self, data: &mut Mapping, _type_name: &str, content: &Content) -> Result<()> {
        for property in &self.properties {
            let Some(Value::String(raw)) = data.get(property) else {
                continue;
            };

            let date = parse_date_string(raw).ok_or_else(|| {
                processor_error(
                    "DateProcessor",
                    content,
                    format!("cannot parse \"{}\" as a date in \"{}\"", raw, property),
                )
            })?;

            data.insert(property.clone(), date.to_rfc3339().into());
        }
        Ok(())
    }
}

/// Parse a date string in various formats
///
/// Dates without an offset are taken in the local timezone.
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local));
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).earliest();
        }
    }

    None
}
