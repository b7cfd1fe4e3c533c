//! Machine record model
//!
//! Decodes the compliance snapshot the collection endpoint reports for each
//! machine. Every field is optional on the wire, and a field carrying the wrong
//! JSON type is treated as missing rather than failing the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::Display;

/// Decode a field leniently: anything that does not fit `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], for check blocks. Serde would also read a JSON array
/// positionally into a struct, so only objects are accepted.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskEncryption {
    #[serde(default, deserialize_with = "lenient")]
    pub encrypted: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsUpdate {
    #[serde(default, deserialize_with = "lenient")]
    pub up_to_date: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Antivirus {
    #[serde(default, deserialize_with = "lenient")]
    pub antivirus_present: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepSettings {
    #[serde(default, deserialize_with = "lenient")]
    pub compliant: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub sleep_timeout_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<String>,
}

/// The four compliance checks every machine reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum CheckKind {
    #[strum(to_string = "Disk Encryption")]
    DiskEncryption,
    #[strum(to_string = "OS Updates")]
    OsUpdate,
    #[strum(to_string = "Antivirus")]
    Antivirus,
    #[strum(to_string = "Sleep Settings")]
    SleepSettings,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::DiskEncryption,
        CheckKind::OsUpdate,
        CheckKind::Antivirus,
        CheckKind::SleepSettings,
    ];

    /// Name of the boolean property that carries the verdict.
    pub fn property(&self) -> &'static str {
        match self {
            CheckKind::DiskEncryption => "encrypted",
            CheckKind::OsUpdate => "up_to_date",
            CheckKind::Antivirus => "antivirus_present",
            CheckKind::SleepSettings => "compliant",
        }
    }

    /// Narrow column header used by the table renderers.
    pub fn short_label(&self) -> &'static str {
        match self {
            CheckKind::DiskEncryption => "Encryption",
            CheckKind::OsUpdate => "Updates",
            CheckKind::Antivirus => "Antivirus",
            CheckKind::SleepSettings => "Sleep",
        }
    }
}

/// Latest compliance snapshot for one monitored machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub machine_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub os: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub disk_encryption: Option<DiskEncryption>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub os_update: Option<OsUpdate>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub antivirus: Option<Antivirus>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub sleep_settings: Option<SleepSettings>,
    /// The record exactly as the server sent it.
    #[serde(skip)]
    pub raw: Value,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl MachineRecord {
    /// Decode a record from JSON, keeping the original value for display.
    ///
    /// # Errors
    /// Returns an error only when `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "machine record must be an object, got {}",
                json_type_name(&value)
            )));
        }
        let mut record: MachineRecord = serde_json::from_value(value.clone())?;
        record.raw = value;
        Ok(record)
    }

    /// Verdict of one check: `None` when the check or its property is missing.
    pub fn check_value(&self, kind: CheckKind) -> Option<bool> {
        match kind {
            CheckKind::DiskEncryption => self.disk_encryption.as_ref()?.encrypted,
            CheckKind::OsUpdate => self.os_update.as_ref()?.up_to_date,
            CheckKind::Antivirus => self.antivirus.as_ref()?.antivirus_present,
            CheckKind::SleepSettings => self.sleep_settings.as_ref()?.compliant,
        }
    }

    /// Whether the record carries a block for this check at all.
    pub fn has_check(&self, kind: CheckKind) -> bool {
        match kind {
            CheckKind::DiskEncryption => self.disk_encryption.is_some(),
            CheckKind::OsUpdate => self.os_update.is_some(),
            CheckKind::Antivirus => self.antivirus.is_some(),
            CheckKind::SleepSettings => self.sleep_settings.is_some(),
        }
    }

    /// Free-form text attached to a check.
    pub fn check_details(&self, kind: CheckKind) -> Option<&str> {
        let details = match kind {
            CheckKind::DiskEncryption => self.disk_encryption.as_ref()?.details.as_deref(),
            CheckKind::OsUpdate => self.os_update.as_ref()?.details.as_deref(),
            CheckKind::Antivirus => self.antivirus.as_ref()?.status.as_deref(),
            CheckKind::SleepSettings => self.sleep_settings.as_ref()?.details.as_deref(),
        };
        details.filter(|d| !d.trim().is_empty())
    }

    /// OS name for display.
    pub fn os_name(&self) -> &str {
        match self.os.as_deref() {
            Some(os) if !os.is_empty() => os,
            _ => "Unknown",
        }
    }

    /// Report time, if the server sent a parseable one.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.timestamp.as_deref()?)
    }

    /// The JSON shown in the raw-data section of the detail view.
    pub fn raw_json(&self) -> Value {
        if self.raw.is_null() {
            serde_json::to_value(self).unwrap_or(Value::Null)
        } else {
            self.raw.clone()
        }
    }
}

/// Parse a report timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Decode the collection payload. `null` is an empty fleet; elements that are
/// not objects are dropped.
///
/// # Errors
/// Returns an error when the payload is neither an array nor `null`.
pub fn decode_list(value: Value) -> Result<Vec<MachineRecord>, serde_json::Error> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a list of machines, got {}",
                json_type_name(&other)
            )));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match MachineRecord::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping machine entry {}: {}", index, e),
        }
    }
    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "machine_id": "a1b2",
            "os": "Windows",
            "timestamp": "2025-03-01T10:15:00.123456",
            "disk_encryption": { "encrypted": true, "details": "BitLocker enabled" },
            "os_update": { "up_to_date": false, "details": "Updates available" },
            "antivirus": { "antivirus_present": true, "status": "Windows Defender active" },
            "sleep_settings": { "compliant": true, "sleep_timeout_minutes": 10, "details": "" }
        })
    }

    #[test]
    fn decodes_full_record() {
        let record = MachineRecord::from_value(sample()).unwrap();
        assert_eq!(record.machine_id, "a1b2");
        assert_eq!(record.os_name(), "Windows");
        assert_eq!(record.check_value(CheckKind::DiskEncryption), Some(true));
        assert_eq!(record.check_value(CheckKind::OsUpdate), Some(false));
        assert_eq!(
            record.check_details(CheckKind::Antivirus),
            Some("Windows Defender active")
        );
        assert_eq!(
            record.sleep_settings.as_ref().unwrap().sleep_timeout_minutes,
            Some(10)
        );
        // Blank details are treated as absent.
        assert_eq!(record.check_details(CheckKind::SleepSettings), None);
        assert_eq!(record.raw_json(), sample());
    }

    #[test]
    fn wrong_types_become_missing() {
        let record = MachineRecord::from_value(json!({
            "machine_id": 42,
            "os": null,
            "disk_encryption": { "encrypted": "yes" },
            "os_update": "not an object",
            "antivirus": null
        }))
        .unwrap();

        assert_eq!(record.machine_id, "42");
        assert_eq!(record.os_name(), "Unknown");
        assert!(record.has_check(CheckKind::DiskEncryption));
        assert_eq!(record.check_value(CheckKind::DiskEncryption), None);
        assert!(!record.has_check(CheckKind::OsUpdate));
        assert!(!record.has_check(CheckKind::Antivirus));
        assert!(!record.has_check(CheckKind::SleepSettings));
        assert!(record.observed_at().is_none());
    }

    #[test]
    fn array_check_block_is_missing() {
        let record = MachineRecord::from_value(json!({
            "machine_id": "m",
            "disk_encryption": [false, "x"],
            "sleep_settings": [true]
        }))
        .unwrap();

        assert_eq!(record.check_value(CheckKind::DiskEncryption), None);
        assert_eq!(record.check_value(CheckKind::SleepSettings), None);
        assert!(!record.has_check(CheckKind::DiskEncryption));
    }

    #[test]
    fn rejects_non_object_record() {
        assert!(MachineRecord::from_value(json!("machine")).is_err());
    }

    #[test]
    fn decode_list_handles_null_and_junk_entries() {
        assert!(decode_list(Value::Null).unwrap().is_empty());

        let records = decode_list(json!([sample(), 7, null, { "machine_id": "x" }])).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.machine_id.as_str()).collect();
        assert_eq!(ids, vec!["a1b2", "x"]);

        assert!(decode_list(json!({ "machines": [] })).is_err());
    }

    #[test]
    fn parses_timestamp_variants() {
        let naive = parse_timestamp("2025-03-01T10:15:00.123456").unwrap();
        assert_eq!((naive.year(), naive.hour(), naive.minute()), (2025, 10, 15));

        let offset = parse_timestamp("2025-03-01T12:15:00+02:00").unwrap();
        assert_eq!(offset.hour(), 10);

        let spaced = parse_timestamp("2025-03-01 10:15:00").unwrap();
        assert_eq!(spaced.minute(), 15);

        let http_date = parse_timestamp("Sat, 01 Mar 2025 10:15:00 GMT").unwrap();
        assert_eq!(http_date.hour(), 10);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
