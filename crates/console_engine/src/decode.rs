use chrono::DateTime;
use console_core::{HarvesterState, Metric, StatusEntry, StatusPayload, StatusSnapshot};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{FailureKind, FetchError};

const DISABLED_MARKER: &str = "disabled";
const NOT_AVAILABLE: &str = "N/A";

/// Status object as sent by the control center. Every field is optional and
/// loosely typed: counts arrive as numbers, numeric strings, or `"N/A"`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStatus {
    state: Option<String>,
    status: Option<String>,
    progress_cur: Option<Value>,
    max_docs: Option<Value>,
    cached_docs: Option<Value>,
    health: Option<Value>,
    #[serde(rename = "lastHarvestDate")]
    last_harvest_date: Option<Value>,
    #[serde(rename = "lastActivated")]
    last_activated: Option<Value>,
    #[serde(rename = "remainingHarvestTime")]
    remaining_harvest_time: Option<Value>,
    gui_status: Option<Value>,
    data_pvd: Option<Value>,
}

impl RawStatus {
    fn into_snapshot(self) -> StatusSnapshot {
        let state = self
            .state
            .or(self.status)
            .map(|raw| HarvesterState::parse(&raw))
            .unwrap_or_else(|| HarvesterState::Other("no status".to_string()));
        StatusSnapshot {
            state,
            progress_cur: metric(self.progress_cur.as_ref()),
            max_docs: metric(self.max_docs.as_ref()),
            cached_docs: metric(self.cached_docs.as_ref()).count(),
            health: self.health.as_ref().map(text),
            last_harvest_date: self.last_harvest_date.as_ref().and_then(timestamp_ms),
            last_activated: self.last_activated.as_ref().and_then(timestamp_ms),
            remaining_harvest_time: metric(self.remaining_harvest_time.as_ref()).count(),
            gui_status: self.gui_status.as_ref().map(text),
            data_provider: self.data_pvd.as_ref().map(text),
        }
    }
}

/// `"N/A"` is kept apart from a missing or unreadable value: only the former
/// drops the percent sign from progress text.
fn metric(value: Option<&Value>) -> Metric {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u64))
            .map_or(Metric::Unknown, Metric::Count),
        Some(Value::String(raw)) if raw.trim().eq_ignore_ascii_case(NOT_AVAILABLE) => {
            Metric::NotAvailable
        }
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<u64>()
            .map_or(Metric::Unknown, Metric::Count),
        _ => Metric::Unknown,
    }
}

/// Epoch milliseconds from a number, a numeric string, or an RFC 3339 date.
fn timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|date| date.timestamp_millis())
        }),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn object(body: &[u8]) -> Result<Map<String, Value>, FetchError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FetchError::new(
            FailureKind::Decode,
            format!("expected a JSON object, got {other}"),
        )),
        Err(err) => Err(FetchError::new(FailureKind::Decode, err.to_string())),
    }
}

/// Decodes a name-to-status mapping, preserving payload order.
pub fn decode_status_payload(body: &[u8]) -> Result<StatusPayload, FetchError> {
    let map = object(body)?;
    let mut entries = Vec::with_capacity(map.len());
    for (name, value) in map {
        let entry = match value {
            Value::String(marker) if marker.eq_ignore_ascii_case(DISABLED_MARKER) => {
                StatusEntry::Disabled
            }
            Value::Object(_) => {
                let raw: RawStatus = serde_json::from_value(value)
                    .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
                StatusEntry::Status(raw.into_snapshot())
            }
            // Anything else (plain error text from the harvester) is a status
            // with unknown state and the text as its health.
            other => StatusEntry::Status(StatusSnapshot {
                health: Some(text(&other)),
                ..StatusSnapshot::new(HarvesterState::Other("no status".to_string()))
            }),
        };
        entries.push((name, entry));
    }
    Ok(StatusPayload::new(entries))
}

/// Per-key operator messages from an action endpoint.
///
/// Values may be plain strings or objects carrying `health`/`message`.
/// Non-JSON bodies (redirected HTML pages) yield no messages.
pub fn decode_action_messages(body: &[u8]) -> Vec<(String, String)> {
    let Ok(map) = object(body) else {
        return Vec::new();
    };
    map.into_iter()
        .map(|(key, value)| {
            let message = match &value {
                Value::Object(fields) => fields
                    .get("health")
                    .or_else(|| fields.get("message"))
                    .map(text)
                    .unwrap_or_else(|| value.to_string()),
                other => text(other),
            };
            (key, message)
        })
        .collect()
}

/// Pretty-printed JSON, or the body as text when it is not JSON.
pub fn pretty_document(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
