//! Parsed Lookup Service response envelope.
//!
//! The upstream API answers with a dictionary-shaped JSON body. It is parsed
//! exactly once, here, into a tagged `UpstreamEnvelope`; nothing downstream
//! probes raw JSON.
//!
//! The wire format is one of:
//!
//! ```json
//! {"Error code": "..."}
//! {"List": {"No results found": {...}}}
//! {"List": {"Database name": {"InfoLeak": "...", "Data": [{"Field": "value"}]}}}
//! ```

use serde::Deserialize;
use serde_json::Value;

/// The marker key the upstream uses to signal an empty result set.
pub const NO_RESULTS_MARKER: &str = "No results found";

/// A Lookup Service response, parsed once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEnvelope {
    /// The upstream reported an error code. Treated as a failed attempt.
    Error(String),

    /// The upstream explicitly signalled zero matches. A valid outcome,
    /// distinct from a transport error; triggers a refund, not a report.
    NoResults,

    /// One section per source database, in response order.
    Results(Vec<DatabaseSection>),
}

/// One source database's results.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSection {
    /// The database name (the key in the response map).
    pub name: String,

    /// One attribution line describing the source.
    pub info_leak: String,

    /// Returned records; each record is a field-name → value map.
    pub records: Vec<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "Error code")]
    error_code: Option<Value>,

    #[serde(rename = "List")]
    list: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(rename = "InfoLeak", default)]
    info_leak: String,

    #[serde(rename = "Data", default)]
    data: Vec<serde_json::Map<String, Value>>,
}

/// The response body did not match the documented envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed upstream envelope: {0}")]
pub struct EnvelopeError(pub String);

impl UpstreamEnvelope {
    /// Parse a raw response body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] if the body matches neither the error shape
    /// nor the result-list shape.
    pub fn from_value(body: &Value) -> Result<Self, EnvelopeError> {
        let raw: RawResponse = serde_json::from_value(body.clone())
            .map_err(|e| EnvelopeError(e.to_string()))?;

        if let Some(code) = raw.error_code {
            let code = match code {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Ok(Self::Error(code));
        }

        let Some(list) = raw.list else {
            return Err(EnvelopeError("missing \"List\" key".into()));
        };

        if list.contains_key(NO_RESULTS_MARKER) {
            return Ok(Self::NoResults);
        }

        let mut sections = Vec::with_capacity(list.len());
        for (name, value) in list {
            let raw_section: RawSection = serde_json::from_value(value)
                .map_err(|e| EnvelopeError(format!("section {name:?}: {e}")))?;
            sections.push(DatabaseSection {
                name,
                info_leak: raw_section.info_leak,
                records: raw_section.data,
            });
        }

        Ok(Self::Results(sections))
    }
}
