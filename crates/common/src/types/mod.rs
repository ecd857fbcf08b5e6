use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Outcome flag carried in every admin response body.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Uniform `{status, msg, data}` body returned by admin handlers.
///
/// The HTTP status is always 200; the real outcome lives in `status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub msg: String,
    pub data: Value,
}

impl Envelope {
    pub fn success(msg: impl Into<String>, data: Value) -> Self {
        Self { status: EnvelopeStatus::Success, msg: msg.into(), data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { status: EnvelopeStatus::Error, msg: msg.into(), data: empty_data() }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

/// Handlers without a payload answer with an empty string, not `null`.
pub fn empty_data() -> Value {
    Value::String(String::new())
}
