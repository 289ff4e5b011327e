use serde::Deserialize;
use serde_json::Value;

// Every field is optional and untyped so that any body shape decodes or
// falls through to the raw-text path instead of failing on access.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
}

/// A decoded non-success response from the put endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRejection {
    pub status: u16,
    pub code: Option<String>,
    pub message: Option<String>,
    /// Server supplied details, or the raw response body when the body is
    /// not a complete structured error.
    pub details: String,
}

impl ServerRejection {
    pub fn decode(status: u16, body: &[u8]) -> Self {
        let structured = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| match (error.code, error.message, error.details) {
                (Some(code), Some(message), Some(details)) => {
                    Some((render(&code), render(&message), render(&details)))
                }
                _ => None,
            });

        match structured {
            Some((code, message, details)) => Self {
                status,
                code: Some(code),
                message: Some(message),
                details,
            },
            None => Self {
                status,
                code: None,
                message: None,
                details: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    pub fn is_structured(&self) -> bool {
        self.code.is_some() && self.message.is_some()
    }

    /// One-line description that never depends on the structured fields
    /// being present.
    pub fn summary(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => {
                format!("HTTP {}, code: {}, message: {}", self.status, code, message)
            }
            _ => format!("HTTP {}", self.status),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
