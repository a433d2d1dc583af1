use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

const UPSTREAM_FAILED: &str = "Upstream request failed";

/// The only response shape the front end ever looks at.  Upstream bodies and
/// transport faults are both folded into it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn from_fault(err: &Error) -> Self {
        Self::failure(err.to_string())
    }

    /// Normalize a body returned by the third-party API.  `code == 0` or a
    /// `success: true` flag count as success, and the payload is `data` when
    /// present, otherwise the whole body.
    pub fn from_upstream(body: Value) -> Self {
        let code_ok = body.get("code").and_then(Value::as_i64) == Some(0);
        let flag_ok = body.get("success").and_then(Value::as_bool) == Some(true);

        if code_ok || flag_ok {
            let data = match body.get("data") {
                Some(data) if !data.is_null() => data.clone(),
                _ => body,
            };
            Self::success(data)
        } else {
            Self::failure(upstream_message(&body))
        }
    }

    /// A local proxy already speaks the envelope shape, so its fields are
    /// read as they are.  A body without `data` keeps every top-level field
    /// reachable by becoming the payload itself.
    pub fn from_proxy(body: Value) -> Self {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        let data = match body.get("data") {
            Some(data) if !data.is_null() => Some(data.clone()),
            Some(_) => None,
            None => Some(body),
        };
        Self {
            success,
            data,
            error,
        }
    }

    /// Payload of a successful envelope.
    pub fn data(&self) -> Option<&Value> {
        if self.success {
            self.data.as_ref()
        } else {
            None
        }
    }

    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| UPSTREAM_FAILED.to_string())
    }
}

fn upstream_message(body: &Value) -> String {
    ["message", "msg", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .or_else(|| {
            body.get("code")
                .filter(|code| !code.is_null())
                .map(|code| format!("Upstream returned code {code}"))
        })
        .unwrap_or_else(|| UPSTREAM_FAILED.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn zero_code_is_success_with_data() {
        let envelope = Envelope::from_upstream(json!({
            "code": 0,
            "message": "ok",
            "data": { "items": [1, 2] }
        }));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!({ "items": [1, 2] })));
        assert_eq!(envelope.error, None);
    }

    #[test]
    fn zero_code_without_data_keeps_whole_body() {
        let body = json!({ "code": 0, "subjectList": [] });
        let envelope = Envelope::from_upstream(body.clone());
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(body));
    }

    #[test]
    fn non_zero_code_is_failure_with_message() {
        let envelope = Envelope::from_upstream(json!({
            "code": 401,
            "message": "forbidden",
            "data": null
        }));
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("forbidden"));
        assert_eq!(envelope.data(), None);
    }

    #[test]
    fn non_zero_code_without_message_names_the_code() {
        let envelope = Envelope::from_upstream(json!({ "code": 5 }));
        assert_eq!(envelope.error.as_deref(), Some("Upstream returned code 5"));
    }

    #[test]
    fn success_flag_counts_as_success() {
        let envelope = Envelope::from_upstream(json!({ "success": true, "data": [1] }));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!([1])));
    }

    #[test]
    fn string_zero_code_is_not_success() {
        let envelope = Envelope::from_upstream(json!({ "code": "0", "data": {} }));
        assert!(!envelope.success);
    }

    #[test]
    fn proxy_body_passes_through() {
        let envelope = Envelope::from_proxy(json!({
            "success": false,
            "error": "API returned 500"
        }));
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("API returned 500"));
    }

    #[test]
    fn proxy_body_without_data_becomes_payload() {
        let body = json!({ "success": true, "qualities": [], "cached": false });
        let envelope = Envelope::from_proxy(body.clone());
        assert_eq!(envelope.data(), Some(&body));
    }

    #[test]
    fn fault_becomes_failure() {
        let envelope = Envelope::from_fault(&Error::UnexpectedResponse);
        assert!(!envelope.success);
        assert_eq!(envelope.error_message(), "Unknown server response");
    }
}
