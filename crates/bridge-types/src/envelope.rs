//! # Request/Response Envelopes
//!
//! The two message shapes that cross the channel.
//!
//! ```text
//! Request:  { "uid": string, "functionName": string, "args": [any] }
//! Response: { "uid": string, "functionName": string, "response": any|null, "error"?: string|null }
//! ```
//!
//! A response carrying a non-empty `error` is a failure regardless of what
//! `response` holds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque identifier of one in-flight call.
///
/// Unique among the calls pending on a single engine. Created when the call
/// starts and retired when it settles or times out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap an already generated identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for CallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Request sent from the caller to the callee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Identifier the response must echo.
    pub uid: CallId,
    /// Operation to run on the callee.
    pub function_name: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl RequestEnvelope {
    pub fn new(uid: CallId, function_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            uid,
            function_name: function_name.into(),
            args,
        }
    }
}

/// Response sent from the callee back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Identifier of the request being answered.
    pub uid: CallId,
    /// Operation name, echoed from the request.
    pub function_name: String,
    /// Result payload. `null` on failure.
    #[serde(default)]
    pub response: Value,
    /// Error description. Takes precedence over `response` when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Successful response carrying `response`.
    pub fn success(uid: CallId, function_name: impl Into<String>, response: Value) -> Self {
        Self {
            uid,
            function_name: function_name.into(),
            response,
            error: None,
        }
    }

    /// Failed response carrying an error description.
    pub fn failure(
        uid: CallId,
        function_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            uid,
            function_name: function_name.into(),
            response: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Answer `request` with the outcome of running it.
    pub fn reply_to(request: &RequestEnvelope, outcome: Result<Value, String>) -> Self {
        match outcome {
            Ok(value) => Self::success(request.uid.clone(), &request.function_name, value),
            Err(error) => Self::failure(request.uid.clone(), &request.function_name, error),
        }
    }

    /// The error description, if this response is a failure.
    ///
    /// An empty string counts as no error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Whether this response is a failure.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Split into the settled outcome.
    pub fn into_outcome(self) -> Result<Value, String> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.response),
        }
    }
}

/// Either envelope, as seen by a listener on a shared window.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Request(RequestEnvelope),
    Response(ResponseEnvelope),
}

impl Envelope {
    /// Classify an inbound message.
    ///
    /// Anything carrying an `args` key is a request; any other object with
    /// `uid` and `functionName` is a response.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let is_request = value.get("args").is_some();
        if is_request {
            serde_json::from_value(value).map(Envelope::Request)
        } else {
            serde_json::from_value(value).map(Envelope::Response)
        }
    }
}
