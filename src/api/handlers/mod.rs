//! Route handlers and the request/response bodies they share.

pub mod health;
pub mod liveness;
pub mod signin;
pub mod signup;

use crate::store::{CredentialRecord, CredentialStore};
use axum::{
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::{fmt, sync::Arc};
use utoipa::ToSchema;

/// Store handle shared with every handler through an `Extension` layer.
pub type SharedStore = Arc<dyn CredentialStore>;

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
// Also returned by signin when the username is unknown.
pub const MSG_SIGNUP_ERROR: &str = "Error while signup";
pub const MSG_SIGNUP_OK: &str = "user signup successfully";
pub const MSG_SIGNIN_OK: &str = "user signin successfully";
pub const MSG_PASSWORD_MISMATCH: &str = "Password not match";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
pub const MSG_INVALID_JSON: &str = "Invalid JSON body";

/// Request body for `/signup` and `/signin`, as documented in the `OpenAPI` schema.
///
/// Handlers read the raw body through [`required_fields`]; this type only
/// describes the expected shape.
#[derive(ToSchema, Serialize, Default, Clone)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Fields that passed the presence check.
pub struct Submitted {
    pub username: String,
    pub password: String,
    /// `false` when the password arrived as a JSON number or `true`.
    pub password_is_text: bool,
}

impl fmt::Debug for Submitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitted")
            .field("username", &self.username)
            .field("password", &"***")
            .field("password_is_text", &self.password_is_text)
            .finish()
    }
}

/// JSON body of every signup/signin answer.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<CredentialRecord>,
}

impl Message {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            response: None,
        }
    }

    #[must_use]
    pub fn with_record(message: &str, record: CredentialRecord) -> Self {
        Self {
            message: message.to_string(),
            response: Some(record),
        }
    }
}

pub type MessageResponse = (StatusCode, Json<Message>);

pub(crate) fn reply(status: StatusCode, message: &str) -> MessageResponse {
    (status, Json(Message::new(message)))
}

/// Read `username` and `password` from a raw request body.
///
/// Only a JSON object can carry fields. A body without a JSON content type,
/// an empty body or a top-level array has none, and answers 403. Bytes that
/// are not valid JSON, or a top-level scalar, answer 400.
pub(crate) fn required_fields(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Submitted, MessageResponse> {
    let missing = || reply(StatusCode::FORBIDDEN, MSG_FIELDS_REQUIRED);

    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Err(missing());
    }

    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(Value::Array(_)) => return Err(missing()),
        _ => return Err(reply(StatusCode::BAD_REQUEST, MSG_INVALID_JSON)),
    };

    let username = field_text(fields.get("username"));
    let password = field_text(fields.get("password"));

    match (username, password) {
        (Some(username), Some(password)) => Ok(Submitted {
            username,
            password,
            password_is_text: matches!(fields.get("password"), Some(Value::String(_))),
        }),
        _ => Err(missing()),
    }
}

/// Text of a present field. `null`, `false`, `0`, `""`, arrays and objects
/// count as absent; numbers and `true` are kept in their decimal/literal form.
fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()).filter(|text| !text.is_empty()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(number) => number_text(number),
        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn number_text(number: &Number) -> Option<String> {
    if let Some(int) = number.as_i64() {
        return (int != 0).then(|| int.to_string());
    }
    if let Some(uint) = number.as_u64() {
        return Some(uint.to_string());
    }
    number
        .as_f64()
        .filter(|float| *float != 0.0)
        .map(|float| float.to_string())
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
