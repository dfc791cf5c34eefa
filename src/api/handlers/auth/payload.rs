//! Form-or-JSON request bodies for the auth pages.
//!
//! Browsers post `application/x-www-form-urlencoded`; scripted clients may
//! send JSON. Both end up as a flat string map so field names (the username
//! field in particular) can be configured at runtime.

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use secrecy::SecretString;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Default)]
pub struct FormFields(HashMap<String, String>);

impl std::fmt::Debug for FormFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl FormFields {
    pub(super) fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A field as a secret, so it stays out of logs and `Debug` output.
    pub(super) fn secret(&self, name: &str) -> Option<SecretString> {
        self.0.get(name).map(|value| SecretString::from(value.as_str()))
    }

    /// Checkbox semantics: `on`, `true`, or `1`.
    pub(super) fn checked(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|value| matches!(value.trim(), "on" | "true" | "1"))
    }
}

impl From<HashMap<String, String>> for FormFields {
    fn from(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }
}

fn json_scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(true) => Some("on".to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(map) = Json::<HashMap<String, Value>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(
                map.into_iter()
                    .filter_map(|(key, value)| json_scalar(value).map(|value| (key, value)))
                    .collect(),
            ))
        } else {
            let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(map))
        }
    }
}
