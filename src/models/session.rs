use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The authenticated identity as the client knows it.
///
/// The session endpoint also echoes the account's credential material. It has
/// no field here: serde drops it on the way in, so it is never logged or
/// serialized.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    id: String,
    username: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedSession {
    #[error("session id is missing or empty")]
    MissingId,
    #[error("session username is missing or empty")]
    MissingUsername,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Result<Self, MalformedSession> {
        let id = id.into();
        let username = username.into();
        if id.is_empty() {
            return Err(MalformedSession::MissingId);
        }
        if username.is_empty() {
            return Err(MalformedSession::MissingUsername);
        }
        Ok(Self { id, username })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Parses a session body. Ids may arrive as numbers or strings and are
    /// kept verbatim. A numeric zero in any form (`0`, `0.0`), `""`, `null`
    /// or a missing id all mean "no session"; any other string, including
    /// whitespace, is an opaque id.
    pub fn from_json(body: &Value) -> Result<Self, MalformedSession> {
        let id = match &body["id"] {
            Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => String::new(),
        };
        let username = body["username"].as_str().unwrap_or_default();
        Self::new(id, username)
    }
}

impl<'de> Deserialize<'de> for SessionRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.username, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_id_is_normalised() {
        let record = SessionRecord::from_json(&json!({"id": 1, "username": "ana"}))
            .expect("record should parse");
        assert_eq!(record.id(), "1");
        assert_eq!(record.username(), "ana");
    }

    #[test]
    fn credential_material_is_dropped() {
        let record: SessionRecord = serde_json::from_value(json!({
            "id": "abc",
            "username": "ana",
            "credentialMaterial": "x",
            "password": "hunter2"
        }))
        .expect("record should parse");

        let serialized = serde_json::to_string(&record).expect("record should serialize");
        assert!(!serialized.contains("hunter2"));
        assert!(!serialized.contains("credentialMaterial"));
        assert!(!format!("{:?}", record).contains("hunter2"));
    }

    #[test]
    fn empty_or_zero_ids_are_malformed() {
        for body in [
            json!({"id": 0, "username": "ana"}),
            json!({"id": 0.0, "username": "ana"}),
            json!({"id": -0.0, "username": "ana"}),
            json!({"id": "", "username": "ana"}),
            json!({"id": null, "username": "ana"}),
            json!({"username": "ana"}),
            json!({}),
            json!(null),
        ] {
            assert_eq!(
                SessionRecord::from_json(&body),
                Err(MalformedSession::MissingId),
                "body {} should be rejected",
                body
            );
        }
    }

    #[test]
    fn non_empty_string_ids_are_kept_verbatim() {
        let record = SessionRecord::from_json(&json!({"id": " ", "username": "ana"}))
            .expect("whitespace id is still an id");
        assert_eq!(record.id(), " ");

        let record = SessionRecord::from_json(&json!({"id": 2.5, "username": "ana"}))
            .expect("non-zero float id is accepted");
        assert_eq!(record.id(), "2.5");
    }

    #[test]
    fn missing_username_is_malformed() {
        assert_eq!(
            SessionRecord::from_json(&json!({"id": 7})),
            Err(MalformedSession::MissingUsername)
        );
    }
}
