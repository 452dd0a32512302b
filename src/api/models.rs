//! Wire models for the user administration backend.
//!
//! Field names on the wire follow the backend's JSON keys; the Rust side
//! uses descriptive names and maps them with `serde(rename)`.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Server-assigned identifier of a user record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user profile as returned by `GET /admin/users`.
///
/// The stored password is never part of a fetched record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "id_usuario")]
    pub id: UserId,
    #[serde(rename = "nombre", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "app", default, deserialize_with = "null_as_empty")]
    pub paternal_surname: String,
    #[serde(rename = "apm", default, deserialize_with = "null_as_empty")]
    pub maternal_surname: String,
    /// Expected `YYYY-MM-DD`, not validated.
    #[serde(rename = "fn", default, deserialize_with = "null_as_empty")]
    pub birth_date: String,
    #[serde(rename = "telefono", default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, alias = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserRecord {
    /// Given name followed by both surnames, skipping empty parts.
    pub fn full_name(&self) -> String {
        [&self.name, &self.paternal_surname, &self.maternal_surname]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body shared by registration, creation and replacement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "app")]
    pub paternal_surname: String,
    #[serde(rename = "apm")]
    pub maternal_surname: String,
    #[serde(rename = "fn")]
    pub birth_date: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Session token returned by a successful login. Held only in memory.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters only, for log lines.
    pub fn redacted(&self) -> String {
        let head: String = self.0.chars().take(6).collect();
        format!("{head}…")
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.redacted()).finish()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: Token,
}

/// Body carried by non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_reads_backend_keys_and_tolerates_nulls() {
        let json = r#"{"id_usuario":7,"nombre":"Ana","app":"Ruiz","apm":null,"fn":"1990-01-02","telefono":"555","email":"ana@x.com","rol":"admin"}"#;
        let rec: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, UserId(7));
        assert_eq!(rec.maternal_surname, "");
        assert_eq!(rec.role.as_deref(), Some("admin"));
        assert_eq!(rec.full_name(), "Ana Ruiz");
    }

    #[test]
    fn payload_uses_backend_keys() {
        let payload = UserPayload {
            name: "Ana".into(),
            birth_date: "1990-01-02".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["nombre"], "Ana");
        assert_eq!(value["fn"], "1990-01-02");
        assert_eq!(value["password"], "");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn token_debug_is_redacted() {
        let t = Token::new("abcdefghijklmnop");
        let shown = format!("{t:?}");
        assert!(!shown.contains("ghijklmnop"));
    }
}
