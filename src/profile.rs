//! User record models: the export-side `ProfileRecord` with Auth0's
//! capitalized field names, and the import-side `ImportRecord` in the schema
//! the import extension expects.
//!
//! Fields not named here ride along untouched through the flattened `extra`
//! maps. Use [`ImportRecord::from_profile`] to apply the rename/derive
//! rules; they are idempotent.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider namespace tag the export prepends to local user ids.
pub const LOCAL_ID_PREFIX: &str = "auth0|";

/// One user as it appears in the user export: one ndjson object per line,
/// capitalized field names.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Email Verified")]
    pub email_verified: bool,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Given Name", default)]
    pub given_name: Option<String>,
    #[serde(rename = "Family Name", default)]
    pub family_name: Option<String>,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Connection")]
    pub connection: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One user in the shape the import extension accepts. `password_hash` is
/// attached later by the engine, only for local-store members with a match
/// in the hash export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub email: String,
    pub email_verified: bool,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    pub connection: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Strip the exact `auth0|` namespace tag. Other provider tags (for example
/// `google-oauth2|`) pass through unchanged; those records never reach the
/// output anyway because their connection is non-local.
pub fn strip_provider_prefix(id: &str) -> &str {
    id.strip_prefix(LOCAL_ID_PREFIX).unwrap_or(id)
}

impl ImportRecord {
    /// Apply the field renames and derivations: lower-cased names, optional
    /// names carried over only when non-empty, id stripped of its provider
    /// tag. No password hash yet.
    pub fn from_profile(profile: ProfileRecord) -> Self {
        let id = strip_provider_prefix(&profile.id).to_string();
        Self {
            email: profile.email,
            email_verified: profile.email_verified,
            name: profile.name,
            given_name: profile.given_name.filter(|s| !s.is_empty()),
            family_name: profile.family_name.filter(|s| !s.is_empty()),
            connection: profile.connection,
            id,
            password_hash: None,
            extra: profile.extra,
        }
    }
}

/// Parse one export line into a `ProfileRecord`.
pub fn parse_line(line: &str) -> Result<ProfileRecord, serde_json::Error> {
    serde_json::from_str(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_line_and_renames() {
        let line = r#"{"Email":"a@x.com","Email Verified":true,"Name":"A","Id":"auth0|1","Connection":"Local"}"#;
        let rec = ImportRecord::from_profile(parse_line(line).unwrap());
        assert_eq!(rec.email, "a@x.com");
        assert!(rec.email_verified);
        assert_eq!(rec.id, "1");
        assert_eq!(rec.connection, "Local");
        assert!(rec.given_name.is_none());
        assert!(rec.password_hash.is_none());
    }

    #[test]
    fn empty_optional_names_are_dropped() {
        let line = r#"{"Email":"a@x.com","Email Verified":false,"Name":"A","Given Name":"","Family Name":"Smith","Id":"1","Connection":"Local"}"#;
        let rec = ImportRecord::from_profile(parse_line(line).unwrap());
        assert!(rec.given_name.is_none());
        assert_eq!(rec.family_name.as_deref(), Some("Smith"));
    }

    #[test]
    fn strips_only_the_auth0_prefix() {
        assert_eq!(strip_provider_prefix("auth0|abc123"), "abc123");
        assert_eq!(strip_provider_prefix("google-oauth2|xyz"), "google-oauth2|xyz");
        assert_eq!(strip_provider_prefix("plain"), "plain");
    }

    #[test]
    fn prefix_stripping_is_idempotent() {
        let once = strip_provider_prefix("auth0|abc123");
        assert_eq!(strip_provider_prefix(once), once);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let line = r#"{"Email":"a@x.com","Email Verified":true,"Name":"A","Id":"1","Connection":"Local","Nickname":"ay"}"#;
        let rec = ImportRecord::from_profile(parse_line(line).unwrap());
        assert_eq!(rec.extra.get("Nickname").unwrap(), "ay");
        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["Nickname"], "ay");
    }

    #[test]
    fn serialized_record_omits_absent_hash() {
        let line = r#"{"Email":"a@x.com","Email Verified":true,"Name":"A","Id":"1","Connection":"Local"}"#;
        let rec = ImportRecord::from_profile(parse_line(line).unwrap());
        let out = serde_json::to_value(&rec).unwrap();
        assert!(out.get("password_hash").is_none());
        assert!(out.get("given_name").is_none());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let line = r#"{"Email Verified":true,"Name":"A","Id":"1","Connection":"Local"}"#;
        assert!(parse_line(line).is_err());
    }
}
