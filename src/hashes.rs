//! Password hash export records. Unlike the user export, this file already
//! uses lower-cased field names; `connection` names the Auth0 database that
//! stores local users and is shared by every record in the file.
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HashRecord {
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    pub connection: String,
}

/// Parse one hash export line.
pub fn parse_line(line: &str) -> Result<HashRecord, serde_json::Error> {
    serde_json::from_str(line)
}
