//! Engine: orchestrates decoding, validating, indexing, and reconciling the
//! two exports. Reconciliation itself is a pure function of the two indexes;
//! missing-hash identities come back as a value, never as ambient state.
//!
//! Typical usage:
//!
//! ```no_run
//! use auth0_merge::engine::Engine;
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = Engine::new();
//! engine.load_from_file_paths("users.json.gz", "hashes.zip")?;
//! println!("{}", serde_json::to_string_pretty(&engine.records)?);
//! # Ok(())
//! # }
//! ```
use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use log::warn;

use crate::decode;
use crate::hashes::{self, HashRecord};
use crate::ndjson::is_valid_ndjson;
use crate::profile::{self, ImportRecord, ProfileRecord};

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("invalid json (ndjson) content in {input}")]
    MalformedStream { input: String },
    #[error("malformed record in {input}: {source}")]
    MalformedRecord {
        input: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Profile index: insertion-ordered, keyed by the lower-cased email so the
/// join against the hash export is case-insensitive. Output order follows
/// this order.
pub type ProfileIndex = Vec<(String, ProfileRecord)>;

/// Hash index: lookup-only, keyed by the lower-cased email.
pub type HashIndex = HashMap<String, HashRecord>;

/// Parse profile lines and index them by email. Duplicate emails are
/// last-wins: the later record replaces the earlier one in place, keeping
/// the first occurrence's position.
pub fn index_profiles(lines: &[String], input: &str) -> Result<ProfileIndex, MergeError> {
    let mut index: ProfileIndex = Vec::with_capacity(lines.len());
    let mut seen: HashMap<String, usize> = HashMap::new();
    for line in lines {
        let record = profile::parse_line(line).map_err(|source| MergeError::MalformedRecord {
            input: input.to_string(),
            source,
        })?;
        let key = record.email.to_lowercase();
        match seen.get(&key) {
            Some(&pos) => {
                warn!("duplicate user entry for {key}, keeping the last one");
                index[pos].1 = record;
            }
            None => {
                seen.insert(key.clone(), index.len());
                index.push((key, record));
            }
        }
    }
    Ok(index)
}

/// Parse hash lines and index them by email, last-wins on duplicates.
pub fn index_hashes(lines: &[String], input: &str) -> Result<HashIndex, MergeError> {
    let mut index: HashIndex = HashMap::with_capacity(lines.len());
    for line in lines {
        let record = hashes::parse_line(line).map_err(|source| MergeError::MalformedRecord {
            input: input.to_string(),
            source,
        })?;
        let key = record.email.to_lowercase();
        if index.insert(key.clone(), record).is_some() {
            warn!("duplicate hash entry for {key}, keeping the last one");
        }
    }
    Ok(index)
}

/// Name of the Auth0 database that stores local users, read off an
/// arbitrary hash record. Every record in the hash export shares one
/// connection value.
pub fn local_store_name(hashes: &HashIndex) -> Option<String> {
    hashes.values().next().map(|h| h.connection.clone())
}

/// Join the two indexes. Local-store users come back normalized with their
/// password hash attached when one exists; local users without a hash are
/// still emitted and their email is returned in the second list. Users on
/// any other connection are dropped entirely, since social and enterprise
/// connections carry no local password material.
///
/// An empty index on either side short-circuits to empty output.
pub fn reconcile(profiles: &ProfileIndex, hashes: &HashIndex) -> (Vec<ImportRecord>, Vec<String>) {
    let mut records: Vec<ImportRecord> = Vec::new();
    let mut missing: Vec<String> = Vec::new();
    let Some(local_store) = local_store_name(hashes) else {
        return (records, missing);
    };

    for (key, profile) in profiles {
        if profile.connection != local_store {
            continue;
        }
        let mut record = ImportRecord::from_profile(profile.clone());
        match hashes.get(key) {
            Some(hash) => record.password_hash = Some(hash.password_hash.clone()),
            None => missing.push(record.email.clone()),
        }
        records.push(record);
    }
    (records, missing)
}

/// Aggregates the merged records and per-run diagnostics.
#[derive(Debug, Default)]
pub struct Engine {
    pub records: Vec<ImportRecord>,
    pub missing_hashes: Vec<String>,
    pub profile_count: usize,
    pub hash_count: usize,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of profile records dropped for belonging to a non-local
    /// connection.
    pub fn skipped_non_local(&self) -> usize {
        self.profile_count - self.records.len()
    }

    /// Load inputs already decoded into line vectors. Runs validation,
    /// indexing, and reconciliation; the decode step is the caller's.
    pub fn load_from_lines(
        &mut self,
        profile_lines: &[String],
        profile_input: &str,
        hash_lines: &[String],
        hash_input: &str,
    ) -> Result<(), MergeError> {
        if !is_valid_ndjson(profile_lines) {
            return Err(MergeError::MalformedStream {
                input: profile_input.to_string(),
            });
        }
        let profiles = index_profiles(profile_lines, profile_input)?;
        self.profile_count = profiles.len();
        if profiles.is_empty() {
            return Ok(());
        }

        if !is_valid_ndjson(hash_lines) {
            return Err(MergeError::MalformedStream {
                input: hash_input.to_string(),
            });
        }
        let hashes = index_hashes(hash_lines, hash_input)?;
        self.hash_count = hashes.len();

        let (records, missing) = reconcile(&profiles, &hashes);
        self.records = records;
        self.missing_hashes = missing;
        Ok(())
    }

    /// Load from in-memory ndjson contents. Intended for tests and small
    /// programmatic integrations.
    pub fn load_from_strings(&mut self, profiles: &str, hashes: &str) -> Result<(), MergeError> {
        let split = |s: &str| -> Vec<String> {
            s.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        };
        self.load_from_lines(
            &split(profiles),
            "users export",
            &split(hashes),
            "password hash export",
        )
    }

    /// Load from the two export files: decode each container, then validate
    /// and reconcile. The hash export stays unopened when the user export
    /// turns out to be empty.
    pub fn load_from_file_paths<P: AsRef<Path>>(
        &mut self,
        users_path: P,
        hashes_path: P,
    ) -> Result<()> {
        let users_path = users_path.as_ref();
        let hashes_path = hashes_path.as_ref();

        let profile_lines = decode::read_profile_lines(users_path)?;
        let hash_lines = if profile_lines.is_empty() {
            Vec::new()
        } else {
            decode::read_hash_lines(hashes_path)?
        };
        self.load_from_lines(
            &profile_lines,
            &users_path.display().to_string(),
            &hash_lines,
            &hashes_path.display().to_string(),
        )?;
        Ok(())
    }
}
