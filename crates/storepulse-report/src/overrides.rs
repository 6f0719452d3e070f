//! Hard-coded identity overrides for agents whose names do not follow the
//! `<store> <role> <person>` convention.
//!
//! The table is data: the built-in entries can be replaced at startup from a
//! JSON file without touching the name parser.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{RoleCode, TOTAL_STORE};

/// One `name -> (store, role)` override row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityOverride {
    pub name: String,
    pub store: String,
    pub role: RoleCode,
}

impl IdentityOverride {
    pub fn new(name: &str, store: &str, role: RoleCode) -> Self {
        Self {
            name: name.to_string(),
            store: store.to_string(),
            role,
        }
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `OverrideTableError` values.
pub enum OverrideTableError {
    #[error("failed to read identity overrides '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse identity overrides: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("identity override #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("identity override '{name}' has an empty store")]
    EmptyStore { name: String },
    #[error("identity override '{name}' uses reserved store '{store}'")]
    ReservedStore { name: String, store: String },
    #[error("identity override name '{name}' is listed more than once")]
    DuplicateName { name: String },
}

/// Case-insensitive exact-match lookup table consulted before pattern parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityOverrideTable {
    entries: Vec<IdentityOverride>,
    index: HashMap<String, usize>,
}

impl Default for IdentityOverrideTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IdentityOverrideTable {
    /// Digital-channel and sales-management staff who sign with a bare first name.
    pub fn builtin() -> Self {
        Self::from_validated(vec![
            IdentityOverride::new("Camila", "Canal Digital", RoleCode::Jefe),
            IdentityOverride::new("Franco", "Canal Digital", RoleCode::Supervisor),
            IdentityOverride::new("Ana Paula", "Jefe de Venta", RoleCode::Jefe),
            IdentityOverride::new("Maite", "Jefe de Venta", RoleCode::Jefe),
        ])
    }

    pub fn from_entries(entries: Vec<IdentityOverride>) -> Result<Self, OverrideTableError> {
        let mut seen = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            let key = normalize_override_key(&entry.name);
            if key.is_empty() {
                return Err(OverrideTableError::EmptyName { index });
            }
            let store = entry.store.trim();
            if store.is_empty() {
                return Err(OverrideTableError::EmptyStore {
                    name: entry.name.clone(),
                });
            }
            if store == TOTAL_STORE {
                return Err(OverrideTableError::ReservedStore {
                    name: entry.name.clone(),
                    store: store.to_string(),
                });
            }
            if seen.insert(key, index).is_some() {
                return Err(OverrideTableError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }
        let entries = entries
            .into_iter()
            .map(|entry| IdentityOverride {
                store: entry.store.trim().to_string(),
                ..entry
            })
            .collect();
        Ok(Self::from_validated(entries))
    }

    /// Parses a JSON array of `{ "name", "store", "role" }` objects.
    pub fn from_json_str(raw: &str) -> Result<Self, OverrideTableError> {
        let entries: Vec<IdentityOverride> = serde_json::from_str(raw)?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> Result<Self, OverrideTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| OverrideTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    fn from_validated(entries: Vec<IdentityOverride>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (normalize_override_key(&entry.name), position))
            .collect();
        Self { entries, index }
    }

    /// Looks up `raw_name` ignoring case and surrounding whitespace.
    pub fn lookup(&self, raw_name: &str) -> Option<&IdentityOverride> {
        self.index
            .get(&normalize_override_key(raw_name))
            .and_then(|position| self.entries.get(*position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct override stores in first-appearance order.
    pub fn special_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !groups.iter().any(|group| group == &entry.store) {
                groups.push(entry.store.clone());
            }
        }
        groups
    }
}

fn normalize_override_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}
