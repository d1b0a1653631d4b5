use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fixed league roster plus known spelling variants. Injected per deployment:
/// the engine never hardcodes who plays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Canonical identities, in display order. Membership is closed.
    pub roster: Vec<String>,
    /// Raw spellings seen in the sheet mapped to canonical names.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl RosterConfig {
    pub fn new(roster: Vec<String>, aliases: HashMap<String, String>) -> Self {
        Self { roster, aliases }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse roster config json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read roster config {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Map a raw sheet name to a canonical roster identity. Exact alias hit
    /// first, then a normalized comparison against alias keys, then the
    /// trimmed name itself checked against the roster. `None` means the name
    /// is outside the league and its rows are excluded downstream.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(canonical) = self.aliases.get(trimmed) {
            return self.roster_member(canonical);
        }

        let wanted = normalize_name(trimmed);
        for (key, canonical) in &self.aliases {
            if normalize_name(key) == wanted {
                return self.roster_member(canonical);
            }
        }

        self.roster_member(trimmed)
    }

    fn roster_member(&self, name: &str) -> Option<String> {
        if self.roster.iter().any(|r| r == name) {
            return Some(name.to_string());
        }
        let wanted = normalize_name(name);
        self.roster
            .iter()
            .find(|r| normalize_name(r) == wanted)
            .cloned()
    }
}

/// Trim, collapse internal whitespace, casefold.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
