//! Keyword reference data: `KEY:value;value;...` text files loaded once at startup.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed aspect entry {name}: {message}")]
    MalformedAspect { name: String, message: String },
}

/// One category of keyword data keyed by upper-case name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    entries: HashMap<String, Vec<String>>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the line format. Blank lines and lines without `:` are ignored; a repeated
    /// key replaces the earlier entry.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                let values = value.split(';').map(|v| v.trim().to_string()).collect();
                entries.insert(key.trim().to_string(), values);
            }
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceDataError> {
        let text = fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Missing file yields an empty table and a warning.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(ReferenceDataError::Io { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                log::warn!("Data file {} not found", path.display());
                Self::new()
            }
            Err(e) => {
                log::warn!("Error loading {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.entries.insert(key.into(), values);
    }

    pub fn lookup(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Entries in key order, for deterministic iteration.
    pub fn sorted_entries(&self) -> Vec<(&str, &[String])> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four categories the engine and interpreter read.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub planets: KeywordTable,
    pub houses: KeywordTable,
    pub signs: KeywordTable,
    pub aspects: KeywordTable,
}

impl ReferenceData {
    pub const PLANETS_FILE: &'static str = "planets.txt";
    pub const HOUSES_FILE: &'static str = "houses.txt";
    pub const SIGNS_FILE: &'static str = "signs.txt";
    pub const ASPECTS_FILE: &'static str = "aspects.txt";

    pub fn load_dir(data_dir: &Path) -> Self {
        Self {
            planets: KeywordTable::load_or_empty(&data_dir.join(Self::PLANETS_FILE)),
            houses: KeywordTable::load_or_empty(&data_dir.join(Self::HOUSES_FILE)),
            signs: KeywordTable::load_or_empty(&data_dir.join(Self::SIGNS_FILE)),
            aspects: KeywordTable::load_or_empty(&data_dir.join(Self::ASPECTS_FILE)),
        }
    }
}

/// Key used in `houses.txt`.
pub fn house_key(house: u8) -> String {
    format!("HOUSE_{}", house)
}
