//! Named S-box collections and their serialized form.

use aes_core::SboxTable;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::error::CatalogError;
use crate::metrics::SboxMetrics;

/// Current catalog format version.
pub const CATALOG_VERSION: u32 = 1;

/// One named table, optionally with its computed profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SboxEntry {
    /// Unique name within the catalog.
    pub name: String,
    /// Forward mapping.
    #[serde(with = "BigArray")]
    pub forward: [u8; 256],
    /// Profile, if computed.
    pub metrics: Option<SboxMetrics>,
}

impl SboxEntry {
    /// Entry for `table` without metrics.
    pub fn new(name: impl Into<String>, table: &SboxTable) -> Self {
        Self {
            name: name.into(),
            forward: *table.forward(),
            metrics: None,
        }
    }
}

/// Ordered collection of named S-boxes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SboxCatalog {
    /// Format version tag.
    pub version: u32,
    /// Entries in insertion order.
    pub entries: Vec<SboxEntry>,
}

impl Default for SboxCatalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            entries: Vec::new(),
        }
    }
}

impl SboxCatalog {
    /// The three tables shipped with the engine.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert(SboxEntry::new("AES", &SboxTable::STANDARD));
        catalog.insert(SboxEntry::new("EXPERIMENTAL", &SboxTable::EXPERIMENTAL));
        catalog.insert(SboxEntry::new("ALTERNATE", &SboxTable::ALTERNATE));
        catalog
    }

    /// Adds `entry`, replacing any entry with the same name in place.
    pub fn insert(&mut self, entry: SboxEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&SboxEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Engine table for the named entry.
    pub fn table(&self, name: &str) -> Result<SboxTable, CatalogError> {
        let entry = self
            .get(name)
            .ok_or_else(|| CatalogError::UnknownEntry(name.to_owned()))?;
        SboxTable::from_forward(entry.forward)
            .map_err(|_| CatalogError::NotPermutation(name.to_owned()))
    }

    /// Fills in metrics for every entry that has none yet.
    pub fn compute_metrics(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.metrics.is_none()) {
            entry.metrics = Some(SboxMetrics::compute(&entry.forward));
        }
    }

    /// Serializes the catalog with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a catalog with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Parses a text listing with one S-box per line:
    /// `ID, 0xHH, 0xHH, ...` (256 values). Entries are named `S{ID}`.
    /// Blank lines are skipped.
    pub fn parse_listing(text: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = |reason: String| CatalogError::Parse {
                line: idx + 1,
                reason,
            };

            let mut fields = line.split(',').map(str::trim);
            let id = fields.next().unwrap_or_default();
            if id.is_empty() {
                return Err(parse_err("missing S-box id".to_owned()));
            }
            let values = fields
                .map(|field| {
                    let digits = field
                        .strip_prefix("0x")
                        .or_else(|| field.strip_prefix("0X"))
                        .unwrap_or(field);
                    u8::from_str_radix(digits, 16)
                        .map_err(|_| parse_err(format!("bad byte value {field:?}")))
                })
                .collect::<Result<Vec<u8>, _>>()?;
            let forward: [u8; 256] = values
                .as_slice()
                .try_into()
                .map_err(|_| parse_err(format!("expected 256 values, found {}", values.len())))?;
            catalog.insert(SboxEntry {
                name: format!("S{id}"),
                forward,
                metrics: None,
            });
        }
        Ok(catalog)
    }
}
