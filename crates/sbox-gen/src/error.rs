//! Catalog errors.

use core::fmt;

/// The error type for loading and querying S-box catalogs.
#[derive(Debug)]
pub enum CatalogError {
    /// Binary catalog could not be decoded.
    Decode(bincode::Error),
    /// A line of a text listing is malformed.
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// No entry with this name.
    UnknownEntry(String),
    /// The named entry is not a permutation and cannot drive the engine.
    NotPermutation(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogError::Decode(err) => write!(f, "Cannot decode catalog: {err}"),
            CatalogError::Parse { line, reason } => write!(f, "Line {line}: {reason}"),
            CatalogError::UnknownEntry(name) => write!(f, "No S-box named {name:?} in catalog"),
            CatalogError::NotPermutation(name) => {
                write!(f, "S-box {name:?} is not a permutation")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Decode(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<bincode::Error> for CatalogError {
    fn from(err: bincode::Error) -> Self {
        CatalogError::Decode(err)
    }
}
