//! S-box laboratory for the `aes-core` engine.
//!
//! Provides GF(2) affine maps for deriving affine-equivalent tables, random
//! table generation, the cryptographic profile used to compare candidate
//! tables (nonlinearity, differential and boomerang uniformity, branch
//! numbers, avalanche criteria), and a `bincode`-backed catalog of named
//! tables that the engine and CLI can load.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod affine;
mod catalog;
mod error;
mod generator;
mod matrix;
mod metrics;
mod render;

pub use affine::{affine_equivalent, Affine8};
pub use catalog::{SboxCatalog, SboxEntry, CATALOG_VERSION};
pub use error::CatalogError;
pub use generator::{Generator, GeneratorConfig, Strategy};
pub use matrix::Matrix8;
pub use metrics::SboxMetrics;
pub use render::{render_pair, render_table};
