//! Validator catalogs and chain files.
//!
//! A [`Catalog`] maps type identifiers to validators. The built-in rules are
//! registered by [`builtin::register_all`], and a [`ChainConfig`] names the
//! rules of one field so the catalog can resolve it into a composition.

pub mod builtin;
pub mod chain;
pub mod registry;

pub use chain::{ChainConfig, RuleSpec};
pub use registry::{Catalog, CatalogBuilder, CatalogEntry};
