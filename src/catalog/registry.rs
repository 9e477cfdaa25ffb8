//! Validator catalog.
//!
//! A caller-owned map from type identifier to validator. Nothing here is
//! global: a form, an API guard or a test builds its own catalog and hands
//! the resolved, ordered list to a [`Composition`].

use crate::catalog::chain::{ChainConfig, RuleSpec};
use crate::composition::Composition;
use crate::core::error::{CatalogError, FieldCheckError, FieldCheckResult};
use crate::validator::factory::{validator, Validator, ValidatorConfig};
use indexmap::IndexMap;

/// Catalog entry containing the validator and its description.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The validator, usually still initable.
    pub validator: Validator,
    /// One-line description for listings.
    pub description: String,
}

/// Map of available validators, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Entries indexed by type identifier.
    entries: IndexMap<String, CatalogEntry>,
    /// Reject duplicate types instead of replacing them.
    strict: bool,
}

impl Catalog {
    /// Create an empty catalog where re-registering a type replaces it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog that rejects duplicate types.
    pub fn strict() -> Self {
        Self {
            entries: IndexMap::new(),
            strict: true,
        }
    }

    /// Create a catalog pre-populated with the built-in rules.
    pub fn with_builtins() -> FieldCheckResult<Self> {
        let mut catalog = Self::new();
        crate::catalog::builtin::register_all(&mut catalog)?;
        Ok(catalog)
    }

    /// Whether duplicate types are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Register an already-built validator under its type.
    pub fn register(
        &mut self,
        validator: Validator,
        description: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let type_name = validator.type_name().to_string();
        if self.entries.contains_key(&type_name) {
            if self.strict {
                return Err(CatalogError::TypeExists(type_name));
            }
            log::warn!("catalog: replacing validator '{}'", type_name);
        }

        self.entries.insert(
            type_name,
            CatalogEntry {
                validator,
                description: description.into(),
            },
        );
        Ok(())
    }

    /// Build a validator from its descriptor and register it.
    pub fn define(
        &mut self,
        config: ValidatorConfig,
        description: impl Into<String>,
    ) -> FieldCheckResult<()> {
        let validator = validator(config)?;
        self.register(validator, description)?;
        Ok(())
    }

    /// Look up a validator by type.
    pub fn get(&self, type_name: &str) -> Option<&Validator> {
        self.entries.get(type_name).map(|e| &e.validator)
    }

    /// Get a catalog entry.
    pub fn get_entry(&self, type_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(type_name)
    }

    /// Check if a type is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// All registered types, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove a type. Returns whether it was registered.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        self.entries.shift_remove(type_name).is_some()
    }

    /// Get the total number of registered validators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an ordered rule list into an inited composition.
    ///
    /// Initable rules are bound with their `params` (empty when absent).
    /// Giving `params` to a rule that takes none is an error.
    pub fn compose(&self, rules: &[RuleSpec]) -> FieldCheckResult<Composition> {
        let mut validators = Vec::with_capacity(rules.len());
        let mut init_values = Vec::new();

        for rule in rules {
            let validator = self
                .get(&rule.type_name)
                .ok_or_else(|| CatalogError::UnknownType(rule.type_name.clone()))?;

            if validator.needs_init() {
                init_values.push((
                    rule.type_name.clone(),
                    rule.params.clone().unwrap_or_default(),
                ));
            } else if rule.params.is_some() {
                return Err(CatalogError::UnexpectedParams(rule.type_name.clone()).into());
            }
            validators.push(validator.clone());
        }

        Composition::new(validators)
            .init(init_values)
            .map_err(FieldCheckError::from)
    }

    /// Resolve the rules of a chain config.
    pub fn compose_config(&self, config: &ChainConfig) -> FieldCheckResult<Composition> {
        self.compose(&config.rules)
    }
}

/// Builder for creating a customized catalog.
pub struct CatalogBuilder {
    catalog: Catalog,
    pending: Vec<(ValidatorConfig, String)>,
    include_builtins: bool,
}

impl CatalogBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            pending: Vec::new(),
            include_builtins: true,
        }
    }

    /// Reject duplicate types.
    pub fn strict(mut self) -> Self {
        self.catalog.strict = true;
        self
    }

    /// Include or exclude built-in rules.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Queue a custom rule.
    pub fn define(mut self, config: ValidatorConfig, description: impl Into<String>) -> Self {
        self.pending.push((config, description.into()));
        self
    }

    /// Build the catalog. Built-ins are registered first.
    pub fn build(mut self) -> FieldCheckResult<Catalog> {
        if self.include_builtins {
            crate::catalog::builtin::register_all(&mut self.catalog)?;
        }
        for (config, description) in self.pending {
            self.catalog.define(config, description)?;
        }
        Ok(self.catalog)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
