//! Schema registry
//!
//! Every lookup first resolves an alias to its canonical name. Per canonical
//! name the registry keeps one factory, one loaded configuration and one
//! mapper instance.

use crate::config::{config_file_name, read_mapper_config};
use crate::{Error, Result};
use dpp_mapping::{
    Fragment, FromConfig, MapperConfig, MappedDocument, PassportLayers, SchemaMapper,
};
use dpp_model::{DigitalProductPassport, Part};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a mapper from its configuration
pub type MapperFactory = Arc<dyn Fn(MapperConfig) -> Box<dyn SchemaMapper> + Send + Sync>;

/// Deferred factory resolution, run on first use
pub type LazyLoader = Arc<dyn Fn() -> Result<MapperFactory> + Send + Sync>;

/// Factory for a mapper type constructible from its configuration.
#[must_use]
pub fn factory_of<M>() -> MapperFactory
where
    M: SchemaMapper + FromConfig + 'static,
{
    Arc::new(|config: MapperConfig| Box::new(M::from_config(config)) as Box<dyn SchemaMapper>)
}

#[derive(Clone)]
enum Slot {
    Ready(MapperFactory),
    Lazy(LazyLoader),
}

/// Metadata returned by [`SchemaRegistry::info`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaInfo {
    Found {
        name: String,
        version: String,
        canonical_name: String,
        aliases: Vec<String>,
        mapper_type: String,
    },
    Missing {
        error: String,
    },
}

/// Registry of schema mappers
pub struct SchemaRegistry {
    config_dir: PathBuf,
    factories: HashMap<String, Slot>,
    /// Canonical names in registration order
    order: Vec<String>,
    /// (alias, canonical name) in registration order
    aliases: Vec<(String, String)>,
    instances: HashMap<String, Arc<dyn SchemaMapper>>,
    configs: HashMap<String, MapperConfig>,
}

impl SchemaRegistry {
    /// Create an empty registry reading mapping files from `config_dir`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        info!("Schema registry initialized with config_dir={}", config_dir.display());
        Self {
            config_dir,
            factories: HashMap::new(),
            order: Vec::new(),
            aliases: Vec::new(),
            instances: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Create a registry with the built-in ECLASS and ISA-95 mappers
    pub fn with_builtin(config_dir: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new(config_dir);
        crate::builtin::register_builtin_mappers(&mut registry);
        registry
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Register a mapper type eagerly. Returns its canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the mapper reports an empty schema
    /// name.
    pub fn register<M>(&mut self, aliases: &[&str]) -> Result<String>
    where
        M: SchemaMapper + FromConfig + 'static,
    {
        self.register_factory(factory_of::<M>(), aliases)
    }

    /// Register a factory eagerly. The canonical name is taken from a mapper
    /// built with an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if that mapper reports an empty
    /// schema name.
    pub fn register_factory(&mut self, factory: MapperFactory, aliases: &[&str]) -> Result<String> {
        let probe = factory(MapperConfig::empty());
        let name = probe.schema_name().to_string();
        if name.is_empty() {
            return Err(Error::TypeMismatch {
                name: probe.mapper_type().to_string(),
                reason: "mapper reports an empty schema name".to_string(),
            });
        }

        self.insert_slot(&name, Slot::Ready(factory));
        info!("Registered schema mapper: {}", name);
        self.add_aliases(&name, aliases);
        Ok(name)
    }

    /// Register a mapper whose factory is resolved on first use.
    pub fn register_lazy(
        &mut self,
        canonical_name: &str,
        loader: impl Fn() -> Result<MapperFactory> + Send + Sync + 'static,
        aliases: &[&str],
    ) {
        self.insert_slot(canonical_name, Slot::Lazy(Arc::new(loader)));
        info!("Registered lazy mapper: {}", canonical_name);
        self.add_aliases(canonical_name, aliases);
    }

    fn insert_slot(&mut self, name: &str, slot: Slot) {
        if self.factories.insert(name.to_string(), slot).is_none() {
            self.order.push(name.to_string());
        }
    }

    fn add_aliases(&mut self, canonical_name: &str, aliases: &[&str]) {
        for alias in aliases {
            match self.aliases.iter_mut().find(|(a, _)| a == alias) {
                Some(entry) => entry.1 = canonical_name.to_string(),
                None => self
                    .aliases
                    .push(((*alias).to_string(), canonical_name.to_string())),
            }
            debug!("Alias registered: {} -> {}", alias, canonical_name);
        }
    }

    /// Canonical name for a name or alias. Unknown names resolve to themselves.
    #[must_use]
    pub fn resolve_canonical_name<'a>(&'a self, name_or_alias: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name_or_alias)
            .map_or(name_or_alias, |(_, canonical)| canonical.as_str())
    }

    /// Configuration for a canonical name, read once and cached.
    pub fn load_config(&mut self, canonical_name: &str) -> MapperConfig {
        if let Some(config) = self.configs.get(canonical_name) {
            return config.clone();
        }
        let path = self.config_dir.join(config_file_name(canonical_name));
        let config = read_mapper_config(&path);
        self.configs.insert(canonical_name.to_string(), config.clone());
        config
    }

    /// Mapper for a name or alias, created on first use and cached.
    ///
    /// With `force_reload` a fresh instance replaces the cached one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unregistered name, the loader's
    /// own error if deferred resolution fails, or [`Error::TypeMismatch`]
    /// if a deferred factory builds a mapper for a different schema.
    pub fn get_mapper(
        &mut self,
        name_or_alias: &str,
        force_reload: bool,
    ) -> Result<Arc<dyn SchemaMapper>> {
        let canonical = self.resolve_canonical_name(name_or_alias).to_string();
        let Some(slot) = self.factories.get(&canonical).cloned() else {
            return Err(Error::NotFound {
                name: name_or_alias.to_string(),
                available: self.list_schemas(),
            });
        };

        if !force_reload {
            if let Some(mapper) = self.instances.get(&canonical) {
                debug!("Using cached mapper for {}", canonical);
                return Ok(Arc::clone(mapper));
            }
        }

        let factory = match slot {
            Slot::Ready(factory) => factory,
            Slot::Lazy(loader) => {
                debug!("Resolving deferred mapper for {}", canonical);
                let factory = loader()?;
                check_lazy_factory(&canonical, &factory)?;
                self.factories
                    .insert(canonical.clone(), Slot::Ready(Arc::clone(&factory)));
                factory
            }
        };

        let config = self.load_config(&canonical);
        let mapper: Arc<dyn SchemaMapper> = Arc::from(factory(config));
        info!(
            "Created new mapper instance for {}: {} {}",
            canonical,
            mapper.schema_name(),
            mapper.schema_version()
        );
        self.instances.insert(canonical, Arc::clone(&mapper));
        Ok(mapper)
    }

    /// Canonical names of all registered schemas, in registration order.
    #[must_use]
    pub fn list_schemas(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Aliases registered for a canonical name.
    #[must_use]
    pub fn list_aliases(&self, canonical_name: &str) -> Vec<String> {
        self.aliases
            .iter()
            .filter(|(_, canonical)| canonical == canonical_name)
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    /// Metadata for a schema. An unregistered name yields
    /// [`SchemaInfo::Missing`] instead of an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if resolving a registered mapper fails.
    pub fn info(&mut self, name_or_alias: &str) -> Result<SchemaInfo> {
        let mapper = match self.get_mapper(name_or_alias, false) {
            Ok(mapper) => mapper,
            Err(e @ Error::NotFound { .. }) => {
                return Ok(SchemaInfo::Missing {
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let canonical = self.resolve_canonical_name(name_or_alias).to_string();
        Ok(SchemaInfo::Found {
            name: mapper.schema_name().to_string(),
            version: mapper.schema_version().to_string(),
            aliases: self.list_aliases(&canonical),
            canonical_name: canonical,
            mapper_type: mapper.mapper_type().to_string(),
        })
    }

    /// Map a passport with the named schema.
    ///
    /// # Errors
    ///
    /// Returns a resolution error or the mapper's error unchanged.
    pub fn map_dpp(
        &mut self,
        name_or_alias: &str,
        passport: &DigitalProductPassport,
    ) -> Result<MappedDocument> {
        let mapper = self.get_mapper(name_or_alias, false)?;
        debug!("Mapping passport using schema {}", mapper.schema_name());
        Ok(mapper.map_dpp(passport)?)
    }

    /// Map a single part with the named schema.
    ///
    /// # Errors
    ///
    /// Returns a resolution error or the mapper's error unchanged.
    pub fn map_part(&mut self, name_or_alias: &str, part: &Part) -> Result<Fragment> {
        let mapper = self.get_mapper(name_or_alias, false)?;
        debug!(
            "Mapping part (id={}, type={}) using schema {}",
            part.part_id,
            part.part_type,
            mapper.schema_name()
        );
        Ok(mapper.map_part(part)?)
    }

    /// Map independently held layers with the named schema.
    ///
    /// # Errors
    ///
    /// Returns a resolution error or the mapper's error unchanged.
    pub fn map_layers(
        &mut self,
        name_or_alias: &str,
        layers: PassportLayers<'_>,
    ) -> Result<MappedDocument> {
        let mapper = self.get_mapper(name_or_alias, false)?;
        debug!("Mapping individual layers using schema {}", mapper.schema_name());
        Ok(mapper.map_layers(layers)?)
    }
}

/// A deferred factory must build a mapper for the schema it was registered
/// under.
fn check_lazy_factory(canonical_name: &str, factory: &MapperFactory) -> Result<()> {
    let probe = factory(MapperConfig::empty());
    let reported = probe.schema_name();
    if reported.is_empty() {
        return Err(Error::TypeMismatch {
            name: canonical_name.to_string(),
            reason: format!("{} reports an empty schema name", probe.mapper_type()),
        });
    }
    if reported != canonical_name {
        return Err(Error::TypeMismatch {
            name: canonical_name.to_string(),
            reason: format!(
                "{} reports schema name '{}'",
                probe.mapper_type(),
                reported
            ),
        });
    }
    Ok(())
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("config_dir", &self.config_dir)
            .field("schemas", &self.order)
            .field("aliases", &self.aliases)
            .field("instances", &self.instances.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
