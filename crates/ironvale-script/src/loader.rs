//! RON catalog loader

use crate::error::{Error, Result};
use indexmap::IndexMap;
use ironvale_core::{Enemy, EnemyId, Item, ItemId, ResourceType};
use ironvale_db::Store;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The catalog shipped with the crate
const BUILTIN: &str = include_str!("../data/catalog.ron");

/// Loaded reference data, in authoring order
#[derive(Debug, Default)]
pub struct Catalog {
    pub items: IndexMap<ItemId, Item>,
    pub enemies: IndexMap<EnemyId, Enemy>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate the built-in catalog
    pub fn builtin() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_str(BUILTIN)?;
        loader.finish()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// The item a resource node yields
    pub fn item_for_resource(&self, resource: ResourceType) -> Option<&Item> {
        self.items
            .values()
            .find(|item| item.gathered_from == Some(resource))
    }

    /// Upsert every item and enemy into the store in one transaction
    pub fn install(&self, store: &Store) -> Result<()> {
        store.install_catalog(self.items.values(), self.enemies.values())?;
        Ok(())
    }

    /// Check cross-record rules that a single definition cannot
    fn validate(&self) -> Result<()> {
        for resource in ResourceType::ALL {
            let sources: Vec<&Item> = self
                .items
                .values()
                .filter(|item| item.gathered_from == Some(resource))
                .collect();
            match sources.len() {
                0 => warn!(%resource, "no catalog item is gathered from this resource"),
                1 => {}
                _ => {
                    return Err(Error::InvalidSchema(format!(
                        "{} items are gathered from {}",
                        sources.len(),
                        resource
                    )))
                }
            }
        }

        for enemy in self.enemies.values() {
            if enemy.max_hp == 0 {
                return Err(Error::InvalidSchema(format!("{} has no HP", enemy.name)));
            }
            if enemy.reward_exp.is_inverted() || enemy.reward_gold.is_inverted() {
                warn!(
                    enemy = %enemy.id,
                    name = %enemy.name,
                    "reward range has min above max; draws will use the minimum"
                );
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    enemies: Vec<Enemy>,
}

/// Loader for RON catalog files
///
/// Several files may be loaded into one catalog; an id defined twice,
/// within a file or across files, is an error.
pub struct Loader {
    catalog: Catalog,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
        }
    }

    /// Load a catalog document from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: CatalogFile = ron::from_str(content)?;

        for item in file.items {
            if self.catalog.items.contains_key(&item.id) {
                return Err(Error::DuplicateDefinition(item.id.to_string()));
            }
            self.catalog.items.insert(item.id, item);
        }
        for enemy in file.enemies {
            if self.catalog.enemies.contains_key(&enemy.id) {
                return Err(Error::DuplicateDefinition(enemy.id.to_string()));
            }
            self.catalog.enemies.insert(enemy.id, enemy);
        }
        Ok(())
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_str(&content)
    }

    /// Load all RON files from a directory, recursively, in name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut paths = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for file_path in paths {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }
        Ok(())
    }

    /// Validate and return the catalog
    pub fn finish(self) -> Result<Catalog> {
        self.catalog.validate()?;
        info!(
            items = self.catalog.items.len(),
            enemies = self.catalog.enemies.len(),
            "catalog loaded"
        );
        Ok(self.catalog)
    }

    /// The catalog loaded so far
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
