use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use funia_logging::{funia_error, funia_info, funia_warn};
use serde::Deserialize;
use thiserror::Error;

const BUNDLED_EFFECTS: &str = include_str!("../data/effects.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EffectDescriptor {
    #[serde(rename = "uniquename")]
    pub unique_name: String,
    pub key: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read effect catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse effect catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable effect list with O(1) lookup by unique name.
///
/// Listing order is dataset order. When a dataset repeats a name, the first
/// descriptor wins and the repeat is dropped.
#[derive(Debug, Default)]
pub struct EffectCatalog {
    effects: Vec<EffectDescriptor>,
    by_name: HashMap<String, usize>,
}

impl EffectCatalog {
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = EffectDescriptor>) -> Self {
        let mut effects = Vec::new();
        let mut by_name = HashMap::new();
        for descriptor in descriptors {
            if by_name.contains_key(&descriptor.unique_name) {
                funia_warn!(
                    "Duplicate effect {:?} in catalog; keeping first entry",
                    descriptor.unique_name
                );
                continue;
            }
            by_name.insert(descriptor.unique_name.clone(), effects.len());
            effects.push(descriptor);
        }
        Self { effects, by_name }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let descriptors: Vec<EffectDescriptor> = serde_json::from_str(json)?;
        Ok(Self::from_descriptors(descriptors))
    }

    /// Load a replacement dataset from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        funia_info!("Loaded {} effects from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// The catalog bundled with the crate, parsed once per process.
    pub fn builtin() -> Arc<EffectCatalog> {
        static BUILTIN: OnceLock<Arc<EffectCatalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| match Self::from_json(BUNDLED_EFFECTS) {
                Ok(catalog) => Arc::new(catalog),
                Err(err) => {
                    funia_error!("Bundled effect catalog is unreadable: {}", err);
                    Arc::new(EffectCatalog::default())
                }
            })
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<&EffectDescriptor> {
        self.by_name.get(name).map(|&index| &self.effects[index])
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn list_effects(&self) -> Vec<String> {
        self.effects
            .iter()
            .map(|effect| effect.unique_name.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses() {
        let catalog = EffectCatalog::from_json(BUNDLED_EFFECTS).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.len(), EffectCatalog::builtin().len());
    }

    #[test]
    fn duplicates_keep_first_descriptor() {
        let catalog = EffectCatalog::from_json(
            r#"[{"uniquename":"a","key":"one"},{"uniquename":"a","key":"two"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().key, "one");
    }
}
