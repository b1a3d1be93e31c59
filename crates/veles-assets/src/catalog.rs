//! Typed views over an archive's paths.

use std::collections::BTreeMap;

use tracing::debug;
use veles_pak::PakArchive;

use crate::classify::{AssetCategory, ClassifierTable};
use crate::names::NamingTables;

/// A path matched to a naming table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamedPath {
    pub name: String,
    pub path: String,
}

/// Archive paths grouped by category.
///
/// Paths keep the order they were supplied in.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssetCatalog {
    groups: BTreeMap<AssetCategory, Vec<String>>,
    npcs: Vec<NamedPath>,
    exotic_weapons: Vec<NamedPath>,
}

impl AssetCatalog {
    /// Group `paths` with `table`; weapons and characters are matched against
    /// `names` as well.
    pub fn from_paths<I, S>(paths: I, table: &ClassifierTable, names: &NamingTables) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();

        for path in paths {
            let path = path.as_ref();
            let category = table.classify(path);

            match category {
                AssetCategory::Character => {
                    if let Some(npc) = names.npc_for(path) {
                        catalog.npcs.push(NamedPath {
                            name: npc.name().to_string(),
                            path: path.to_string(),
                        });
                    }
                }
                AssetCategory::Weapon => {
                    if let Some(weapon) = names.exotic_weapon_for(path) {
                        catalog.exotic_weapons.push(NamedPath {
                            name: weapon.name().to_string(),
                            path: path.to_string(),
                        });
                    }
                }
                _ => {}
            }

            catalog
                .groups
                .entry(category)
                .or_default()
                .push(path.to_string());
        }

        catalog
    }

    /// Catalog every entry of an opened archive.
    pub fn from_archive(archive: &PakArchive, table: &ClassifierTable, names: &NamingTables) -> Self {
        let catalog = Self::from_paths(archive.list(), table, names);
        debug!(
            archive = archive.name(),
            known = archive.len() - catalog.category(AssetCategory::Unknown).len(),
            exotic_weapons = catalog.exotic_weapons.len(),
            "catalogued archive"
        );
        catalog
    }

    /// Paths in one category.
    pub fn category(&self, category: AssetCategory) -> &[String] {
        self.groups.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Number of paths per category, in category order.
    pub fn counts(&self) -> impl Iterator<Item = (AssetCategory, usize)> + '_ {
        AssetCategory::ALL
            .into_iter()
            .map(|category| (category, self.category(category).len()))
    }

    #[inline]
    pub fn characters(&self) -> &[String] {
        self.category(AssetCategory::Character)
    }

    #[inline]
    pub fn weapons(&self) -> &[String] {
        self.category(AssetCategory::Weapon)
    }

    #[inline]
    pub fn locations(&self) -> &[String] {
        self.category(AssetCategory::Location)
    }

    #[inline]
    pub fn items(&self) -> &[String] {
        self.category(AssetCategory::Item)
    }

    #[inline]
    pub fn ui(&self) -> &[String] {
        self.category(AssetCategory::Ui)
    }

    /// Character paths that name a known NPC.
    #[inline]
    pub fn npcs(&self) -> &[NamedPath] {
        &self.npcs
    }

    /// Weapon paths that name an exotic weapon.
    #[inline]
    pub fn exotic_weapons(&self) -> &[NamedPath] {
        &self.exotic_weapons
    }
}
