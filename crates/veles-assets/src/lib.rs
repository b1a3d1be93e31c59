//! Asset classification for PAK archive contents.
//!
//! Everything here is a pure function of archive paths: the classifier maps a
//! path to an [`AssetCategory`] by prefix, the naming tables pick out notable
//! NPCs and weapons by file stem, and the catalog groups a whole archive.
//! [`discover`] locates archives in a game install.
//!
//! # Example
//!
//! ```
//! use veles_assets::{classify, AssetCategory, ClassifierTable};
//!
//! let table = ClassifierTable::fortnite();
//! assert_eq!(
//!     classify("FortniteGame/Content/Weapons/boom_sniper.uasset", &table),
//!     AssetCategory::Weapon
//! );
//! ```

mod catalog;
mod classify;
pub mod discover;
mod names;

pub use catalog::{AssetCatalog, NamedPath};
pub use classify::{classify, AssetCategory, ClassifierTable, PrefixRule};
pub use names::{NamedAsset, NamingTables};
