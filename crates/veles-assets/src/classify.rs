//! Prefix-based asset classification.

use std::fmt;

use veles_pak::format::normalize_path;
use veles_pak::PathCase;

/// Semantic category of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AssetCategory {
    Character,
    Weapon,
    Location,
    Item,
    Ui,
    Unknown,
}

impl AssetCategory {
    /// All categories, `Unknown` last.
    pub const ALL: [AssetCategory; 6] = [
        Self::Character,
        Self::Weapon,
        Self::Location,
        Self::Item,
        Self::Ui,
        Self::Unknown,
    ];

    /// Lowercase name used in listings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Weapon => "weapon",
            Self::Location => "location",
            Self::Item => "item",
            Self::Ui => "ui",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    /// Prefix as given, separators normalized.
    prefix: String,
    /// ASCII-lowercased prefix used for matching.
    folded: String,
    category: AssetCategory,
}

impl PrefixRule {
    /// The prefix, separators normalized.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn category(&self) -> AssetCategory {
        self.category
    }

    fn matches(&self, folded_path: &str) -> bool {
        // Whole path components only: "Content/UI" must not match "Content/UIX".
        folded_path.starts_with(&self.folded)
            && (folded_path.len() == self.folded.len()
                || folded_path.as_bytes()[self.folded.len()] == b'/')
    }
}

/// Immutable table of `(prefix, category)` rules.
///
/// The longest matching prefix wins. Matching is ASCII case-insensitive and
/// ignores separator style, so `FortniteGame\Content\Weapons\x` and
/// `fortnitegame/content/weapons/x` classify the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierTable {
    rules: Vec<PrefixRule>,
}

impl ClassifierTable {
    /// Build a table from rules in declaration order.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, AssetCategory)>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(prefix, category)| {
                let prefix = normalize_path(prefix.as_ref(), PathCase::Preserve);
                let folded = prefix.to_ascii_lowercase();
                PrefixRule {
                    prefix,
                    folded,
                    category,
                }
            })
            .collect();

        Self { rules }
    }

    /// Content roots of the Fortnite game tree.
    pub fn fortnite() -> Self {
        Self::new([
            ("FortniteGame/Content/Characters/", AssetCategory::Character),
            (
                "FortniteGame/Content/Athena/Items/Cosmetics/Characters/",
                AssetCategory::Character,
            ),
            ("FortniteGame/Content/Weapons/", AssetCategory::Weapon),
            ("FortniteGame/Content/Athena/Items/Weapons/", AssetCategory::Weapon),
            ("FortniteGame/Content/Athena/Maps/", AssetCategory::Location),
            ("FortniteGame/Content/Environments/", AssetCategory::Location),
            ("FortniteGame/Content/Items/", AssetCategory::Item),
            ("FortniteGame/Content/UI/", AssetCategory::Ui),
        ])
    }

    /// Rules in declaration order.
    #[inline]
    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    /// Check if a path falls under any rule.
    pub fn is_known(&self, path: &str) -> bool {
        self.classify(path) != AssetCategory::Unknown
    }

    /// Classify a path.
    pub fn classify(&self, path: &str) -> AssetCategory {
        let folded = normalize_path(path, PathCase::Preserve).to_ascii_lowercase();

        self.rules
            .iter()
            .filter(|rule| rule.matches(&folded))
            .max_by_key(|rule| rule.folded.len())
            .map_or(AssetCategory::Unknown, |rule| rule.category)
    }
}

/// Classify `path` against `table`.
#[inline]
pub fn classify(path: &str, table: &ClassifierTable) -> AssetCategory {
    table.classify(path)
}
