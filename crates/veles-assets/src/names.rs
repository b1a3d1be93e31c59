//! Static naming tables for notable assets.
//!
//! Tables are plain data handed to lookups; nothing here is compiled into the
//! classifier itself.

use std::path::Path;

/// A display name plus the asset identifiers that refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamedAsset {
    name: String,
    aliases: Vec<String>,
}

impl NamedAsset {
    pub fn new<S: Into<String>>(name: S, aliases: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asset identifiers (file stems) that also refer to this asset.
    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Check the name and every alias against a file stem, ignoring ASCII case.
    pub fn matches_stem(&self, stem: &str) -> bool {
        self.name.eq_ignore_ascii_case(stem)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(stem))
    }
}

/// Immutable lookup tables for NPCs, exotic weapons, map locations and UI
/// elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingTables {
    npcs: Vec<NamedAsset>,
    exotic_weapons: Vec<NamedAsset>,
    locations: Vec<NamedAsset>,
    ui: Vec<NamedAsset>,
}

impl NamingTables {
    pub fn new(
        npcs: Vec<NamedAsset>,
        exotic_weapons: Vec<NamedAsset>,
        locations: Vec<NamedAsset>,
        ui: Vec<NamedAsset>,
    ) -> Self {
        Self {
            npcs,
            exotic_weapons,
            locations,
            ui,
        }
    }

    /// Chapter 2 Season 5 tables.
    pub fn season5() -> Self {
        let npcs = vec![
            NamedAsset::new("Mando", ["CID_694_Athena_Commando_M_MandalorianSeason"]),
            NamedAsset::new("Mancake", ["CID_695_Athena_Commando_M_Mancake"]),
            NamedAsset::new("Kondor", ["CID_696_Athena_Commando_M_Kondor"]),
            NamedAsset::new("Lexa", ["CID_697_Athena_Commando_F_Lexa"]),
            NamedAsset::new("Reese", ["CID_698_Athena_Commando_F_Reese"]),
        ];

        let exotic_weapons = vec![
            NamedAsset::new("Mandalorian_Rifle", ["WID_Assault_Auto_Athena_SR_Ore_T03"]),
            NamedAsset::new(
                "Boom_Sniper",
                ["Boom_Sniper_Rifle", "WID_Shotgun_Break_Athena_VR_Ore_T03"],
            ),
            NamedAsset::new(
                "Dragons_Breath",
                ["Dragons_Breath_Shotgun", "WID_Shotgun_SemiAuto_Athena_VR_Ore_T03"],
            ),
            NamedAsset::new("Shadow_Tracker", ["WID_Pistol_SemiAuto_Athena_VR_Ore_T03"]),
            NamedAsset::new("Hop_Rock_Dualies", ["WID_Pistol_AutoHeavy_Athena_VR_Ore_T03"]),
        ];

        let locations = ["Desert_Biome", "Butter_Barn", "Colosseum", "Stealthy_Stronghold", "Crashed_Ships"]
            .into_iter()
            .map(|name| NamedAsset::new(name, []))
            .collect();

        let ui = ["BountySystem", "GoldBars", "NPCInteraction", "ExoticWeapons"]
            .into_iter()
            .map(|name| NamedAsset::new(name, []))
            .collect();

        Self::new(npcs, exotic_weapons, locations, ui)
    }

    #[inline]
    pub fn npcs(&self) -> &[NamedAsset] {
        &self.npcs
    }

    #[inline]
    pub fn exotic_weapons(&self) -> &[NamedAsset] {
        &self.exotic_weapons
    }

    #[inline]
    pub fn locations(&self) -> &[NamedAsset] {
        &self.locations
    }

    #[inline]
    pub fn ui(&self) -> &[NamedAsset] {
        &self.ui
    }

    /// NPC whose name or identifier equals the path's file stem.
    pub fn npc_for(&self, path: &str) -> Option<&NamedAsset> {
        lookup(&self.npcs, path)
    }

    /// Exotic weapon whose name or identifier equals the path's file stem.
    pub fn exotic_weapon_for(&self, path: &str) -> Option<&NamedAsset> {
        lookup(&self.exotic_weapons, path)
    }

    /// Check if the path names an exotic weapon.
    pub fn is_exotic_weapon(&self, path: &str) -> bool {
        self.exotic_weapon_for(path).is_some()
    }

    /// Map location whose name equals the path's file stem.
    pub fn location_for(&self, path: &str) -> Option<&NamedAsset> {
        lookup(&self.locations, path)
    }

    /// UI element whose name equals the path's file stem.
    pub fn ui_element_for(&self, path: &str) -> Option<&NamedAsset> {
        lookup(&self.ui, path)
    }
}

fn lookup<'a>(table: &'a [NamedAsset], path: &str) -> Option<&'a NamedAsset> {
    let stem = file_stem(path)?;
    table.iter().find(|asset| asset.matches_stem(stem))
}

fn file_stem(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    Path::new(name).file_stem().and_then(|s| s.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exotic_weapons() {
        let tables = NamingTables::season5();

        assert!(tables.is_exotic_weapon("FortniteGame/Content/Weapons/boom_sniper.uasset"));
        assert!(tables.is_exotic_weapon("Weapons\\Exotic\\Dragons_Breath_Shotgun.uasset"));
        assert!(tables.is_exotic_weapon(
            "FortniteGame/Content/Athena/Items/Weapons/WID_Pistol_AutoHeavy_Athena_VR_Ore_T03.uasset"
        ));
        assert!(!tables.is_exotic_weapon("FortniteGame/Content/Weapons/pump_shotgun.uasset"));
        // Stem must match exactly, not just contain a name.
        assert!(!tables.is_exotic_weapon("FortniteGame/Content/Weapons/boom_sniper_scope.uasset"));

        assert_eq!(
            tables
                .exotic_weapon_for("a/WID_Assault_Auto_Athena_SR_Ore_T03.uasset")
                .map(NamedAsset::name),
            Some("Mandalorian_Rifle")
        );
    }

    #[test]
    fn test_npcs() {
        let tables = NamingTables::season5();

        assert_eq!(
            tables.npc_for("FortniteGame/Content/Characters/MANDO.uasset").map(NamedAsset::name),
            Some("Mando")
        );
        assert_eq!(
            tables
                .npc_for("Cosmetics/Characters/CID_697_Athena_Commando_F_Lexa.uasset")
                .map(NamedAsset::name),
            Some("Lexa")
        );
        assert!(tables.npc_for("FortniteGame/Content/Characters/Jonesy.uasset").is_none());
        assert!(tables.npc_for("").is_none());
    }

    #[test]
    fn test_locations() {
        let tables = NamingTables::season5();
        assert_eq!(
            tables.location_for("Athena/Maps/Colosseum.umap").map(NamedAsset::name),
            Some("Colosseum")
        );
        assert_eq!(tables.locations().len(), 5);
    }

    #[test]
    fn test_ui_elements() {
        let tables = NamingTables::season5();
        assert_eq!(
            tables
                .ui_element_for("FortniteGame/Content/UI/npcinteraction.uasset")
                .map(NamedAsset::name),
            Some("NPCInteraction")
        );
        assert!(tables.ui_element_for("FortniteGame/Content/UI/MiniMap.uasset").is_none());
        assert_eq!(tables.ui().len(), 4);
    }

    #[test]
    fn test_custom_tables() {
        let tables = NamingTables::new(vec![NamedAsset::new("Jonesy", ["CID_001"])], Vec::new(), Vec::new(), Vec::new());
        assert!(tables.npc_for("x/cid_001.uasset").is_some());
        assert!(!tables.is_exotic_weapon("x/boom_sniper.uasset"));
        assert!(NamingTables::default().npcs().is_empty());
    }
}
