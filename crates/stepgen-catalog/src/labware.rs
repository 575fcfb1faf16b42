//! Labware entity definitions and well geometry lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stepgen_model::{DeckSlot, LabwareId, WellName};

/// Geometry of a single well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellGeometry {
    /// Interior depth, mm.
    pub depth_mm: f64,
    /// Rated liquid capacity, µL.
    pub total_liquid_volume_ul: f64,
}

/// Static definition of a labware type: its wells and their geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabwareDef {
    /// Definition URI, e.g. `"opentrons/corning_96_wellplate_360ul_flat/1"`.
    pub uri: String,
    pub display_name: String,
    pub wells: BTreeMap<WellName, WellGeometry>,
    #[serde(default)]
    pub is_tiprack: bool,
    #[serde(default)]
    pub is_trash: bool,
}

impl LabwareDef {
    pub fn well(&self, name: &WellName) -> Option<&WellGeometry> {
        self.wells.get(name)
    }

    pub fn has_well(&self, name: &WellName) -> bool {
        self.wells.contains_key(name)
    }

    /// All wells in column-major order (A1, B1, .., A2, B2, ..), the order
    /// tips are consumed from a tip rack.
    pub fn ordered_wells(&self) -> Vec<&WellName> {
        let mut wells: Vec<&WellName> = self.wells.keys().collect();
        wells.sort_by_key(|well| (well.column().unwrap_or(u32::MAX), well.row().unwrap_or('Z')));
        wells
    }
}

/// A labware instance placed on the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabwareEntity {
    pub id: LabwareId,
    pub def: LabwareDef,
    pub slot: DeckSlot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> LabwareDef {
        let geometry = WellGeometry {
            depth_mm: 10.0,
            total_liquid_volume_ul: 200.0,
        };
        let mut wells = BTreeMap::new();
        for name in ["A1", "B1", "A2", "B2"] {
            wells.insert(WellName::from(name), geometry.clone());
        }
        LabwareDef {
            uri: "test/two_by_two/1".to_string(),
            display_name: "2x2 test plate".to_string(),
            wells,
            is_tiprack: false,
            is_trash: false,
        }
    }

    #[test]
    fn ordered_wells_are_column_major() {
        let def = two_by_two();
        let ordered: Vec<&str> = def.ordered_wells().iter().map(|w| w.as_str()).collect();
        assert_eq!(ordered, ["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn missing_well_lookup_is_none() {
        let def = two_by_two();
        assert!(def.well(&"C1".into()).is_none());
        assert!(def.has_well(&"A2".into()));
    }
}
