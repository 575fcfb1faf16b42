//! Programmatic standard definitions for common pipettes and labware.
//!
//! These stand in for a bundled definition library: geometry is generated
//! from the published dimensions of each labware rather than loaded from
//! data files. Lookup is by load name via [`labware_def`] / [`pipette_spec`].

use std::collections::BTreeMap;

use stepgen_model::WellName;

use crate::labware::{LabwareDef, WellGeometry};
use crate::pipette::PipetteSpec;

const TIPRACK_300UL_URI: &str = "opentrons/opentrons_96_tiprack_300ul/1";
const TIPRACK_20UL_URI: &str = "opentrons/opentrons_96_tiprack_20ul/1";

/// Build a rows × columns grid of identical wells ("A1".."H12" layout).
fn well_grid(rows: u8, columns: u8, geometry: &WellGeometry) -> BTreeMap<WellName, WellGeometry> {
    let mut wells = BTreeMap::new();
    for row in 0..rows {
        let row_letter = (b'A' + row) as char;
        for column in 1..=u32::from(columns) {
            wells.insert(
                WellName::from_row_column(row_letter, column),
                geometry.clone(),
            );
        }
    }
    wells
}

/// Standard 96-well flat-bottom plate, 360 µL per well.
pub fn corning_96_wellplate_360ul_flat() -> LabwareDef {
    LabwareDef {
        uri: "opentrons/corning_96_wellplate_360ul_flat/1".to_string(),
        display_name: "Corning 96 Well Plate 360 µL Flat".to_string(),
        wells: well_grid(
            8,
            12,
            &WellGeometry {
                depth_mm: 10.67,
                total_liquid_volume_ul: 360.0,
            },
        ),
        is_tiprack: false,
        is_trash: false,
    }
}

/// 12-channel reservoir, 22 mL per channel.
pub fn usa_scientific_12_reservoir_22ml() -> LabwareDef {
    LabwareDef {
        uri: "opentrons/usa_scientific_12_reservoir_22ml/1".to_string(),
        display_name: "USA Scientific 12 Well Reservoir 22 mL".to_string(),
        wells: well_grid(
            1,
            12,
            &WellGeometry {
                depth_mm: 42.16,
                total_liquid_volume_ul: 22_000.0,
            },
        ),
        is_tiprack: false,
        is_trash: false,
    }
}

/// 96-tip rack for 300 µL tips.
pub fn opentrons_96_tiprack_300ul() -> LabwareDef {
    LabwareDef {
        uri: TIPRACK_300UL_URI.to_string(),
        display_name: "Opentrons 96 Tip Rack 300 µL".to_string(),
        wells: well_grid(
            8,
            12,
            &WellGeometry {
                depth_mm: 59.3,
                total_liquid_volume_ul: 300.0,
            },
        ),
        is_tiprack: true,
        is_trash: false,
    }
}

/// 96-tip rack for 20 µL tips.
pub fn opentrons_96_tiprack_20ul() -> LabwareDef {
    LabwareDef {
        uri: TIPRACK_20UL_URI.to_string(),
        display_name: "Opentrons 96 Tip Rack 20 µL".to_string(),
        wells: well_grid(
            8,
            12,
            &WellGeometry {
                depth_mm: 39.2,
                total_liquid_volume_ul: 20.0,
            },
        ),
        is_tiprack: true,
        is_trash: false,
    }
}

/// The fixed trash: one oversized well, flagged `is_trash`.
pub fn fixed_trash() -> LabwareDef {
    let mut wells = BTreeMap::new();
    wells.insert(
        WellName::from("A1"),
        WellGeometry {
            depth_mm: 40.0,
            total_liquid_volume_ul: 1_000_000.0,
        },
    );
    LabwareDef {
        uri: "opentrons/opentrons_1_trash_1100ml_fixed/1".to_string(),
        display_name: "Fixed Trash".to_string(),
        wells,
        is_tiprack: false,
        is_trash: true,
    }
}

/// Resolve a labware definition by load name.
pub fn labware_def(load_name: &str) -> Option<LabwareDef> {
    match load_name {
        "corning_96_wellplate_360ul_flat" => Some(corning_96_wellplate_360ul_flat()),
        "usa_scientific_12_reservoir_22ml" => Some(usa_scientific_12_reservoir_22ml()),
        "opentrons_96_tiprack_300ul" => Some(opentrons_96_tiprack_300ul()),
        "opentrons_96_tiprack_20ul" => Some(opentrons_96_tiprack_20ul()),
        "fixed_trash" => Some(fixed_trash()),
        _ => None,
    }
}

/// Resolve a pipette specification by model name.
pub fn pipette_spec(model: &str) -> Option<PipetteSpec> {
    match model {
        "p20_single_gen2" => Some(PipetteSpec {
            model: model.to_string(),
            channels: 1,
            min_volume_ul: 1.0,
            max_volume_ul: 20.0,
            tiprack_uri: TIPRACK_20UL_URI.to_string(),
        }),
        "p300_single_gen2" => Some(PipetteSpec {
            model: model.to_string(),
            channels: 1,
            min_volume_ul: 20.0,
            max_volume_ul: 300.0,
            tiprack_uri: TIPRACK_300UL_URI.to_string(),
        }),
        "p300_multi_gen2" => Some(PipetteSpec {
            model: model.to_string(),
            channels: 8,
            min_volume_ul: 20.0,
            max_volume_ul: 300.0,
            tiprack_uri: TIPRACK_300UL_URI.to_string(),
        }),
        _ => None,
    }
}
