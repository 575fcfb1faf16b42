//! Shared fixtures for unit tests.

use stepgen_catalog::{InvariantContext, LabwareEntity, ModuleEntity, ModuleKind, PipetteEntity, fixtures};
use stepgen_model::{
    ChangeTip, ConsolidateArgs, DistributeArgs, MixArgs, TransferArgs,
};

use crate::robot_state::RobotState;

/// One p300 single, a 300 µL tip rack, a 96-well plate, and the fixed trash.
pub(crate) fn basic_context() -> InvariantContext {
    InvariantContext::builder()
        .pipette(PipetteEntity {
            id: "p1".into(),
            spec: fixtures::pipette_spec("p300_single_gen2").expect("known model"),
        })
        .labware(LabwareEntity {
            id: "tiprack1".into(),
            def: fixtures::opentrons_96_tiprack_300ul(),
            slot: "1".into(),
        })
        .labware(LabwareEntity {
            id: "plate1".into(),
            def: fixtures::corning_96_wellplate_360ul_flat(),
            slot: "2".into(),
        })
        .labware(LabwareEntity {
            id: "trash".into(),
            def: fixtures::fixed_trash(),
            slot: "12".into(),
        })
        .build()
        .expect("valid catalog")
}

/// [`basic_context`] plus a temperature module and a thermocycler.
pub(crate) fn module_context() -> InvariantContext {
    InvariantContext::builder()
        .pipette(PipetteEntity {
            id: "p1".into(),
            spec: fixtures::pipette_spec("p300_single_gen2").expect("known model"),
        })
        .labware(LabwareEntity {
            id: "tiprack1".into(),
            def: fixtures::opentrons_96_tiprack_300ul(),
            slot: "1".into(),
        })
        .labware(LabwareEntity {
            id: "trash".into(),
            def: fixtures::fixed_trash(),
            slot: "12".into(),
        })
        .module(ModuleEntity {
            id: "tempdeck".into(),
            kind: ModuleKind::TemperatureModule,
            slot: "4".into(),
        })
        .module(ModuleEntity {
            id: "magdeck".into(),
            kind: ModuleKind::MagneticModule,
            slot: "6".into(),
        })
        .module(ModuleEntity {
            id: "tc".into(),
            kind: ModuleKind::Thermocycler,
            slot: "7".into(),
        })
        .build()
        .expect("valid catalog")
}

/// Initial state with `volume` µL of water in plate1 A1.
pub(crate) fn state_with_water(ctx: &InvariantContext, volume: f64) -> RobotState {
    RobotState::initial(ctx).with_liquid(&"plate1".into(), &"A1".into(), &"water".into(), volume)
}

pub(crate) fn mix_args() -> MixArgs {
    MixArgs {
        pipette: "p1".into(),
        labware: "plate1".into(),
        wells: vec!["A1".into()],
        volume: 50.0,
        times: 2,
        change_tip: ChangeTip::Always,
        aspirate_offset_from_bottom_mm: 1.0,
        dispense_offset_from_bottom_mm: 0.5,
        aspirate_flow_rate_ul_sec: 150.0,
        dispense_flow_rate_ul_sec: 300.0,
        blowout_location: None,
        blowout_flow_rate_ul_sec: 300.0,
        blowout_offset_from_top_mm: 0.0,
        touch_tip: false,
        touch_tip_mm_from_bottom: 13.0,
    }
}

pub(crate) fn transfer_args() -> TransferArgs {
    TransferArgs {
        pipette: "p1".into(),
        source_labware: "plate1".into(),
        source_wells: vec!["A1".into()],
        dest_labware: "plate1".into(),
        dest_wells: vec!["A2".into()],
        volume: 100.0,
        change_tip: ChangeTip::Once,
        air_gap_volume: None,
        touch_tip_after_aspirate: false,
        touch_tip_after_dispense: false,
        aspirate_offset_from_bottom_mm: 1.0,
        dispense_offset_from_bottom_mm: 0.5,
        aspirate_flow_rate_ul_sec: 150.0,
        dispense_flow_rate_ul_sec: 300.0,
        blowout_location: None,
        blowout_flow_rate_ul_sec: 300.0,
        blowout_offset_from_top_mm: 0.0,
        touch_tip_mm_from_bottom: 13.0,
    }
}

pub(crate) fn consolidate_args() -> ConsolidateArgs {
    ConsolidateArgs {
        pipette: "p1".into(),
        source_labware: "plate1".into(),
        source_wells: vec!["A1".into(), "B1".into()],
        dest_labware: "plate1".into(),
        dest_well: "A12".into(),
        volume: 50.0,
        change_tip: ChangeTip::Once,
        air_gap_volume: None,
        touch_tip_after_aspirate: false,
        touch_tip_after_dispense: false,
        aspirate_offset_from_bottom_mm: 1.0,
        dispense_offset_from_bottom_mm: 0.5,
        aspirate_flow_rate_ul_sec: 150.0,
        dispense_flow_rate_ul_sec: 300.0,
        blowout_location: None,
        blowout_flow_rate_ul_sec: 300.0,
        blowout_offset_from_top_mm: 0.0,
        touch_tip_mm_from_bottom: 13.0,
    }
}

pub(crate) fn distribute_args() -> DistributeArgs {
    DistributeArgs {
        pipette: "p1".into(),
        source_labware: "plate1".into(),
        source_well: "A1".into(),
        dest_labware: "plate1".into(),
        dest_wells: vec!["A2".into()],
        volume: 50.0,
        change_tip: ChangeTip::Once,
        disposal_volume: None,
        air_gap_volume: None,
        touch_tip_after_aspirate: false,
        touch_tip_after_dispense: false,
        aspirate_offset_from_bottom_mm: 1.0,
        dispense_offset_from_bottom_mm: 0.5,
        aspirate_flow_rate_ul_sec: 150.0,
        dispense_flow_rate_ul_sec: 300.0,
        blowout_location: None,
        blowout_flow_rate_ul_sec: 300.0,
        blowout_offset_from_top_mm: 0.0,
        touch_tip_mm_from_bottom: 13.0,
    }
}
