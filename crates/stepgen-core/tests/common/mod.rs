//! Shared deck setup for integration tests.
#![allow(dead_code)]

use stepgen_catalog::{InvariantContext, LabwareEntity, PipetteEntity, fixtures};
use stepgen_core::RobotState;
use stepgen_model::{ChangeTip, MixArgs, Step, StepArgs, TransferArgs, WellName};

pub fn context() -> InvariantContext {
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

pub fn water_state(ctx: &InvariantContext, well: &str, volume: f64) -> RobotState {
    RobotState::initial(ctx).with_liquid(&"plate1".into(), &well.into(), &"water".into(), volume)
}

pub fn mix_step(id: &str, wells: &[&str], volume: f64, times: u32, change_tip: ChangeTip) -> Step {
    Step {
        id: id.into(),
        args: StepArgs::Mix(MixArgs {
            pipette: "p1".into(),
            labware: "plate1".into(),
            wells: wells.iter().map(|well| WellName::from(*well)).collect(),
            volume,
            times,
            change_tip,
            aspirate_offset_from_bottom_mm: 1.0,
            dispense_offset_from_bottom_mm: 0.5,
            aspirate_flow_rate_ul_sec: 150.0,
            dispense_flow_rate_ul_sec: 300.0,
            blowout_location: None,
            blowout_flow_rate_ul_sec: 300.0,
            blowout_offset_from_top_mm: 0.0,
            touch_tip: false,
            touch_tip_mm_from_bottom: 13.0,
        }),
    }
}

pub fn transfer_step(
    id: &str,
    source_labware: &str,
    source: &str,
    dest: &str,
    volume: f64,
) -> Step {
    Step {
        id: id.into(),
        args: StepArgs::Transfer(TransferArgs {
            pipette: "p1".into(),
            source_labware: source_labware.into(),
            source_wells: vec![source.into()],
            dest_labware: "plate1".into(),
            dest_wells: vec![dest.into()],
            volume,
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
        }),
    }
}
