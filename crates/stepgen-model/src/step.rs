//! User-authored step definitions.
//!
//! A [`Step`] is the compiler's input unit: a step id plus a tagged argument
//! union discriminated by `stepType`. Each variant carries the typed
//! arguments for one compound command creator and is matched exhaustively
//! when dispatching.

use serde::{Deserialize, Serialize};

use crate::ids::{DeckSlot, LabwareId, ModuleId, PipetteId, StepId, WellName};

/// When a multi-well operation acquires a fresh tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTip {
    /// Fresh tip before every well (or chunk) of the operation.
    Always,
    /// One fresh tip at the start of the step, reused throughout.
    Once,
    /// Reuse whatever tip is already mounted from the prior step.
    Never,
}

/// Where a blow-out goes after a pipetting cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlowoutLocation {
    /// The well liquid was last aspirated from.
    SourceWell,
    /// The well liquid was last dispensed into.
    DestWell,
    /// The fixed trash.
    Trash,
    /// Well A1 of a specific labware.
    Labware(LabwareId),
}

mod defaults {
    pub fn aspirate_offset_from_bottom_mm() -> f64 {
        1.0
    }
    pub fn dispense_offset_from_bottom_mm() -> f64 {
        0.5
    }
    pub fn aspirate_flow_rate_ul_sec() -> f64 {
        150.0
    }
    pub fn dispense_flow_rate_ul_sec() -> f64 {
        300.0
    }
    pub fn blowout_flow_rate_ul_sec() -> f64 {
        300.0
    }
    pub fn blowout_offset_from_top_mm() -> f64 {
        0.0
    }
    pub fn touch_tip_mm_from_bottom() -> f64 {
        13.0
    }
}

/// A user-authored protocol step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    #[serde(flatten)]
    pub args: StepArgs,
}

/// Step arguments, discriminated by `stepType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stepType", rename_all = "camelCase")]
pub enum StepArgs {
    Mix(MixArgs),
    Transfer(TransferArgs),
    Consolidate(ConsolidateArgs),
    Distribute(DistributeArgs),
    Pause(PauseArgs),
    MoveLabware(MoveLabwareArgs),
    SetTemperature(SetTemperatureArgs),
    AwaitTemperature(AwaitTemperatureArgs),
    DeactivateTemperature(ModuleStepArgs),
    EngageMagnet(EngageMagnetArgs),
    DisengageMagnet(ModuleStepArgs),
    ThermocyclerSetBlock(ThermocyclerBlockArgs),
    ThermocyclerSetLid(ThermocyclerLidArgs),
}

impl StepArgs {
    /// The `stepType` discriminant as serialized.
    pub fn step_type(&self) -> &'static str {
        match self {
            StepArgs::Mix(_) => "mix",
            StepArgs::Transfer(_) => "transfer",
            StepArgs::Consolidate(_) => "consolidate",
            StepArgs::Distribute(_) => "distribute",
            StepArgs::Pause(_) => "pause",
            StepArgs::MoveLabware(_) => "moveLabware",
            StepArgs::SetTemperature(_) => "setTemperature",
            StepArgs::AwaitTemperature(_) => "awaitTemperature",
            StepArgs::DeactivateTemperature(_) => "deactivateTemperature",
            StepArgs::EngageMagnet(_) => "engageMagnet",
            StepArgs::DisengageMagnet(_) => "disengageMagnet",
            StepArgs::ThermocyclerSetBlock(_) => "thermocyclerSetBlock",
            StepArgs::ThermocyclerSetLid(_) => "thermocyclerSetLid",
        }
    }
}

/// Arguments for a mix step: aspirate/dispense a uniform volume `times`
/// times in each listed well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixArgs {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub wells: Vec<WellName>,
    /// Volume per aspirate/dispense cycle, µL.
    pub volume: f64,
    /// Number of aspirate/dispense cycles per well.
    pub times: u32,
    pub change_tip: ChangeTip,
    #[serde(default = "defaults::aspirate_offset_from_bottom_mm")]
    pub aspirate_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::dispense_offset_from_bottom_mm")]
    pub dispense_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::aspirate_flow_rate_ul_sec")]
    pub aspirate_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::dispense_flow_rate_ul_sec")]
    pub dispense_flow_rate_ul_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blowout_location: Option<BlowoutLocation>,
    #[serde(default = "defaults::blowout_flow_rate_ul_sec")]
    pub blowout_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::blowout_offset_from_top_mm")]
    pub blowout_offset_from_top_mm: f64,
    #[serde(default)]
    pub touch_tip: bool,
    #[serde(default = "defaults::touch_tip_mm_from_bottom")]
    pub touch_tip_mm_from_bottom: f64,
}

/// Arguments for a one-to-one transfer between paired well lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferArgs {
    pub pipette: PipetteId,
    pub source_labware: LabwareId,
    pub source_wells: Vec<WellName>,
    pub dest_labware: LabwareId,
    pub dest_wells: Vec<WellName>,
    /// Volume per source/dest pair, µL. Split into chunks when it exceeds
    /// the pipette's working volume.
    pub volume: f64,
    pub change_tip: ChangeTip,
    /// Air drawn above the source after each aspirate, µL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_gap_volume: Option<f64>,
    #[serde(default)]
    pub touch_tip_after_aspirate: bool,
    #[serde(default)]
    pub touch_tip_after_dispense: bool,
    #[serde(default = "defaults::aspirate_offset_from_bottom_mm")]
    pub aspirate_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::dispense_offset_from_bottom_mm")]
    pub dispense_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::aspirate_flow_rate_ul_sec")]
    pub aspirate_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::dispense_flow_rate_ul_sec")]
    pub dispense_flow_rate_ul_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blowout_location: Option<BlowoutLocation>,
    #[serde(default = "defaults::blowout_flow_rate_ul_sec")]
    pub blowout_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::blowout_offset_from_top_mm")]
    pub blowout_offset_from_top_mm: f64,
    #[serde(default = "defaults::touch_tip_mm_from_bottom")]
    pub touch_tip_mm_from_bottom: f64,
}

/// Arguments for a many-to-one consolidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidateArgs {
    pub pipette: PipetteId,
    pub source_labware: LabwareId,
    pub source_wells: Vec<WellName>,
    pub dest_labware: LabwareId,
    pub dest_well: WellName,
    /// Volume per source well, µL.
    pub volume: f64,
    pub change_tip: ChangeTip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_gap_volume: Option<f64>,
    #[serde(default)]
    pub touch_tip_after_aspirate: bool,
    #[serde(default)]
    pub touch_tip_after_dispense: bool,
    #[serde(default = "defaults::aspirate_offset_from_bottom_mm")]
    pub aspirate_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::dispense_offset_from_bottom_mm")]
    pub dispense_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::aspirate_flow_rate_ul_sec")]
    pub aspirate_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::dispense_flow_rate_ul_sec")]
    pub dispense_flow_rate_ul_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blowout_location: Option<BlowoutLocation>,
    #[serde(default = "defaults::blowout_flow_rate_ul_sec")]
    pub blowout_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::blowout_offset_from_top_mm")]
    pub blowout_offset_from_top_mm: f64,
    #[serde(default = "defaults::touch_tip_mm_from_bottom")]
    pub touch_tip_mm_from_bottom: f64,
}

/// Arguments for a one-to-many distribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeArgs {
    pub pipette: PipetteId,
    pub source_labware: LabwareId,
    pub source_well: WellName,
    pub dest_labware: LabwareId,
    pub dest_wells: Vec<WellName>,
    /// Volume per destination well, µL.
    pub volume: f64,
    pub change_tip: ChangeTip,
    /// Extra volume aspirated per chunk and shed by the final blow-out, µL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_gap_volume: Option<f64>,
    #[serde(default)]
    pub touch_tip_after_aspirate: bool,
    #[serde(default)]
    pub touch_tip_after_dispense: bool,
    #[serde(default = "defaults::aspirate_offset_from_bottom_mm")]
    pub aspirate_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::dispense_offset_from_bottom_mm")]
    pub dispense_offset_from_bottom_mm: f64,
    #[serde(default = "defaults::aspirate_flow_rate_ul_sec")]
    pub aspirate_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::dispense_flow_rate_ul_sec")]
    pub dispense_flow_rate_ul_sec: f64,
    /// Defaults to the trash when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blowout_location: Option<BlowoutLocation>,
    #[serde(default = "defaults::blowout_flow_rate_ul_sec")]
    pub blowout_flow_rate_ul_sec: f64,
    #[serde(default = "defaults::blowout_offset_from_top_mm")]
    pub blowout_offset_from_top_mm: f64,
    #[serde(default = "defaults::touch_tip_mm_from_bottom")]
    pub touch_tip_mm_from_bottom: f64,
}

/// Arguments for a pause: fixed duration, or wait for operator resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Absent means wait until the operator resumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLabwareArgs {
    pub labware: LabwareId,
    pub new_slot: DeckSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTemperatureArgs {
    pub module: ModuleId,
    pub celsius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwaitTemperatureArgs {
    pub module: ModuleId,
    /// Absent means await the module's currently configured target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celsius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStepArgs {
    pub module: ModuleId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageMagnetArgs {
    pub module: ModuleId,
    pub engage_height_mm: f64,
}

/// Set or clear the thermocycler block target. `None` deactivates the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermocyclerBlockArgs {
    pub module: ModuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celsius: Option<f64>,
}

/// Position and/or heat the thermocycler lid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermocyclerLidArgs {
    pub module: ModuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LidPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celsius: Option<f64>,
}

/// Thermocycler lid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LidPosition {
    Open,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_step_deserializes_with_defaults() {
        let json = r#"{
            "id": "step-1",
            "stepType": "mix",
            "pipette": "p1",
            "labware": "plate1",
            "wells": ["A1", "B1"],
            "volume": 50.0,
            "times": 2,
            "changeTip": "always"
        }"#;
        let step: Step = serde_json::from_str(json).expect("deserialize");
        assert_eq!(step.id.as_str(), "step-1");
        let StepArgs::Mix(args) = &step.args else {
            panic!("expected mix step");
        };
        assert_eq!(args.wells.len(), 2);
        assert_eq!(args.change_tip, ChangeTip::Always);
        assert_eq!(args.aspirate_offset_from_bottom_mm, 1.0);
        assert_eq!(args.dispense_offset_from_bottom_mm, 0.5);
        assert!(!args.touch_tip);
    }

    #[test]
    fn step_type_matches_serialized_tag() {
        let step = Step {
            id: "s".into(),
            args: StepArgs::Pause(PauseArgs {
                message: None,
                seconds: Some(30.0),
            }),
        };
        let json = serde_json::to_value(&step).expect("serialize");
        assert_eq!(json["stepType"], step.args.step_type());
    }

    #[test]
    fn blowout_location_round_trips() {
        for location in [
            BlowoutLocation::SourceWell,
            BlowoutLocation::DestWell,
            BlowoutLocation::Trash,
            BlowoutLocation::Labware("reservoir".into()),
        ] {
            let json = serde_json::to_string(&location).expect("serialize");
            let round: BlowoutLocation = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(round, location);
        }
    }
}
