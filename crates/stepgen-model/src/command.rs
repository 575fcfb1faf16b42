//! Low-level robot commands — the compiled output unit.
//!
//! Every command carries fully resolved numeric parameters: volumes in µL,
//! flow rates in µL/s, offsets in mm from a stated reference (bottom of well,
//! or signed from the top of the well). The serde representation matches the
//! robot's JSON command schema: `{"command": "...", "params": {...}}`.

use serde::{Deserialize, Serialize};

use crate::ids::{DeckSlot, LabwareId, ModuleId, PipetteId, WellName};

/// Parameters shared by `aspirate` and `dispense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipettingParams {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub well: WellName,
    /// Volume in µL.
    pub volume: f64,
    /// Tip position, mm above the bottom of the well.
    pub offset_from_bottom_mm: f64,
    /// Plunger speed in µL/s.
    pub flow_rate_ul_sec: f64,
}

/// Parameters for `airGap` / `dispenseAirGap`, positioned above the liquid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirGapParams {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub well: WellName,
    /// Air volume in µL.
    pub volume: f64,
    /// Tip position, signed mm relative to the top of the well.
    pub offset_from_top_mm: f64,
    pub flow_rate_ul_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlowoutParams {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub well: WellName,
    /// Tip position, signed mm relative to the top of the well.
    pub offset_from_top_mm: f64,
    pub flow_rate_ul_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchTipParams {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub well: WellName,
    pub offset_from_bottom_mm: f64,
}

/// Parameters for `pickUpTip` / `dropTip`, with the tip rack (or trash)
/// location fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipHandlingParams {
    pub pipette: PipetteId,
    pub labware: LabwareId,
    pub well: WellName,
}

/// What a `delay` command waits on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Wait {
    /// Wait a fixed number of seconds.
    Seconds(f64),
    /// Wait until the operator resumes (serialized as `true`).
    UntilResume(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayParams {
    pub wait: Wait,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLabwareParams {
    pub labware: LabwareId,
    pub new_slot: DeckSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureParams {
    pub module: ModuleId,
    pub celsius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOnlyParams {
    pub module: ModuleId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageMagnetParams {
    pub module: ModuleId,
    /// Magnet height in mm above home.
    pub engage_height_mm: f64,
}

/// A single compiled robot instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "params")]
pub enum Command {
    #[serde(rename = "aspirate")]
    Aspirate(PipettingParams),
    #[serde(rename = "dispense")]
    Dispense(PipettingParams),
    #[serde(rename = "airGap")]
    AirGap(AirGapParams),
    #[serde(rename = "dispenseAirGap")]
    DispenseAirGap(AirGapParams),
    #[serde(rename = "blowout")]
    Blowout(BlowoutParams),
    #[serde(rename = "touchTip")]
    TouchTip(TouchTipParams),
    #[serde(rename = "pickUpTip")]
    PickUpTip(TipHandlingParams),
    #[serde(rename = "dropTip")]
    DropTip(TipHandlingParams),
    #[serde(rename = "delay")]
    Delay(DelayParams),
    #[serde(rename = "moveLabware")]
    MoveLabware(MoveLabwareParams),
    #[serde(rename = "temperatureModule/setTargetTemperature")]
    SetTargetTemperature(TemperatureParams),
    #[serde(rename = "temperatureModule/awaitTemperature")]
    AwaitTemperature(TemperatureParams),
    #[serde(rename = "temperatureModule/deactivate")]
    DeactivateTemperature(ModuleOnlyParams),
    #[serde(rename = "magneticModule/engage")]
    EngageMagnet(EngageMagnetParams),
    #[serde(rename = "magneticModule/disengage")]
    DisengageMagnet(ModuleOnlyParams),
    #[serde(rename = "thermocycler/setTargetBlockTemperature")]
    SetBlockTemperature(TemperatureParams),
    #[serde(rename = "thermocycler/deactivateBlock")]
    DeactivateBlock(ModuleOnlyParams),
    #[serde(rename = "thermocycler/setTargetLidTemperature")]
    SetLidTemperature(TemperatureParams),
    #[serde(rename = "thermocycler/openLid")]
    OpenLid(ModuleOnlyParams),
    #[serde(rename = "thermocycler/closeLid")]
    CloseLid(ModuleOnlyParams),
}

impl Command {
    /// The wire name of this command, as used in the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Aspirate(_) => "aspirate",
            Command::Dispense(_) => "dispense",
            Command::AirGap(_) => "airGap",
            Command::DispenseAirGap(_) => "dispenseAirGap",
            Command::Blowout(_) => "blowout",
            Command::TouchTip(_) => "touchTip",
            Command::PickUpTip(_) => "pickUpTip",
            Command::DropTip(_) => "dropTip",
            Command::Delay(_) => "delay",
            Command::MoveLabware(_) => "moveLabware",
            Command::SetTargetTemperature(_) => "temperatureModule/setTargetTemperature",
            Command::AwaitTemperature(_) => "temperatureModule/awaitTemperature",
            Command::DeactivateTemperature(_) => "temperatureModule/deactivate",
            Command::EngageMagnet(_) => "magneticModule/engage",
            Command::DisengageMagnet(_) => "magneticModule/disengage",
            Command::SetBlockTemperature(_) => "thermocycler/setTargetBlockTemperature",
            Command::DeactivateBlock(_) => "thermocycler/deactivateBlock",
            Command::SetLidTemperature(_) => "thermocycler/setTargetLidTemperature",
            Command::OpenLid(_) => "thermocycler/openLid",
            Command::CloseLid(_) => "thermocycler/closeLid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspirate_serializes_with_command_tag() {
        let command = Command::Aspirate(PipettingParams {
            pipette: "p1".into(),
            labware: "plate1".into(),
            well: "A1".into(),
            volume: 50.0,
            offset_from_bottom_mm: 1.0,
            flow_rate_ul_sec: 150.0,
        });
        let json = serde_json::to_value(&command).expect("serialize");
        assert_eq!(json["command"], "aspirate");
        assert_eq!(json["params"]["volume"], 50.0);
        assert_eq!(json["params"]["offsetFromBottomMm"], 1.0);
    }

    #[test]
    fn delay_wait_forever_round_trips() {
        let command = Command::Delay(DelayParams {
            wait: Wait::UntilResume(true),
            message: Some("operator check".to_string()),
        });
        let json = serde_json::to_string(&command).expect("serialize");
        let round: Command = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round, command);
    }

    #[test]
    fn module_command_names_match_wire_format() {
        let command = Command::EngageMagnet(EngageMagnetParams {
            module: "mag1".into(),
            engage_height_mm: 16.0,
        });
        assert_eq!(command.name(), "magneticModule/engage");
        let json = serde_json::to_value(&command).expect("serialize");
        assert_eq!(json["command"], "magneticModule/engage");
    }
}
