//! Structured compile diagnostics.
//!
//! Failure during step generation is represented as data, never as a panic
//! or a thrown error: each [`StepError`] carries a machine-readable kind with
//! the offending entity references plus a human-readable message. Warnings
//! are non-fatal and never halt state propagation.

use serde::{Deserialize, Serialize};

use crate::ids::{DeckSlot, LabwareId, ModuleId, PipetteId, StepId, WellName};

/// Machine-readable error kind with offending references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ErrorKind {
    PipetteDoesNotExist {
        pipette: PipetteId,
    },
    LabwareDoesNotExist {
        labware: LabwareId,
    },
    ModuleDoesNotExist {
        module: ModuleId,
    },
    WellDoesNotExist {
        labware: LabwareId,
        well: WellName,
    },
    NoTipOnPipette {
        pipette: PipetteId,
    },
    TipAlreadyAttached {
        pipette: PipetteId,
    },
    /// No compatible tip rack has a tip left.
    InsufficientTips {
        pipette: PipetteId,
    },
    MixInvalidVolume {
        volume: f64,
    },
    MixInvalidTimes {
        times: u32,
    },
    /// A single aspirate would exceed the pipette's working volume.
    PipetteVolumeExceeded {
        pipette: PipetteId,
        volume: f64,
        max_volume: f64,
    },
    /// Module exists but is the wrong kind for the requested operation, or
    /// has no target configured where one is required.
    ModuleNotConfigured {
        module: ModuleId,
    },
    SlotOccupied {
        slot: DeckSlot,
    },
    DuplicateStepId {
        step: StepId,
    },
    InvalidStepArguments,
}

/// A fatal, per-step compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub message: String,
}

impl StepError {
    pub fn pipette_does_not_exist(action: &str, pipette: &PipetteId) -> Self {
        Self {
            kind: ErrorKind::PipetteDoesNotExist {
                pipette: pipette.clone(),
            },
            message: format!(
                "attempted to {action} with pipette \"{pipette}\", but no pipette with that id exists"
            ),
        }
    }

    pub fn labware_does_not_exist(action: &str, labware: &LabwareId) -> Self {
        Self {
            kind: ErrorKind::LabwareDoesNotExist {
                labware: labware.clone(),
            },
            message: format!(
                "attempted to {action} on labware \"{labware}\", but no labware with that id exists"
            ),
        }
    }

    pub fn module_does_not_exist(action: &str, module: &ModuleId) -> Self {
        Self {
            kind: ErrorKind::ModuleDoesNotExist {
                module: module.clone(),
            },
            message: format!(
                "attempted to {action} on module \"{module}\", but no module with that id exists"
            ),
        }
    }

    pub fn well_does_not_exist(action: &str, labware: &LabwareId, well: &WellName) -> Self {
        Self {
            kind: ErrorKind::WellDoesNotExist {
                labware: labware.clone(),
                well: well.clone(),
            },
            message: format!(
                "attempted to {action} in well \"{well}\" of labware \"{labware}\", but that labware has no such well"
            ),
        }
    }

    pub fn no_tip_on_pipette(action: &str, pipette: &PipetteId) -> Self {
        Self {
            kind: ErrorKind::NoTipOnPipette {
                pipette: pipette.clone(),
            },
            message: format!("attempted to {action} with pipette \"{pipette}\", but it has no tip attached"),
        }
    }

    pub fn tip_already_attached(pipette: &PipetteId) -> Self {
        Self {
            kind: ErrorKind::TipAlreadyAttached {
                pipette: pipette.clone(),
            },
            message: format!(
                "attempted to pick up a tip with pipette \"{pipette}\", but it already has one attached"
            ),
        }
    }

    pub fn insufficient_tips(pipette: &PipetteId) -> Self {
        Self {
            kind: ErrorKind::InsufficientTips {
                pipette: pipette.clone(),
            },
            message: format!("no tip rack compatible with pipette \"{pipette}\" has any tips left"),
        }
    }

    pub fn mix_invalid_volume(volume: f64) -> Self {
        Self {
            kind: ErrorKind::MixInvalidVolume { volume },
            message: format!("mix volume must be greater than zero, got {volume} µL"),
        }
    }

    pub fn mix_invalid_times(times: u32) -> Self {
        Self {
            kind: ErrorKind::MixInvalidTimes { times },
            message: format!("mix repetitions must be at least 1, got {times}"),
        }
    }

    pub fn pipette_volume_exceeded(pipette: &PipetteId, volume: f64, max_volume: f64) -> Self {
        Self {
            kind: ErrorKind::PipetteVolumeExceeded {
                pipette: pipette.clone(),
                volume,
                max_volume,
            },
            message: format!(
                "requested {volume} µL exceeds the {max_volume} µL working volume of pipette \"{pipette}\""
            ),
        }
    }

    pub fn module_not_configured(action: &str, module: &ModuleId) -> Self {
        Self {
            kind: ErrorKind::ModuleNotConfigured {
                module: module.clone(),
            },
            message: format!(
                "attempted to {action} on module \"{module}\", but the module is not configured for that operation"
            ),
        }
    }

    pub fn slot_occupied(slot: &DeckSlot) -> Self {
        Self {
            kind: ErrorKind::SlotOccupied { slot: slot.clone() },
            message: format!("deck slot \"{slot}\" is already occupied"),
        }
    }

    pub fn duplicate_step_id(step: &StepId) -> Self {
        Self {
            kind: ErrorKind::DuplicateStepId { step: step.clone() },
            message: format!("step id \"{step}\" appears more than once in the protocol"),
        }
    }

    pub fn invalid_step_arguments(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidStepArguments,
            message: message.into(),
        }
    }
}

/// Machine-readable warning kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WarningKind {
    /// Aspirate asked for more than the well holds; contents clamped to 0.
    AspirateVolumeExceedsWellContents {
        labware: LabwareId,
        well: WellName,
        requested: f64,
        available: f64,
    },
    /// Dispense asked for more than the tip holds; clamped to tip contents.
    DispenseVolumeExceedsTipContents {
        pipette: PipetteId,
        requested: f64,
        available: f64,
    },
    /// A dispense raised a well above its rated capacity.
    WellCapacityExceeded {
        labware: LabwareId,
        well: WellName,
        volume: f64,
        capacity: f64,
    },
}

/// A non-fatal, per-step compile warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepWarning {
    #[serde(flatten)]
    pub kind: WarningKind,
    pub message: String,
}

impl StepWarning {
    pub fn aspirate_exceeds_well_contents(
        labware: &LabwareId,
        well: &WellName,
        requested: f64,
        available: f64,
    ) -> Self {
        Self {
            kind: WarningKind::AspirateVolumeExceedsWellContents {
                labware: labware.clone(),
                well: well.clone(),
                requested,
                available,
            },
            message: format!(
                "aspirating {requested} µL from well \"{well}\" of \"{labware}\" which holds only {available} µL"
            ),
        }
    }

    pub fn dispense_exceeds_tip_contents(pipette: &PipetteId, requested: f64, available: f64) -> Self {
        Self {
            kind: WarningKind::DispenseVolumeExceedsTipContents {
                pipette: pipette.clone(),
                requested,
                available,
            },
            message: format!(
                "dispensing {requested} µL from pipette \"{pipette}\" whose tip holds only {available} µL"
            ),
        }
    }

    pub fn well_capacity_exceeded(
        labware: &LabwareId,
        well: &WellName,
        volume: f64,
        capacity: f64,
    ) -> Self {
        Self {
            kind: WarningKind::WellCapacityExceeded {
                labware: labware.clone(),
                well: well.clone(),
                volume,
                capacity,
            },
            message: format!(
                "well \"{well}\" of \"{labware}\" now holds {volume} µL, above its {capacity} µL capacity"
            ),
        }
    }
}
