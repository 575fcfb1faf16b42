//! Atomic command creators.
//!
//! Each operation validates its preconditions against the invariant context
//! and the previous robot state, then returns the next state plus the
//! commands it emits — or a list of structured errors. Inputs are never
//! mutated; a fresh state is returned on every evaluation.

mod deck;
mod module;
mod pipetting;
mod tip;

use stepgen_catalog::{InvariantContext, LabwareEntity, PipetteEntity, WellGeometry};
use stepgen_model::{
    AirGapParams, BlowoutParams, DelayParams, EngageMagnetParams, LabwareId, LidPosition,
    ModuleId, MoveLabwareParams, PipetteId, PipettingParams, StepError, TemperatureParams,
    TouchTipParams, WellName,
};

use crate::reduce::CreatorResult;
use crate::robot_state::RobotState;

/// A single physical action, bound to fully resolved parameters.
///
/// The sequence of ops a compound creator produces is plain data: it can be
/// inspected, tested, and evaluated deterministically in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicOp {
    Aspirate(PipettingParams),
    Dispense(PipettingParams),
    AirGap(AirGapParams),
    DispenseAirGap(AirGapParams),
    Blowout(BlowoutParams),
    TouchTip(TouchTipParams),
    PickUpTip { pipette: PipetteId },
    DropTip { pipette: PipetteId },
    /// Drop the mounted tip (if any), then pick up a fresh one.
    ReplaceTip { pipette: PipetteId },
    Delay(DelayParams),
    MoveLabware(MoveLabwareParams),
    SetTemperature(TemperatureParams),
    AwaitTemperature { module: ModuleId, celsius: Option<f64> },
    DeactivateTemperature { module: ModuleId },
    EngageMagnet(EngageMagnetParams),
    DisengageMagnet { module: ModuleId },
    SetBlockTemperature { module: ModuleId, celsius: Option<f64> },
    SetLid {
        module: ModuleId,
        position: Option<LidPosition>,
        celsius: Option<f64>,
    },
}

impl AtomicOp {
    /// Validate preconditions and produce the next state plus commands.
    pub fn evaluate(&self, ctx: &InvariantContext, prev: &RobotState) -> CreatorResult {
        match self {
            AtomicOp::Aspirate(params) => pipetting::aspirate(params, ctx, prev),
            AtomicOp::Dispense(params) => pipetting::dispense(params, ctx, prev),
            AtomicOp::AirGap(params) => pipetting::air_gap(params, ctx, prev),
            AtomicOp::DispenseAirGap(params) => pipetting::dispense_air_gap(params, ctx, prev),
            AtomicOp::Blowout(params) => pipetting::blowout(params, ctx, prev),
            AtomicOp::TouchTip(params) => pipetting::touch_tip(params, ctx, prev),
            AtomicOp::PickUpTip { pipette } => tip::pick_up_tip(pipette, ctx, prev),
            AtomicOp::DropTip { pipette } => tip::drop_tip(pipette, ctx, prev),
            AtomicOp::ReplaceTip { pipette } => tip::replace_tip(pipette, ctx, prev),
            AtomicOp::Delay(params) => deck::delay(params, prev),
            AtomicOp::MoveLabware(params) => deck::move_labware(params, ctx, prev),
            AtomicOp::SetTemperature(params) => module::set_temperature(params, ctx, prev),
            AtomicOp::AwaitTemperature { module, celsius } => {
                module::await_temperature(module, *celsius, ctx, prev)
            }
            AtomicOp::DeactivateTemperature { module } => {
                module::deactivate_temperature(module, ctx, prev)
            }
            AtomicOp::EngageMagnet(params) => module::engage_magnet(params, ctx, prev),
            AtomicOp::DisengageMagnet { module } => module::disengage_magnet(module, ctx, prev),
            AtomicOp::SetBlockTemperature { module, celsius } => {
                module::set_block_temperature(module, *celsius, ctx, prev)
            }
            AtomicOp::SetLid {
                module,
                position,
                celsius,
            } => module::set_lid(module, *position, *celsius, ctx, prev),
        }
    }
}

pub(crate) fn require_pipette<'a>(
    action: &str,
    ctx: &'a InvariantContext,
    pipette: &PipetteId,
) -> Result<&'a PipetteEntity, Vec<StepError>> {
    ctx.pipette(pipette)
        .ok_or_else(|| vec![StepError::pipette_does_not_exist(action, pipette)])
}

pub(crate) fn require_labware<'a>(
    action: &str,
    ctx: &'a InvariantContext,
    labware: &LabwareId,
) -> Result<&'a LabwareEntity, Vec<StepError>> {
    ctx.labware(labware)
        .ok_or_else(|| vec![StepError::labware_does_not_exist(action, labware)])
}

pub(crate) fn require_well<'a>(
    action: &str,
    entity: &'a LabwareEntity,
    well: &WellName,
) -> Result<&'a WellGeometry, Vec<StepError>> {
    entity
        .def
        .well(well)
        .ok_or_else(|| vec![StepError::well_does_not_exist(action, &entity.id, well)])
}

pub(crate) fn require_tip(
    action: &str,
    state: &RobotState,
    pipette: &PipetteId,
) -> Result<(), Vec<StepError>> {
    if state.has_tip(pipette) {
        Ok(())
    } else {
        Err(vec![StepError::no_tip_on_pipette(action, pipette)])
    }
}
