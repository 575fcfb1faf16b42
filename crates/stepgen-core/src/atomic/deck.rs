//! Pause and deck-rearrangement atomic operations.

use stepgen_catalog::InvariantContext;
use stepgen_model::{Command, DelayParams, MoveLabwareParams, StepError};

use crate::atomic::require_labware;
use crate::reduce::{CreatorResult, StepOutput};
use crate::robot_state::{Placement, RobotState};

/// Pause the protocol: either a timed delay or until operator resume. Pure
/// pass-through; no robot state changes.
pub(super) fn delay(params: &DelayParams, prev: &RobotState) -> CreatorResult {
    Ok(StepOutput {
        commands: vec![Command::Delay(params.clone())],
        robot_state: prev.clone(),
        warnings: Vec::new(),
    })
}

/// Move a labware to another slot. The target must not hold other labware
/// or a module.
pub(super) fn move_labware(
    params: &MoveLabwareParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "move labware";
    require_labware(action, ctx, &params.labware)?;

    let occupied_by_labware = prev.labware_positions.iter().any(|(id, placement)| {
        *id != params.labware && *placement == Placement::Slot(params.new_slot.clone())
    });
    let occupied_by_module = ctx.modules().any(|module| module.slot == params.new_slot);
    if occupied_by_labware || occupied_by_module {
        return Err(vec![StepError::slot_occupied(&params.new_slot)]);
    }

    let mut robot_state = prev.clone();
    robot_state.labware_positions.insert(
        params.labware.clone(),
        Placement::Slot(params.new_slot.clone()),
    );
    Ok(StepOutput {
        commands: vec![Command::MoveLabware(params.clone())],
        robot_state,
        warnings: Vec::new(),
    })
}
