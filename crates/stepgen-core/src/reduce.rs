//! Sequential evaluation of atomic operations against robot state.

use stepgen_catalog::InvariantContext;
use stepgen_model::{Command, StepError, StepWarning};

use crate::atomic::AtomicOp;
use crate::robot_state::RobotState;

/// Successful result of evaluating one or more operations.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub commands: Vec<Command>,
    pub robot_state: RobotState,
    pub warnings: Vec<StepWarning>,
}

/// Evaluation either advances state or produces only errors — never both.
pub type CreatorResult = Result<StepOutput, Vec<StepError>>;

/// Thread `ops` through state in order, concatenating commands and
/// warnings. The first failing op aborts the whole sequence: partial
/// commands from a failed step are never surfaced.
pub fn reduce_ops(ops: &[AtomicOp], ctx: &InvariantContext, prev: &RobotState) -> CreatorResult {
    let mut robot_state = prev.clone();
    let mut commands = Vec::new();
    let mut warnings = Vec::new();
    for op in ops {
        let output = op.evaluate(ctx, &robot_state)?;
        robot_state = output.robot_state;
        commands.extend(output.commands);
        warnings.extend(output.warnings);
    }
    Ok(StepOutput {
        commands,
        robot_state,
        warnings,
    })
}
