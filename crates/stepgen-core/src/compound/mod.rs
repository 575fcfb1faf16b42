//! Compound command creators.
//!
//! A compound creator binds a step's arguments into an ordered sequence of
//! atomic operations. Binding validates entity references and argument
//! shapes; a bind failure aborts the whole step with only errors, emitting
//! no partial command list. The bound sequence is then threaded through
//! state by [`crate::reduce::reduce_ops`].

mod consolidate;
mod distribute;
mod mix;
mod support;
mod transfer;

use stepgen_catalog::InvariantContext;
use stepgen_model::{
    DelayParams, EngageMagnetParams, MoveLabwareParams, StepArgs, StepError, TemperatureParams,
    Wait,
};

use crate::atomic::AtomicOp;
use crate::robot_state::RobotState;

/// Bind a step's arguments to its atomic operation sequence.
pub fn bind_step(
    args: &StepArgs,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    match args {
        StepArgs::Mix(args) => mix::mix(args, ctx, prev),
        StepArgs::Transfer(args) => transfer::transfer(args, ctx, prev),
        StepArgs::Consolidate(args) => consolidate::consolidate(args, ctx, prev),
        StepArgs::Distribute(args) => distribute::distribute(args, ctx, prev),
        StepArgs::Pause(args) => Ok(vec![AtomicOp::Delay(DelayParams {
            wait: match args.seconds {
                Some(seconds) => Wait::Seconds(seconds),
                None => Wait::UntilResume(true),
            },
            message: args.message.clone(),
        })]),
        StepArgs::MoveLabware(args) => Ok(vec![AtomicOp::MoveLabware(MoveLabwareParams {
            labware: args.labware.clone(),
            new_slot: args.new_slot.clone(),
        })]),
        StepArgs::SetTemperature(args) => Ok(vec![AtomicOp::SetTemperature(TemperatureParams {
            module: args.module.clone(),
            celsius: args.celsius,
        })]),
        StepArgs::AwaitTemperature(args) => Ok(vec![AtomicOp::AwaitTemperature {
            module: args.module.clone(),
            celsius: args.celsius,
        }]),
        StepArgs::DeactivateTemperature(args) => Ok(vec![AtomicOp::DeactivateTemperature {
            module: args.module.clone(),
        }]),
        StepArgs::EngageMagnet(args) => Ok(vec![AtomicOp::EngageMagnet(EngageMagnetParams {
            module: args.module.clone(),
            engage_height_mm: args.engage_height_mm,
        })]),
        StepArgs::DisengageMagnet(args) => Ok(vec![AtomicOp::DisengageMagnet {
            module: args.module.clone(),
        }]),
        StepArgs::ThermocyclerSetBlock(args) => Ok(vec![AtomicOp::SetBlockTemperature {
            module: args.module.clone(),
            celsius: args.celsius,
        }]),
        StepArgs::ThermocyclerSetLid(args) => {
            if args.position.is_none() && args.celsius.is_none() {
                return Err(vec![StepError::invalid_step_arguments(
                    "thermocycler lid step must set a position or a lid temperature",
                )]);
            }
            Ok(vec![AtomicOp::SetLid {
                module: args.module.clone(),
                position: args.position,
                celsius: args.celsius,
            }])
        }
    }
}
