//! Mix: aspirate and dispense a uniform volume some number of times in each
//! of a set of wells of a single labware.
//!
//! Ordering contract per well: tip change (per policy), then `times` ×
//! (aspirate, dispense), then blow-out, then touch-tip.

use stepgen_catalog::InvariantContext;
use stepgen_model::{MixArgs, PipettingParams, StepError, TouchTipParams};

use crate::atomic::AtomicOp;
use crate::compound::support::{blowout_ops, bound_labware, bound_pipette, tip_ops};
use crate::robot_state::RobotState;

pub(super) fn mix(
    args: &MixArgs,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    let action = "mix";
    bound_pipette(action, &args.pipette, ctx, prev)?;
    bound_labware(action, &args.labware, ctx)?;
    if args.volume <= 0.0 {
        return Err(vec![StepError::mix_invalid_volume(args.volume)]);
    }
    if args.times == 0 {
        return Err(vec![StepError::mix_invalid_times(args.times)]);
    }

    let mut ops = Vec::new();
    for (well_index, well) in args.wells.iter().enumerate() {
        ops.extend(tip_ops(args.change_tip, well_index, &args.pipette));
        for _ in 0..args.times {
            ops.push(AtomicOp::Aspirate(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.labware.clone(),
                well: well.clone(),
                volume: args.volume,
                offset_from_bottom_mm: args.aspirate_offset_from_bottom_mm,
                flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
            }));
            ops.push(AtomicOp::Dispense(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.labware.clone(),
                well: well.clone(),
                volume: args.volume,
                offset_from_bottom_mm: args.dispense_offset_from_bottom_mm,
                flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
            }));
        }
        ops.extend(blowout_ops(
            args.blowout_location.as_ref(),
            &args.pipette,
            (&args.labware, well),
            (&args.labware, well),
            ctx,
            args.blowout_flow_rate_ul_sec,
            args.blowout_offset_from_top_mm,
        )?);
        if args.touch_tip {
            ops.push(AtomicOp::TouchTip(TouchTipParams {
                pipette: args.pipette.clone(),
                labware: args.labware.clone(),
                well: well.clone(),
                offset_from_bottom_mm: args.touch_tip_mm_from_bottom,
            }));
        }
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{basic_context, mix_args};
    use stepgen_model::{ChangeTip, ErrorKind};

    #[test]
    fn unknown_pipette_bails_before_command_generation() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.pipette = "ghost".into();
        let errors = mix(&args, &ctx, &state).expect_err("unknown pipette");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ErrorKind::PipetteDoesNotExist { .. }));
    }

    #[test]
    fn unknown_labware_bails() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.labware = "ghost".into();
        let errors = mix(&args, &ctx, &state).expect_err("unknown labware");
        assert!(matches!(errors[0].kind, ErrorKind::LabwareDoesNotExist { .. }));
    }

    #[test]
    fn zero_volume_is_invalid() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.volume = 0.0;
        let errors = mix(&args, &ctx, &state).expect_err("invalid volume");
        assert!(matches!(errors[0].kind, ErrorKind::MixInvalidVolume { .. }));
    }

    #[test]
    fn zero_times_is_invalid() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.times = 0;
        let errors = mix(&args, &ctx, &state).expect_err("invalid times");
        assert!(matches!(errors[0].kind, ErrorKind::MixInvalidTimes { .. }));
    }

    #[test]
    fn change_tip_once_replaces_only_before_first_well() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.wells = vec!["A1".into(), "B1".into(), "C1".into()];
        args.change_tip = ChangeTip::Once;
        let ops = mix(&args, &ctx, &state).expect("bind succeeds");
        let replaces = ops
            .iter()
            .filter(|op| matches!(op, AtomicOp::ReplaceTip { .. }))
            .count();
        assert_eq!(replaces, 1);
        assert!(matches!(ops[0], AtomicOp::ReplaceTip { .. }));
    }

    #[test]
    fn blowout_and_touch_tip_come_after_the_cycles_in_order() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = mix_args();
        args.blowout_location = Some(stepgen_model::BlowoutLocation::SourceWell);
        args.touch_tip = true;
        let ops = mix(&args, &ctx, &state).expect("bind succeeds");
        let tail: Vec<&AtomicOp> = ops.iter().rev().take(2).collect();
        assert!(matches!(tail[1], AtomicOp::Blowout(_)));
        assert!(matches!(tail[0], AtomicOp::TouchTip(_)));
    }
}
