//! Consolidate: aspirate from several source wells, then dispense the
//! combined volume into a single destination well (many-to-one).
//!
//! Sources are chunked so each tip-load stays within the pipette's working
//! volume. Ordering contract per chunk: tip change, aspirates (one per
//! source, each optionally followed by touch-tip), air gap after the last
//! aspirate, dispense-air-gap, one combined dispense, touch-tip (dest),
//! blow-out.

use stepgen_catalog::InvariantContext;
use stepgen_model::{AirGapParams, ConsolidateArgs, PipettingParams, StepError, TouchTipParams};

use crate::atomic::AtomicOp;
use crate::compound::support::{
    AIR_GAP_OFFSET_FROM_TOP_MM, blowout_ops, bound_labware, bound_pipette, tip_ops,
};
use crate::robot_state::RobotState;

pub(super) fn consolidate(
    args: &ConsolidateArgs,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    let action = "consolidate";
    let pipette = bound_pipette(action, &args.pipette, ctx, prev)?;
    bound_labware(action, &args.source_labware, ctx)?;
    bound_labware(action, &args.dest_labware, ctx)?;
    if args.volume <= 0.0 {
        return Err(vec![StepError::invalid_step_arguments(format!(
            "consolidate volume must be greater than zero, got {} µL",
            args.volume
        ))]);
    }
    if args.source_wells.is_empty() {
        return Err(vec![StepError::invalid_step_arguments(
            "consolidate requires at least one source well",
        )]);
    }
    let max_volume = pipette.spec.max_volume_ul;
    let sources_per_chunk = (max_volume / args.volume).floor() as usize;
    if sources_per_chunk < 1 {
        return Err(vec![StepError::pipette_volume_exceeded(
            &args.pipette,
            args.volume,
            max_volume,
        )]);
    }

    let mut ops = Vec::new();
    for (chunk_index, chunk) in args.source_wells.chunks(sources_per_chunk).enumerate() {
        ops.extend(tip_ops(args.change_tip, chunk_index, &args.pipette));
        for source in chunk {
            ops.push(AtomicOp::Aspirate(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.source_labware.clone(),
                well: source.clone(),
                volume: args.volume,
                offset_from_bottom_mm: args.aspirate_offset_from_bottom_mm,
                flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
            }));
            if args.touch_tip_after_aspirate {
                ops.push(AtomicOp::TouchTip(TouchTipParams {
                    pipette: args.pipette.clone(),
                    labware: args.source_labware.clone(),
                    well: source.clone(),
                    offset_from_bottom_mm: args.touch_tip_mm_from_bottom,
                }));
            }
        }
        let Some(last_source) = chunk.last() else {
            continue;
        };
        if let Some(air) = args.air_gap_volume {
            ops.push(AtomicOp::AirGap(AirGapParams {
                pipette: args.pipette.clone(),
                labware: args.source_labware.clone(),
                well: last_source.clone(),
                volume: air,
                offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
            }));
            ops.push(AtomicOp::DispenseAirGap(AirGapParams {
                pipette: args.pipette.clone(),
                labware: args.dest_labware.clone(),
                well: args.dest_well.clone(),
                volume: air,
                offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
            }));
        }
        ops.push(AtomicOp::Dispense(PipettingParams {
            pipette: args.pipette.clone(),
            labware: args.dest_labware.clone(),
            well: args.dest_well.clone(),
            volume: args.volume * chunk.len() as f64,
            offset_from_bottom_mm: args.dispense_offset_from_bottom_mm,
            flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
        }));
        if args.touch_tip_after_dispense {
            ops.push(AtomicOp::TouchTip(TouchTipParams {
                pipette: args.pipette.clone(),
                labware: args.dest_labware.clone(),
                well: args.dest_well.clone(),
                offset_from_bottom_mm: args.touch_tip_mm_from_bottom,
            }));
        }
        ops.extend(blowout_ops(
            args.blowout_location.as_ref(),
            &args.pipette,
            (&args.source_labware, last_source),
            (&args.dest_labware, &args.dest_well),
            ctx,
            args.blowout_flow_rate_ul_sec,
            args.blowout_offset_from_top_mm,
        )?);
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{basic_context, consolidate_args};
    use stepgen_model::{ChangeTip, ErrorKind};

    #[test]
    fn sources_chunk_by_pipette_capacity() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = consolidate_args();
        // p300 holds 300 µL; 100 µL per source → 3 sources per chunk
        args.volume = 100.0;
        args.source_wells = vec![
            "A1".into(),
            "B1".into(),
            "C1".into(),
            "D1".into(),
            "E1".into(),
        ];
        args.change_tip = ChangeTip::Always;
        let ops = consolidate(&args, &ctx, &state).expect("bind succeeds");
        let dispenses: Vec<f64> = ops
            .iter()
            .filter_map(|op| match op {
                AtomicOp::Dispense(params) => Some(params.volume),
                _ => None,
            })
            .collect();
        assert_eq!(dispenses, vec![300.0, 200.0]);
        let replaces = ops
            .iter()
            .filter(|op| matches!(op, AtomicOp::ReplaceTip { .. }))
            .count();
        assert_eq!(replaces, 2);
    }

    #[test]
    fn volume_above_capacity_is_an_error_at_bind() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = consolidate_args();
        args.volume = 400.0;
        let errors = consolidate(&args, &ctx, &state).expect_err("cannot hold one aspirate");
        assert!(matches!(
            errors[0].kind,
            ErrorKind::PipetteVolumeExceeded { .. }
        ));
    }

    #[test]
    fn empty_source_list_is_invalid() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let mut args = consolidate_args();
        args.source_wells = Vec::new();
        let errors = consolidate(&args, &ctx, &state).expect_err("no sources");
        assert!(matches!(errors[0].kind, ErrorKind::InvalidStepArguments));
    }
}
