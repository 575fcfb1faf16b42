//! Transfer: move a volume from each source well to its paired destination
//! well (one-to-one, with single-well broadcast on either side).
//!
//! Ordering contract per chunk: tip change, aspirate, touch-tip (source),
//! air gap, dispense-air-gap (dest), dispense, touch-tip (dest), blow-out.

use stepgen_catalog::InvariantContext;
use stepgen_model::{
    AirGapParams, PipettingParams, StepError, TouchTipParams, TransferArgs, WellName,
};

use crate::atomic::AtomicOp;
use crate::compound::support::{
    AIR_GAP_OFFSET_FROM_TOP_MM, blowout_ops, bound_labware, bound_pipette, split_volume, tip_ops,
};
use crate::robot_state::RobotState;

pub(super) fn transfer(
    args: &TransferArgs,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    let action = "transfer";
    let pipette = bound_pipette(action, &args.pipette, ctx, prev)?;
    bound_labware(action, &args.source_labware, ctx)?;
    bound_labware(action, &args.dest_labware, ctx)?;
    if args.volume <= 0.0 {
        return Err(vec![StepError::invalid_step_arguments(format!(
            "transfer volume must be greater than zero, got {} µL",
            args.volume
        ))]);
    }
    let pairs = pair_wells(&args.source_wells, &args.dest_wells).ok_or_else(|| {
        vec![StepError::invalid_step_arguments(
            "transfer well lists must be the same length, or either side a single well",
        )]
    })?;
    let chunks = split_volume(args.volume, pipette.spec.max_volume_ul);

    let mut ops = Vec::new();
    let mut group = 0usize;
    for (source, dest) in pairs {
        for chunk_volume in &chunks {
            ops.extend(tip_ops(args.change_tip, group, &args.pipette));
            group += 1;
            ops.push(AtomicOp::Aspirate(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.source_labware.clone(),
                well: source.clone(),
                volume: *chunk_volume,
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
            if let Some(air) = args.air_gap_volume {
                ops.push(AtomicOp::AirGap(AirGapParams {
                    pipette: args.pipette.clone(),
                    labware: args.source_labware.clone(),
                    well: source.clone(),
                    volume: air,
                    offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                    flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
                }));
                ops.push(AtomicOp::DispenseAirGap(AirGapParams {
                    pipette: args.pipette.clone(),
                    labware: args.dest_labware.clone(),
                    well: dest.clone(),
                    volume: air,
                    offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                    flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
                }));
            }
            ops.push(AtomicOp::Dispense(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.dest_labware.clone(),
                well: dest.clone(),
                volume: *chunk_volume,
                offset_from_bottom_mm: args.dispense_offset_from_bottom_mm,
                flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
            }));
            if args.touch_tip_after_dispense {
                ops.push(AtomicOp::TouchTip(TouchTipParams {
                    pipette: args.pipette.clone(),
                    labware: args.dest_labware.clone(),
                    well: dest.clone(),
                    offset_from_bottom_mm: args.touch_tip_mm_from_bottom,
                }));
            }
            ops.extend(blowout_ops(
                args.blowout_location.as_ref(),
                &args.pipette,
                (&args.source_labware, source),
                (&args.dest_labware, dest),
                ctx,
                args.blowout_flow_rate_ul_sec,
                args.blowout_offset_from_top_mm,
            )?);
        }
    }
    Ok(ops)
}

/// Zip source and destination lists, broadcasting a single well on either
/// side across the other list.
fn pair_wells<'a>(
    sources: &'a [WellName],
    dests: &'a [WellName],
) -> Option<Vec<(&'a WellName, &'a WellName)>> {
    if sources.is_empty() || dests.is_empty() {
        return None;
    }
    if sources.len() == dests.len() {
        Some(sources.iter().zip(dests.iter()).collect())
    } else if sources.len() == 1 {
        Some(dests.iter().map(|dest| (&sources[0], dest)).collect())
    } else if dests.len() == 1 {
        Some(sources.iter().map(|source| (source, &dests[0])).collect())
    } else {
        None
    }
}
