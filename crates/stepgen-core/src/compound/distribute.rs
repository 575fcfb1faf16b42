//! Distribute: one aspirate feeds several destination wells (one-to-many),
//! with an optional disposal volume that is aspirated on top of the payload
//! and shed by the closing blow-out.
//!
//! Destinations are chunked so `n × volume + disposal` stays within the
//! pipette's working volume. Ordering contract per chunk: tip change, one
//! aspirate from the source, touch-tip (source), air gap, dispense-air-gap
//! before the first dispense, one dispense per destination (each optionally
//! followed by touch-tip), blow-out (trash by default when a disposal
//! volume is set).

use stepgen_catalog::InvariantContext;
use stepgen_model::{
    AirGapParams, BlowoutLocation, DistributeArgs, PipettingParams, StepError, TouchTipParams,
};

use crate::atomic::AtomicOp;
use crate::compound::support::{
    AIR_GAP_OFFSET_FROM_TOP_MM, blowout_ops, bound_labware, bound_pipette, tip_ops,
};
use crate::robot_state::RobotState;

pub(super) fn distribute(
    args: &DistributeArgs,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    let action = "distribute";
    let pipette = bound_pipette(action, &args.pipette, ctx, prev)?;
    bound_labware(action, &args.source_labware, ctx)?;
    bound_labware(action, &args.dest_labware, ctx)?;
    if args.volume <= 0.0 {
        return Err(vec![StepError::invalid_step_arguments(format!(
            "distribute volume must be greater than zero, got {} µL",
            args.volume
        ))]);
    }
    if args.dest_wells.is_empty() {
        return Err(vec![StepError::invalid_step_arguments(
            "distribute requires at least one destination well",
        )]);
    }
    let disposal = args.disposal_volume.unwrap_or(0.0);
    if disposal < 0.0 {
        return Err(vec![StepError::invalid_step_arguments(
            "disposal volume cannot be negative",
        )]);
    }
    let max_volume = pipette.spec.max_volume_ul;
    let dests_per_chunk = ((max_volume - disposal) / args.volume).floor() as usize;
    if dests_per_chunk < 1 {
        return Err(vec![StepError::pipette_volume_exceeded(
            &args.pipette,
            args.volume + disposal,
            max_volume,
        )]);
    }
    // A disposal volume has to leave the tip somewhere; default to trash.
    let blowout_location = match (&args.blowout_location, disposal > 0.0) {
        (Some(location), _) => Some(location.clone()),
        (None, true) => Some(BlowoutLocation::Trash),
        (None, false) => None,
    };

    let mut ops = Vec::new();
    for (chunk_index, chunk) in args.dest_wells.chunks(dests_per_chunk).enumerate() {
        ops.extend(tip_ops(args.change_tip, chunk_index, &args.pipette));
        ops.push(AtomicOp::Aspirate(PipettingParams {
            pipette: args.pipette.clone(),
            labware: args.source_labware.clone(),
            well: args.source_well.clone(),
            volume: args.volume * chunk.len() as f64 + disposal,
            offset_from_bottom_mm: args.aspirate_offset_from_bottom_mm,
            flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
        }));
        if args.touch_tip_after_aspirate {
            ops.push(AtomicOp::TouchTip(TouchTipParams {
                pipette: args.pipette.clone(),
                labware: args.source_labware.clone(),
                well: args.source_well.clone(),
                offset_from_bottom_mm: args.touch_tip_mm_from_bottom,
            }));
        }
        if let Some(air) = args.air_gap_volume {
            ops.push(AtomicOp::AirGap(AirGapParams {
                pipette: args.pipette.clone(),
                labware: args.source_labware.clone(),
                well: args.source_well.clone(),
                volume: air,
                offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                flow_rate_ul_sec: args.aspirate_flow_rate_ul_sec,
            }));
        }
        for (dest_index, dest) in chunk.iter().enumerate() {
            if dest_index == 0 {
                if let Some(air) = args.air_gap_volume {
                    ops.push(AtomicOp::DispenseAirGap(AirGapParams {
                        pipette: args.pipette.clone(),
                        labware: args.dest_labware.clone(),
                        well: dest.clone(),
                        volume: air,
                        offset_from_top_mm: AIR_GAP_OFFSET_FROM_TOP_MM,
                        flow_rate_ul_sec: args.dispense_flow_rate_ul_sec,
                    }));
                }
            }
            ops.push(AtomicOp::Dispense(PipettingParams {
                pipette: args.pipette.clone(),
                labware: args.dest_labware.clone(),
                well: dest.clone(),
                volume: args.volume,
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
        }
        let last_dest = chunk.last().unwrap_or(&args.dest_wells[0]);
        ops.extend(blowout_ops(
            blowout_location.as_ref(),
            &args.pipette,
            (&args.source_labware, &args.source_well),
            (&args.dest_labware, last_dest),
            ctx,
            args.blowout_flow_rate_ul_sec,
            args.blowout_offset_from_top_mm,
        )?);
    }
    Ok(ops)
}
