//! Liquid-handling atomic operations: aspirate, dispense, air gap,
//! blow-out, touch-tip.

use stepgen_model::{
    AirGapParams, BlowoutParams, Command, PipettingParams, StepError, StepWarning, TouchTipParams,
};

use stepgen_catalog::InvariantContext;

use crate::atomic::{require_labware, require_pipette, require_tip, require_well};
use crate::liquid::{merge_liquid, split_liquid, total_volume};
use crate::reduce::{CreatorResult, StepOutput};
use crate::robot_state::RobotState;

pub(super) fn aspirate(
    params: &PipettingParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "aspirate";
    let pipette = require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;
    if params.volume > pipette.spec.max_volume_ul {
        return Err(vec![StepError::pipette_volume_exceeded(
            &params.pipette,
            params.volume,
            pipette.spec.max_volume_ul,
        )]);
    }

    let mut robot_state = prev.clone();
    let mut warnings = Vec::new();
    let available = robot_state.well_total(&params.labware, &params.well);
    if params.volume > available {
        warnings.push(StepWarning::aspirate_exceeds_well_contents(
            &params.labware,
            &params.well,
            params.volume,
            available,
        ));
    }
    let contents = robot_state.well_contents_mut(&params.labware, &params.well);
    let (removed, remaining) = split_liquid(params.volume, contents);
    *contents = remaining;
    let tip = robot_state.pipette_tip_mut(&params.pipette);
    tip.contents = merge_liquid(&tip.contents, &removed);

    Ok(StepOutput {
        commands: vec![Command::Aspirate(params.clone())],
        robot_state,
        warnings,
    })
}

pub(super) fn dispense(
    params: &PipettingParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "dispense";
    require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    let geometry = require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;

    let capacity = geometry.total_liquid_volume_ul;
    let mut robot_state = prev.clone();
    let mut warnings = Vec::new();
    let tip = robot_state.pipette_tip_mut(&params.pipette);
    let in_tip = total_volume(&tip.contents);
    if params.volume > in_tip {
        warnings.push(StepWarning::dispense_exceeds_tip_contents(
            &params.pipette,
            params.volume,
            in_tip,
        ));
    }
    let (removed, remaining) = split_liquid(params.volume, &tip.contents);
    tip.contents = remaining;
    let contents = robot_state.well_contents_mut(&params.labware, &params.well);
    *contents = merge_liquid(contents, &removed);
    let new_total = total_volume(contents);
    if new_total > capacity {
        warnings.push(StepWarning::well_capacity_exceeded(
            &params.labware,
            &params.well,
            new_total,
            capacity,
        ));
    }

    Ok(StepOutput {
        commands: vec![Command::Dispense(params.clone())],
        robot_state,
        warnings,
    })
}

/// Draw air above the well top. The air rides in the tip until the next
/// dispense-air-gap or blow-out; it never touches the liquid accounting.
pub(super) fn air_gap(
    params: &AirGapParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "air gap";
    require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;

    let mut robot_state = prev.clone();
    robot_state.pipette_tip_mut(&params.pipette).air_gap_ul += params.volume;

    Ok(StepOutput {
        commands: vec![Command::AirGap(params.clone())],
        robot_state,
        warnings: Vec::new(),
    })
}

pub(super) fn dispense_air_gap(
    params: &AirGapParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "dispense air gap";
    require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;

    let mut robot_state = prev.clone();
    let tip = robot_state.pipette_tip_mut(&params.pipette);
    tip.air_gap_ul = (tip.air_gap_ul - params.volume).max(0.0);

    Ok(StepOutput {
        commands: vec![Command::DispenseAirGap(params.clone())],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Expel everything left in the tip — liquid and air — into the target well.
pub(super) fn blowout(
    params: &BlowoutParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "blow out";
    require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    let geometry = require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;

    let capacity = geometry.total_liquid_volume_ul;
    let trash = labware.def.is_trash;
    let mut robot_state = prev.clone();
    let mut warnings = Vec::new();
    let tip = robot_state.pipette_tip_mut(&params.pipette);
    let expelled = std::mem::take(&mut tip.contents);
    tip.air_gap_ul = 0.0;
    let contents = robot_state.well_contents_mut(&params.labware, &params.well);
    *contents = merge_liquid(contents, &expelled);
    let new_total = total_volume(contents);
    if !trash && new_total > capacity {
        warnings.push(StepWarning::well_capacity_exceeded(
            &params.labware,
            &params.well,
            new_total,
            capacity,
        ));
    }

    Ok(StepOutput {
        commands: vec![Command::Blowout(params.clone())],
        robot_state,
        warnings,
    })
}

pub(super) fn touch_tip(
    params: &TouchTipParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "touch tip";
    require_pipette(action, ctx, &params.pipette)?;
    let labware = require_labware(action, ctx, &params.labware)?;
    require_well(action, labware, &params.well)?;
    require_tip(action, prev, &params.pipette)?;

    Ok(StepOutput {
        commands: vec![Command::TouchTip(params.clone())],
        robot_state: prev.clone(),
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::AtomicOp;
    use crate::test_support::{basic_context, state_with_water};
    use stepgen_model::ErrorKind;

    fn aspirate_params(volume: f64) -> PipettingParams {
        PipettingParams {
            pipette: "p1".into(),
            labware: "plate1".into(),
            well: "A1".into(),
            volume,
            offset_from_bottom_mm: 1.0,
            flow_rate_ul_sec: 150.0,
        }
    }

    #[test]
    fn aspirate_without_tip_is_exactly_one_error() {
        let ctx = basic_context();
        let state = state_with_water(&ctx, 100.0);
        let result = AtomicOp::Aspirate(aspirate_params(50.0)).evaluate(&ctx, &state);
        let errors = result.expect_err("should fail without a tip");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0].kind,
            ErrorKind::NoTipOnPipette { pipette } if pipette.as_str() == "p1"
        ));
    }

    #[test]
    fn aspirate_moves_liquid_into_tip() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 100.0);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let output = AtomicOp::Aspirate(aspirate_params(40.0))
            .evaluate(&ctx, &state)
            .expect("aspirate succeeds");
        assert_eq!(
            output.robot_state.well_total(&"plate1".into(), &"A1".into()),
            60.0
        );
        let tip = output.robot_state.pipette_tip(&"p1".into()).unwrap();
        assert_eq!(total_volume(&tip.contents), 40.0);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn aspirate_overdraft_warns_and_clamps_to_zero() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 30.0);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let output = AtomicOp::Aspirate(aspirate_params(100.0))
            .evaluate(&ctx, &state)
            .expect("overdraft is a warning, not an error");
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(
            output.robot_state.well_total(&"plate1".into(), &"A1".into()),
            0.0
        );
        assert!(output.robot_state.all_volumes_non_negative());
    }

    #[test]
    fn aspirate_above_pipette_max_is_an_error() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 1000.0);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let errors = AtomicOp::Aspirate(aspirate_params(400.0))
            .evaluate(&ctx, &state)
            .expect_err("p300 cannot hold 400 µL");
        assert!(matches!(
            errors[0].kind,
            ErrorKind::PipetteVolumeExceeded { .. }
        ));
    }

    #[test]
    fn aspirate_from_unknown_well_fails() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 100.0);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let mut params = aspirate_params(10.0);
        params.well = "Z99".into();
        let errors = AtomicOp::Aspirate(params)
            .evaluate(&ctx, &state)
            .expect_err("well does not exist");
        assert!(matches!(errors[0].kind, ErrorKind::WellDoesNotExist { .. }));
    }

    #[test]
    fn dispense_into_full_well_warns_on_capacity() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 350.0);
        let tip = state.pipette_tip_mut(&"p1".into());
        tip.has_tip = true;
        tip.contents.insert("buffer".into(), 50.0);
        let params = PipettingParams {
            pipette: "p1".into(),
            labware: "plate1".into(),
            well: "A1".into(),
            volume: 50.0,
            offset_from_bottom_mm: 0.5,
            flow_rate_ul_sec: 300.0,
        };
        let output = AtomicOp::Dispense(params)
            .evaluate(&ctx, &state)
            .expect("dispense succeeds");
        // 350 + 50 = 400 µL in a 360 µL well
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(
            output.robot_state.well_total(&"plate1".into(), &"A1".into()),
            400.0
        );
    }

    #[test]
    fn blowout_empties_tip_entirely() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 0.0);
        let tip = state.pipette_tip_mut(&"p1".into());
        tip.has_tip = true;
        tip.contents.insert("water".into(), 20.0);
        tip.air_gap_ul = 5.0;
        let output = AtomicOp::Blowout(BlowoutParams {
            pipette: "p1".into(),
            labware: "plate1".into(),
            well: "B2".into(),
            offset_from_top_mm: 0.0,
            flow_rate_ul_sec: 300.0,
        })
        .evaluate(&ctx, &state)
        .expect("blowout succeeds");
        let tip = output.robot_state.pipette_tip(&"p1".into()).unwrap();
        assert!(tip.contents.is_empty());
        assert_eq!(tip.air_gap_ul, 0.0);
        assert_eq!(
            output.robot_state.well_total(&"plate1".into(), &"B2".into()),
            20.0
        );
    }

    #[test]
    fn touch_tip_leaves_state_unchanged() {
        let ctx = basic_context();
        let mut state = state_with_water(&ctx, 100.0);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let output = AtomicOp::TouchTip(TouchTipParams {
            pipette: "p1".into(),
            labware: "plate1".into(),
            well: "A1".into(),
            offset_from_bottom_mm: 13.0,
        })
        .evaluate(&ctx, &state)
        .expect("touch tip succeeds");
        assert_eq!(output.robot_state, state);
        assert_eq!(output.commands.len(), 1);
    }
}
