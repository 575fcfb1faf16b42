//! Tip handling: pick-up, drop, replace.

use stepgen_model::{Command, LabwareId, PipetteId, StepError, TipHandlingParams, WellName};

use stepgen_catalog::InvariantContext;

use crate::atomic::{AtomicOp, require_pipette};
use crate::liquid::merge_liquid;
use crate::reduce::{CreatorResult, StepOutput, reduce_ops};
use crate::robot_state::RobotState;

/// Consume the first free tip, searching compatible racks in slot order and
/// wells in column-major order.
pub(super) fn pick_up_tip(
    pipette: &PipetteId,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let entity = require_pipette("pick up tip", ctx, pipette)?;
    if prev.has_tip(pipette) {
        return Err(vec![StepError::tip_already_attached(pipette)]);
    }

    let next_tip = ctx.tipracks_for(&entity.spec).into_iter().find_map(|rack| {
        let rack_state = prev.tip_state.tipracks.get(&rack.id)?;
        rack.def
            .ordered_wells()
            .into_iter()
            .find(|well| rack_state.get(*well).copied().unwrap_or(false))
            .map(|well| (rack.id.clone(), well.clone()))
    });
    let Some((rack_id, well)) = next_tip else {
        return Err(vec![StepError::insufficient_tips(pipette)]);
    };

    let mut robot_state = prev.clone();
    if let Some(rack_state) = robot_state.tip_state.tipracks.get_mut(&rack_id) {
        rack_state.insert(well.clone(), false);
    }
    let tip = robot_state.pipette_tip_mut(pipette);
    tip.has_tip = true;
    tip.contents.clear();
    tip.air_gap_ul = 0.0;

    Ok(StepOutput {
        commands: vec![Command::PickUpTip(TipHandlingParams {
            pipette: pipette.clone(),
            labware: rack_id,
            well,
        })],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Drop the mounted tip into the fixed trash; whatever the tip still holds
/// is discarded into the trash well.
pub(super) fn drop_tip(
    pipette: &PipetteId,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "drop tip";
    require_pipette(action, ctx, pipette)?;
    if !prev.has_tip(pipette) {
        return Err(vec![StepError::no_tip_on_pipette(action, pipette)]);
    }
    let Some(trash) = ctx.fixed_trash() else {
        return Err(vec![StepError::labware_does_not_exist(
            action,
            &LabwareId::from("fixedTrash"),
        )]);
    };
    let trash_well = trash
        .def
        .ordered_wells()
        .first()
        .map(|well| (*well).clone())
        .unwrap_or_else(|| WellName::from("A1"));

    let mut robot_state = prev.clone();
    let tip = robot_state.pipette_tip_mut(pipette);
    let discarded = std::mem::take(&mut tip.contents);
    tip.has_tip = false;
    tip.air_gap_ul = 0.0;
    let contents = robot_state.well_contents_mut(&trash.id, &trash_well);
    *contents = merge_liquid(contents, &discarded);

    Ok(StepOutput {
        commands: vec![Command::DropTip(TipHandlingParams {
            pipette: pipette.clone(),
            labware: trash.id.clone(),
            well: trash_well,
        })],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Drop the mounted tip if there is one, then pick up a fresh tip. This is
/// the building block behind every tip-change policy, so a bare pipette is
/// not an error here.
pub(super) fn replace_tip(
    pipette: &PipetteId,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let mut ops = Vec::new();
    if prev.has_tip(pipette) {
        ops.push(AtomicOp::DropTip {
            pipette: pipette.clone(),
        });
    }
    ops.push(AtomicOp::PickUpTip {
        pipette: pipette.clone(),
    });
    reduce_ops(&ops, ctx, prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::basic_context;
    use stepgen_model::ErrorKind;

    #[test]
    fn pick_up_consumes_tips_column_major() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let first = pick_up_tip(&"p1".into(), &ctx, &state).expect("first pick-up");
        let Command::PickUpTip(params) = &first.commands[0] else {
            panic!("expected pickUpTip");
        };
        assert_eq!(params.well.as_str(), "A1");

        // drop and pick again: next tip is B1, not A2
        let dropped = drop_tip(&"p1".into(), &ctx, &first.robot_state).expect("drop");
        let second = pick_up_tip(&"p1".into(), &ctx, &dropped.robot_state).expect("second pick-up");
        let Command::PickUpTip(params) = &second.commands[0] else {
            panic!("expected pickUpTip");
        };
        assert_eq!(params.well.as_str(), "B1");
    }

    #[test]
    fn pick_up_with_tip_attached_fails() {
        let ctx = basic_context();
        let mut state = RobotState::initial(&ctx);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let errors = pick_up_tip(&"p1".into(), &ctx, &state).expect_err("already attached");
        assert!(matches!(errors[0].kind, ErrorKind::TipAlreadyAttached { .. }));
    }

    #[test]
    fn drop_without_tip_fails() {
        let ctx = basic_context();
        let state = RobotState::initial(&ctx);
        let errors = drop_tip(&"p1".into(), &ctx, &state).expect_err("no tip");
        assert!(matches!(errors[0].kind, ErrorKind::NoTipOnPipette { .. }));
    }

    #[test]
    fn exhausted_racks_yield_insufficient_tips() {
        let ctx = basic_context();
        let mut state = RobotState::initial(&ctx);
        for rack in state.tip_state.tipracks.values_mut() {
            for present in rack.values_mut() {
                *present = false;
            }
        }
        let errors = pick_up_tip(&"p1".into(), &ctx, &state).expect_err("no tips left");
        assert!(matches!(errors[0].kind, ErrorKind::InsufficientTips { .. }));
    }

    #[test]
    fn drop_tip_discards_liquid_into_trash() {
        let ctx = basic_context();
        let mut state = RobotState::initial(&ctx);
        let tip = state.pipette_tip_mut(&"p1".into());
        tip.has_tip = true;
        tip.contents.insert("water".into(), 25.0);
        let output = drop_tip(&"p1".into(), &ctx, &state).expect("drop succeeds");
        assert_eq!(
            output.robot_state.well_total(&"trash".into(), &"A1".into()),
            25.0
        );
        assert!(!output.robot_state.has_tip(&"p1".into()));
    }

    #[test]
    fn replace_tip_drops_then_picks() {
        let ctx = basic_context();
        let mut state = RobotState::initial(&ctx);
        state.pipette_tip_mut(&"p1".into()).has_tip = true;
        let output = replace_tip(&"p1".into(), &ctx, &state).expect("replace succeeds");
        let names: Vec<&str> = output.commands.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["dropTip", "pickUpTip"]);
        assert!(output.robot_state.has_tip(&"p1".into()));
    }
}
