//! Shared pieces of the compound creators: bind-time entity checks,
//! tip-change policy expansion, blow-out targeting, and volume chunking.

use stepgen_catalog::{InvariantContext, LabwareEntity, PipetteEntity};
use stepgen_model::{
    BlowoutLocation, BlowoutParams, ChangeTip, LabwareId, PipetteId, StepError, WellName,
};

use crate::atomic::AtomicOp;
use crate::robot_state::RobotState;

/// Height above the well top where air gaps are drawn.
pub(super) const AIR_GAP_OFFSET_FROM_TOP_MM: f64 = 2.0;

/// Bind-time pipette check: the pipette must exist in the catalog and in the
/// state snapshot. Fails the whole step before any command is generated.
pub(super) fn bound_pipette<'a>(
    action: &str,
    pipette: &PipetteId,
    ctx: &'a InvariantContext,
    prev: &RobotState,
) -> Result<&'a PipetteEntity, Vec<StepError>> {
    match ctx.pipette(pipette) {
        Some(entity) if prev.pipette_tip(pipette).is_some() => Ok(entity),
        _ => Err(vec![StepError::pipette_does_not_exist(action, pipette)]),
    }
}

/// Bind-time labware check.
pub(super) fn bound_labware<'a>(
    action: &str,
    labware: &LabwareId,
    ctx: &'a InvariantContext,
) -> Result<&'a LabwareEntity, Vec<StepError>> {
    ctx.labware(labware)
        .ok_or_else(|| vec![StepError::labware_does_not_exist(action, labware)])
}

/// Tip ops preceding group `group_index` of a multi-group operation.
///
/// `always` re-acquires before every group, `once` only before the first,
/// `never` keeps whatever tip is already mounted.
pub(super) fn tip_ops(change_tip: ChangeTip, group_index: usize, pipette: &PipetteId) -> Vec<AtomicOp> {
    let replace = AtomicOp::ReplaceTip {
        pipette: pipette.clone(),
    };
    match change_tip {
        ChangeTip::Always => vec![replace],
        ChangeTip::Once if group_index == 0 => vec![replace],
        ChangeTip::Once | ChangeTip::Never => Vec::new(),
    }
}

/// Resolve a blow-out location to a concrete labware + well and produce the
/// op. `None` means no blow-out.
pub(super) fn blowout_ops(
    location: Option<&BlowoutLocation>,
    pipette: &PipetteId,
    source: (&LabwareId, &WellName),
    dest: (&LabwareId, &WellName),
    ctx: &InvariantContext,
    flow_rate_ul_sec: f64,
    offset_from_top_mm: f64,
) -> Result<Vec<AtomicOp>, Vec<StepError>> {
    let Some(location) = location else {
        return Ok(Vec::new());
    };
    let (labware, well) = match location {
        BlowoutLocation::SourceWell => (source.0.clone(), source.1.clone()),
        BlowoutLocation::DestWell => (dest.0.clone(), dest.1.clone()),
        BlowoutLocation::Trash => {
            let trash = ctx.fixed_trash().ok_or_else(|| {
                vec![StepError::labware_does_not_exist(
                    "blow out",
                    &LabwareId::from("fixedTrash"),
                )]
            })?;
            (trash.id.clone(), first_well(trash))
        }
        BlowoutLocation::Labware(id) => {
            let entity = bound_labware("blow out", id, ctx)?;
            (entity.id.clone(), first_well(entity))
        }
    };
    Ok(vec![AtomicOp::Blowout(BlowoutParams {
        pipette: pipette.clone(),
        labware,
        well,
        offset_from_top_mm,
        flow_rate_ul_sec,
    })])
}

fn first_well(entity: &LabwareEntity) -> WellName {
    entity
        .def
        .ordered_wells()
        .first()
        .map(|well| (*well).clone())
        .unwrap_or_else(|| WellName::from("A1"))
}

/// Split a transfer volume into equal chunks, each within the pipette's
/// working volume.
pub(super) fn split_volume(volume: f64, max_volume: f64) -> Vec<f64> {
    if volume <= max_volume {
        return vec![volume];
    }
    let chunks = (volume / max_volume).ceil() as usize;
    vec![volume / chunks as f64; chunks]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_volume_is_one_chunk() {
        assert_eq!(split_volume(120.0, 300.0), vec![120.0]);
    }

    #[test]
    fn oversized_volume_splits_evenly() {
        assert_eq!(split_volume(600.0, 300.0), vec![300.0, 300.0]);
        assert_eq!(split_volume(700.0, 300.0), vec![700.0 / 3.0; 3]);
    }

    #[test]
    fn once_policy_only_replaces_on_first_group() {
        let pipette = PipetteId::from("p1");
        assert_eq!(tip_ops(ChangeTip::Once, 0, &pipette).len(), 1);
        assert!(tip_ops(ChangeTip::Once, 1, &pipette).is_empty());
        assert_eq!(tip_ops(ChangeTip::Always, 5, &pipette).len(), 1);
        assert!(tip_ops(ChangeTip::Never, 0, &pipette).is_empty());
    }
}
