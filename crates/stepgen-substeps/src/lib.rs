//! Substep expansion: project a compiled step and its state transition into
//! human-viewable per-well rows.
//!
//! Everything here is derived purely from the timeline frame and the
//! pre-step state snapshot, so it is safe (and cheap) to recompute on every
//! render. Nothing feeds back into compilation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stepgen_core::{RobotState, TimelineFrame};
use stepgen_model::{Command, LabwareId, Step, StepArgs, WellName};

/// A well's liquid level before and after one operation, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellSnapshot {
    pub labware: LabwareId,
    pub well: WellName,
    pub pre_volume_ul: f64,
    pub post_volume_ul: f64,
}

/// One source→dest movement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDestRow {
    pub source: Option<WellSnapshot>,
    pub dest: Option<WellSnapshot>,
    pub volume_ul: f64,
    /// True when a fresh tip was picked up for this row.
    pub fresh_tip: bool,
}

/// One mixed well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixRow {
    pub well: WellName,
    pub volume_ul: f64,
    pub repetitions: u32,
}

/// Per-step display projection, discriminated by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "substepType", rename_all = "camelCase")]
pub enum SubstepItem {
    SourceDest {
        rows: Vec<SourceDestRow>,
    },
    Mix {
        labware: LabwareId,
        rows: Vec<MixRow>,
    },
    Pause {
        message: Option<String>,
        seconds: Option<f64>,
    },
}

/// Expand one compiled step into display rows.
///
/// Returns `None` for steps with no per-well projection (module commands,
/// labware moves) and for steps that failed to compile.
pub fn expand_substeps(
    step: &Step,
    frame: &TimelineFrame,
    prev_state: &RobotState,
) -> Option<SubstepItem> {
    if frame.is_error() {
        return None;
    }
    match &step.args {
        StepArgs::Mix(args) => Some(SubstepItem::Mix {
            labware: args.labware.clone(),
            rows: args
                .wells
                .iter()
                .map(|well| MixRow {
                    well: well.clone(),
                    volume_ul: args.volume,
                    repetitions: args.times,
                })
                .collect(),
        }),
        StepArgs::Pause(args) => Some(SubstepItem::Pause {
            message: args.message.clone(),
            seconds: args.seconds,
        }),
        StepArgs::Transfer(_) | StepArgs::Consolidate(_) | StepArgs::Distribute(_) => {
            Some(SubstepItem::SourceDest {
                rows: pair_commands(&frame.commands, prev_state),
            })
        }
        _ => None,
    }
}

/// Running per-well totals seeded lazily from the pre-step snapshot.
struct VolumeTracker<'a> {
    prev_state: &'a RobotState,
    totals: BTreeMap<(LabwareId, WellName), f64>,
}

impl<'a> VolumeTracker<'a> {
    fn new(prev_state: &'a RobotState) -> Self {
        Self {
            prev_state,
            totals: BTreeMap::new(),
        }
    }

    fn current(&mut self, labware: &LabwareId, well: &WellName) -> f64 {
        *self
            .totals
            .entry((labware.clone(), well.clone()))
            .or_insert_with(|| self.prev_state.well_total(labware, well))
    }

    fn apply(&mut self, labware: &LabwareId, well: &WellName, delta: f64) -> (f64, f64) {
        let pre = self.current(labware, well);
        let post = (pre + delta).max(0.0);
        self.totals.insert((labware.clone(), well.clone()), post);
        (pre, post)
    }
}

#[derive(Clone)]
struct AspirateInfo {
    snapshot: WellSnapshot,
    volume: f64,
}

/// Pair aspirates with dispenses into movement rows.
///
/// Several aspirates feeding one dispense (consolidate) produce one row per
/// source; one aspirate feeding several dispenses (distribute) repeats the
/// source on every row. Air-gap, touch-tip, and blow-out commands do not
/// form rows.
fn pair_commands(commands: &[Command], prev_state: &RobotState) -> Vec<SourceDestRow> {
    let mut tracker = VolumeTracker::new(prev_state);
    let mut rows = Vec::new();
    let mut pending: Vec<AspirateInfo> = Vec::new();
    let mut last_aspirate: Option<AspirateInfo> = None;
    let mut fresh_tip = false;

    for command in commands {
        match command {
            Command::PickUpTip(_) => fresh_tip = true,
            Command::Aspirate(params) => {
                let (pre, post) = tracker.apply(&params.labware, &params.well, -params.volume);
                let info = AspirateInfo {
                    snapshot: WellSnapshot {
                        labware: params.labware.clone(),
                        well: params.well.clone(),
                        pre_volume_ul: pre,
                        post_volume_ul: post,
                    },
                    volume: params.volume,
                };
                pending.push(info.clone());
                last_aspirate = Some(info);
            }
            Command::Dispense(params) => {
                let (pre, post) = tracker.apply(&params.labware, &params.well, params.volume);
                let dest = WellSnapshot {
                    labware: params.labware.clone(),
                    well: params.well.clone(),
                    pre_volume_ul: pre,
                    post_volume_ul: post,
                };
                if pending.len() > 1 {
                    // consolidate: one row per pooled source
                    for (index, info) in pending.drain(..).enumerate() {
                        rows.push(SourceDestRow {
                            source: Some(info.snapshot),
                            dest: Some(dest.clone()),
                            volume_ul: info.volume,
                            fresh_tip: fresh_tip && index == 0,
                        });
                    }
                } else {
                    let source = pending
                        .pop()
                        .or_else(|| last_aspirate.clone())
                        .map(|info| info.snapshot);
                    rows.push(SourceDestRow {
                        source,
                        dest: Some(dest),
                        volume_ul: params.volume,
                        fresh_tip,
                    });
                }
                fresh_tip = false;
            }
            _ => {}
        }
    }
    rows
}
