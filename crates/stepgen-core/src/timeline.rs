//! The timeline generator: a single synchronous pass over the ordered step
//! list, carrying the latest successful robot state forward.
//!
//! A failed step contributes its errors and the *unchanged* carried state,
//! so later steps simulate as if the failed step were a no-op. This keeps a
//! partial timeline available for preview even when a mid-protocol step is
//! invalid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use stepgen_catalog::InvariantContext;
use stepgen_model::{Command, Step, StepError, StepId, StepWarning};

use crate::compound::bind_step;
use crate::reduce::reduce_ops;
use crate::robot_state::RobotState;

/// Compiled result of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub step_id: StepId,
    /// Commands emitted by this step; empty when the step failed.
    pub commands: Vec<Command>,
    /// State after this step — or the carried pre-step state on failure.
    pub robot_state: RobotState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StepWarning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StepError>,
}

impl TimelineFrame {
    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Ordered per-step compile results for a whole protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub frames: Vec<TimelineFrame>,
}

impl Timeline {
    pub fn error_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.warnings.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.frames.iter().any(TimelineFrame::is_error)
    }

    /// The last computed state, i.e. the deck at end of protocol.
    pub fn last_state(&self) -> Option<&RobotState> {
        self.frames.last().map(|frame| &frame.robot_state)
    }
}

/// Compile an ordered step list against an initial robot state.
///
/// Pure and deterministic: identical inputs produce identical timelines.
pub fn generate_timeline(
    ctx: &InvariantContext,
    initial: &RobotState,
    steps: &[Step],
) -> Timeline {
    let span = debug_span!("generate_timeline", steps = steps.len());
    let _guard = span.enter();

    let mut frames = Vec::with_capacity(steps.len());
    let mut state = initial.clone();
    let mut seen_ids: BTreeSet<StepId> = BTreeSet::new();
    for step in steps {
        let result = if seen_ids.insert(step.id.clone()) {
            bind_step(&step.args, ctx, &state)
                .and_then(|ops| reduce_ops(&ops, ctx, &state))
        } else {
            Err(vec![StepError::duplicate_step_id(&step.id)])
        };
        match result {
            Ok(output) => {
                debug!(
                    step = %step.id,
                    commands = output.commands.len(),
                    warnings = output.warnings.len(),
                    "step compiled"
                );
                state = output.robot_state.clone();
                frames.push(TimelineFrame {
                    step_id: step.id.clone(),
                    commands: output.commands,
                    robot_state: output.robot_state,
                    warnings: output.warnings,
                    errors: Vec::new(),
                });
            }
            Err(errors) => {
                warn!(step = %step.id, errors = errors.len(), "step failed to compile");
                frames.push(TimelineFrame {
                    step_id: step.id.clone(),
                    commands: Vec::new(),
                    robot_state: state.clone(),
                    warnings: Vec::new(),
                    errors,
                });
            }
        }
    }
    Timeline { frames }
}
