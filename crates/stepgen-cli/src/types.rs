use std::path::PathBuf;

use stepgen_core::Timeline;
use stepgen_model::Step;
use stepgen_substeps::SubstepItem;

/// Everything the summary printer needs after a compile run.
#[derive(Debug)]
pub struct CompileResult {
    pub protocol_name: String,
    pub steps: Vec<Step>,
    pub timeline: Timeline,
    /// Per-step display rows, aligned with `timeline.frames`. Empty unless
    /// `--substeps` was requested.
    pub substeps: Vec<Option<SubstepItem>>,
    pub output_path: Option<PathBuf>,
}
