//! Step-generation core: robot state simulation, command creators, and the
//! timeline generator.
//!
//! The whole crate is synchronous, single-threaded, and side-effect-free.
//! Compilation is a pure function of (catalog, initial state, step list) —
//! safe to re-run from scratch on every input change, and deterministic:
//! identical inputs yield byte-identical serialized timelines.

pub mod atomic;
pub mod compound;
pub mod liquid;
pub mod reduce;
pub mod robot_state;
pub mod timeline;

#[cfg(test)]
mod test_support;

pub use atomic::AtomicOp;
pub use compound::bind_step;
pub use liquid::WellContents;
pub use reduce::{CreatorResult, StepOutput, reduce_ops};
pub use robot_state::{
    ModuleState, Placement, PipetteTipState, RobotState, TemperatureStatus, TipState,
};
pub use timeline::{Timeline, TimelineFrame, generate_timeline};
