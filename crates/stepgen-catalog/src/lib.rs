pub mod context;
pub mod fixtures;
pub mod labware;
pub mod module;
pub mod pipette;

pub use context::{CatalogError, ContextBuilder, InvariantContext};
pub use labware::{LabwareDef, LabwareEntity, WellGeometry};
pub use module::{ModuleEntity, ModuleKind};
pub use pipette::{PipetteEntity, PipetteSpec};
