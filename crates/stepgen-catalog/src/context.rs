//! The invariant compile context: every entity a protocol can reference,
//! resolved once and passed by reference into every compile entry point.

use std::collections::BTreeMap;

use tracing::debug;

use stepgen_model::{LabwareId, ModuleId, PipetteId};

use crate::labware::LabwareEntity;
use crate::module::ModuleEntity;
use crate::pipette::{PipetteEntity, PipetteSpec};

/// Errors raised while assembling a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate pipette id: {0}")]
    DuplicatePipette(PipetteId),

    #[error("duplicate labware id: {0}")]
    DuplicateLabware(LabwareId),

    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    #[error("labware \"{first}\" and \"{second}\" are both flagged as the fixed trash")]
    MultipleTrash { first: LabwareId, second: LabwareId },
}

/// Immutable entity catalog, built once per protocol.
///
/// All lookups are pure functions of an id. Iteration order over entities is
/// deterministic (id order).
#[derive(Debug, Clone, Default)]
pub struct InvariantContext {
    pipettes: BTreeMap<PipetteId, PipetteEntity>,
    labware: BTreeMap<LabwareId, LabwareEntity>,
    modules: BTreeMap<ModuleId, ModuleEntity>,
}

impl InvariantContext {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn pipette(&self, id: &PipetteId) -> Option<&PipetteEntity> {
        self.pipettes.get(id)
    }

    pub fn labware(&self, id: &LabwareId) -> Option<&LabwareEntity> {
        self.labware.get(id)
    }

    pub fn module(&self, id: &ModuleId) -> Option<&ModuleEntity> {
        self.modules.get(id)
    }

    pub fn pipettes(&self) -> impl Iterator<Item = &PipetteEntity> {
        self.pipettes.values()
    }

    pub fn labware_entities(&self) -> impl Iterator<Item = &LabwareEntity> {
        self.labware.values()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleEntity> {
        self.modules.values()
    }

    /// The labware flagged as the fixed trash, if any.
    pub fn fixed_trash(&self) -> Option<&LabwareEntity> {
        self.labware.values().find(|entity| entity.def.is_trash)
    }

    /// Tip racks compatible with `spec`, in deck slot order.
    ///
    /// Slot order (then id order as tie-break) is the order tips are
    /// consumed during pick-up-tip resolution.
    pub fn tipracks_for(&self, spec: &PipetteSpec) -> Vec<&LabwareEntity> {
        let mut racks: Vec<&LabwareEntity> = self
            .labware
            .values()
            .filter(|entity| entity.def.is_tiprack && entity.def.uri == spec.tiprack_uri)
            .collect();
        racks.sort_by(|a, b| {
            a.slot
                .sort_key()
                .cmp(&b.slot.sort_key())
                .then_with(|| a.id.cmp(&b.id))
        });
        racks
    }
}

/// Builder validating id uniqueness and trash flags.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    pipettes: Vec<PipetteEntity>,
    labware: Vec<LabwareEntity>,
    modules: Vec<ModuleEntity>,
}

impl ContextBuilder {
    pub fn pipette(mut self, entity: PipetteEntity) -> Self {
        self.pipettes.push(entity);
        self
    }

    pub fn labware(mut self, entity: LabwareEntity) -> Self {
        self.labware.push(entity);
        self
    }

    pub fn module(mut self, entity: ModuleEntity) -> Self {
        self.modules.push(entity);
        self
    }

    pub fn build(self) -> Result<InvariantContext, CatalogError> {
        let mut context = InvariantContext::default();
        for entity in self.pipettes {
            if context.pipettes.contains_key(&entity.id) {
                return Err(CatalogError::DuplicatePipette(entity.id));
            }
            context.pipettes.insert(entity.id.clone(), entity);
        }
        let mut trash: Option<LabwareId> = None;
        for entity in self.labware {
            if context.labware.contains_key(&entity.id) {
                return Err(CatalogError::DuplicateLabware(entity.id));
            }
            if entity.def.is_trash {
                if let Some(first) = &trash {
                    return Err(CatalogError::MultipleTrash {
                        first: first.clone(),
                        second: entity.id,
                    });
                }
                trash = Some(entity.id.clone());
            }
            context.labware.insert(entity.id.clone(), entity);
        }
        for entity in self.modules {
            if context.modules.contains_key(&entity.id) {
                return Err(CatalogError::DuplicateModule(entity.id));
            }
            context.modules.insert(entity.id.clone(), entity);
        }
        debug!(
            pipettes = context.pipettes.len(),
            labware = context.labware.len(),
            modules = context.modules.len(),
            "built invariant context"
        );
        Ok(context)
    }
}
