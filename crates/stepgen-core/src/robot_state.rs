//! The simulated robot state.
//!
//! A [`RobotState`] is one snapshot in the protocol timeline: tip presence
//! and tip contents per pipette, remaining tips per rack, liquid per well,
//! module states, and deck placement. Snapshots are plain owned data —
//! cloning one yields a fully independent copy, which is what lets the
//! timeline keep every intermediate state for preview.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stepgen_catalog::{InvariantContext, ModuleKind};
use stepgen_model::{DeckSlot, LabwareId, LidPosition, LiquidId, ModuleId, PipetteId, WellName};

use crate::liquid::{WellContents, total_volume};

/// Tip status of one pipette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipetteTipState {
    pub has_tip: bool,
    /// Liquid currently held in the tip.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contents: WellContents,
    /// Air drawn above the liquid (air gap), µL.
    #[serde(default)]
    pub air_gap_ul: f64,
}

impl PipetteTipState {
    fn empty() -> Self {
        Self {
            has_tip: false,
            contents: WellContents::new(),
            air_gap_ul: 0.0,
        }
    }
}

/// Tip bookkeeping: mounted tips per pipette, remaining tips per rack well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipState {
    pub pipettes: BTreeMap<PipetteId, PipetteTipState>,
    pub tipracks: BTreeMap<LabwareId, BTreeMap<WellName, bool>>,
}

/// Temperature module status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemperatureStatus {
    Deactivated,
    /// Target set, still ramping.
    Pending,
    /// Target reached and held.
    Holding,
}

/// Per-module simulated state, discriminated by module kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModuleState {
    TemperatureModule {
        target_celsius: Option<f64>,
        status: TemperatureStatus,
    },
    MagneticModule {
        engaged: bool,
        engage_height_mm: Option<f64>,
    },
    Thermocycler {
        lid: LidPosition,
        block_target_celsius: Option<f64>,
        lid_target_celsius: Option<f64>,
    },
}

impl ModuleState {
    fn initial(kind: ModuleKind) -> Self {
        match kind {
            ModuleKind::TemperatureModule => ModuleState::TemperatureModule {
                target_celsius: None,
                status: TemperatureStatus::Deactivated,
            },
            ModuleKind::MagneticModule => ModuleState::MagneticModule {
                engaged: false,
                engage_height_mm: None,
            },
            ModuleKind::Thermocycler => ModuleState::Thermocycler {
                lid: LidPosition::Open,
                block_target_celsius: None,
                lid_target_celsius: None,
            },
        }
    }
}

/// Where a labware currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Slot(DeckSlot),
    OffDeck,
}

/// One snapshot of the simulated robot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotState {
    pub tip_state: TipState,
    /// Liquid per labware well. Absent wells are empty.
    pub liquid_state: BTreeMap<LabwareId, BTreeMap<WellName, WellContents>>,
    pub module_state: BTreeMap<ModuleId, ModuleState>,
    pub labware_positions: BTreeMap<LabwareId, Placement>,
}

impl RobotState {
    /// The protocol-start state for a catalog: no tips mounted, all racks
    /// full, all wells empty, modules idle, labware in its catalog slot.
    pub fn initial(ctx: &InvariantContext) -> Self {
        let mut state = RobotState::default();
        for pipette in ctx.pipettes() {
            state
                .tip_state
                .pipettes
                .insert(pipette.id.clone(), PipetteTipState::empty());
        }
        for entity in ctx.labware_entities() {
            if entity.def.is_tiprack {
                let wells = entity
                    .def
                    .wells
                    .keys()
                    .map(|well| (well.clone(), true))
                    .collect();
                state.tip_state.tipracks.insert(entity.id.clone(), wells);
            }
            state
                .labware_positions
                .insert(entity.id.clone(), Placement::Slot(entity.slot.clone()));
        }
        for module in ctx.modules() {
            state
                .module_state
                .insert(module.id.clone(), ModuleState::initial(module.kind));
        }
        state
    }

    /// Place liquid into a well (initial deck setup).
    pub fn with_liquid(
        mut self,
        labware: &LabwareId,
        well: &WellName,
        liquid: &LiquidId,
        volume_ul: f64,
    ) -> Self {
        *self
            .well_contents_mut(labware, well)
            .entry(liquid.clone())
            .or_insert(0.0) += volume_ul;
        self
    }

    /// Contents of a well; `None` means the well has never held liquid.
    pub fn well_contents(&self, labware: &LabwareId, well: &WellName) -> Option<&WellContents> {
        self.liquid_state.get(labware)?.get(well)
    }

    /// Total liquid volume in a well, µL.
    pub fn well_total(&self, labware: &LabwareId, well: &WellName) -> f64 {
        self.well_contents(labware, well)
            .map(total_volume)
            .unwrap_or(0.0)
    }

    pub(crate) fn well_contents_mut(
        &mut self,
        labware: &LabwareId,
        well: &WellName,
    ) -> &mut WellContents {
        self.liquid_state
            .entry(labware.clone())
            .or_default()
            .entry(well.clone())
            .or_default()
    }

    pub fn pipette_tip(&self, pipette: &PipetteId) -> Option<&PipetteTipState> {
        self.tip_state.pipettes.get(pipette)
    }

    pub(crate) fn pipette_tip_mut(&mut self, pipette: &PipetteId) -> &mut PipetteTipState {
        self.tip_state
            .pipettes
            .entry(pipette.clone())
            .or_insert_with(PipetteTipState::empty)
    }

    /// Whether the pipette currently has a tip mounted.
    pub fn has_tip(&self, pipette: &PipetteId) -> bool {
        self.pipette_tip(pipette).is_some_and(|tip| tip.has_tip)
    }

    /// Whether any tracked well has gone negative (should never happen).
    pub fn all_volumes_non_negative(&self) -> bool {
        self.liquid_state
            .values()
            .flat_map(|wells| wells.values())
            .flat_map(|contents| contents.values())
            .all(|volume| *volume >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgen_catalog::{LabwareEntity, fixtures};

    fn context() -> InvariantContext {
        InvariantContext::builder()
            .pipette(stepgen_catalog::PipetteEntity {
                id: "p1".into(),
                spec: fixtures::pipette_spec("p300_single_gen2").unwrap(),
            })
            .labware(LabwareEntity {
                id: "tiprack1".into(),
                def: fixtures::opentrons_96_tiprack_300ul(),
                slot: "1".into(),
            })
            .labware(LabwareEntity {
                id: "plate1".into(),
                def: fixtures::corning_96_wellplate_360ul_flat(),
                slot: "2".into(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn initial_state_has_full_tipracks_and_no_mounted_tips() {
        let state = RobotState::initial(&context());
        assert!(!state.has_tip(&"p1".into()));
        let rack = state.tip_state.tipracks.get(&"tiprack1".into()).unwrap();
        assert_eq!(rack.len(), 96);
        assert!(rack.values().all(|present| *present));
        assert!(state.tip_state.tipracks.get(&"plate1".into()).is_none());
    }

    #[test]
    fn with_liquid_accumulates() {
        let state = RobotState::initial(&context())
            .with_liquid(&"plate1".into(), &"A1".into(), &"water".into(), 100.0)
            .with_liquid(&"plate1".into(), &"A1".into(), &"water".into(), 20.0);
        assert_eq!(state.well_total(&"plate1".into(), &"A1".into()), 120.0);
    }

    #[test]
    fn clone_is_deeply_independent() {
        let original = RobotState::initial(&context()).with_liquid(
            &"plate1".into(),
            &"A1".into(),
            &"water".into(),
            100.0,
        );
        let mut copy = original.clone();
        copy.well_contents_mut(&"plate1".into(), &"A1".into())
            .insert("dye".into(), 5.0);
        copy.pipette_tip_mut(&"p1".into()).has_tip = true;
        assert_eq!(original.well_total(&"plate1".into(), &"A1".into()), 100.0);
        assert!(!original.has_tip(&"p1".into()));
    }
}
