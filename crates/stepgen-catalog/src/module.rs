//! Hardware module entity definitions.

use serde::{Deserialize, Serialize};

use stepgen_model::{DeckSlot, ModuleId};

/// Module hardware kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleKind {
    TemperatureModule,
    MagneticModule,
    Thermocycler,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::TemperatureModule => "temperatureModule",
            ModuleKind::MagneticModule => "magneticModule",
            ModuleKind::Thermocycler => "thermocycler",
        }
    }
}

/// A module instance placed on the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntity {
    pub id: ModuleId,
    pub kind: ModuleKind,
    pub slot: DeckSlot,
}
