//! Protocol file loading and resolution.
//!
//! A protocol JSON file declares the deck (pipettes, labware, modules),
//! initial liquid placements, and the ordered step list. Pipette models and
//! labware definitions are resolved against the built-in standard
//! definitions from `stepgen-catalog`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stepgen_catalog::{
    CatalogError, InvariantContext, LabwareEntity, ModuleEntity, ModuleKind, PipetteEntity,
    fixtures,
};
use stepgen_core::RobotState;
use stepgen_model::{DeckSlot, LabwareId, LiquidId, ModuleId, PipetteId, Step, WellName};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("failed to read protocol {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse protocol {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown pipette model \"{model}\" for pipette \"{id}\"")]
    UnknownPipetteModel { id: PipetteId, model: String },

    #[error("unknown labware definition \"{definition}\" for labware \"{id}\"")]
    UnknownLabwareDefinition { id: LabwareId, definition: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipetteConfig {
    pub id: PipetteId,
    /// Model name resolved via the standard catalog, e.g. "p300_single_gen2".
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabwareConfig {
    pub id: LabwareId,
    /// Load name resolved via the standard catalog,
    /// e.g. "corning_96_wellplate_360ul_flat".
    pub definition: String,
    pub slot: DeckSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub id: ModuleId,
    pub kind: ModuleKind,
    pub slot: DeckSlot,
}

/// Initial liquid placed into a well at protocol start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidPlacement {
    pub labware: LabwareId,
    pub well: WellName,
    pub liquid: LiquidId,
    pub volume_ul: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolFile {
    #[serde(default)]
    pub metadata: ProtocolMetadata,
    pub pipettes: Vec<PipetteConfig>,
    pub labware: Vec<LabwareConfig>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
    #[serde(default)]
    pub liquids: Vec<LiquidPlacement>,
    pub steps: Vec<Step>,
}

impl ProtocolFile {
    /// Resolve the declared deck into a compile context and initial state.
    pub fn resolve(&self) -> Result<(InvariantContext, RobotState), ProtocolError> {
        let mut builder = InvariantContext::builder();
        for pipette in &self.pipettes {
            let spec = fixtures::pipette_spec(&pipette.model).ok_or_else(|| {
                ProtocolError::UnknownPipetteModel {
                    id: pipette.id.clone(),
                    model: pipette.model.clone(),
                }
            })?;
            builder = builder.pipette(PipetteEntity {
                id: pipette.id.clone(),
                spec,
            });
        }
        for labware in &self.labware {
            let def = fixtures::labware_def(&labware.definition).ok_or_else(|| {
                ProtocolError::UnknownLabwareDefinition {
                    id: labware.id.clone(),
                    definition: labware.definition.clone(),
                }
            })?;
            builder = builder.labware(LabwareEntity {
                id: labware.id.clone(),
                def,
                slot: labware.slot.clone(),
            });
        }
        for module in &self.modules {
            builder = builder.module(ModuleEntity {
                id: module.id.clone(),
                kind: module.kind,
                slot: module.slot.clone(),
            });
        }
        let context = builder.build()?;

        let mut state = RobotState::initial(&context);
        for placement in &self.liquids {
            state = state.with_liquid(
                &placement.labware,
                &placement.well,
                &placement.liquid,
                placement.volume_ul,
            );
        }
        Ok((context, state))
    }
}

/// Read and parse a protocol JSON file.
pub fn load_protocol(path: &Path) -> Result<ProtocolFile, ProtocolError> {
    let raw = fs::read_to_string(path).map_err(|source| ProtocolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ProtocolError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "metadata": { "name": "demo" },
        "pipettes": [{ "id": "p1", "model": "p300_single_gen2" }],
        "labware": [
            { "id": "tiprack1", "definition": "opentrons_96_tiprack_300ul", "slot": "1" },
            { "id": "plate1", "definition": "corning_96_wellplate_360ul_flat", "slot": "2" },
            { "id": "trash", "definition": "fixed_trash", "slot": "12" }
        ],
        "liquids": [
            { "labware": "plate1", "well": "A1", "liquid": "water", "volumeUl": 200.0 }
        ],
        "steps": [
            {
                "id": "mix-1",
                "stepType": "mix",
                "pipette": "p1",
                "labware": "plate1",
                "wells": ["A1"],
                "volume": 50.0,
                "times": 2,
                "changeTip": "always"
            }
        ]
    }"#;

    #[test]
    fn minimal_protocol_resolves() {
        let protocol: ProtocolFile = serde_json::from_str(MINIMAL).expect("parse");
        let (context, state) = protocol.resolve().expect("resolve");
        assert!(context.pipette(&"p1".into()).is_some());
        assert!(context.fixed_trash().is_some());
        assert_eq!(state.well_total(&"plate1".into(), &"A1".into()), 200.0);
        assert_eq!(protocol.steps.len(), 1);
    }

    #[test]
    fn unknown_pipette_model_is_a_typed_error() {
        let mut protocol: ProtocolFile = serde_json::from_str(MINIMAL).expect("parse");
        protocol.pipettes[0].model = "p9000".to_string();
        let error = protocol.resolve().expect_err("unknown model");
        assert!(matches!(error, ProtocolError::UnknownPipetteModel { .. }));
    }

    #[test]
    fn duplicate_labware_id_surfaces_catalog_error() {
        let mut protocol: ProtocolFile = serde_json::from_str(MINIMAL).expect("parse");
        let duplicate = protocol.labware[1].clone();
        protocol.labware.push(duplicate);
        let error = protocol.resolve().expect_err("duplicate id");
        assert!(matches!(error, ProtocolError::Catalog(_)));
    }
}
