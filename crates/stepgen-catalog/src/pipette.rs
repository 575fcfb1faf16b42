//! Pipette entity definitions.

use serde::{Deserialize, Serialize};

use stepgen_model::PipetteId;

/// Static specification of a pipette model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipetteSpec {
    /// Model name, e.g. `"p300_single_gen2"`.
    pub model: String,
    /// Channel count: 1 for single-channel, 8 for multi-channel.
    pub channels: u8,
    /// Smallest accurately dispensable volume, µL.
    pub min_volume_ul: f64,
    /// Working volume, µL. Aspirates above this are split or rejected.
    pub max_volume_ul: f64,
    /// Definition URI of the tip racks this pipette picks up from.
    pub tiprack_uri: String,
}

/// A pipette instance mounted on the robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipetteEntity {
    pub id: PipetteId,
    pub spec: PipetteSpec,
}
