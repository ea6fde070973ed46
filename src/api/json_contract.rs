use serde::{Deserialize, Serialize};

use crate::error::{RigError, RigResult};

use super::{RigSnapshot, TestSummary};

pub const RIG_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;
pub const TEST_SUMMARY_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: RigSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummaryJsonContractV1 {
    pub schema_version: u32,
    pub summary: TestSummary,
}

impl RigSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> RigResult<String> {
        let payload = RigSnapshotJsonContractV1 {
            schema_version: RIG_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            RigError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 envelope.
    pub fn from_json_compat_str(input: &str) -> RigResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<RigSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: RigSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            RigError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != RIG_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(RigError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl TestSummary {
    pub fn to_json_contract_v1_pretty(&self) -> RigResult<String> {
        let payload = TestSummaryJsonContractV1 {
            schema_version: TEST_SUMMARY_JSON_SCHEMA_V1,
            summary: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            RigError::InvalidData(format!("failed to serialize summary contract v1: {e}"))
        })
    }
}
