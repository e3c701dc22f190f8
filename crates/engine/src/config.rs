// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Settings that shape how the orchestrator reads time and names itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Household offset from UTC; decides local dates and midnight
    pub utc_offset_minutes: i32,
    /// Approver name recorded for automatic approvals
    pub auto_approver_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            auto_approver_name: "auto".to_string(),
        }
    }
}

impl EngineConfig {
    /// The configured offset, or UTC when out of range
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}
