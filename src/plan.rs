//! Plan state and tier quotas.
//!
//! Plan state is an explicit value loaded from the store and threaded into
//! every call that checks a quota; nothing reads entitlements from ambient
//! globals.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ProspectError, Result};

/// Inspections per UTC day on the free plan
pub const FREE_DAILY_LIMIT: u32 = 30;

/// Saved items on the free plan
pub const FREE_SAVED_LIMIT: usize = 10;

/// Items per compare selection, both tiers
pub const MAX_COMPARE: usize = 5;

/// Entitlement and usage state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanState {
    pub is_pro: bool,
    /// Developer override; counts as pro
    pub dev_mode: bool,
    /// "YYYY-MM-DD" of the day `usage_count` refers to
    pub usage_date: Option<String>,
    pub usage_count: u32,
}

impl PlanState {
    /// Effective pro status: the stored flag or the developer override
    pub fn effective_pro(&self) -> bool {
        self.is_pro || self.dev_mode
    }

    /// Today's date key in UTC
    pub fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    /// Count one inspection against the daily quota.
    ///
    /// Pro is unmetered. The counter resets when the stored date differs from
    /// `today`. State is only mutated when the inspection is admitted.
    pub fn register_inspection(&mut self, today: &str) -> Result<()> {
        if self.effective_pro() {
            return Ok(());
        }
        if self.usage_date.as_deref() != Some(today) {
            self.usage_date = Some(today.to_string());
            self.usage_count = 1;
            return Ok(());
        }
        if self.usage_count >= FREE_DAILY_LIMIT {
            return Err(ProspectError::DailyLimitReached {
                limit: FREE_DAILY_LIMIT,
            });
        }
        self.usage_count += 1;
        Ok(())
    }

    /// Remaining inspections today, `None` when unmetered
    pub fn remaining_today(&self, today: &str) -> Option<u32> {
        if self.effective_pro() {
            return None;
        }
        if self.usage_date.as_deref() != Some(today) {
            return Some(FREE_DAILY_LIMIT);
        }
        Some(FREE_DAILY_LIMIT.saturating_sub(self.usage_count))
    }
}
