//! Dashboard statistics over the full initiative set.
//!
//! Computed from scratch on every request by folding the raw stored values.
//! The fold is permissive: a record with an unknown status only
//! counts toward the total, missing or non-numeric amounts count as 0, and a
//! record without a category is left out of the category breakdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::amount::deserialize_amount;
use crate::initiative::{STATUS_ACTIVE, STATUS_COMPLETED};

/// Aggregate counts and sums returned by `GET /statistics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_initiatives: u64,
    pub active_initiatives: u64,
    pub completed_initiatives: u64,
    pub total_beneficiaries: u64,
    pub total_budget: u64,
    /// Category label -> number of initiatives.
    pub categories: BTreeMap<String, u64>,
}

/// The subset of a stored initiative the fold looks at. Every field is
/// optional so that partially written records still contribute.
#[derive(Debug, Default, Deserialize)]
struct StatsRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    beneficiaries: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    budget: u64,
}

/// Accept any JSON value; only strings are kept.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl Stats {
    /// Fold one stored value into the running totals.
    pub fn record(&mut self, value: &Value) {
        self.total_initiatives += 1;

        // Non-object values still count toward the total.
        let record: StatsRecord = serde_json::from_value(value.clone()).unwrap_or_default();

        match record.status.as_deref() {
            Some(STATUS_ACTIVE) => self.active_initiatives += 1,
            Some(STATUS_COMPLETED) => self.completed_initiatives += 1,
            _ => {}
        }

        self.total_beneficiaries = self.total_beneficiaries.saturating_add(record.beneficiaries);
        self.total_budget = self.total_budget.saturating_add(record.budget);

        if let Some(category) = record.category.filter(|c| !c.is_empty()) {
            *self.categories.entry(category).or_insert(0) += 1;
        }
    }
}

/// Compute statistics over every stored initiative value.
pub fn compute_statistics<'a, I>(values: I) -> Stats
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut stats = Stats::default();
    for value in values {
        stats.record(value);
    }
    stats
}
