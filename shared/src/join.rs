use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::normalize;
use crate::region::{AttrValue, Region};

/// One already-parsed tabular row: field name to raw cell.
pub type SourceRow = HashMap<String, Value>;

/// Which fields of a source participate in a join pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Field holding the human-entered region name.
    pub key_field: String,
    pub value_fields: Vec<ValueField>,
}

impl JoinSpec {
    pub fn new(key_field: impl Into<String>, value_fields: Vec<ValueField>) -> Self {
        Self {
            key_field: key_field.into(),
            value_fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueField {
    pub field: String,
    /// Absent and unparseable cells become `0.0` instead of the missing
    /// sentinel. Off by default: a parse failure is data loss worth seeing.
    #[serde(default)]
    pub treat_missing_as_zero: bool,
}

impl ValueField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            treat_missing_as_zero: false,
        }
    }

    pub fn zero_filled(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            treat_missing_as_zero: true,
        }
    }
}

/// Two source rows normalized to the same key; the first kept the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConflict {
    pub key: String,
    pub kept_row: usize,
    pub dropped_row: usize,
}

/// Diagnostics for one join pass. `matched` and `unmatched_regions`
/// together cover every region exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinResult {
    /// Region ids that received values this pass.
    pub matched: Vec<String>,
    /// Region ids no row matched; they keep whatever they had before.
    pub unmatched_regions: Vec<String>,
    /// Raw key cells of rows that matched no region.
    pub unmatched_rows: Vec<String>,
    pub conflicts: Vec<KeyConflict>,
}

impl JoinResult {
    pub fn is_clean(&self) -> bool {
        self.unmatched_regions.is_empty()
            && self.unmatched_rows.is_empty()
            && self.conflicts.is_empty()
    }
}

/// Attach `spec.value_fields` from `rows` onto `regions`, matching rows to
/// regions by normalized key.
///
/// First-occurrence-wins throughout: a later row with an already-seen key
/// is recorded as a conflict and skipped entirely, and when two regions
/// normalize to the same key the earlier region owns it. Unmatched rows are
/// recorded and the pass continues; nothing aborts. Safe to call repeatedly
/// against the same region set to attach further sources.
pub fn join(regions: &mut [Region], rows: &[SourceRow], spec: &JoinSpec) -> JoinResult {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for (idx, region) in regions.iter().enumerate() {
        by_key.entry(region.key.clone()).or_insert(idx);
    }

    let mut result = JoinResult::default();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut matched = vec![false; regions.len()];

    for (row_idx, row) in rows.iter().enumerate() {
        let raw_key = match row.get(&spec.key_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let key = normalize(&raw_key);
        if key.is_empty() {
            result.unmatched_rows.push(raw_key);
            continue;
        }
        if let Some(&kept_row) = seen.get(&key) {
            result.conflicts.push(KeyConflict {
                key,
                kept_row,
                dropped_row: row_idx,
            });
            continue;
        }
        seen.insert(key.clone(), row_idx);

        let Some(&region_idx) = by_key.get(&key) else {
            result.unmatched_rows.push(raw_key);
            continue;
        };
        let region = &mut regions[region_idx];
        for field in &spec.value_fields {
            let value = numeric_cell(row.get(&field.field), field.treat_missing_as_zero);
            region.attributes.insert(field.field.clone(), value);
        }
        matched[region_idx] = true;
    }

    for (idx, region) in regions.iter().enumerate() {
        if matched[idx] {
            result.matched.push(region.id.clone());
        } else {
            result.unmatched_regions.push(region.id.clone());
        }
    }
    result
}

fn numeric_cell(cell: Option<&Value>, zero_when_missing: bool) -> AttrValue {
    let parsed = match cell {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let value = parsed.filter(|v| v.is_finite());
    if value.is_none() && zero_when_missing {
        Some(0.0)
    } else {
        value
    }
}
