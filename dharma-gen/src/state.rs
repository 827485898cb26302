//! Per-test-case mutable state (SPEC_FULL.md §3 "Lifecycle", §4.5).

use dharma_resolve::VariableId;
use std::collections::HashMap;

/// Drives the leaf-mode trigger for one test case. `leaf_trigger` here is the
/// running count of value-rule expansions seen so far this test case, not the
/// configured threshold (that lives on [`crate::config::Config`]); once it
/// exceeds the threshold, `leaf_mode` flips and never reverts
/// (leaf-mode-monotonicity, SPEC_FULL.md §8).
#[derive(Default)]
pub struct GenState {
    pub leaf_mode: bool,
    pub leaf_trigger: u64,
}

impl GenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on every value-rule expansion. Returns the up-to-date
    /// `leaf_mode` flag.
    pub fn tick(&mut self, threshold: u64) -> bool {
        if !self.leaf_mode {
            self.leaf_trigger += 1;
            if self.leaf_trigger > threshold {
                self.leaf_mode = true;
            }
        }
        self.leaf_mode
    }
}

/// Per-variable-rule mutable state, reset between test cases (SPEC_FULL.md
/// §4.5 "Variable-rule expansion").
#[derive(Default, Clone)]
pub struct VariableState {
    pub count: u32,
    pub default: String,
}

/// All per-variable-rule state for one test case, keyed by rule id so the
/// rule graph itself stays immutable and shareable.
#[derive(Default)]
pub struct VariableTable(HashMap<VariableId, VariableState>);

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, id: VariableId) -> &mut VariableState {
        self.0.entry(id).or_default()
    }

    pub fn get(&self, id: VariableId) -> Option<&VariableState> {
        self.0.get(&id)
    }

    /// Touched rules in ascending id order, so the emitted preamble is
    /// deterministic for a fixed seed regardless of hash-map iteration order.
    pub fn touched(&self) -> Vec<(VariableId, &VariableState)> {
        let mut entries: Vec<_> = self.0.iter().filter(|(_, s)| s.count > 0).map(|(id, s)| (*id, s)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_flips_leaf_mode_once_threshold_exceeded() {
        let mut state = GenState::new();
        assert!(!state.tick(2));
        assert!(!state.tick(2));
        assert!(state.tick(2));
        // monotonic: stays true even once it would no longer increment.
        assert!(state.tick(2));
    }

    #[test]
    fn variable_table_tracks_touched_rules_only() {
        let mut table = VariableTable::new();
        let id = VariableId(0);
        assert!(table.touched().is_empty());
        table.entry(id).count += 1;
        assert_eq!(table.touched().len(), 1);
    }
}
