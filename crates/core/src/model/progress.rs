use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::StepId;

/// Per-module persisted progress: position, completions, and interactive
/// sub-state.
///
/// Completion is monotonic by design (mirrors typical LMS semantics): steps
/// can be marked complete but never un-completed, and no removal operation is
/// exposed. The current step index is clamped to the module's step range on
/// load and on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    current_step_index: usize,
    completed: BTreeSet<StepId>,
    interactive: BTreeMap<String, bool>,
    last_access: DateTime<Utc>,
}

impl ProgressRecord {
    /// The empty record a module starts with the first time it is opened.
    #[must_use]
    pub fn default_record(now: DateTime<Utc>) -> Self {
        Self {
            current_step_index: 0,
            completed: BTreeSet::new(),
            interactive: BTreeMap::new(),
            last_access: now,
        }
    }

    /// Rehydrates a record from persisted storage.
    ///
    /// The index is stored as-is; callers clamp it against the live module
    /// via [`clamp_to`](Self::clamp_to) since the step count may have changed
    /// between sessions.
    #[must_use]
    pub fn from_persisted(
        current_step_index: usize,
        completed: BTreeSet<StepId>,
        interactive: BTreeMap<String, bool>,
        last_access: DateTime<Utc>,
    ) -> Self {
        Self {
            current_step_index,
            completed,
            interactive,
            last_access,
        }
    }

    /// Map key for one interactive sub-element: `"<stepId>-<index>"`.
    #[must_use]
    pub fn interactive_key(step_id: &StepId, index: usize) -> String {
        format!("{step_id}-{index}")
    }

    #[must_use]
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn set_current_step_index(&mut self, index: usize) {
        self.current_step_index = index;
    }

    /// Clamps the current index into `0..step_count`.
    ///
    /// `step_count` must be at least one (a module invariant).
    pub fn clamp_to(&mut self, step_count: usize) {
        let max = step_count.saturating_sub(1);
        if self.current_step_index > max {
            self.current_step_index = max;
        }
    }

    /// Marks a step complete. Returns `true` if the step was newly completed,
    /// `false` if it was already in the set (idempotent, not an error).
    pub fn mark_completed(&mut self, step_id: StepId) -> bool {
        self.completed.insert(step_id)
    }

    #[must_use]
    pub fn is_completed(&self, step_id: &StepId) -> bool {
        self.completed.contains(step_id)
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<StepId> {
        &self.completed
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn interactive(&self) -> &BTreeMap<String, bool> {
        &self.interactive
    }

    #[must_use]
    pub fn interactive_value(&self, key: &str) -> Option<bool> {
        self.interactive.get(key).copied()
    }

    pub fn set_interactive(&mut self, key: String, value: bool) {
        self.interactive.insert(key, value);
    }

    pub fn remove_interactive(&mut self, key: &str) {
        self.interactive.remove(key);
    }

    #[must_use]
    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    /// Stamps the record with a fresh last-access time. Called on every
    /// persisted mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn sid(s: &str) -> StepId {
        StepId::new(s).unwrap()
    }

    #[test]
    fn default_record_is_empty() {
        let record = ProgressRecord::default_record(fixed_now());
        assert_eq!(record.current_step_index(), 0);
        assert!(record.completed().is_empty());
        assert!(record.interactive().is_empty());
    }

    #[test]
    fn completion_is_idempotent() {
        let mut record = ProgressRecord::default_record(fixed_now());
        assert!(record.mark_completed(sid("s1")));
        assert!(!record.mark_completed(sid("s1")));
        assert_eq!(record.completed_count(), 1);
    }

    #[test]
    fn clamp_pulls_out_of_range_index_back() {
        let mut record = ProgressRecord::default_record(fixed_now());
        record.set_current_step_index(9);
        record.clamp_to(3);
        assert_eq!(record.current_step_index(), 2);

        record.set_current_step_index(1);
        record.clamp_to(3);
        assert_eq!(record.current_step_index(), 1);
    }

    #[test]
    fn interactive_key_format() {
        assert_eq!(
            ProgressRecord::interactive_key(&sid("making-connections"), 2),
            "making-connections-2"
        );
    }

    #[test]
    fn touch_updates_last_access() {
        let mut record = ProgressRecord::default_record(fixed_now());
        let later = fixed_now() + chrono::Duration::minutes(5);
        record.touch(later);
        assert_eq!(record.last_access(), later);
    }
}
