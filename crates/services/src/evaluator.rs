//! Interactive element evaluator: checklist toggles and decision-tree
//! selections, recorded in the shared progress blob.
//!
//! All operations are pure over `(&Step, &mut ProgressRecord)`; persistence
//! is the session's job. Malformed or missing interactive configuration is
//! never an error — the affected sub-element simply does nothing, mirroring
//! the render-nothing rule of the hosting page.

use academy_core::model::{DecisionOption, InteractiveElement, ProgressRecord, Step};

/// Flips the checked state of one checklist item. Returns `true` if the
/// record changed.
///
/// No-op (returns `false`) when the step has no checklist or the index is out
/// of range. Checking every box is NOT required for step advancement; the
/// navigator enforces no validation gate here.
pub fn toggle_checklist_item(
    step: &Step,
    record: &mut ProgressRecord,
    item_index: usize,
) -> bool {
    let Some(InteractiveElement::Checklist { items }) = step.interactive() else {
        return false;
    };
    if item_index >= items.len() {
        return false;
    }

    let key = ProgressRecord::interactive_key(step.id(), item_index);
    let checked = record.interactive_value(&key).unwrap_or(false);
    record.set_interactive(key, !checked);
    true
}

/// Current checked states for a checklist step, in item order. Empty for
/// steps without a checklist.
#[must_use]
pub fn checklist_state(step: &Step, record: &ProgressRecord) -> Vec<bool> {
    let Some(InteractiveElement::Checklist { items }) = step.interactive() else {
        return Vec::new();
    };
    (0..items.len())
        .map(|i| {
            record
                .interactive_value(&ProgressRecord::interactive_key(step.id(), i))
                .unwrap_or(false)
        })
        .collect()
}

/// Records a decision-tree selection and returns the chosen option so the
/// caller can display its result text.
///
/// Only one option is selected at a time: choosing an option clears any
/// previous selection for the step. Invalid indexes and steps without a
/// decision tree return `None` without touching the record.
pub fn select_decision_option<'a>(
    step: &'a Step,
    record: &mut ProgressRecord,
    option_index: usize,
) -> Option<&'a DecisionOption> {
    let Some(InteractiveElement::DecisionTree { options, .. }) = step.interactive() else {
        return None;
    };
    let option = options.get(option_index)?;

    for i in 0..options.len() {
        record.remove_interactive(&ProgressRecord::interactive_key(step.id(), i));
    }
    record.set_interactive(
        ProgressRecord::interactive_key(step.id(), option_index),
        true,
    );
    Some(option)
}

/// Index of the option last selected for display, if any.
#[must_use]
pub fn selected_option(step: &Step, record: &ProgressRecord) -> Option<usize> {
    let Some(InteractiveElement::DecisionTree { options, .. }) = step.interactive() else {
        return None;
    };
    (0..options.len()).find(|&i| {
        record
            .interactive_value(&ProgressRecord::interactive_key(step.id(), i))
            .unwrap_or(false)
    })
}
