use crate::model::{Module, ProgressRecord, Step, StepId};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Navigation state of a module: either viewing one step of the ordered
/// sequence, or the terminal summary screen entered after the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Viewing(usize),
    Summary,
}

/// Outcome of one navigation call, consumed by the hosting layer.
///
/// The navigator performs no I/O and invokes no callbacks itself; it reports
/// what happened so the caller can persist the record and fire completion
/// hooks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Step that moved from not-complete to complete during this call.
    /// `None` when the step was already complete (idempotent re-advance) or
    /// when the call did not mark anything.
    pub newly_completed: Option<StepId>,
    /// True when this call moved the navigator into `Summary`.
    pub entered_summary: bool,
    /// True when the call changed state or record and a save is warranted.
    pub changed: bool,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }
}

//
// ─── NAVIGATOR ─────────────────────────────────────────────────────────────────
//

/// State machine governing movement through a module's ordered steps.
///
/// Owns the module definition and the live progress record. Completion is
/// monotonic: nothing here ever removes an entry from the completed set, and
/// `jump_to` never marks anything complete as a side effect.
#[derive(Debug, Clone)]
pub struct ModuleNavigator {
    module: Module,
    record: ProgressRecord,
    state: NavigatorState,
}

impl ModuleNavigator {
    /// Starts navigation from a (possibly rehydrated) progress record.
    ///
    /// The record's index is clamped to the module's step range, so a record
    /// persisted against an older, longer revision of the module still lands
    /// on a valid step.
    #[must_use]
    pub fn new(module: Module, mut record: ProgressRecord) -> Self {
        record.clamp_to(module.step_count());
        let state = NavigatorState::Viewing(record.current_step_index());
        Self {
            module,
            record,
            state,
        }
    }

    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    #[must_use]
    pub fn record_mut(&mut self) -> &mut ProgressRecord {
        &mut self.record
    }

    #[must_use]
    pub fn state(&self) -> NavigatorState {
        self.state
    }

    /// The step currently being viewed; `None` from `Summary`.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        match self.state {
            NavigatorState::Viewing(i) => self.module.step(i),
            NavigatorState::Summary => None,
        }
    }

    /// Split borrow of the current step and the mutable record, for
    /// interactive sub-state updates scoped to the viewed step.
    #[must_use]
    pub fn current_step_and_record_mut(&mut self) -> (Option<&Step>, &mut ProgressRecord) {
        let step = match self.state {
            NavigatorState::Viewing(i) => self.module.step(i),
            NavigatorState::Summary => None,
        };
        (step, &mut self.record)
    }

    /// True once every step in the module has been completed.
    #[must_use]
    pub fn all_steps_completed(&self) -> bool {
        self.module
            .steps()
            .iter()
            .all(|step| self.record.is_completed(step.id()))
    }

    /// Marks the current step complete (idempotently) and moves forward:
    /// to the next step, or into `Summary` from the last step.
    ///
    /// No-op from `Summary`.
    pub fn advance(&mut self) -> Transition {
        let NavigatorState::Viewing(index) = self.state else {
            return Transition::none();
        };
        let Some(step) = self.module.step(index) else {
            return Transition::none();
        };

        let step_id = step.id().clone();
        let newly_completed = self
            .record
            .mark_completed(step_id.clone())
            .then_some(step_id);

        let last_index = self.module.step_count() - 1;
        let entered_summary = index == last_index;
        if entered_summary {
            self.state = NavigatorState::Summary;
        } else {
            self.state = NavigatorState::Viewing(index + 1);
            self.record.set_current_step_index(index + 1);
        }

        Transition {
            newly_completed,
            entered_summary,
            changed: true,
        }
    }

    /// Moves back one step. No-op at the first step and from `Summary`.
    pub fn retreat(&mut self) -> Transition {
        match self.state {
            NavigatorState::Viewing(index) if index > 0 => {
                self.state = NavigatorState::Viewing(index - 1);
                self.record.set_current_step_index(index - 1);
                Transition {
                    changed: true,
                    ..Transition::default()
                }
            }
            _ => Transition::none(),
        }
    }

    /// Jumps directly to step `target` (sidebar navigation). Exits `Summary`
    /// if currently there. Out-of-range targets are silently ignored, and
    /// the completed set is never touched.
    pub fn jump_to(&mut self, target: usize) -> Transition {
        if target >= self.module.step_count() {
            return Transition::none();
        }
        if self.state == NavigatorState::Viewing(target) {
            return Transition::none();
        }
        self.state = NavigatorState::Viewing(target);
        self.record.set_current_step_index(target);
        Transition {
            changed: true,
            ..Transition::default()
        }
    }

    /// From `Summary`, re-enters the module at the first step without
    /// clearing any completion records. No-op while viewing a step.
    ///
    /// Review restarts at the first step; the last-viewed step stays
    /// reachable through `jump_to`.
    pub fn review_from_summary(&mut self) -> Transition {
        if self.state != NavigatorState::Summary {
            return Transition::none();
        }
        self.state = NavigatorState::Viewing(0);
        self.record.set_current_step_index(0);
        Transition {
            changed: true,
            ..Transition::default()
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
