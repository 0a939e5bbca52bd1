use std::sync::Arc;

use tracing::warn;

use academy_core::model::{DecisionOption, Module, ProgressRecord, Step, StepId};
use academy_core::navigator::{ModuleNavigator, NavigatorState, Transition};
use academy_core::time::Clock;
use storage::repository::ProgressRepository;

use crate::error::SessionError;
use crate::evaluator;

//
// ─── COMPLETION HOOKS ──────────────────────────────────────────────────────────
//

type StepHook = Box<dyn FnMut(&StepId) + Send>;
type ModuleHook = Box<dyn FnMut() + Send>;

/// Callbacks the hosting page registers so it can update its own dashboards
/// and analytics without the session knowing about them.
#[derive(Default)]
pub struct CompletionHooks {
    on_step_complete: Option<StepHook>,
    on_module_complete: Option<ModuleHook>,
}

impl CompletionHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired at most once per step identifier per session.
    #[must_use]
    pub fn on_step_complete(mut self, hook: impl FnMut(&StepId) + Send + 'static) -> Self {
        self.on_step_complete = Some(Box::new(hook));
        self
    }

    /// Fired exactly once per session, on first entry into the summary.
    #[must_use]
    pub fn on_module_complete(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_module_complete = Some(Box::new(hook));
        self
    }
}

//
// ─── PROGRESS VIEW ─────────────────────────────────────────────────────────────
//

/// Aggregated view of module progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percent: u8,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One module-view session: the navigator plus its persistence discipline.
///
/// The progress record is loaded exactly once, when the session opens; every
/// mutation afterwards overwrites the full record with a fresh last-access
/// stamp. There is no cross-tab synchronization: two sessions over the same
/// module key diverge silently and the last writer wins.
pub struct ModuleSession {
    navigator: ModuleNavigator,
    repo: Arc<dyn ProgressRepository>,
    clock: Clock,
    hooks: CompletionHooks,
    module_complete_signaled: bool,
}

impl ModuleSession {
    /// Opens a session, loading (or implicitly creating) the module's
    /// progress record. The persisted index is clamped to the module's
    /// current step range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` only for backend failures; a missing
    /// or corrupt record loads as the default empty record instead.
    pub async fn open(
        module: Module,
        repo: Arc<dyn ProgressRepository>,
        clock: Clock,
        hooks: CompletionHooks,
    ) -> Result<Self, SessionError> {
        let record = repo.load(module.id(), clock.now()).await?;
        Ok(Self {
            navigator: ModuleNavigator::new(module, record),
            repo,
            clock,
            hooks,
            module_complete_signaled: false,
        })
    }

    #[must_use]
    pub fn module(&self) -> &Module {
        self.navigator.module()
    }

    #[must_use]
    pub fn state(&self) -> NavigatorState {
        self.navigator.state()
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.navigator.current_step()
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        self.navigator.record()
    }

    /// Returns a summary of the current module progress.
    #[must_use]
    pub fn progress(&self) -> ModuleProgress {
        let total = self.navigator.module().step_count();
        let completed = self
            .navigator
            .module()
            .steps()
            .iter()
            .filter(|step| self.navigator.record().is_completed(step.id()))
            .count();
        let percent = u8::try_from(completed * 100 / total).unwrap_or(100);
        ModuleProgress {
            total,
            completed,
            remaining: total - completed,
            percent,
            is_complete: completed == total,
        }
    }

    /// Marks the current step complete and moves forward, firing completion
    /// hooks and persisting the record.
    pub async fn advance(&mut self) -> Transition {
        let transition = self.navigator.advance();
        if let Some(step_id) = &transition.newly_completed
            && let Some(hook) = self.hooks.on_step_complete.as_mut()
        {
            hook(step_id);
        }
        if transition.entered_summary && !self.module_complete_signaled {
            self.module_complete_signaled = true;
            if let Some(hook) = self.hooks.on_module_complete.as_mut() {
                hook();
            }
        }
        self.persist_if_changed(&transition).await;
        transition
    }

    /// Moves back one step; no-op at the first step and from the summary.
    pub async fn retreat(&mut self) -> Transition {
        let transition = self.navigator.retreat();
        self.persist_if_changed(&transition).await;
        transition
    }

    /// Sidebar navigation straight to a step; out-of-range targets are
    /// ignored and nothing is marked complete.
    pub async fn jump_to(&mut self, target: usize) -> Transition {
        let transition = self.navigator.jump_to(target);
        self.persist_if_changed(&transition).await;
        transition
    }

    /// From the summary, re-enters the module at the first step.
    pub async fn review_from_summary(&mut self) -> Transition {
        let transition = self.navigator.review_from_summary();
        self.persist_if_changed(&transition).await;
        transition
    }

    /// Toggles a checklist item on the current step. Returns the new checked
    /// states, or an empty list when the step has no checklist.
    pub async fn toggle_checklist_item(&mut self, item_index: usize) -> Vec<bool> {
        let changed = {
            let (step, record) = self.navigator.current_step_and_record_mut();
            match step {
                Some(step) => evaluator::toggle_checklist_item(step, record, item_index),
                None => false,
            }
        };
        if changed {
            self.persist().await;
        }
        self.current_step()
            .map(|step| evaluator::checklist_state(step, self.navigator.record()))
            .unwrap_or_default()
    }

    /// Selects a decision-tree option on the current step, returning the
    /// chosen option for result display. Invalid selections return `None`.
    pub async fn select_decision_option(&mut self, option_index: usize) -> Option<DecisionOption> {
        let chosen = {
            let (step, record) = self.navigator.current_step_and_record_mut();
            step.and_then(|step| {
                evaluator::select_decision_option(step, record, option_index).cloned()
            })
        };
        if chosen.is_some() {
            self.persist().await;
        }
        chosen
    }

    /// Checked states for the current step's checklist.
    #[must_use]
    pub fn checklist_state(&self) -> Vec<bool> {
        self.current_step()
            .map(|step| evaluator::checklist_state(step, self.navigator.record()))
            .unwrap_or_default()
    }

    /// Last-selected decision option index on the current step, if any.
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.current_step()
            .and_then(|step| evaluator::selected_option(step, self.navigator.record()))
    }

    async fn persist_if_changed(&mut self, transition: &Transition) {
        if transition.changed {
            self.persist().await;
        }
    }

    // Full-record overwrite with a fresh last-access stamp. A failed save is
    // logged and navigation proceeds; progress tracking degrades rather than
    // blocking content access.
    async fn persist(&mut self) {
        let now = self.clock.now();
        self.navigator.record_mut().touch(now);
        let module_id = self.navigator.module().id().clone();
        if let Err(err) = self.repo.save(&module_id, self.navigator.record()).await {
            warn!(module = %module_id, %err, "failed to persist module progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::model::{Difficulty, Localized, ModuleId, StepKind};
    use academy_core::time::fixed_clock;
    use storage::repository::InMemoryProgressRepository;

    fn step(id: &str) -> Step {
        Step::new(
            StepId::new(id).unwrap(),
            Localized::english(id),
            StepKind::Tutorial,
            5,
            Localized::english("content"),
        )
    }

    fn module() -> Module {
        Module::new(
            ModuleId::new("business-networking").unwrap(),
            Localized::english("Business Networking"),
            Localized::english("desc"),
            Difficulty::Intermediate,
            Localized::english("Professional"),
            vec![],
            vec![step("s1"), step("s2"), step("s3")],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn progress_view_tracks_completion() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let mut session = ModuleSession::open(module(), repo, fixed_clock(), CompletionHooks::new())
            .await
            .unwrap();

        assert_eq!(session.progress().percent, 0);
        session.advance().await;
        let progress = session.progress();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.percent, 33);
        assert!(!progress.is_complete);

        session.advance().await;
        session.advance().await;
        let progress = session.progress();
        assert_eq!(progress.percent, 100);
        assert!(progress.is_complete);
    }

    #[tokio::test]
    async fn reopened_session_resumes_persisted_position() {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let mut session =
            ModuleSession::open(module(), Arc::clone(&repo) as _, fixed_clock(), CompletionHooks::new())
                .await
                .unwrap();
        session.advance().await;
        session.advance().await;
        drop(session);

        let resumed = ModuleSession::open(module(), repo, fixed_clock(), CompletionHooks::new())
            .await
            .unwrap();
        assert_eq!(resumed.state(), NavigatorState::Viewing(2));
        assert_eq!(resumed.record().completed_count(), 2);
    }
}
