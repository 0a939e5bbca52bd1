use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use academy_core::model::{
    Difficulty, InteractiveElement, Localized, Module, ModuleId, ProgressRecord, Step, StepId,
    StepKind,
};
use academy_core::navigator::NavigatorState;
use academy_core::time::{fixed_clock, fixed_now};
use services::{CompletionHooks, ModuleSession};
use storage::repository::{InMemoryProgressRepository, ProgressRepository};

fn sid(s: &str) -> StepId {
    StepId::new(s).unwrap()
}

fn step(id: &str, kind: StepKind) -> Step {
    Step::new(
        sid(id),
        Localized::english(id),
        kind,
        5,
        Localized::english("content"),
    )
}

fn build_module() -> Module {
    Module::new(
        ModuleId::new("business-networking").unwrap(),
        Localized::new("Business Networking", "Networking Empresarial"),
        Localized::english("desc"),
        Difficulty::Intermediate,
        Localized::new("Professional", "Profissional"),
        vec![],
        vec![
            step("s1", StepKind::Introduction),
            step("s2", StepKind::Checklist).with_interactive(InteractiveElement::Checklist {
                items: vec![
                    Localized::english("Prepare your story"),
                    Localized::english("Research leaders"),
                ],
            }),
            step("s3", StepKind::Summary),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn module_completion_fires_hooks_exactly_once() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let step_fires = Arc::new(AtomicUsize::new(0));
    let module_fires = Arc::new(AtomicUsize::new(0));

    let hooks = CompletionHooks::new()
        .on_step_complete({
            let fires = Arc::clone(&step_fires);
            move |_| {
                fires.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_module_complete({
            let fires = Arc::clone(&module_fires);
            move || {
                fires.fetch_add(1, Ordering::SeqCst);
            }
        });

    let mut session = ModuleSession::open(build_module(), repo, fixed_clock(), hooks)
        .await
        .unwrap();

    // Advance, jump back, re-advance over the already-complete step; then run
    // to the summary and try to advance past it.
    session.advance().await;
    session.jump_to(0).await;
    session.advance().await;
    session.advance().await;
    session.advance().await;
    session.advance().await;

    assert_eq!(session.state(), NavigatorState::Summary);
    assert_eq!(step_fires.load(Ordering::SeqCst), 3, "one fire per step id");
    assert_eq!(module_fires.load(Ordering::SeqCst), 1);

    // Reviewing and completing the last step again must not re-fire.
    session.review_from_summary().await;
    session.jump_to(2).await;
    session.advance().await;
    assert_eq!(session.state(), NavigatorState::Summary);
    assert_eq!(step_fires.load(Ordering::SeqCst), 3);
    assert_eq!(module_fires.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_mutation_is_persisted() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let module = build_module();
    let module_id = module.id().clone();

    let mut session = ModuleSession::open(
        module,
        Arc::clone(&repo) as _,
        fixed_clock(),
        CompletionHooks::new(),
    )
    .await
    .unwrap();

    session.advance().await;
    let stored = repo.load(&module_id, fixed_now()).await.unwrap();
    assert_eq!(stored.current_step_index(), 1);
    assert!(stored.is_completed(&sid("s1")));

    session.toggle_checklist_item(1).await;
    let stored = repo.load(&module_id, fixed_now()).await.unwrap();
    assert_eq!(stored.interactive_value("s2-1"), Some(true));

    session.retreat().await;
    let stored = repo.load(&module_id, fixed_now()).await.unwrap();
    assert_eq!(stored.current_step_index(), 0);
}

#[tokio::test]
async fn noop_navigation_does_not_rewrite_the_record() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let mut session = ModuleSession::open(
        build_module(),
        Arc::clone(&repo) as _,
        fixed_clock(),
        CompletionHooks::new(),
    )
    .await
    .unwrap();

    let t = session.retreat().await;
    assert!(!t.changed);
    let t = session.jump_to(99).await;
    assert!(!t.changed);

    // Nothing was ever saved, so a fresh load still yields the default.
    let stored = repo
        .load(&ModuleId::new("business-networking").unwrap(), fixed_now())
        .await
        .unwrap();
    assert_eq!(stored, ProgressRecord::default_record(fixed_now()));
}

#[tokio::test]
async fn corrupt_stored_progress_opens_as_fresh_session() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    repo.insert_raw(
        &ModuleId::new("business-networking").unwrap(),
        "{not even json",
    )
    .unwrap();

    let session = ModuleSession::open(
        build_module(),
        Arc::clone(&repo) as _,
        fixed_clock(),
        CompletionHooks::new(),
    )
    .await
    .unwrap();

    assert_eq!(session.state(), NavigatorState::Viewing(0));
    assert!(session.record().completed().is_empty());
}

#[tokio::test]
async fn persisted_index_beyond_module_is_clamped_on_open() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    repo.insert_raw(
        &ModuleId::new("business-networking").unwrap(),
        "{\"currentStepIndex\": 12, \"completedSteps\": [\"s1\"]}",
    )
    .unwrap();

    let session = ModuleSession::open(
        build_module(),
        Arc::clone(&repo) as _,
        fixed_clock(),
        CompletionHooks::new(),
    )
    .await
    .unwrap();

    assert_eq!(session.state(), NavigatorState::Viewing(2));
    assert!(session.record().is_completed(&sid("s1")));
}

#[tokio::test]
async fn checklist_is_not_a_gate_on_advancement() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let mut session = ModuleSession::open(
        build_module(),
        repo,
        fixed_clock(),
        CompletionHooks::new(),
    )
    .await
    .unwrap();

    session.jump_to(1).await;
    assert_eq!(session.checklist_state(), vec![false, false]);

    // Next without checking any boxes still completes the step.
    let t = session.advance().await;
    assert_eq!(t.newly_completed, Some(sid("s2")));
    assert_eq!(session.state(), NavigatorState::Viewing(2));
}
