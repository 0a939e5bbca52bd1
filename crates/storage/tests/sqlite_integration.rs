use academy_core::model::{ModuleId, ProgressRecord, StepId};
use academy_core::time::fixed_now;
use storage::repository::ProgressRepository;
use storage::sqlite::SqliteRepository;

fn mid(s: &str) -> ModuleId {
    ModuleId::new(s).unwrap()
}

fn sid(s: &str) -> StepId {
    StepId::new(s).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let module = mid("business-networking");
    let mut record = ProgressRecord::default_record(fixed_now());
    record.mark_completed(sid("introduction-portuguese-business"));
    record.mark_completed(sid("making-connections"));
    record.set_current_step_index(2);
    record.set_interactive("making-connections-0".into(), true);
    record.set_interactive("making-connections-1".into(), false);

    repo.save(&module, &record).await.unwrap();
    let loaded = repo.load(&module, fixed_now()).await.unwrap();

    assert_eq!(loaded.completed(), record.completed());
    assert_eq!(loaded.current_step_index(), 2);
    assert_eq!(loaded.interactive_value("making-connections-0"), Some(true));
    assert_eq!(loaded.interactive_value("making-connections-1"), Some(false));
}

#[tokio::test]
async fn sqlite_missing_module_loads_default() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let record = repo.load(&mid("never-opened"), fixed_now()).await.unwrap();
    assert_eq!(record, ProgressRecord::default_record(fixed_now()));
}

#[tokio::test]
async fn sqlite_corrupt_blob_degrades_to_default() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    // Truncated JSON planted directly under the module's storage key.
    sqlx::query(
        "INSERT INTO academy_progress (storage_key, blob, last_access) VALUES (?1, ?2, ?3)",
    )
    .bind("lusotown-academy-broken-module-progress")
    .bind("{\"completedSteps\": [\"s1\"")
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let record = repo.load(&mid("broken-module"), fixed_now()).await.unwrap();
    assert_eq!(record.current_step_index(), 0);
    assert!(record.completed().is_empty());
    assert!(record.interactive().is_empty());
}

#[tokio::test]
async fn sqlite_save_overwrites_previous_record() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let module = mid("cultural-events");

    let mut first = ProgressRecord::default_record(fixed_now());
    first.mark_completed(sid("s1"));
    repo.save(&module, &first).await.unwrap();

    let mut second = first.clone();
    second.mark_completed(sid("s2"));
    second.set_current_step_index(1);
    second.touch(fixed_now() + chrono::Duration::minutes(1));
    repo.save(&module, &second).await.unwrap();

    let loaded = repo.load(&module, fixed_now()).await.unwrap();
    assert_eq!(loaded.completed_count(), 2);
    assert_eq!(loaded.current_step_index(), 1);
}

#[tokio::test]
async fn sqlite_namespace_separates_keys() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_ns?mode=memory&cache=shared")
        .await
        .expect("connect")
        .with_namespace("staging");
    repo.migrate().await.expect("migrate");

    let module = mid("m");
    let mut record = ProgressRecord::default_record(fixed_now());
    record.mark_completed(sid("s1"));
    repo.save(&module, &record).await.unwrap();

    let row = sqlx::query("SELECT storage_key FROM academy_progress")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    let key: String = sqlx::Row::try_get(&row, "storage_key").unwrap();
    assert_eq!(key, "staging-academy-m-progress");
}
