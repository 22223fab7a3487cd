use sgt::models::{AppState, GoalType, Priority, StudySession};
use sgt::{Action, DispatchOutcome, Goal, Storage, Store, Subject, Task};

fn session(id: &str, subject_id: &str, duration: u32, timestamp: &str) -> StudySession {
    StudySession {
        id: id.to_string(),
        subject_id: subject_id.to_string(),
        activity_type: "Reading".to_string(),
        duration,
        notes: String::new(),
        timestamp: timestamp.to_string(),
    }
}

#[test]
fn snapshot_roundtrip_through_storage() {
    let storage = Storage::open_in_memory().unwrap();
    let mut store = Store::new(storage.load());

    store.dispatch(Action::AddSession(session("a", "1", 45, "2024-01-08T10:00:00")));
    store.dispatch(Action::AddTask(Task::new("revise algebra".to_string(), "1".to_string())));
    storage.save(store.state()).unwrap();

    let reloaded = storage.load();
    assert_eq!(&reloaded, store.state());
}

#[test]
fn missing_snapshot_falls_back_to_default_state() {
    let storage = Storage::open_in_memory().unwrap();
    let state = storage.load();

    assert_eq!(state, AppState::default());
    assert_eq!(state.subjects.len(), 5);
    assert!(state.sessions.is_empty());
}

#[test]
fn malformed_snapshot_falls_back_to_default_state() {
    let storage = Storage::open_in_memory().unwrap();
    storage.save_raw("{not valid json!").unwrap();

    let state = storage.load();

    assert_eq!(state, AppState::default());
}

#[test]
fn snapshot_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");
    let path_str = path.to_str().unwrap();

    {
        let storage = Storage::open(path_str).unwrap();
        let mut store = Store::new(storage.load());
        store.dispatch(Action::AddGoal(Goal::new("weekly hours".to_string(), GoalType::Weekly)));
        storage.save(store.state()).unwrap();
    }

    let storage = Storage::open(path_str).unwrap();
    let state = storage.load();
    assert_eq!(state.goals.len(), 1);
    assert_eq!(state.goals[0].title, "weekly hours");
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("planner.db");

    let storage = Storage::open(path.to_str().unwrap()).unwrap();
    storage.save(&AppState::default()).unwrap();

    assert!(path.exists());
}

#[test]
fn every_applied_dispatch_yields_a_persistable_snapshot() {
    let storage = Storage::open_in_memory().unwrap();
    let mut store = Store::new(AppState::default());

    let subject = Subject::new("Biology".to_string(), "#22C55E".to_string());
    let subject_id = subject.id.clone();

    let actions = vec![
        Action::AddSubject(subject),
        Action::AddSession(session("s1", &subject_id, 30, "2024-03-04T09:00:00")),
        Action::DeleteSession("s1".to_string()),
    ];

    for action in actions {
        assert_eq!(store.dispatch(action), DispatchOutcome::Applied);
        storage.save(store.state()).unwrap();
        assert_eq!(&storage.load(), store.state());
    }
}

#[test]
fn update_with_unknown_id_keeps_state_identical() {
    let mut store = Store::new(AppState::default());
    store.dispatch(Action::AddTask(Task {
        priority: Priority::High,
        ..Task::new("write essay".to_string(), "4".to_string())
    }));
    let before = store.state().clone();

    let ghost = Task::new("ghost".to_string(), "4".to_string());
    let outcome = store.dispatch(Action::UpdateTask(ghost));

    assert_eq!(outcome, DispatchOutcome::NotFound);
    assert_eq!(store.state(), &before);
}

#[test]
fn load_state_action_replaces_everything() {
    let mut store = Store::new(AppState::default());
    store.dispatch(Action::AddTask(Task::new("old".to_string(), "1".to_string())));

    let mut snapshot = AppState::empty();
    snapshot
        .sessions
        .push(session("s1", "1", 60, "2024-01-08T10:00:00"));
    store.dispatch(Action::LoadState(snapshot.clone()));

    assert_eq!(store.state(), &snapshot);
    assert!(store.state().tasks.is_empty());
}
