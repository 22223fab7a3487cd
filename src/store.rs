use crate::models::{AppState, CalendarEvent, Goal, StudySession, Subject, Task};

/// The closed set of state mutations. Add payloads carry a freshly generated
/// id (callers generate ids, the store never does); Update payloads replace
/// the whole record matching their id; Delete payloads name the id to remove.
/// `LoadState` wholesale-replaces the tree and is used once at startup to
/// hydrate from the persisted snapshot.
#[derive(Debug, Clone)]
pub enum Action {
    AddSubject(Subject),
    UpdateSubject(Subject),
    DeleteSubject(String),
    AddSession(StudySession),
    UpdateSession(StudySession),
    DeleteSession(String),
    AddGoal(Goal),
    UpdateGoal(Goal),
    DeleteGoal(String),
    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(String),
    AddEvent(CalendarEvent),
    UpdateEvent(CalendarEvent),
    DeleteEvent(String),
    LoadState(AppState),
}

/// What a dispatch did. Update/Delete on a missing id leave the state tree
/// untouched and report `NotFound` instead of silently pretending the change
/// was applied; callers decide whether that is worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    NotFound,
}

trait Identified {
    fn id(&self) -> &str;
}

macro_rules! impl_identified {
    ($($ty:ty),+) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

impl_identified!(Subject, StudySession, Goal, Task, CalendarEvent);

/// Owns the single state tree and applies actions deterministically. Every
/// applied dispatch produces a brand-new snapshot (the previous one is never
/// mutated in place), so observers can detect change by comparing snapshots
/// or by watching the revision counter.
pub struct Store {
    state: AppState,
    revision: u64,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Monotonic counter, bumped once per applied action. A `NotFound`
    /// dispatch does not bump it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        let mut next = self.state.clone();
        let outcome = match action {
            Action::AddSubject(subject) => add(&mut next.subjects, subject),
            Action::UpdateSubject(subject) => replace(&mut next.subjects, subject),
            Action::DeleteSubject(id) => remove(&mut next.subjects, &id),
            Action::AddSession(session) => add(&mut next.sessions, session),
            Action::UpdateSession(session) => replace(&mut next.sessions, session),
            Action::DeleteSession(id) => remove(&mut next.sessions, &id),
            Action::AddGoal(goal) => add(&mut next.goals, goal),
            Action::UpdateGoal(goal) => replace(&mut next.goals, goal),
            Action::DeleteGoal(id) => remove(&mut next.goals, &id),
            Action::AddTask(task) => add(&mut next.tasks, task),
            Action::UpdateTask(task) => replace(&mut next.tasks, task),
            Action::DeleteTask(id) => remove(&mut next.tasks, &id),
            Action::AddEvent(event) => add(&mut next.events, event),
            Action::UpdateEvent(event) => replace(&mut next.events, event),
            Action::DeleteEvent(id) => remove(&mut next.events, &id),
            Action::LoadState(state) => {
                next = state;
                DispatchOutcome::Applied
            }
        };

        if outcome == DispatchOutcome::Applied {
            self.state = next;
            self.revision += 1;
        }
        outcome
    }
}

fn add<T: Identified>(collection: &mut Vec<T>, item: T) -> DispatchOutcome {
    collection.push(item);
    DispatchOutcome::Applied
}

fn replace<T: Identified>(collection: &mut Vec<T>, item: T) -> DispatchOutcome {
    match collection.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            DispatchOutcome::Applied
        }
        None => DispatchOutcome::NotFound,
    }
}

fn remove<T: Identified>(collection: &mut Vec<T>, id: &str) -> DispatchOutcome {
    let before = collection.len();
    collection.retain(|existing| existing.id() != id);
    if collection.len() < before {
        DispatchOutcome::Applied
    } else {
        DispatchOutcome::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalType;

    fn session(id: &str, subject_id: &str, duration: u32) -> StudySession {
        StudySession {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            activity_type: "Reading".to_string(),
            duration,
            notes: String::new(),
            timestamp: "2024-01-08T10:00:00".to_string(),
        }
    }

    #[test]
    fn add_appends_to_collection() {
        let mut store = Store::new(AppState::empty());
        let outcome = store.dispatch(Action::AddSession(session("a", "1", 30)));
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(store.state().sessions.len(), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn update_replaces_whole_record() {
        let mut store = Store::new(AppState::empty());
        store.dispatch(Action::AddSession(session("a", "1", 30)));

        let mut edited = session("a", "2", 45);
        edited.notes = "revised".to_string();
        store.dispatch(Action::UpdateSession(edited));

        let stored = &store.state().sessions[0];
        assert_eq!(stored.subject_id, "2");
        assert_eq!(stored.duration, 45);
        assert_eq!(stored.notes, "revised");
    }

    #[test]
    fn update_missing_id_leaves_state_untouched() {
        let mut store = Store::new(AppState::empty());
        store.dispatch(Action::AddSession(session("a", "1", 30)));
        let before = store.state().clone();
        let revision = store.revision();

        let outcome = store.dispatch(Action::UpdateSession(session("ghost", "1", 99)));

        assert_eq!(outcome, DispatchOutcome::NotFound);
        assert_eq!(store.state(), &before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = Store::new(AppState::empty());
        store.dispatch(Action::AddSession(session("a", "1", 30)));
        store.dispatch(Action::AddSession(session("b", "1", 60)));

        let outcome = store.dispatch(Action::DeleteSession("a".to_string()));

        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(store.state().sessions.len(), 1);
        assert_eq!(store.state().sessions[0].id, "b");
    }

    #[test]
    fn delete_missing_id_is_not_found() {
        let mut store = Store::new(AppState::empty());
        let before = store.state().clone();

        let outcome = store.dispatch(Action::DeleteGoal("ghost".to_string()));

        assert_eq!(outcome, DispatchOutcome::NotFound);
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn load_state_replaces_whole_tree() {
        let mut store = Store::new(AppState::default());
        let mut snapshot = AppState::empty();
        snapshot.goals.push(Goal::new("read more".to_string(), GoalType::Weekly));

        store.dispatch(Action::LoadState(snapshot.clone()));

        assert_eq!(store.state(), &snapshot);
    }

    #[test]
    fn deleting_subject_keeps_referencing_task() {
        let mut store = Store::new(AppState::default());
        let subject_id = store.state().subjects[0].id.clone();
        store.dispatch(Action::AddTask(Task::new("revise".to_string(), subject_id.clone())));

        store.dispatch(Action::DeleteSubject(subject_id.clone()));

        // The task remains with a dangling reference; lookups resolve to a
        // placeholder instead of an error
        assert_eq!(store.state().tasks.len(), 1);
        assert_eq!(store.state().subject_name(&subject_id), "Unknown");
    }
}
