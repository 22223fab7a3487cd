use chrono::{Datelike, Days, Local, Months, NaiveDate};
use ratatui::widgets::ListState;
use std::time::Instant;

use crate::models::{
    CalendarEvent, EventType, Goal, GoalType, Priority, StudySession, Subject, Task,
    clamp_progress,
};
use crate::store::{Action, DispatchOutcome};
use crate::tui::widgets::editor::Editor;
use crate::utils::{parse_date, parse_timestamp};
use crate::{Config, Storage, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Sessions,
    Goals,
    Tasks,
    Calendar,
}

impl Tab {
    pub const ORDER: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Sessions,
        Tab::Goals,
        Tab::Tasks,
        Tab::Calendar,
    ];

    pub fn index(&self) -> usize {
        Self::ORDER.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Sessions => "Sessions",
            Tab::Goals => "Goals",
            Tab::Tasks => "Tasks",
            Tab::Calendar => "Calendar",
        }
    }

    pub fn next(&self) -> Tab {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Tab {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    Create,
    SubjectModal,
}

#[derive(Debug, Clone)]
pub enum SelectedItem {
    Session(StudySession),
    Goal(Goal),
    Task(Task),
    Event(CalendarEvent),
}

// ---------------------------------------------------------------------------
// Forms

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Subject,
    Activity,
    Duration,
    Timestamp,
    Notes,
}

#[derive(Debug, Clone)]
pub struct SessionForm {
    pub current_field: SessionField,
    pub subject_index: usize,
    pub activity: Editor,
    pub duration: Editor,
    pub timestamp: Editor,
    pub notes: Editor,
    pub editing_id: Option<String>, // None for new items, Some(id) for editing
}

impl SessionForm {
    pub fn new() -> Self {
        let now = Local::now().format("%Y-%m-%d %H:%M").to_string();
        Self {
            current_field: SessionField::Subject,
            subject_index: 0,
            activity: Editor::from_string("Reading"),
            duration: Editor::from_string("30"),
            timestamp: Editor::from_string(&now),
            notes: Editor::new(),
            editing_id: None,
        }
    }

    pub fn edit(session: &StudySession, subjects: &[Subject]) -> Self {
        let subject_index = subjects
            .iter()
            .position(|s| s.id == session.subject_id)
            .unwrap_or(0);
        let timestamp = parse_timestamp(&session.timestamp)
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| session.timestamp.clone());
        Self {
            current_field: SessionField::Subject,
            subject_index,
            activity: Editor::from_string(&session.activity_type),
            duration: Editor::from_string(&session.duration.to_string()),
            timestamp: Editor::from_string(&timestamp),
            notes: Editor::from_string(&session.notes),
            editing_id: Some(session.id.clone()),
        }
    }

    pub fn build(&self, subjects: &[Subject]) -> Result<StudySession, String> {
        let subject = subjects
            .get(self.subject_index)
            .ok_or_else(|| "Pick a subject".to_string())?;
        let duration: u32 = self
            .duration
            .trimmed()
            .parse()
            .map_err(|_| "Duration must be a number of minutes".to_string())?;
        if duration == 0 {
            return Err("Duration must be positive".to_string());
        }
        let timestamp_raw = self.timestamp.trimmed();
        let timestamp = parse_timestamp(&timestamp_raw)
            .ok_or_else(|| "Date must be YYYY-MM-DD HH:MM".to_string())?
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        let activity = self.activity.trimmed();

        Ok(StudySession {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            subject_id: subject.id.clone(),
            activity_type: if activity.is_empty() { "Study".to_string() } else { activity },
            duration,
            notes: self.notes.to_string().trim().to_string(),
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Title,
    Type,
    Subject,
    TargetTime,
    TargetTasks,
    DueDate,
    Description,
}

#[derive(Debug, Clone)]
pub struct GoalForm {
    pub current_field: GoalField,
    pub title: Editor,
    pub type_index: usize, // into GoalType::ALL
    pub subject_index: usize,
    pub target_time: Editor,
    pub target_tasks: Editor,
    pub due_date: Editor,
    pub description: Editor,
    // Carried through edits so derived state survives a field change
    pub progress: u8,
    pub completed: bool,
    pub editing_id: Option<String>,
}

impl GoalForm {
    pub fn new() -> Self {
        Self {
            current_field: GoalField::Title,
            title: Editor::new(),
            type_index: 1, // weekly
            subject_index: 0,
            target_time: Editor::new(),
            target_tasks: Editor::new(),
            due_date: Editor::new(),
            description: Editor::new(),
            progress: 0,
            completed: false,
            editing_id: None,
        }
    }

    pub fn edit(goal: &Goal, subjects: &[Subject]) -> Self {
        let type_index = GoalType::ALL
            .iter()
            .position(|t| *t == goal.goal_type)
            .unwrap_or(0);
        let subject_index = goal
            .subject_id
            .as_deref()
            .and_then(|id| subjects.iter().position(|s| s.id == id))
            .unwrap_or(0);
        Self {
            current_field: GoalField::Title,
            title: Editor::from_string(&goal.title),
            type_index,
            subject_index,
            target_time: Editor::from_string(
                &goal.target_time.map(|t| t.to_string()).unwrap_or_default(),
            ),
            target_tasks: Editor::from_string(
                &goal.target_tasks.map(|t| t.to_string()).unwrap_or_default(),
            ),
            due_date: Editor::from_string(goal.due_date.as_deref().unwrap_or("")),
            description: Editor::from_string(&goal.description),
            progress: goal.progress,
            completed: goal.completed,
            editing_id: Some(goal.id.clone()),
        }
    }

    pub fn goal_type(&self) -> GoalType {
        GoalType::ALL[self.type_index % GoalType::ALL.len()]
    }

    pub fn build(&self, subjects: &[Subject]) -> Result<Goal, String> {
        let title = self.title.trimmed();
        if title.is_empty() {
            return Err("Title must not be empty".to_string());
        }
        let goal_type = self.goal_type();
        let subject_id = if goal_type == GoalType::Subject {
            let subject = subjects
                .get(self.subject_index)
                .ok_or_else(|| "Subject goals need a subject".to_string())?;
            Some(subject.id.clone())
        } else {
            None
        };
        let target_time = parse_optional_number(&self.target_time, "Target time")?;
        let target_tasks = parse_optional_number(&self.target_tasks, "Target tasks")?;
        if target_time.unwrap_or(0) == 0 && target_tasks.unwrap_or(0) == 0 {
            return Err("Set a positive target time or task count".to_string());
        }
        let due_raw = self.due_date.trimmed();
        let due_date = if due_raw.is_empty() {
            None
        } else {
            parse_date(&due_raw).map_err(|_| "Due date must be YYYY-MM-DD".to_string())?;
            Some(due_raw)
        };

        Ok(Goal {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title,
            description: self.description.to_string().trim().to_string(),
            goal_type,
            subject_id,
            target_time,
            target_tasks,
            due_date,
            progress: self.progress,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Subject,
    DueDate,
    Priority,
    EstimatedTime,
    Progress,
    Description,
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub title: Editor,
    pub subject_index: usize,
    pub due_date: Editor,
    pub priority_index: usize, // into Priority::ALL
    pub estimated_time: Editor,
    pub progress: Editor,
    pub description: Editor,
    pub completed: bool,
    pub editing_id: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        let today = Local::now().format("%Y-%m-%d").to_string();
        Self {
            current_field: TaskField::Title,
            title: Editor::new(),
            subject_index: 0,
            due_date: Editor::from_string(&today),
            priority_index: 1, // medium
            estimated_time: Editor::new(),
            progress: Editor::from_string("0"),
            description: Editor::new(),
            completed: false,
            editing_id: None,
        }
    }

    pub fn edit(task: &Task, subjects: &[Subject]) -> Self {
        let subject_index = subjects
            .iter()
            .position(|s| s.id == task.subject_id)
            .unwrap_or(0);
        let priority_index = Priority::ALL
            .iter()
            .position(|p| *p == task.priority)
            .unwrap_or(1);
        Self {
            current_field: TaskField::Title,
            title: Editor::from_string(&task.title),
            subject_index,
            due_date: Editor::from_string(&task.due_date),
            priority_index,
            estimated_time: Editor::from_string(
                &task.estimated_time.map(|t| t.to_string()).unwrap_or_default(),
            ),
            progress: Editor::from_string(&task.progress.to_string()),
            description: Editor::from_string(&task.description),
            completed: task.completed,
            editing_id: Some(task.id.clone()),
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::ALL[self.priority_index % Priority::ALL.len()]
    }

    pub fn build(&self, subjects: &[Subject]) -> Result<Task, String> {
        let title = self.title.trimmed();
        if title.is_empty() {
            return Err("Title must not be empty".to_string());
        }
        let subject = subjects
            .get(self.subject_index)
            .ok_or_else(|| "Pick a subject".to_string())?;
        let due_date = self.due_date.trimmed();
        parse_date(&due_date).map_err(|_| "Due date must be YYYY-MM-DD".to_string())?;
        let estimated_time = parse_optional_number(&self.estimated_time, "Estimated time")?;
        let progress_raw = self.progress.trimmed();
        let progress = if progress_raw.is_empty() {
            0
        } else {
            clamp_progress(
                progress_raw
                    .parse::<i64>()
                    .map_err(|_| "Progress must be a number".to_string())?,
            )
        };

        Ok(Task {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title,
            description: self.description.to_string().trim().to_string(),
            subject_id: subject.id.clone(),
            due_date,
            priority: self.priority(),
            estimated_time,
            progress,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    Type,
    Date,
    StartTime,
    EndTime,
    AllDay,
    Subject,
    Location,
    Description,
}

#[derive(Debug, Clone)]
pub struct EventForm {
    pub current_field: EventField,
    pub title: Editor,
    pub type_index: usize, // into EventType::ALL
    pub date: Editor,
    pub start_time: Editor,
    pub end_time: Editor,
    pub all_day: bool,
    pub subject_index: usize, // 0 = "[None]", 1+ = actual subjects
    pub location: Editor,
    pub description: Editor,
    pub editing_id: Option<String>,
}

impl EventForm {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            current_field: EventField::Title,
            title: Editor::new(),
            type_index: 2, // study
            date: Editor::from_string(&day.format("%Y-%m-%d").to_string()),
            start_time: Editor::from_string("09:00"),
            end_time: Editor::from_string("10:00"),
            all_day: false,
            subject_index: 0,
            location: Editor::new(),
            description: Editor::new(),
            editing_id: None,
        }
    }

    pub fn edit(event: &CalendarEvent, subjects: &[Subject]) -> Self {
        let type_index = EventType::ALL
            .iter()
            .position(|t| *t == event.event_type)
            .unwrap_or(3);
        let subject_index = event
            .subject_id
            .as_deref()
            .and_then(|id| subjects.iter().position(|s| s.id == id))
            .map(|i| i + 1)
            .unwrap_or(0);
        let (date, start_time) = match parse_timestamp(&event.start_time) {
            Some(at) => (
                at.format("%Y-%m-%d").to_string(),
                at.format("%H:%M").to_string(),
            ),
            None => (event.start_time.clone(), "09:00".to_string()),
        };
        let end_time = parse_timestamp(&event.end_time)
            .map(|at| at.format("%H:%M").to_string())
            .unwrap_or_else(|| "10:00".to_string());
        Self {
            current_field: EventField::Title,
            title: Editor::from_string(&event.title),
            type_index,
            date: Editor::from_string(&date),
            start_time: Editor::from_string(&start_time),
            end_time: Editor::from_string(&end_time),
            all_day: event.all_day,
            subject_index,
            location: Editor::from_string(event.location.as_deref().unwrap_or("")),
            description: Editor::from_string(event.description.as_deref().unwrap_or("")),
            editing_id: Some(event.id.clone()),
        }
    }

    pub fn event_type(&self) -> EventType {
        EventType::ALL[self.type_index % EventType::ALL.len()]
    }

    pub fn build(&self, subjects: &[Subject]) -> Result<CalendarEvent, String> {
        let title = self.title.trimmed();
        if title.is_empty() {
            return Err("Title must not be empty".to_string());
        }
        let date_raw = self.date.trimmed();
        let date =
            parse_date(&date_raw).map_err(|_| "Date must be YYYY-MM-DD".to_string())?;

        let (start_time, end_time) = if self.all_day {
            (
                date.format("%Y-%m-%dT00:00").to_string(),
                date.format("%Y-%m-%dT23:59").to_string(),
            )
        } else {
            let start = parse_clock_time(&self.start_time.trimmed())
                .ok_or_else(|| "Start time must be HH:MM".to_string())?;
            let end = parse_clock_time(&self.end_time.trimmed())
                .ok_or_else(|| "End time must be HH:MM".to_string())?;
            if end < start {
                return Err("End time must not be before start time".to_string());
            }
            (
                format!("{}T{}", date.format("%Y-%m-%d"), start.format("%H:%M")),
                format!("{}T{}", date.format("%Y-%m-%d"), end.format("%H:%M")),
            )
        };

        let subject_id = if self.subject_index == 0 {
            None
        } else {
            subjects
                .get(self.subject_index - 1)
                .map(|s| s.id.clone())
        };
        let location = self.location.trimmed();
        let description = self.description.to_string().trim().to_string();

        Ok(CalendarEvent {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title,
            description: if description.is_empty() { None } else { Some(description) },
            location: if location.is_empty() { None } else { Some(location) },
            start_time,
            end_time,
            event_type: self.event_type(),
            subject_id,
            all_day: self.all_day,
            custom_color: None,
        })
    }
}

fn parse_clock_time(raw: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

fn parse_optional_number(editor: &Editor, label: &str) -> Result<Option<u32>, String> {
    let raw = editor.trimmed();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| format!("{} must be a number", label))
}

#[derive(Debug, Clone)]
pub enum EntryForm {
    Session(SessionForm),
    Goal(GoalForm),
    Task(TaskForm),
    Event(EventForm),
}

// ---------------------------------------------------------------------------
// Subject management modal

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectModalMode {
    View,
    Add,
    Rename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectModalField {
    SubjectList,
    ActionsList,
}

/// Palette cycled through by the recolor action; mirrors the accents used
/// by the starter subjects
pub const SUBJECT_COLORS: [&str; 8] = [
    "#4F46E5", "#0D9488", "#E11D48", "#F59E0B", "#22C55E", "#0EA5E9", "#A855F7", "#64748B",
];

#[derive(Debug, Clone)]
pub struct SubjectModalState {
    pub mode: SubjectModalMode,
    pub selected_index: usize,
    pub actions_selected_index: usize, // 0 = Add, 1 = Rename, 2 = Recolor, 3 = Delete
    pub name_editor: Editor,
    pub list_state: ListState,
    pub current_field: SubjectModalField,
}

impl SubjectModalState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            mode: SubjectModalMode::View,
            selected_index: 0,
            actions_selected_index: 0,
            name_editor: Editor::new(),
            list_state,
            current_field: SubjectModalField::SubjectList,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state

/// How long a status message stays on screen
const STATUS_MESSAGE_SECS: u64 = 4;

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub store: Store,
    pub storage: Storage,

    // Navigation
    pub current_tab: Tab,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub selected_item: Option<SelectedItem>,
    pub detail_scroll: usize,

    // Calendar cursor
    pub selected_day: NaiveDate,

    // Modals and forms
    pub form: Option<EntryForm>,
    pub delete_confirmation: Option<SelectedItem>,
    pub delete_modal_selection: usize,
    pub subject_modal: Option<SubjectModalState>,

    // Transient status line
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, store: Store, storage: Storage) -> Self {
        let mut app = Self {
            config,
            store,
            storage,
            current_tab: Tab::Dashboard,
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            selected_item: None,
            detail_scroll: 0,
            selected_day: Local::now().date_naive(),
            form: None,
            delete_confirmation: None,
            delete_modal_selection: 0,
            subject_modal: None,
            status_message: None,
            status_message_time: None,
            should_quit: false,
        };
        app.sync_list_state();
        app.select_current_item();
        app
    }

    // -- derived lists ------------------------------------------------------

    /// Sessions, newest first; unparseable timestamps sort last
    pub fn sessions_sorted(&self) -> Vec<StudySession> {
        let mut sessions = self.store.state().sessions.clone();
        sessions.sort_by_key(|s| std::cmp::Reverse(parse_timestamp(&s.timestamp)));
        sessions
    }

    pub fn goals_list(&self) -> Vec<Goal> {
        self.store.state().goals.clone()
    }

    /// Tasks: open ones first, then by due date, then title
    pub fn tasks_sorted(&self) -> Vec<Task> {
        let mut tasks = self.store.state().tasks.clone();
        tasks.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| a.due_date.cmp(&b.due_date))
                .then_with(|| a.title.cmp(&b.title))
        });
        tasks
    }

    /// Events whose start date falls on the selected day, all-day first
    pub fn events_for_selected_day(&self) -> Vec<CalendarEvent> {
        let mut events = self.events_on(self.selected_day);
        events.sort_by(|a, b| {
            b.all_day
                .cmp(&a.all_day)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        events
    }

    pub fn events_on(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        self.store
            .state()
            .events
            .iter()
            .filter(|e| parse_timestamp(&e.start_time).map(|at| at.date_naive()) == Some(day))
            .cloned()
            .collect()
    }

    fn current_list_len(&self) -> usize {
        match self.current_tab {
            Tab::Dashboard => 0,
            Tab::Sessions => self.store.state().sessions.len(),
            Tab::Goals => self.store.state().goals.len(),
            Tab::Tasks => self.store.state().tasks.len(),
            Tab::Calendar => self.events_for_selected_day().len(),
        }
    }

    // -- navigation ---------------------------------------------------------

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            self.current_tab = tab;
            self.selected_index = 0;
            self.detail_scroll = 0;
            self.selected_item = None;
            self.sync_list_state();
            self.select_current_item();
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.sync_list_state();
            self.select_current_item();
        }
    }

    pub fn move_selection_down(&mut self) {
        let len = self.current_list_len();
        if len > 0 && self.selected_index + 1 < len {
            self.selected_index += 1;
            self.sync_list_state();
            self.select_current_item();
        }
    }

    /// Keep selected_index within bounds after the underlying list changed
    pub fn adjust_selected_index(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
        self.sync_list_state();
    }

    pub fn sync_list_state(&mut self) {
        if self.current_list_len() == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn select_current_item(&mut self) {
        self.detail_scroll = 0;
        self.selected_item = match self.current_tab {
            Tab::Dashboard => None,
            Tab::Sessions => self
                .sessions_sorted()
                .get(self.selected_index)
                .cloned()
                .map(SelectedItem::Session),
            Tab::Goals => self
                .goals_list()
                .get(self.selected_index)
                .cloned()
                .map(SelectedItem::Goal),
            Tab::Tasks => self
                .tasks_sorted()
                .get(self.selected_index)
                .cloned()
                .map(SelectedItem::Task),
            Tab::Calendar => self
                .events_for_selected_day()
                .get(self.selected_index)
                .cloned()
                .map(SelectedItem::Event),
        };
    }

    // -- calendar cursor ----------------------------------------------------

    pub fn calendar_step_day(&mut self, forward: bool) {
        let next = if forward {
            self.selected_day.checked_add_days(Days::new(1))
        } else {
            self.selected_day.checked_sub_days(Days::new(1))
        };
        if let Some(day) = next {
            self.selected_day = day;
            self.selected_index = 0;
            self.sync_list_state();
            self.select_current_item();
        }
    }

    pub fn calendar_step_month(&mut self, forward: bool) {
        let next = if forward {
            self.selected_day.checked_add_months(Months::new(1))
        } else {
            self.selected_day.checked_sub_months(Months::new(1))
        };
        if let Some(day) = next {
            self.selected_day = day;
            self.selected_index = 0;
            self.sync_list_state();
            self.select_current_item();
        }
    }

    pub fn calendar_jump_today(&mut self) {
        self.selected_day = Local::now().date_naive();
        self.selected_index = 0;
        self.sync_list_state();
        self.select_current_item();
    }

    /// First day of the month containing the calendar cursor
    pub fn visible_month(&self) -> NaiveDate {
        self.selected_day
            .with_day(1)
            .unwrap_or(self.selected_day)
    }

    // -- status line --------------------------------------------------------

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(at) = self.status_message_time {
            if at.elapsed().as_secs() >= STATUS_MESSAGE_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    // -- mutations ----------------------------------------------------------

    /// Dispatch an action and persist the new snapshot. A `NotFound` outcome
    /// (item vanished between selection and action) is reported on the
    /// status line instead of being silently dropped.
    pub fn dispatch_and_save(&mut self, action: Action) -> DispatchOutcome {
        let outcome = self.store.dispatch(action);
        match outcome {
            DispatchOutcome::Applied => {
                if let Err(e) = self.storage.save(self.store.state()) {
                    self.set_status(format!("Failed to save: {}", e));
                }
            }
            DispatchOutcome::NotFound => {
                self.set_status("Item no longer exists");
            }
        }
        self.adjust_selected_index();
        outcome
    }

    pub fn toggle_complete_selected(&mut self) {
        match self.selected_item.clone() {
            Some(SelectedItem::Task(mut task)) => {
                task.completed = !task.completed;
                if task.completed {
                    task.progress = 100;
                }
                self.dispatch_and_save(Action::UpdateTask(task));
                self.select_current_item();
            }
            Some(SelectedItem::Goal(mut goal)) => {
                goal.completed = !goal.completed;
                self.dispatch_and_save(Action::UpdateGoal(goal));
                self.select_current_item();
            }
            _ => {}
        }
    }

    // -- forms --------------------------------------------------------------

    pub fn open_create_form(&mut self) {
        let has_subjects = !self.store.state().subjects.is_empty();
        let form = match self.current_tab {
            Tab::Dashboard => None,
            Tab::Sessions => {
                if !has_subjects {
                    self.set_status("Create a subject first");
                    return;
                }
                Some(EntryForm::Session(SessionForm::new()))
            }
            Tab::Goals => Some(EntryForm::Goal(GoalForm::new())),
            Tab::Tasks => {
                if !has_subjects {
                    self.set_status("Create a subject first");
                    return;
                }
                Some(EntryForm::Task(TaskForm::new()))
            }
            Tab::Calendar => Some(EntryForm::Event(EventForm::new(self.selected_day))),
        };
        if let Some(form) = form {
            self.form = Some(form);
            self.mode = Mode::Create;
        }
    }

    pub fn open_edit_form(&mut self) {
        let subjects = &self.store.state().subjects;
        let form = match &self.selected_item {
            Some(SelectedItem::Session(session)) => {
                Some(EntryForm::Session(SessionForm::edit(session, subjects)))
            }
            Some(SelectedItem::Goal(goal)) => Some(EntryForm::Goal(GoalForm::edit(goal, subjects))),
            Some(SelectedItem::Task(task)) => Some(EntryForm::Task(TaskForm::edit(task, subjects))),
            Some(SelectedItem::Event(event)) => {
                Some(EntryForm::Event(EventForm::edit(event, subjects)))
            }
            None => None,
        };
        if let Some(form) = form {
            self.form = Some(form);
            self.mode = Mode::Create;
        }
    }

    /// Validate the open form and dispatch the resulting add/update
    pub fn save_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let subjects = self.store.state().subjects.clone();

        let result: Result<(Action, &'static str), String> = match &form {
            EntryForm::Session(f) => f.build(&subjects).map(|session| {
                if f.editing_id.is_some() {
                    (Action::UpdateSession(session), "Session updated")
                } else {
                    (Action::AddSession(session), "Session logged")
                }
            }),
            EntryForm::Goal(f) => f.build(&subjects).map(|goal| {
                if f.editing_id.is_some() {
                    (Action::UpdateGoal(goal), "Goal updated")
                } else {
                    (Action::AddGoal(goal), "Goal created")
                }
            }),
            EntryForm::Task(f) => f.build(&subjects).map(|task| {
                if f.editing_id.is_some() {
                    (Action::UpdateTask(task), "Task updated")
                } else {
                    (Action::AddTask(task), "Task created")
                }
            }),
            EntryForm::Event(f) => f.build(&subjects).map(|event| {
                if f.editing_id.is_some() {
                    (Action::UpdateEvent(event), "Event updated")
                } else {
                    (Action::AddEvent(event), "Event created")
                }
            }),
        };

        match result {
            Ok((action, message)) => {
                if self.dispatch_and_save(action) == DispatchOutcome::Applied {
                    self.set_status(message);
                }
                self.form = None;
                self.mode = Mode::View;
                self.select_current_item();
            }
            Err(message) => self.set_status(message),
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = Mode::View;
    }

    // -- deletion -----------------------------------------------------------

    pub fn request_delete_selected(&mut self) {
        if let Some(item) = self.selected_item.clone() {
            self.delete_confirmation = Some(item);
            self.delete_modal_selection = 0;
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(item) = self.delete_confirmation.take() else {
            return;
        };
        let action = match item {
            SelectedItem::Session(session) => Action::DeleteSession(session.id),
            SelectedItem::Goal(goal) => Action::DeleteGoal(goal.id),
            SelectedItem::Task(task) => Action::DeleteTask(task.id),
            SelectedItem::Event(event) => Action::DeleteEvent(event.id),
        };
        if self.dispatch_and_save(action) == DispatchOutcome::Applied {
            self.set_status("Deleted");
        }
        self.select_current_item();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = None;
        self.delete_modal_selection = 0;
    }
}
