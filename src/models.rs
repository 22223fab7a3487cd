use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named study category. Sessions, goals, tasks and events reference
/// subjects by id; a deleted subject leaves those references dangling and
/// consumers resolve them to an "Unknown" placeholder at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: String, // display accent: #RRGGBB or a named terminal color
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    pub activity_type: String,
    pub duration: u32, // in minutes
    pub notes: String,
    pub timestamp: String, // ISO 8601: YYYY-MM-DDTHH:MM:SS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Daily,
    Weekly,
    Subject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub subject_id: Option<String>, // set when goal_type is Subject
    pub target_time: Option<u32>,   // in minutes
    pub target_tasks: Option<u32>,
    pub due_date: Option<String>, // ISO 8601: YYYY-MM-DD
    pub progress: u8,             // 0-100
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject_id: String,
    pub due_date: String, // ISO 8601: YYYY-MM-DD
    pub priority: Priority,
    pub estimated_time: Option<u32>, // in minutes
    pub progress: u8,                // 0-100
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Exam,
    Assignment,
    Study,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: String, // ISO 8601: YYYY-MM-DDTHH:MM
    pub end_time: String,
    pub event_type: EventType,
    pub subject_id: Option<String>,
    pub all_day: bool,
    pub custom_color: Option<String>,
}

/// The whole state tree. Collections preserve insertion order; any ordering
/// shown to the user is applied explicitly at the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub sessions: Vec<StudySession>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

impl Default for AppState {
    fn default() -> Self {
        // Starter subjects for a fresh install
        let subjects = vec![
            Subject::with_id("1", "Mathematics", "#4F46E5"),
            Subject::with_id("2", "Science", "#0D9488"),
            Subject::with_id("3", "History", "#E11D48"),
            Subject::with_id("4", "Literature", "#F59E0B"),
            Subject::with_id("5", "Computer Science", "#22C55E"),
        ];
        Self {
            subjects,
            sessions: Vec::new(),
            goals: Vec::new(),
            tasks: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl AppState {
    /// Empty state with no starter subjects
    pub fn empty() -> Self {
        Self {
            subjects: Vec::new(),
            sessions: Vec::new(),
            goals: Vec::new(),
            tasks: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Display name for a subject id, falling back to "Unknown" when the
    /// subject has been deleted
    pub fn subject_name(&self, id: &str) -> &str {
        self.subject(id).map(|s| s.name.as_str()).unwrap_or("Unknown")
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Clamp a parsed progress value into the 0-100 range
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

impl Subject {
    pub fn new(name: String, color: String) -> Self {
        Self {
            id: new_id(),
            name,
            color,
        }
    }

    fn with_id(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

impl StudySession {
    pub fn new(subject_id: String, duration: u32) -> Self {
        let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        Self {
            id: new_id(),
            subject_id,
            activity_type: "Reading".to_string(),
            duration,
            notes: String::new(),
            timestamp: now,
        }
    }
}

impl Goal {
    pub fn new(title: String, goal_type: GoalType) -> Self {
        Self {
            id: new_id(),
            title,
            description: String::new(),
            goal_type,
            subject_id: None,
            target_time: None,
            target_tasks: None,
            due_date: None,
            progress: 0,
            completed: false,
        }
    }

    /// Progress to show in lists and detail views. Completed goals always
    /// read as 100 regardless of the stored value.
    pub fn display_progress(&self) -> u8 {
        if self.completed { 100 } else { self.progress }
    }
}

impl Task {
    pub fn new(title: String, subject_id: String) -> Self {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        Self {
            id: new_id(),
            title,
            description: String::new(),
            subject_id,
            due_date: today,
            priority: Priority::Medium,
            estimated_time: None,
            progress: 0,
            completed: false,
        }
    }

    pub fn display_progress(&self) -> u8 {
        if self.completed { 100 } else { self.progress }
    }
}

impl CalendarEvent {
    pub fn new(title: String, start_time: String, end_time: String) -> Self {
        Self {
            id: new_id(),
            title,
            description: None,
            location: None,
            start_time,
            end_time,
            event_type: EventType::Study,
            subject_id: None,
            all_day: false,
            custom_color: None,
        }
    }
}

impl GoalType {
    pub const ALL: [GoalType; 3] = [GoalType::Daily, GoalType::Weekly, GoalType::Subject];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Daily => "daily",
            GoalType::Weekly => "weekly",
            GoalType::Subject => "subject",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(GoalType::Daily),
            "weekly" => Ok(GoalType::Weekly),
            "subject" => Ok(GoalType::Subject),
            other => Err(format!("Unknown goal type: {}", other)),
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Marker shown in task lists
    pub fn marker(&self) -> &'static str {
        match self {
            Priority::Low => "·",
            Priority::Medium => "!",
            Priority::High => "‼",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Exam,
        EventType::Assignment,
        EventType::Study,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Exam => "exam",
            EventType::Assignment => "assignment",
            EventType::Study => "study",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exam" => Ok(EventType::Exam),
            "assignment" => Ok(EventType::Assignment),
            "study" => Ok(EventType::Study),
            "other" => Ok(EventType::Other),
            other => Err(format!("Unknown event type: {}", other)),
        }
    }
}
