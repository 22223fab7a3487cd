//! Derived statistics over the state tree's collections.
//!
//! Every function here is pure and recomputed on each read: same inputs,
//! same outputs, no caching and no side effects. Nothing in this module
//! returns an error or panics. Empty or malformed inputs degrade to zeros,
//! empty lists and placeholder labels.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate};

use crate::models::{Goal, GoalType, StudySession, Subject, Task};
use crate::utils::{parse_date, parse_timestamp};

/// Label and accent used when a session references a deleted subject
pub const UNKNOWN_SUBJECT: &str = "Unknown";
pub const UNKNOWN_SUBJECT_COLOR: &str = "#CBD5E1";

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectTime {
    pub subject: String,
    pub minutes: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayTime {
    pub day: &'static str,
    pub minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalTypeSummary {
    pub goal_type: GoalType,
    pub total: usize,
    pub completed: usize,
}

impl GoalTypeSummary {
    pub fn completion_rate(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
        }
    }
}

/// Total study time in minutes
pub fn total_study_time(sessions: &[StudySession]) -> u32 {
    sessions
        .iter()
        .fold(0u32, |total, session| total.saturating_add(session.duration))
}

/// Study time grouped by subject, joined against the subject list for
/// display name and color, sorted by minutes descending. Sessions whose
/// subject no longer exists are grouped under an "Unknown" placeholder.
pub fn study_time_by_subject(sessions: &[StudySession], subjects: &[Subject]) -> Vec<SubjectTime> {
    // Accumulate per subject id, preserving first-seen order so the sort
    // below is stable across recomputations
    let mut time_by_id: Vec<(&str, u32)> = Vec::new();
    for session in sessions {
        match time_by_id.iter_mut().find(|(id, _)| *id == session.subject_id) {
            Some((_, minutes)) => *minutes = minutes.saturating_add(session.duration),
            None => time_by_id.push((session.subject_id.as_str(), session.duration)),
        }
    }

    let mut result: Vec<SubjectTime> = time_by_id
        .into_iter()
        .map(|(subject_id, minutes)| {
            match subjects.iter().find(|s| s.id == subject_id) {
                Some(subject) => SubjectTime {
                    subject: subject.name.clone(),
                    minutes,
                    color: subject.color.clone(),
                },
                None => SubjectTime {
                    subject: UNKNOWN_SUBJECT.to_string(),
                    minutes,
                    color: UNKNOWN_SUBJECT_COLOR.to_string(),
                },
            }
        })
        .collect();

    result.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    result
}

/// Study time bucketed into the seven weekdays (Sunday first), by the
/// session timestamp's local-time weekday. All seven buckets are always
/// present, zero-filled; sessions with unparseable timestamps are skipped.
pub fn study_time_by_weekday(sessions: &[StudySession]) -> Vec<WeekdayTime> {
    let mut minutes = [0u32; 7];
    for session in sessions {
        if let Some(at) = parse_timestamp(&session.timestamp) {
            let bucket = at.weekday().num_days_from_sunday() as usize;
            minutes[bucket] = minutes[bucket].saturating_add(session.duration);
        }
    }

    WEEKDAY_LABELS
        .into_iter()
        .zip(minutes)
        .map(|(day, minutes)| WeekdayTime { day, minutes })
        .collect()
}

/// Goal progress in percent, derived from the sessions relevant to the
/// goal's window. A completed goal is always 100. When the goal carries a
/// positive time target the result is `min(100, round(100 * relevant /
/// target))`; without a usable target the stored progress is returned
/// unchanged.
///
/// `now` anchors the daily/weekly windows; callers pass `Local::now()`.
pub fn goal_progress(goal: &Goal, sessions: &[StudySession], now: DateTime<Local>) -> u8 {
    if goal.completed {
        return 100;
    }

    let relevant_minutes = sessions
        .iter()
        .filter(|session| session_counts_toward(goal, session, now))
        .fold(0u32, |total, session| total.saturating_add(session.duration));

    match goal.target_time {
        Some(target) if target > 0 => {
            let percent = (f64::from(relevant_minutes) / f64::from(target) * 100.0).round();
            percent.min(100.0) as u8
        }
        _ => goal.progress.min(100),
    }
}

fn session_counts_toward(goal: &Goal, session: &StudySession, now: DateTime<Local>) -> bool {
    let Some(at) = parse_timestamp(&session.timestamp) else {
        return false;
    };

    match goal.goal_type {
        GoalType::Daily => at.date_naive() == now.date_naive(),
        GoalType::Weekly => at.date_naive() >= start_of_week(now.date_naive()),
        GoalType::Subject => {
            let Some(subject_id) = goal.subject_id.as_deref() else {
                return false;
            };
            if session.subject_id != subject_id {
                return false;
            }
            // Due date bounds inclusively at end of day
            match goal.due_date.as_deref() {
                None => true,
                Some(raw) => match parse_date(raw) {
                    Ok(due) => at.date_naive() <= due,
                    Err(_) => false,
                },
            }
        }
    }
}

/// Most recent Sunday on or before `day` (weeks run Sunday to Saturday)
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    let offset = day.weekday().num_days_from_sunday() as u64;
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// Percentage of tasks marked completed; 0 for an empty list
pub fn task_completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    (completed as f64 / tasks.len() as f64) * 100.0
}

/// Per-type goal counts and completion, in Daily/Weekly/Subject order
pub fn goal_completion_by_type(goals: &[Goal]) -> Vec<GoalTypeSummary> {
    GoalType::ALL
        .iter()
        .map(|&goal_type| {
            let of_type: Vec<&Goal> = goals.iter().filter(|g| g.goal_type == goal_type).collect();
            GoalTypeSummary {
                goal_type,
                total: of_type.len(),
                completed: of_type.iter().filter(|g| g.completed).count(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppState;

    fn session(subject_id: &str, duration: u32, timestamp: &str) -> StudySession {
        StudySession {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            activity_type: "Reading".to_string(),
            duration,
            notes: String::new(),
            timestamp: timestamp.to_string(),
        }
    }

    fn task(completed: bool) -> Task {
        Task {
            completed,
            ..Task::new("revise".to_string(), "1".to_string())
        }
    }

    #[test]
    fn total_time_is_sum_of_durations() {
        let sessions = vec![
            session("1", 45, "2024-01-08T10:00:00"),
            session("2", 15, "2024-01-09T10:00:00"),
        ];
        assert_eq!(total_study_time(&sessions), 60);
        assert_eq!(total_study_time(&[]), 0);
    }

    #[test]
    fn by_subject_sums_match_total_and_sort_descending() {
        let state = AppState::default();
        let sessions = vec![
            session("1", 30, "2024-01-08T10:00:00"),
            session("2", 90, "2024-01-08T12:00:00"),
            session("1", 20, "2024-01-09T10:00:00"),
        ];

        let by_subject = study_time_by_subject(&sessions, &state.subjects);

        assert_eq!(by_subject.len(), 2);
        assert_eq!(by_subject[0].subject, "Science");
        assert_eq!(by_subject[0].minutes, 90);
        assert_eq!(by_subject[1].subject, "Mathematics");
        assert_eq!(by_subject[1].minutes, 50);
        let summed: u32 = by_subject.iter().map(|s| s.minutes).sum();
        assert_eq!(summed, total_study_time(&sessions));
    }

    #[test]
    fn by_subject_resolves_deleted_subject_to_unknown() {
        let sessions = vec![session("gone", 25, "2024-01-08T10:00:00")];

        let by_subject = study_time_by_subject(&sessions, &[]);

        assert_eq!(by_subject.len(), 1);
        assert_eq!(by_subject[0].subject, UNKNOWN_SUBJECT);
        assert_eq!(by_subject[0].color, UNKNOWN_SUBJECT_COLOR);
        assert_eq!(by_subject[0].minutes, 25);
    }

    #[test]
    fn by_weekday_always_has_seven_buckets() {
        let buckets = study_time_by_weekday(&[]);
        assert_eq!(buckets.len(), 7);
        assert!(buckets.iter().all(|b| b.minutes == 0));
        let labels: Vec<&str> = buckets.iter().map(|b| b.day).collect();
        assert_eq!(labels, WEEKDAY_LABELS);
    }

    #[test]
    fn monday_session_lands_in_monday_bucket() {
        // 2024-01-08 is a Monday
        let sessions = vec![session("1", 45, "2024-01-08T10:00:00")];

        let buckets = study_time_by_weekday(&sessions);

        assert_eq!(buckets[1].day, "Mon");
        assert_eq!(buckets[1].minutes, 45);
        for (i, bucket) in buckets.iter().enumerate() {
            if i != 1 {
                assert_eq!(bucket.minutes, 0);
            }
        }
        let summed: u32 = buckets.iter().map(|b| b.minutes).sum();
        assert_eq!(summed, total_study_time(&sessions));
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        let sessions = vec![
            session("1", 45, "not a date"),
            session("1", 15, "2024-01-08T10:00:00"),
        ];
        let buckets = study_time_by_weekday(&sessions);
        let summed: u32 = buckets.iter().map(|b| b.minutes).sum();
        assert_eq!(summed, 15);
    }

    #[test]
    fn completed_goal_is_always_100() {
        let goal = Goal {
            completed: true,
            progress: 10,
            target_time: Some(600),
            ..Goal::new("finish the course".to_string(), GoalType::Weekly)
        };
        assert_eq!(goal_progress(&goal, &[], Local::now()), 100);
    }

    #[test]
    fn daily_goal_progress_clamps_at_100() {
        let goal = Goal {
            target_time: Some(60),
            ..Goal::new("study an hour".to_string(), GoalType::Daily)
        };
        let now = Local::now();
        let today = now.format("%Y-%m-%dT%H:%M:%S").to_string();

        assert_eq!(goal_progress(&goal, &[], now), 0);

        let mut sessions = vec![session("1", 30, &today)];
        assert_eq!(goal_progress(&goal, &sessions, now), 50);

        sessions.push(session("1", 30, &today));
        assert_eq!(goal_progress(&goal, &sessions, now), 100);

        // Further sessions never push past 100
        sessions.push(session("1", 240, &today));
        assert_eq!(goal_progress(&goal, &sessions, now), 100);
    }

    #[test]
    fn daily_goal_ignores_other_days() {
        let goal = Goal {
            target_time: Some(60),
            ..Goal::new("study an hour".to_string(), GoalType::Daily)
        };
        let now = Local::now();
        let last_year = now
            .date_naive()
            .checked_sub_days(Days::new(365))
            .unwrap()
            .format("%Y-%m-%dT10:00:00")
            .to_string();

        let sessions = vec![session("1", 60, &last_year)];
        assert_eq!(goal_progress(&goal, &sessions, now), 0);
    }

    #[test]
    fn weekly_goal_counts_since_sunday() {
        let goal = Goal {
            target_time: Some(120),
            ..Goal::new("two hours a week".to_string(), GoalType::Weekly)
        };
        let now = Local::now();
        let week_start = start_of_week(now.date_naive());
        let in_week = week_start.format("%Y-%m-%dT08:00:00").to_string();
        let before_week = week_start
            .checked_sub_days(Days::new(1))
            .unwrap()
            .format("%Y-%m-%dT08:00:00")
            .to_string();

        let sessions = vec![session("1", 60, &in_week), session("1", 60, &before_week)];
        assert_eq!(goal_progress(&goal, &sessions, now), 50);
    }

    #[test]
    fn subject_goal_filters_by_subject_and_due_date() {
        let goal = Goal {
            subject_id: Some("1".to_string()),
            target_time: Some(100),
            due_date: Some("2024-01-10".to_string()),
            ..Goal::new("maths sprint".to_string(), GoalType::Subject)
        };
        let sessions = vec![
            session("1", 50, "2024-01-10T23:30:00"), // inclusive end of day
            session("1", 50, "2024-01-11T00:30:00"), // past due
            session("2", 50, "2024-01-09T10:00:00"), // wrong subject
        ];
        assert_eq!(goal_progress(&goal, &sessions, Local::now()), 50);
    }

    #[test]
    fn goal_without_target_returns_stored_progress() {
        let goal = Goal {
            progress: 40,
            target_tasks: Some(5),
            ..Goal::new("five tasks".to_string(), GoalType::Weekly)
        };
        assert_eq!(goal_progress(&goal, &[], Local::now()), 40);
    }

    #[test]
    fn completion_rate_of_empty_list_is_zero() {
        assert_eq!(task_completion_rate(&[]), 0.0);
    }

    #[test]
    fn completion_rate_is_percentage_of_completed() {
        let tasks = vec![task(true), task(false), task(true), task(false)];
        let rate = task_completion_rate(&tasks);
        assert!((rate - 50.0).abs() < f64::EPSILON);
        assert!((0.0..=100.0).contains(&rate));
    }

    #[test]
    fn goal_completion_by_type_groups_and_counts() {
        let goals = vec![
            Goal { completed: true, ..Goal::new("a".to_string(), GoalType::Daily) },
            Goal::new("b".to_string(), GoalType::Daily),
            Goal { completed: true, ..Goal::new("c".to_string(), GoalType::Subject) },
        ];

        let summary = goal_completion_by_type(&goals);

        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].goal_type, GoalType::Daily);
        assert_eq!(summary[0].total, 2);
        assert_eq!(summary[0].completed, 1);
        assert_eq!(summary[0].completion_rate(), 50);
        assert_eq!(summary[1].total, 0);
        assert_eq!(summary[1].completion_rate(), 0);
        assert_eq!(summary[2].total, 1);
        assert_eq!(summary[2].completion_rate(), 100);
    }
}
