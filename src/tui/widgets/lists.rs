use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget,
};

use crate::Config;
use crate::models::{AppState, CalendarEvent, Goal, StudySession, Task};
use crate::stats;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::{format_date, format_duration, parse_timestamp};

fn truncate(text: String, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text
    }
}

/// Shared list chrome: bordered list with highlight and a scrollbar when the
/// content overflows the viewport
fn render_list(
    f: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem>,
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    // Reserve one column for the scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let total_items = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&active_theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        if scrollbar_inner_area.width > 0 && scrollbar_inner_area.height > 0 {
            let selected_index = list_state.selected().unwrap_or(0);
            let scroll_position = if selected_index < visible_items {
                0
            } else {
                selected_index.saturating_sub(visible_items.saturating_sub(1))
            };

            let mut scrollbar_state = ScrollbarState::new(total_items)
                .viewport_content_length(visible_items)
                .position(scroll_position);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
        }
    }
}

pub fn render_session_list(
    f: &mut Frame,
    area: Rect,
    sessions: &[StudySession],
    state: &AppState,
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = sessions
        .iter()
        .map(|session| {
            let day = parse_timestamp(&session.timestamp)
                .map(|at| format_date(&at.format("%Y-%m-%d").to_string()))
                .unwrap_or_else(|| "?".to_string());
            let line = format!(
                "{} · {} · {}",
                day,
                state.subject_name(&session.subject_id),
                format_duration(session.duration),
            );
            ListItem::new(truncate(line, max_width))
        })
        .collect();

    let title = format!("Sessions ({})", sessions.len());
    render_list(f, area, title, items, list_state, config);
}

pub fn render_goal_list(
    f: &mut Frame,
    area: Rect,
    goals: &[Goal],
    state: &AppState,
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let now = Local::now();

    let items: Vec<ListItem> = goals
        .iter()
        .map(|goal| {
            let indicator = if goal.completed { "✓" } else { "○" };
            let progress = stats::goal_progress(goal, &state.sessions, now);
            let line = format!("{} {} [{}%]", indicator, goal.title, progress);
            ListItem::new(truncate(line, max_width))
        })
        .collect();

    let title = format!("Goals ({})", goals.len());
    render_list(f, area, title, items, list_state, config);
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let indicator = if task.completed { "✓" } else { "○" };
            let line = format!(
                "{} {} {} [{}]",
                indicator,
                task.priority.marker(),
                task.title,
                format_date(&task.due_date),
            );
            ListItem::new(truncate(line, max_width))
        })
        .collect();

    let completed = tasks.iter().filter(|t| t.completed).count();
    let title = format!("Tasks ({}/{} done)", completed, tasks.len());
    render_list(f, area, title, items, list_state, config);
}

pub fn render_event_list(
    f: &mut Frame,
    area: Rect,
    events: &[CalendarEvent],
    day_label: &str,
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = events
        .iter()
        .map(|event| {
            let when = if event.all_day {
                "All day".to_string()
            } else {
                parse_timestamp(&event.start_time)
                    .map(|at| at.format("%H:%M").to_string())
                    .unwrap_or_else(|| "?".to_string())
            };
            let line = format!("{} · {} ({})", when, event.title, event.event_type);
            ListItem::new(truncate(line, max_width))
        })
        .collect();

    let title = format!("{} ({})", day_label, events.len());
    render_list(f, area, title, items, list_state, config);
}

/// Dashboard sidebar: study time distribution per subject, most studied
/// first; recomputed from the session list on every render
pub fn render_subject_distribution(
    f: &mut Frame,
    area: Rect,
    state: &AppState,
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let by_subject = stats::study_time_by_subject(&state.sessions, &state.subjects);

    let items: Vec<ListItem> = by_subject
        .iter()
        .map(|entry| {
            let line = format!("{} · {}", entry.subject, format_duration(entry.minutes));
            ListItem::new(truncate(line, max_width))
                .style(Style::default().fg(parse_color(&entry.color)))
        })
        .collect();

    let total = stats::total_study_time(&state.sessions);
    let title = format!("Study time ({})", format_duration(total));
    render_list(f, area, title, items, list_state, config);
}
