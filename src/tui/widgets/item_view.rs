use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::AppState;
use crate::stats;
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::parse_color;
use crate::utils::{format_date, format_duration, parse_timestamp};

fn field(label: &str, value: String, label_style: Style, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value, value_style),
    ])
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (width * percent as usize) / 100;
    let mut bar = String::new();
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    format!("{} {}%", bar, percent)
}

/// Detail pane for the selected list item
pub fn render_item_view(
    f: &mut Frame,
    area: Rect,
    item: &SelectedItem,
    state: &AppState,
    config: &Config,
    scroll: usize,
) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let label_style = Style::default().fg(accent);
    let value_style = Style::default().fg(fg);
    let title_style = Style::default().fg(fg).add_modifier(Modifier::BOLD);

    let bar_width = (area.width.saturating_sub(12) as usize).clamp(10, 30);

    let (title, mut lines): (&str, Vec<Line>) = match item {
        SelectedItem::Session(session) => {
            let subject = state.subject_name(&session.subject_id);
            let when = parse_timestamp(&session.timestamp)
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| session.timestamp.clone());
            let mut lines = vec![
                Line::from(Span::styled(subject.to_string(), title_style)),
                Line::from(""),
                field("Activity", session.activity_type.clone(), label_style, value_style),
                field("Duration", format_duration(session.duration), label_style, value_style),
                field("When", when, label_style, value_style),
            ];
            if !session.notes.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Notes:", label_style)));
                for note_line in session.notes.lines() {
                    lines.push(Line::from(Span::styled(note_line.to_string(), value_style)));
                }
            }
            ("Session", lines)
        }
        SelectedItem::Goal(goal) => {
            let progress = stats::goal_progress(goal, &state.sessions, Local::now());
            let mut lines = vec![
                Line::from(Span::styled(goal.title.clone(), title_style)),
                Line::from(""),
                field("Type", goal.goal_type.to_string(), label_style, value_style),
            ];
            if let Some(subject_id) = goal.subject_id.as_deref() {
                lines.push(field(
                    "Subject",
                    state.subject_name(subject_id).to_string(),
                    label_style,
                    value_style,
                ));
            }
            if let Some(target_time) = goal.target_time {
                lines.push(field("Target time", format_duration(target_time), label_style, value_style));
            }
            if let Some(target_tasks) = goal.target_tasks {
                lines.push(field("Target tasks", target_tasks.to_string(), label_style, value_style));
            }
            if let Some(due) = goal.due_date.as_deref() {
                lines.push(field("Due", format_date(due), label_style, value_style));
            }
            lines.push(field(
                "Status",
                if goal.completed { "completed".to_string() } else { "active".to_string() },
                label_style,
                value_style,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(progress_bar(progress, bar_width), value_style)));
            if !goal.description.is_empty() {
                lines.push(Line::from(""));
                for desc_line in goal.description.lines() {
                    lines.push(Line::from(Span::styled(desc_line.to_string(), value_style)));
                }
            }
            ("Goal", lines)
        }
        SelectedItem::Task(task) => {
            let mut lines = vec![
                Line::from(Span::styled(task.title.clone(), title_style)),
                Line::from(""),
                field(
                    "Subject",
                    state.subject_name(&task.subject_id).to_string(),
                    label_style,
                    value_style,
                ),
                field("Due", format_date(&task.due_date), label_style, value_style),
                field("Priority", task.priority.to_string(), label_style, value_style),
            ];
            if let Some(estimate) = task.estimated_time {
                lines.push(field("Estimate", format_duration(estimate), label_style, value_style));
            }
            lines.push(field(
                "Status",
                if task.completed { "done".to_string() } else { "open".to_string() },
                label_style,
                value_style,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                progress_bar(task.display_progress(), bar_width),
                value_style,
            )));
            if !task.description.is_empty() {
                lines.push(Line::from(""));
                for desc_line in task.description.lines() {
                    lines.push(Line::from(Span::styled(desc_line.to_string(), value_style)));
                }
            }
            ("Task", lines)
        }
        SelectedItem::Event(event) => {
            let window = if event.all_day {
                "All day".to_string()
            } else {
                let start = parse_timestamp(&event.start_time)
                    .map(|at| at.format("%H:%M").to_string())
                    .unwrap_or_else(|| "?".to_string());
                let end = parse_timestamp(&event.end_time)
                    .map(|at| at.format("%H:%M").to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("{} - {}", start, end)
            };
            let day = parse_timestamp(&event.start_time)
                .map(|at| format_date(&at.format("%Y-%m-%d").to_string()))
                .unwrap_or_else(|| event.start_time.clone());
            let mut lines = vec![
                Line::from(Span::styled(event.title.clone(), title_style)),
                Line::from(""),
                field("Type", event.event_type.to_string(), label_style, value_style),
                field("Date", day, label_style, value_style),
                field("Time", window, label_style, value_style),
            ];
            if let Some(subject_id) = event.subject_id.as_deref() {
                lines.push(field(
                    "Subject",
                    state.subject_name(subject_id).to_string(),
                    label_style,
                    value_style,
                ));
            }
            if let Some(location) = event.location.as_deref() {
                lines.push(field("Location", location.to_string(), label_style, value_style));
            }
            if let Some(description) = event.description.as_deref() {
                lines.push(Line::from(""));
                for desc_line in description.lines() {
                    lines.push(Line::from(Span::styled(desc_line.to_string(), value_style)));
                }
            }
            ("Event", lines)
        }
    };

    // Apply manual scroll
    if scroll > 0 && scroll < lines.len() {
        lines.drain(0..scroll);
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(fg))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Placeholder when nothing is selected
pub fn render_empty_view(f: &mut Frame, area: Rect, message: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let paragraph = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);
}
