use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::{AppState, GoalType};
use crate::stats;
use crate::tui::widgets::color::parse_color;
use crate::utils::{format_date, format_duration};

/// Dashboard main pane: stat cards on top, subject distribution and upcoming
/// tasks in the middle, the weekday chart at the bottom. Everything here is
/// recomputed from the state tree on each frame via the stats functions.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &AppState, config: &Config) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Stat cards
            Constraint::Min(6),     // Distribution + upcoming tasks
            Constraint::Length(10), // Weekday chart
        ])
        .split(area);

    render_stat_cards(f, rows[0], state, config);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_distribution(f, middle[0], state, config);
    render_upcoming_tasks(f, middle[1], state, config);
    render_weekday_chart(f, rows[2], state, config);
}

fn stat_card(f: &mut Frame, area: Rect, title: &str, value: String, subtitle: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let lines = vec![
        Line::from(Span::styled(value, Style::default().fg(fg).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(subtitle.to_string(), Style::default().fg(accent))),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);
}

fn render_stat_cards(f: &mut Frame, area: Rect, state: &AppState, config: &Config) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let total = stats::total_study_time(&state.sessions);
    stat_card(
        f,
        cards[0],
        "Study Time",
        format!("{}h {}m", total / 60, total % 60),
        "All sessions",
        config,
    );

    stat_card(
        f,
        cards[1],
        "Sessions",
        state.sessions.len().to_string(),
        "Total logged",
        config,
    );

    // The headline goal is the first weekly goal without a subject
    let weekly_goal = state
        .goals
        .iter()
        .find(|g| g.goal_type == GoalType::Weekly && g.subject_id.is_none());
    let weekly_progress = weekly_goal
        .map(|goal| stats::goal_progress(goal, &state.sessions, Local::now()))
        .unwrap_or(0);
    stat_card(
        f,
        cards[2],
        "Weekly Goal",
        format!("{}%", weekly_progress),
        "of target",
        config,
    );

    let completed = state.tasks.iter().filter(|t| t.completed).count();
    stat_card(
        f,
        cards[3],
        "Tasks",
        format!("{}/{}", completed, state.tasks.len()),
        &format!("{:.0}% done", stats::task_completion_rate(&state.tasks)),
        config,
    );
}

fn bar(minutes: u32, max_minutes: u32, width: usize) -> String {
    if max_minutes == 0 || width == 0 {
        return String::new();
    }
    let filled = ((minutes as usize) * width) / (max_minutes as usize);
    "█".repeat(filled.min(width))
}

fn render_distribution(f: &mut Frame, area: Rect, state: &AppState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let by_subject = stats::study_time_by_subject(&state.sessions, &state.subjects);
    let max_minutes = by_subject.iter().map(|s| s.minutes).max().unwrap_or(0);

    let label_width = 14usize;
    let bar_width = (area.width.saturating_sub(2) as usize)
        .saturating_sub(label_width + 12)
        .clamp(4, 30);

    let mut lines: Vec<Line> = Vec::new();
    if by_subject.is_empty() {
        lines.push(Line::from(Span::styled(
            "No sessions logged yet",
            Style::default().fg(accent),
        )));
    }
    for entry in &by_subject {
        let mut label: String = entry.subject.chars().take(label_width).collect();
        while label.chars().count() < label_width {
            label.push(' ');
        }
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(fg)),
            Span::styled(
                bar(entry.minutes, max_minutes, bar_width),
                Style::default().fg(parse_color(&entry.color)),
            ),
            Span::styled(
                format!(" {}", format_duration(entry.minutes)),
                Style::default().fg(accent),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("By Subject"))
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);
}

fn render_upcoming_tasks(f: &mut Frame, area: Rect, state: &AppState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    // Top three open tasks by due date
    let mut upcoming: Vec<_> = state.tasks.iter().filter(|t| !t.completed).collect();
    upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    upcoming.truncate(3);

    let max_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled(
            "No upcoming tasks",
            Style::default().fg(accent),
        )));
    }
    for task in upcoming {
        let mut line = format!(
            "{} {} [{}]",
            task.priority.marker(),
            task.title,
            format_date(&task.due_date)
        );
        if line.chars().count() > max_width {
            line = line.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
        }
        lines.push(Line::from(Span::styled(line, Style::default().fg(fg))));
    }

    // Goal completion summary underneath
    lines.push(Line::from(""));
    for summary in stats::goal_completion_by_type(&state.goals) {
        lines.push(Line::from(Span::styled(
            format!(
                "{} goals: {}/{} ({}%)",
                summary.goal_type,
                summary.completed,
                summary.total,
                summary.completion_rate()
            ),
            Style::default().fg(accent),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Up Next"))
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);
}

fn render_weekday_chart(f: &mut Frame, area: Rect, state: &AppState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);
    let highlight = parse_color(&active_theme.highlight_bg);

    let by_weekday = stats::study_time_by_weekday(&state.sessions);
    let max_minutes = by_weekday.iter().map(|d| d.minutes).max().unwrap_or(0);

    let bar_width = (area.width.saturating_sub(2) as usize)
        .saturating_sub(16)
        .clamp(4, 40);

    let lines: Vec<Line> = by_weekday
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(format!("{} ", entry.day), Style::default().fg(fg)),
                Span::styled(
                    bar(entry.minutes, max_minutes, bar_width),
                    Style::default().fg(highlight),
                ),
                Span::styled(
                    format!(" {}", format_duration(entry.minutes)),
                    Style::default().fg(accent),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("By Weekday"))
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);
}
