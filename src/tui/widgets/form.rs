use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::Subject;
use crate::tui::app::{
    EventField, EventForm, GoalField, GoalForm, SessionField, SessionForm, TaskField, TaskForm,
};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;

struct FieldStyles {
    active: Style,
    inactive: Style,
}

fn field_styles(config: &Config) -> FieldStyles {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    FieldStyles {
        active: Style::default().bg(highlight_bg).fg(highlight_fg),
        inactive: Style::default()
            .fg(parse_color(&active_theme.fg))
            .add_modifier(Modifier::DIM),
    }
}

/// Single-line text field; returns the cursor position when active
fn text_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    is_active: bool,
    styles: &FieldStyles,
) -> Option<(u16, u16)> {
    let style = if is_active { styles.active } else { styles.inactive };
    let content = editor.lines.first().cloned().unwrap_or_default();
    let paragraph = Paragraph::new(Line::styled(content, style))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    if is_active && area.width > 2 && area.height > 1 {
        let max_col = area.width.saturating_sub(3) as usize;
        let col = editor.cursor_col.min(max_col) as u16;
        Some((area.x + 1 + col, area.y + 1))
    } else {
        None
    }
}

/// Picker field cycled with Left/Right; never owns the cursor
fn picker_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    is_active: bool,
    styles: &FieldStyles,
) {
    let style = if is_active { styles.active } else { styles.inactive };
    let display = if is_active {
        format!("< {} >", value)
    } else {
        value
    };
    let paragraph = Paragraph::new(Line::styled(display, style))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

/// Multi-line field with a cursor-following viewport
fn multi_line_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    is_active: bool,
    styles: &FieldStyles,
) -> Option<(u16, u16)> {
    let style = if is_active { styles.active } else { styles.inactive };
    let viewport_height = area.height.saturating_sub(2) as usize;

    let scroll_start = if viewport_height == 0 || editor.cursor_line < viewport_height {
        0
    } else {
        editor.cursor_line - viewport_height + 1
    };
    let end = (scroll_start + viewport_height).min(editor.lines.len());

    let lines: Vec<Line> = editor.lines[scroll_start..end]
        .iter()
        .map(|l| Line::styled(l.clone(), style))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    if is_active && area.width > 2 && area.height > 2 {
        let max_col = area.width.saturating_sub(3) as usize;
        let col = editor.cursor_col.min(max_col) as u16;
        let row = (editor.cursor_line - scroll_start) as u16;
        if row < area.height.saturating_sub(2) {
            return Some((area.x + 1 + col, area.y + 1 + row));
        }
    }
    None
}

fn subject_label(subjects: &[Subject], index: usize) -> String {
    subjects
        .get(index)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "[None]".to_string())
}

fn split_rows(area: Rect, constraints: Vec<Constraint>) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
}

fn split_columns(area: Rect, count: u16) -> std::rc::Rc<[Rect]> {
    let constraints: Vec<Constraint> = (0..count)
        .map(|_| Constraint::Ratio(1, count as u32))
        .collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
}

pub fn render_session_form(
    f: &mut Frame,
    area: Rect,
    form: &SessionForm,
    subjects: &[Subject],
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let styles = field_styles(config);

    let rows = split_rows(
        area,
        vec![Constraint::Length(3), Constraint::Length(3), Constraint::Min(5)],
    );
    let top = split_columns(rows[0], 2);
    let middle = split_columns(rows[1], 2);

    let mut cursor: Option<(u16, u16)> = None;

    picker_field(
        f,
        top[0],
        "Subject",
        subject_label(subjects, form.subject_index),
        form.current_field == SessionField::Subject,
        &styles,
    );
    cursor = cursor.or(text_field(
        f,
        top[1],
        "Activity",
        &form.activity,
        form.current_field == SessionField::Activity,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        middle[0],
        "Duration (min)",
        &form.duration,
        form.current_field == SessionField::Duration,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        middle[1],
        "When (YYYY-MM-DD HH:MM)",
        &form.timestamp,
        form.current_field == SessionField::Timestamp,
        &styles,
    ));
    cursor = cursor.or(multi_line_field(
        f,
        rows[2],
        "Notes",
        &form.notes,
        form.current_field == SessionField::Notes,
        &styles,
    ));

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

pub fn render_goal_form(
    f: &mut Frame,
    area: Rect,
    form: &GoalForm,
    subjects: &[Subject],
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let styles = field_styles(config);

    let rows = split_rows(
        area,
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ],
    );
    let kind_row = split_columns(rows[1], 2);
    let target_row = split_columns(rows[2], 3);

    let mut cursor = text_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == GoalField::Title,
        &styles,
    );

    picker_field(
        f,
        kind_row[0],
        "Type",
        form.goal_type().to_string(),
        form.current_field == GoalField::Type,
        &styles,
    );
    // Subject only matters for subject goals
    let subject_value = if form.goal_type() == crate::models::GoalType::Subject {
        subject_label(subjects, form.subject_index)
    } else {
        "-".to_string()
    };
    picker_field(
        f,
        kind_row[1],
        "Subject",
        subject_value,
        form.current_field == GoalField::Subject,
        &styles,
    );

    cursor = cursor.or(text_field(
        f,
        target_row[0],
        "Target (min)",
        &form.target_time,
        form.current_field == GoalField::TargetTime,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        target_row[1],
        "Target (tasks)",
        &form.target_tasks,
        form.current_field == GoalField::TargetTasks,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        target_row[2],
        "Due (YYYY-MM-DD)",
        &form.due_date,
        form.current_field == GoalField::DueDate,
        &styles,
    ));
    cursor = cursor.or(multi_line_field(
        f,
        rows[3],
        "Description",
        &form.description,
        form.current_field == GoalField::Description,
        &styles,
    ));

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

pub fn render_task_form(
    f: &mut Frame,
    area: Rect,
    form: &TaskForm,
    subjects: &[Subject],
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let styles = field_styles(config);

    let rows = split_rows(
        area,
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ],
    );
    let subject_row = split_columns(rows[1], 2);
    let detail_row = split_columns(rows[2], 3);

    let mut cursor = text_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == TaskField::Title,
        &styles,
    );

    picker_field(
        f,
        subject_row[0],
        "Subject",
        subject_label(subjects, form.subject_index),
        form.current_field == TaskField::Subject,
        &styles,
    );
    picker_field(
        f,
        subject_row[1],
        "Priority",
        form.priority().to_string(),
        form.current_field == TaskField::Priority,
        &styles,
    );

    cursor = cursor.or(text_field(
        f,
        detail_row[0],
        "Due (YYYY-MM-DD)",
        &form.due_date,
        form.current_field == TaskField::DueDate,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        detail_row[1],
        "Estimate (min)",
        &form.estimated_time,
        form.current_field == TaskField::EstimatedTime,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        detail_row[2],
        "Progress (0-100)",
        &form.progress,
        form.current_field == TaskField::Progress,
        &styles,
    ));
    cursor = cursor.or(multi_line_field(
        f,
        rows[3],
        "Description",
        &form.description,
        form.current_field == TaskField::Description,
        &styles,
    ));

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

pub fn render_event_form(
    f: &mut Frame,
    area: Rect,
    form: &EventForm,
    subjects: &[Subject],
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let styles = field_styles(config);

    let rows = split_rows(
        area,
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ],
    );
    let kind_row = split_columns(rows[1], 2);
    let time_row = split_columns(rows[2], 3);
    let extra_row = split_columns(rows[3], 3);

    let mut cursor = text_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == EventField::Title,
        &styles,
    );

    picker_field(
        f,
        kind_row[0],
        "Type",
        form.event_type().to_string(),
        form.current_field == EventField::Type,
        &styles,
    );
    picker_field(
        f,
        kind_row[1],
        "All day",
        if form.all_day { "yes".to_string() } else { "no".to_string() },
        form.current_field == EventField::AllDay,
        &styles,
    );

    cursor = cursor.or(text_field(
        f,
        time_row[0],
        "Date (YYYY-MM-DD)",
        &form.date,
        form.current_field == EventField::Date,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        time_row[1],
        "Start (HH:MM)",
        &form.start_time,
        form.current_field == EventField::StartTime,
        &styles,
    ));
    cursor = cursor.or(text_field(
        f,
        time_row[2],
        "End (HH:MM)",
        &form.end_time,
        form.current_field == EventField::EndTime,
        &styles,
    ));

    // Subject picker has "[None]" at index 0
    let subject_value = if form.subject_index == 0 {
        "[None]".to_string()
    } else {
        subject_label(subjects, form.subject_index - 1)
    };
    picker_field(
        f,
        extra_row[0],
        "Subject",
        subject_value,
        form.current_field == EventField::Subject,
        &styles,
    );
    cursor = cursor.or(text_field(
        f,
        extra_row[1],
        "Location",
        &form.location,
        form.current_field == EventField::Location,
        &styles,
    ));
    // Third cell of the row stays empty to keep columns aligned
    let spacer = Paragraph::new("").block(Block::default().borders(Borders::ALL));
    f.render_widget(spacer, extra_row[2]);

    cursor = cursor.or(multi_line_field(
        f,
        rows[4],
        "Description",
        &form.description,
        form.current_field == EventField::Description,
        &styles,
    ));

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}
