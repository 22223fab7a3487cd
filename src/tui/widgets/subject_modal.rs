use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::tui::App;
use crate::tui::app::{SubjectModalField, SubjectModalMode};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::format_duration;

/// Centered popup rect, following the ratatui popup example
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Subject management modal: subject list on the left (with logged time per
/// subject), actions on the right
pub fn render_subject_modal(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 70, 60);

    f.render_widget(Clear, popup_area);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Subjects")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, popup_area);

    let inner_area = Rect::new(
        popup_area.x + 1,
        popup_area.y + 1,
        popup_area.width.saturating_sub(2),
        popup_area.height.saturating_sub(2),
    );

    let Some(ref state) = app.subject_modal else {
        return;
    };

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner_area);

    let list_area = horizontal[0];
    let actions_area = horizontal[1];

    // Subject list, each with its accent color and total logged time
    let app_state = app.store.state();
    let subject_items: Vec<ListItem> = app_state
        .subjects
        .iter()
        .map(|subject| {
            let minutes: u32 = app_state
                .sessions
                .iter()
                .filter(|s| s.subject_id == subject.id)
                .map(|s| s.duration)
                .sum();
            ListItem::new(format!("{} · {}", subject.name, format_duration(minutes)))
                .style(Style::default().fg(parse_color(&subject.color)))
        })
        .collect();

    let list = List::new(subject_items)
        .block(Block::default().borders(Borders::ALL).title("Subjects"))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = state.list_state.clone();
    f.render_stateful_widget(list, list_area, &mut list_state);

    // Actions panel
    let is_actions_active = matches!(state.current_field, SubjectModalField::ActionsList);
    let actions = ["Add", "Rename", "Recolor", "Delete"];

    let mut action_lines: Vec<Line> = actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let style = if is_actions_active && state.actions_selected_index == index {
                Style::default()
                    .fg(highlight_fg)
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg_color).bg(bg_color)
            };
            Line::from(Span::styled(action.to_string(), style))
        })
        .collect();

    // Name editor shows up for Add and Rename
    let name_editor_line_index =
        if matches!(state.mode, SubjectModalMode::Add | SubjectModalMode::Rename) {
            action_lines.push(Line::from(""));
            let name_text = state.name_editor.lines.first().cloned().unwrap_or_default();
            action_lines.push(Line::from(vec![
                Span::styled("Name: ", Style::default().fg(fg_color)),
                Span::styled(name_text, Style::default().fg(highlight_fg).bg(highlight_bg)),
            ]));
            Some(action_lines.len() - 1)
        } else {
            None
        };

    let actions_paragraph = Paragraph::new(action_lines)
        .block(Block::default().borders(Borders::ALL).title("Actions"))
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(actions_paragraph, actions_area);

    // Cursor inside the name editor
    if let Some(line_idx) = name_editor_line_index {
        let name_len = state
            .name_editor
            .lines
            .first()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        let cursor_col = state.name_editor.cursor_col.min(name_len);
        let total_cursor_col = "Name: ".chars().count() + cursor_col;

        let max_col = (actions_area.width.saturating_sub(3)) as usize;
        let visible_cursor_col = total_cursor_col.min(max_col);

        let x = actions_area.x + 1 + (visible_cursor_col as u16);
        let y = actions_area.y + 1 + (line_idx as u16);

        if x < actions_area.x + actions_area.width && y < actions_area.y + actions_area.height {
            f.set_cursor_position((x, y));
        }
    }
}
