use ratatui::Frame;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::tui::app::{EntryForm, Mode, SidebarState, Tab};
use crate::tui::widgets::{
    calendar::render_calendar,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    dashboard::render_dashboard,
    form::{render_event_form, render_goal_form, render_session_form, render_task_form},
    help::render_help,
    item_view::{render_empty_view, render_item_view},
    lists::{
        render_event_list, render_goal_list, render_session_list, render_subject_distribution,
        render_task_list,
    },
    status_bar::render_status_bar,
    subject_modal::render_subject_modal,
    tabs::render_tabs,
};
use crate::tui::{App, Layout};
use crate::utils::format_date;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Outer border with the app title centered in the top border
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("SGT")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.current_tab, &app.config);

    // Sidebar: the list for the current tab
    if app.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        match app.current_tab {
            Tab::Dashboard => {
                render_subject_distribution(
                    f,
                    layout.sidebar_area,
                    app.store.state(),
                    &mut app.list_state,
                    &app.config,
                );
            }
            Tab::Sessions => {
                let sessions = app.sessions_sorted();
                render_session_list(
                    f,
                    layout.sidebar_area,
                    &sessions,
                    app.store.state(),
                    &mut app.list_state,
                    &app.config,
                );
            }
            Tab::Goals => {
                let goals = app.goals_list();
                render_goal_list(
                    f,
                    layout.sidebar_area,
                    &goals,
                    app.store.state(),
                    &mut app.list_state,
                    &app.config,
                );
            }
            Tab::Tasks => {
                let tasks = app.tasks_sorted();
                render_task_list(f, layout.sidebar_area, &tasks, &mut app.list_state, &app.config);
            }
            Tab::Calendar => {
                let events = app.events_for_selected_day();
                let day_label = format_date(&app.selected_day.format("%Y-%m-%d").to_string());
                render_event_list(
                    f,
                    layout.sidebar_area,
                    &events,
                    &day_label,
                    &mut app.list_state,
                    &app.config,
                );
            }
        }
    }

    // Main pane
    match app.mode {
        Mode::Create => {
            let subjects = app.store.state().subjects.clone();
            match &app.form {
                Some(EntryForm::Session(form)) => {
                    render_session_form(f, layout.main_area, form, &subjects, &app.config);
                }
                Some(EntryForm::Goal(form)) => {
                    render_goal_form(f, layout.main_area, form, &subjects, &app.config);
                }
                Some(EntryForm::Task(form)) => {
                    render_task_form(f, layout.main_area, form, &subjects, &app.config);
                }
                Some(EntryForm::Event(form)) => {
                    render_event_form(f, layout.main_area, form, &subjects, &app.config);
                }
                None => {
                    render_empty_view(f, layout.main_area, "No form", &app.config);
                }
            }
        }
        // Help and the subject modal overlay the normal content below
        Mode::View | Mode::Help | Mode::SubjectModal => match app.current_tab {
            Tab::Dashboard => {
                render_dashboard(f, layout.main_area, app.store.state(), &app.config);
            }
            Tab::Calendar => {
                render_calendar(
                    f,
                    layout.main_area,
                    app.visible_month(),
                    app.selected_day,
                    |day| app.events_on(day).len(),
                    &app.config,
                );
            }
            Tab::Sessions | Tab::Goals | Tab::Tasks => {
                if let Some(ref item) = app.selected_item {
                    render_item_view(
                        f,
                        layout.main_area,
                        item,
                        app.store.state(),
                        &app.config,
                        app.detail_scroll,
                    );
                } else {
                    render_empty_view(
                        f,
                        layout.main_area,
                        "Select an item to view details",
                        &app.config,
                    );
                }
            }
        },
    }

    // Overlays render after normal content
    if app.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if app.mode == Mode::SubjectModal {
        render_subject_modal(f, f.area(), app);
    }

    if let Some(ref item) = app.delete_confirmation {
        render_confirm_delete(f, f.area(), item, app.delete_modal_selection, &app.config);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status_message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn get_key_hints(app: &App) -> Vec<String> {
    use crate::utils::format_key_binding_for_display as key;
    let bindings = &app.config.key_bindings;

    match app.mode {
        Mode::Help => {
            vec![format!("Esc or {}: Exit help", key(&bindings.help))]
        }
        Mode::Create => {
            vec![
                "Tab/Shift+Tab: Next/previous field".to_string(),
                "Left/Right: Cycle picker".to_string(),
                format!("{}: Save", key(&bindings.save)),
                "Esc: Cancel".to_string(),
            ]
        }
        Mode::SubjectModal => {
            vec![
                "Tab: Switch panel".to_string(),
                format!("{}: Apply", key(&bindings.select)),
                "Esc: Close".to_string(),
            ]
        }
        Mode::View => {
            let mut hints = vec![
                format!("{}: Quit", key(&bindings.quit)),
                format!("{}: New", key(&bindings.new)),
                format!("{}: Edit", key(&bindings.edit)),
                format!("{}: Delete", key(&bindings.delete)),
                format!("{}: Subjects", key(&bindings.subjects)),
            ];

            match app.current_tab {
                Tab::Tasks | Tab::Goals => {
                    hints.push(format!("{}: Toggle done", key(&bindings.toggle_complete)));
                }
                Tab::Calendar => {
                    hints.push("[/]: Day".to_string());
                    hints.push("{/}: Month".to_string());
                    hints.push(format!("{}: Today", key(&bindings.today)));
                }
                _ => {}
            }

            hints.push(format!("{}: Sidebar", key(&bindings.toggle_sidebar)));
            hints.push(format!("{}: Help", key(&bindings.help)));
            hints
        }
    }
}
