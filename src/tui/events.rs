use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

use crate::models::{GoalType, Priority, Subject};
use crate::store::Action;
use crate::tui::app::{
    App, EntryForm, EventField, EventForm, GoalField, GoalForm, Mode, SUBJECT_COLORS,
    SessionField, SessionForm, SidebarState, SubjectModalField, SubjectModalMode,
    SubjectModalState, Tab, TaskField, TaskForm,
};
use crate::tui::error::TuiError;
use crate::tui::widgets::editor::Editor;
use crate::utils::{has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the user's
/// shell becomes unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After calling this, the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors here, this is already a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the error
    // message lands in the normal terminal
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;

    use crate::tui::layout::Layout;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        terminal.draw(|f| {
            let layout = Layout::calculate(
                f.area(),
                app.config.sidebar_width_percent,
                app.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render(f, &mut app, &layout);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key);
                }
            }
        }
    }

    guard.restore()?;
    Ok(())
}

/// True when the key event matches a configured binding string
fn matches_binding(key: &KeyEvent, binding: &str) -> bool {
    match parse_key_binding(binding) {
        Ok(parsed) => {
            if parsed.requires_ctrl {
                key.code == parsed.key_code && has_primary_modifier(key.modifiers)
            } else {
                key.code == parsed.key_code && !has_primary_modifier(key.modifiers)
            }
        }
        Err(_) => false,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // The delete confirmation modal captures all input
    if app.delete_confirmation.is_some() {
        handle_delete_modal_key(app, key);
        return;
    }

    match app.mode {
        Mode::View => handle_view_key(app, key),
        Mode::Help => handle_help_key(app, key),
        Mode::Create => handle_form_key(app, key),
        Mode::SubjectModal => handle_subject_modal_key(app, key),
    }
}

fn handle_delete_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            app.delete_modal_selection = 1 - app.delete_modal_selection;
        }
        KeyCode::Enter => {
            if app.delete_modal_selection == 0 {
                app.confirm_delete();
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc || matches_binding(&key, &app.config.key_bindings.help.clone()) {
        app.mode = Mode::View;
    }
}

fn handle_view_key(app: &mut App, key: KeyEvent) {
    let bindings = app.config.key_bindings.clone();

    if matches_binding(&key, &bindings.quit) {
        app.should_quit = true;
    } else if matches_binding(&key, &bindings.help) {
        app.mode = Mode::Help;
    } else if matches_binding(&key, &bindings.toggle_sidebar) {
        app.sidebar_state = match app.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    } else if matches_binding(&key, &bindings.tab_left) {
        let tab = app.current_tab.previous();
        app.switch_tab(tab);
    } else if matches_binding(&key, &bindings.tab_right) {
        let tab = app.current_tab.next();
        app.switch_tab(tab);
    } else if matches_binding(&key, &bindings.tab_1) {
        app.switch_tab(Tab::Dashboard);
    } else if matches_binding(&key, &bindings.tab_2) {
        app.switch_tab(Tab::Sessions);
    } else if matches_binding(&key, &bindings.tab_3) {
        app.switch_tab(Tab::Goals);
    } else if matches_binding(&key, &bindings.tab_4) {
        app.switch_tab(Tab::Tasks);
    } else if matches_binding(&key, &bindings.tab_5) {
        app.switch_tab(Tab::Calendar);
    } else if matches_binding(&key, &bindings.list_up) {
        app.move_selection_up();
    } else if matches_binding(&key, &bindings.list_down) {
        app.move_selection_down();
    } else if matches_binding(&key, &bindings.select) {
        app.select_current_item();
    } else if matches_binding(&key, &bindings.new) {
        app.open_create_form();
    } else if matches_binding(&key, &bindings.edit) {
        app.open_edit_form();
    } else if matches_binding(&key, &bindings.delete) {
        app.request_delete_selected();
    } else if matches_binding(&key, &bindings.toggle_complete) {
        app.toggle_complete_selected();
    } else if matches_binding(&key, &bindings.subjects) {
        app.subject_modal = Some(SubjectModalState::new());
        app.mode = Mode::SubjectModal;
    } else if app.current_tab == Tab::Calendar && matches_binding(&key, &bindings.today) {
        app.calendar_jump_today();
    } else {
        match key.code {
            // Calendar cursor movement
            KeyCode::Char('[') if app.current_tab == Tab::Calendar => app.calendar_step_day(false),
            KeyCode::Char(']') if app.current_tab == Tab::Calendar => app.calendar_step_day(true),
            KeyCode::Char('{') if app.current_tab == Tab::Calendar => {
                app.calendar_step_month(false)
            }
            KeyCode::Char('}') if app.current_tab == Tab::Calendar => app.calendar_step_month(true),
            // Detail pane scrolling
            KeyCode::PageDown => app.detail_scroll += 1,
            KeyCode::PageUp => app.detail_scroll = app.detail_scroll.saturating_sub(1),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Form handling

fn handle_form_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.cancel_form();
        return;
    }
    if matches_binding(&key, &app.config.key_bindings.save.clone()) {
        app.save_form();
        return;
    }

    let subject_count = app.store.state().subjects.len();
    let Some(form) = app.form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Tab => advance_field(form, true),
        KeyCode::BackTab => advance_field(form, false),
        KeyCode::Enter => {
            if multi_line_active(form) {
                if let Some(editor) = active_editor(form) {
                    editor.insert_newline();
                }
            } else {
                advance_field(form, true);
            }
        }
        KeyCode::Left => {
            if picker_active(form) {
                cycle_picker(form, false, subject_count);
            } else if let Some(editor) = active_editor(form) {
                editor.move_cursor_left();
            }
        }
        KeyCode::Right => {
            if picker_active(form) {
                cycle_picker(form, true, subject_count);
            } else if let Some(editor) = active_editor(form) {
                editor.move_cursor_right();
            }
        }
        KeyCode::Up => {
            if let Some(editor) = active_editor(form) {
                editor.move_cursor_up();
            }
        }
        KeyCode::Down => {
            if let Some(editor) = active_editor(form) {
                editor.move_cursor_down();
            }
        }
        KeyCode::Home => {
            if let Some(editor) = active_editor(form) {
                editor.move_cursor_home();
            }
        }
        KeyCode::End => {
            if let Some(editor) = active_editor(form) {
                editor.move_cursor_end();
            }
        }
        KeyCode::Backspace => {
            if let Some(editor) = active_editor(form) {
                editor.delete_char();
            }
        }
        KeyCode::Char(ch) if !has_primary_modifier(key.modifiers) => {
            if let Some(editor) = active_editor(form) {
                editor.insert_char(ch);
            }
        }
        _ => {}
    }
}

const SESSION_FIELDS: [SessionField; 5] = [
    SessionField::Subject,
    SessionField::Activity,
    SessionField::Duration,
    SessionField::Timestamp,
    SessionField::Notes,
];

const GOAL_FIELDS: [GoalField; 7] = [
    GoalField::Title,
    GoalField::Type,
    GoalField::Subject,
    GoalField::TargetTime,
    GoalField::TargetTasks,
    GoalField::DueDate,
    GoalField::Description,
];

const TASK_FIELDS: [TaskField; 7] = [
    TaskField::Title,
    TaskField::Subject,
    TaskField::Priority,
    TaskField::DueDate,
    TaskField::EstimatedTime,
    TaskField::Progress,
    TaskField::Description,
];

const EVENT_FIELDS: [EventField; 9] = [
    EventField::Title,
    EventField::Type,
    EventField::AllDay,
    EventField::Date,
    EventField::StartTime,
    EventField::EndTime,
    EventField::Subject,
    EventField::Location,
    EventField::Description,
];

fn step<T: Copy + PartialEq>(fields: &[T], current: T, forward: bool) -> T {
    let index = fields.iter().position(|f| *f == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % fields.len()
    } else {
        (index + fields.len() - 1) % fields.len()
    };
    fields[next]
}

fn advance_field(form: &mut EntryForm, forward: bool) {
    match form {
        EntryForm::Session(f) => f.current_field = step(&SESSION_FIELDS, f.current_field, forward),
        EntryForm::Goal(f) => f.current_field = step(&GOAL_FIELDS, f.current_field, forward),
        EntryForm::Task(f) => f.current_field = step(&TASK_FIELDS, f.current_field, forward),
        EntryForm::Event(f) => f.current_field = step(&EVENT_FIELDS, f.current_field, forward),
    }
}

fn picker_active(form: &EntryForm) -> bool {
    match form {
        EntryForm::Session(f) => f.current_field == SessionField::Subject,
        EntryForm::Goal(f) => {
            matches!(f.current_field, GoalField::Type | GoalField::Subject)
        }
        EntryForm::Task(f) => {
            matches!(f.current_field, TaskField::Subject | TaskField::Priority)
        }
        EntryForm::Event(f) => {
            matches!(
                f.current_field,
                EventField::Type | EventField::AllDay | EventField::Subject
            )
        }
    }
}

fn multi_line_active(form: &EntryForm) -> bool {
    match form {
        EntryForm::Session(f) => f.current_field == SessionField::Notes,
        EntryForm::Goal(f) => f.current_field == GoalField::Description,
        EntryForm::Task(f) => f.current_field == TaskField::Description,
        EntryForm::Event(f) => f.current_field == EventField::Description,
    }
}

fn cycle_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn cycle_picker(form: &mut EntryForm, forward: bool, subject_count: usize) {
    match form {
        EntryForm::Session(f) => {
            if f.current_field == SessionField::Subject {
                f.subject_index = cycle_index(f.subject_index, subject_count, forward);
            }
        }
        EntryForm::Goal(f) => match f.current_field {
            GoalField::Type => {
                f.type_index = cycle_index(f.type_index, GoalType::ALL.len(), forward);
            }
            GoalField::Subject => {
                f.subject_index = cycle_index(f.subject_index, subject_count, forward);
            }
            _ => {}
        },
        EntryForm::Task(f) => match f.current_field {
            TaskField::Subject => {
                f.subject_index = cycle_index(f.subject_index, subject_count, forward);
            }
            TaskField::Priority => {
                f.priority_index = cycle_index(f.priority_index, Priority::ALL.len(), forward);
            }
            _ => {}
        },
        EntryForm::Event(f) => match f.current_field {
            EventField::Type => {
                f.type_index = cycle_index(f.type_index, crate::models::EventType::ALL.len(), forward);
            }
            EventField::AllDay => f.all_day = !f.all_day,
            EventField::Subject => {
                // Index 0 is "[None]"
                f.subject_index = cycle_index(f.subject_index, subject_count + 1, forward);
            }
            _ => {}
        },
    }
}

fn active_editor(form: &mut EntryForm) -> Option<&mut Editor> {
    match form {
        EntryForm::Session(SessionForm { current_field, activity, duration, timestamp, notes, .. }) => {
            match current_field {
                SessionField::Activity => Some(activity),
                SessionField::Duration => Some(duration),
                SessionField::Timestamp => Some(timestamp),
                SessionField::Notes => Some(notes),
                SessionField::Subject => None,
            }
        }
        EntryForm::Goal(GoalForm {
            current_field,
            title,
            target_time,
            target_tasks,
            due_date,
            description,
            ..
        }) => match current_field {
            GoalField::Title => Some(title),
            GoalField::TargetTime => Some(target_time),
            GoalField::TargetTasks => Some(target_tasks),
            GoalField::DueDate => Some(due_date),
            GoalField::Description => Some(description),
            GoalField::Type | GoalField::Subject => None,
        },
        EntryForm::Task(TaskForm {
            current_field,
            title,
            due_date,
            estimated_time,
            progress,
            description,
            ..
        }) => match current_field {
            TaskField::Title => Some(title),
            TaskField::DueDate => Some(due_date),
            TaskField::EstimatedTime => Some(estimated_time),
            TaskField::Progress => Some(progress),
            TaskField::Description => Some(description),
            TaskField::Subject | TaskField::Priority => None,
        },
        EntryForm::Event(EventForm {
            current_field,
            title,
            date,
            start_time,
            end_time,
            location,
            description,
            ..
        }) => match current_field {
            EventField::Title => Some(title),
            EventField::Date => Some(date),
            EventField::StartTime => Some(start_time),
            EventField::EndTime => Some(end_time),
            EventField::Location => Some(location),
            EventField::Description => Some(description),
            EventField::Type | EventField::AllDay | EventField::Subject => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Subject modal handling

fn handle_subject_modal_key(app: &mut App, key: KeyEvent) {
    let Some(mut state) = app.subject_modal.take() else {
        app.mode = Mode::View;
        return;
    };

    match state.mode {
        SubjectModalMode::View => handle_subject_modal_view_key(app, &mut state, key),
        SubjectModalMode::Add | SubjectModalMode::Rename => {
            handle_subject_modal_edit_key(app, &mut state, key)
        }
    }

    // Closing the modal is signalled by switching back to View mode
    if app.mode == Mode::SubjectModal {
        app.subject_modal = Some(state);
    }
}

fn handle_subject_modal_view_key(app: &mut App, state: &mut SubjectModalState, key: KeyEvent) {
    let subject_count = app.store.state().subjects.len();
    let action_count = 4;

    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::View;
        }
        KeyCode::Tab => {
            state.current_field = match state.current_field {
                SubjectModalField::SubjectList => SubjectModalField::ActionsList,
                SubjectModalField::ActionsList => SubjectModalField::SubjectList,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => match state.current_field {
            SubjectModalField::SubjectList => {
                state.selected_index = state.selected_index.saturating_sub(1);
                state.list_state.select(Some(state.selected_index));
            }
            SubjectModalField::ActionsList => {
                state.actions_selected_index = state.actions_selected_index.saturating_sub(1);
            }
        },
        KeyCode::Down | KeyCode::Char('j') => match state.current_field {
            SubjectModalField::SubjectList => {
                if subject_count > 0 && state.selected_index + 1 < subject_count {
                    state.selected_index += 1;
                }
                state.list_state.select(Some(state.selected_index));
            }
            SubjectModalField::ActionsList => {
                if state.actions_selected_index + 1 < action_count {
                    state.actions_selected_index += 1;
                }
            }
        },
        KeyCode::Enter => match state.current_field {
            SubjectModalField::SubjectList => {
                state.current_field = SubjectModalField::ActionsList;
            }
            SubjectModalField::ActionsList => {
                apply_subject_action(app, state);
            }
        },
        _ => {}
    }
}

fn apply_subject_action(app: &mut App, state: &mut SubjectModalState) {
    let selected_subject = app.store.state().subjects.get(state.selected_index).cloned();

    match state.actions_selected_index {
        // Add
        0 => {
            state.mode = SubjectModalMode::Add;
            state.name_editor = Editor::new();
        }
        // Rename
        1 => {
            if let Some(subject) = selected_subject {
                state.mode = SubjectModalMode::Rename;
                state.name_editor = Editor::from_string(&subject.name);
            }
        }
        // Recolor: cycle to the next palette color
        2 => {
            if let Some(mut subject) = selected_subject {
                let current = SUBJECT_COLORS
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(&subject.color));
                let next = match current {
                    Some(index) => (index + 1) % SUBJECT_COLORS.len(),
                    None => 0,
                };
                subject.color = SUBJECT_COLORS[next].to_string();
                app.dispatch_and_save(Action::UpdateSubject(subject));
            }
        }
        // Delete: referencing sessions/goals/tasks keep their dangling id and
        // render as "Unknown" from now on
        3 => {
            if let Some(subject) = selected_subject {
                app.dispatch_and_save(Action::DeleteSubject(subject.id));
                let remaining = app.store.state().subjects.len();
                if remaining == 0 {
                    state.selected_index = 0;
                } else if state.selected_index >= remaining {
                    state.selected_index = remaining - 1;
                }
                state.list_state.select(Some(state.selected_index));
                app.set_status("Subject deleted");
            }
        }
        _ => {}
    }
}

fn handle_subject_modal_edit_key(app: &mut App, state: &mut SubjectModalState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.mode = SubjectModalMode::View;
        }
        KeyCode::Enter => {
            let name = state.name_editor.trimmed();
            if name.is_empty() {
                app.set_status("Subject name must not be empty");
                return;
            }
            match state.mode {
                SubjectModalMode::Add => {
                    // Pick the next palette color round-robin
                    let color_index = app.store.state().subjects.len() % SUBJECT_COLORS.len();
                    let color = SUBJECT_COLORS[color_index].to_string();
                    app.dispatch_and_save(Action::AddSubject(Subject::new(name, color)));
                    app.set_status("Subject added");
                }
                SubjectModalMode::Rename => {
                    if let Some(mut subject) =
                        app.store.state().subjects.get(state.selected_index).cloned()
                    {
                        subject.name = name;
                        app.dispatch_and_save(Action::UpdateSubject(subject));
                        app.set_status("Subject renamed");
                    }
                }
                SubjectModalMode::View => {}
            }
            state.mode = SubjectModalMode::View;
        }
        KeyCode::Backspace => state.name_editor.delete_char(),
        KeyCode::Left => state.name_editor.move_cursor_left(),
        KeyCode::Right => state.name_editor.move_cursor_right(),
        KeyCode::Home => state.name_editor.move_cursor_home(),
        KeyCode::End => state.name_editor.move_cursor_end(),
        KeyCode::Char(ch) if !has_primary_modifier(key.modifiers) => {
            state.name_editor.insert_char(ch);
        }
        _ => {}
    }
}
