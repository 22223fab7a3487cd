use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for SGT
/// If profile is Dev, uses "sgt-dev" instead of "sgt"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "sgt-dev",
        Profile::Prod => "sgt",
    };
    ProjectDirs::from("com", "sgt", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for SGT
/// If profile is Dev, uses "sgt-dev" instead of "sgt"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "sgt-dev",
        Profile::Prod => "sgt",
    };
    ProjectDirs::from("com", "sgt", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Get the current date as an ISO 8601 string (YYYY-MM-DD)
pub fn get_current_date_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parse a stored timestamp into a local instant. Accepts RFC 3339 as well
/// as the naive forms the forms and CLI write; returns None for anything
/// unparseable so callers can skip the record instead of failing.
pub fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(fixed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(fixed.with_timezone(&Local));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_local_timezone(Local).earliest();
        }
    }

    // Date-only values count as midnight
    if let Ok(date) = parse_date(raw) {
        return Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest();
    }

    None
}

/// Format minutes as a compact duration: "45 min", "2 hr", "2 hr 5 min"
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{} hr", hours)
    } else {
        format!("{} hr {} min", hours, mins)
    }
}

/// Format a YYYY-MM-DD date for display: "Today", "Tomorrow", "Yesterday",
/// otherwise "Jan 8" (with the year appended when it differs from the
/// current one). Unparseable input is returned as-is.
pub fn format_date(date_str: &str) -> String {
    let Ok(date) = parse_date(date_str) else {
        return date_str.to_string();
    };
    let today = Local::now().date_naive();

    if date == today {
        return "Today".to_string();
    }
    if Some(date) == today.checked_add_days(Days::new(1)) {
        return "Tomorrow".to_string();
    }
    if Some(date) == today.checked_sub_days(Days::new(1)) {
        return "Yesterday".to_string();
    }

    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
/// On macOS, "Ctrl+" is replaced with "Opt+" for better UX (Option key)
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "n"), special keys ("Enter", "Space", "F1"),
/// and modifiers ("Ctrl+s")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        "F1" => Ok(KeyCode::F(1)),
        "F2" => Ok(KeyCode::F(2)),
        _ => {
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(60), "1 hr");
        assert_eq!(format_duration(125), "2 hr 5 min");
    }

    #[test]
    fn timestamp_parsing_accepts_common_forms() {
        assert!(parse_timestamp("2024-01-08T10:00:00").is_some());
        assert!(parse_timestamp("2024-01-08T10:00").is_some());
        assert!(parse_timestamp("2024-01-08 10:00:00").is_some());
        assert!(parse_timestamp("2024-01-08T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-01-08").is_some());
        assert!(parse_timestamp("garbage").is_none());
    }

    #[test]
    fn relative_date_labels() {
        let today = Local::now().date_naive();
        assert_eq!(format_date(&today.format("%Y-%m-%d").to_string()), "Today");
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        assert_eq!(format_date(&tomorrow.format("%Y-%m-%d").to_string()), "Tomorrow");
        assert_eq!(format_date("not-a-date"), "not-a-date");
    }
}
