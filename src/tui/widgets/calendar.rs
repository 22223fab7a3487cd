use chrono::{Datelike, Days, Local, Months, NaiveDate};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::stats::WEEKDAY_LABELS;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// The month grid laid out Sunday-first, padded with the adjacent months'
/// days so every row is a full week
pub fn month_weeks(month_start: NaiveDate) -> Vec<Vec<NaiveDate>> {
    let lead = month_start.weekday().num_days_from_sunday() as u64;
    let grid_start = month_start
        .checked_sub_days(Days::new(lead))
        .unwrap_or(month_start);

    let next_month = month_start
        .checked_add_months(Months::new(1))
        .unwrap_or(month_start);
    let days_in_month = next_month
        .signed_duration_since(month_start)
        .num_days()
        .max(1) as u64;

    let week_count = (lead + days_in_month).div_ceil(7);

    let mut weeks = Vec::new();
    let mut day = grid_start;
    for _ in 0..week_count {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            week.push(day);
            day = day.checked_add_days(Days::new(1)).unwrap_or(day);
        }
        weeks.push(week);
    }
    weeks
}

/// Month view: one cell per day with an event marker, the selected day
/// highlighted and today emphasized
pub fn render_calendar<F>(
    f: &mut Frame,
    area: Rect,
    month_start: NaiveDate,
    selected_day: NaiveDate,
    event_count: F,
    config: &Config,
) where
    F: Fn(NaiveDate) -> usize,
{
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let today = Local::now().date_naive();

    let mut lines: Vec<Line> = Vec::new();

    // Weekday header
    let header_spans: Vec<Span> = WEEKDAY_LABELS
        .iter()
        .map(|day| Span::styled(format!("{:>4} ", day), Style::default().fg(accent)))
        .collect();
    lines.push(Line::from(header_spans));
    lines.push(Line::from(""));

    for week in month_weeks(month_start) {
        let mut spans: Vec<Span> = Vec::with_capacity(7);
        for day in week {
            let in_month = day.month() == month_start.month();
            let marker = if event_count(day) > 0 { "•" } else { " " };
            let cell = format!("{:>3}{} ", day.day(), marker);

            let style = if day == selected_day {
                Style::default().fg(highlight_fg).bg(highlight_bg)
            } else if day == today {
                Style::default().fg(fg).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else if in_month {
                Style::default().fg(fg)
            } else {
                Style::default().fg(accent).add_modifier(Modifier::DIM)
            };

            spans.push(Span::styled(cell, style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[/]: day  {/}: month  t: today",
        Style::default().fg(accent),
    )));

    let title = month_start.format("%B %Y").to_string();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(fg));

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_grid_rows_are_full_weeks_starting_sunday() {
        // January 2024 starts on a Monday
        let month = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let weeks = month_weeks(month);

        assert_eq!(weeks.len(), 5);
        for week in &weeks {
            assert_eq!(week.len(), 7);
            assert_eq!(week[0].weekday().num_days_from_sunday(), 0);
        }
        // Leading cell is the previous month's Sunday
        assert_eq!(weeks[0][0], NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        // Every day of the month is present
        let flat: Vec<NaiveDate> = weeks.concat();
        for day in 1..=31 {
            assert!(flat.contains(&NaiveDate::from_ymd_opt(2024, 1, day).unwrap()));
        }
    }
}
