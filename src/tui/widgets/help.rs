use crate::Config;
use crate::tui::widgets::color::parse_color;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);

    // Clear the background first so content does not show through
    f.render_widget(Clear, popup_area);

    let help_text = build_help_text(config);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Centered popup rect, following the ratatui popup example
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn build_help_text(config: &Config) -> String {
    use crate::utils::format_key_binding_for_display as key;
    let bindings = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {}: Switch tabs\n",
        key(&bindings.tab_left),
        key(&bindings.tab_right)
    ));
    text.push_str(&format!(
        "  {}-{}: Jump to tab\n",
        key(&bindings.tab_1),
        key(&bindings.tab_5)
    ));
    text.push_str(&format!(
        "  {} / {}: Navigate list up/down\n",
        key(&bindings.list_up),
        key(&bindings.list_down)
    ));
    text.push_str(&format!("  {}: Select item\n", key(&bindings.select)));
    text.push('\n');

    text.push_str("Actions:\n");
    text.push_str(&format!("  {}: New item\n", key(&bindings.new)));
    text.push_str(&format!("  {}: Edit selected item\n", key(&bindings.edit)));
    text.push_str(&format!("  {}: Delete selected item\n", key(&bindings.delete)));
    text.push_str(&format!(
        "  {}: Toggle done (Tasks and Goals tabs)\n",
        key(&bindings.toggle_complete)
    ));
    text.push_str(&format!("  {}: Manage subjects\n", key(&bindings.subjects)));
    text.push('\n');

    text.push_str("Calendar:\n");
    text.push_str("  [ / ]: Previous/next day\n");
    text.push_str("  { / }: Previous/next month\n");
    text.push_str(&format!("  {}: Jump to today\n", key(&bindings.today)));
    text.push('\n');

    text.push_str("Forms:\n");
    text.push_str("  Tab/Shift+Tab: Next/previous field\n");
    text.push_str("  Left/Right: Cycle picker values\n");
    text.push_str(&format!("  {}: Save\n", key(&bindings.save)));
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&bindings.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&bindings.help)));
    text.push_str(&format!("  {}: Toggle sidebar\n", key(&bindings.toggle_sidebar)));

    text
}
