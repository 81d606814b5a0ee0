use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const NAV_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const NAV_DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const AVAILABLE_STYLE: Style = BASE_STYLE
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

pub(crate) const MISSING_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const EMPTY_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

// The following are patched on top of one of the day styles above.

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

pub(crate) mod goto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
