use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    widgets::{Block, Clear, Widget},
};

/// Returns a `width`×`height` area centered within `area`
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
    popup
}

/// Blank out `area` so that the calendar beneath does not show through
pub(crate) fn clear(area: Rect, buf: &mut Buffer, style: Style) {
    Clear.render(area, buf);
    Block::new().style(style).render(area, buf);
}
