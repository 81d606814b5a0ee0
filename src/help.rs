use crate::popup;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Paragraph, Widget},
};

static COMMANDS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous day"),
    ("l, RIGHT", "Next day"),
    ("k, UP", "Previous week"),
    ("j, DOWN", "Next week"),
    ("p, PAGE UP", "Previous month"),
    ("n, PAGE DOWN", "Next month"),
    ("0, HOME", "Jump to latest month"),
    ("g", "Input month to go to"),
    ("ENTER, SPACE", "Select date"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEYS_WIDTH: usize = 16;

/// Popup listing the key bindings
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help {
    pub(crate) style: Style,
    pub(crate) disabled: bool,
}

impl Help {
    fn text(self) -> Text<'static> {
        let mut lines = COMMANDS
            .iter()
            .map(|(keys, desc)| Line::raw(format!("{keys:KEYS_WIDTH$}{desc}")))
            .collect::<Vec<_>>();
        lines.push(Line::raw(""));
        if self.disabled {
            lines.push(Line::raw("Selection is disabled."));
        } else {
            lines.push(Line::raw("Dates can also be clicked."));
        }
        lines.push(Line::raw("Press the Any Key to dismiss."));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        // Leave room for the border
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let help_area = popup::centered(area, width, height);
        popup::clear(help_area, buf, self.style);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.style)
            .render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_text() {
        let help = Help {
            style: BASE_STYLE,
            disabled: false,
        };
        let text = help.text();
        assert_eq!(text.lines[0].to_string(), "h, LEFT         Previous day");
        let footer = text.lines[COMMANDS.len()..]
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            footer,
            ["", "Dates can also be clicked.", "Press the Any Key to dismiss."]
        );
    }

    #[test]
    fn test_text_disabled() {
        let help = Help {
            style: BASE_STYLE,
            disabled: true,
        };
        let text = help.text();
        assert!(text
            .lines
            .iter()
            .any(|ln| ln.to_string() == "Selection is disabled."));
    }

    #[test]
    fn test_render_centered() {
        let help = Help {
            style: BASE_STYLE,
            disabled: false,
        };
        let area = Rect::new(0, 0, 50, 20);
        let mut buffer = Buffer::empty(area);
        help.render(area, &mut buffer);
        // 14 lines of text plus the border, 38 columns wide
        assert_eq!(buffer[(6, 2)].symbol(), "┌");
        assert_eq!(buffer[(6, 17)].symbol(), "└");
        assert_eq!(buffer[(43, 17)].symbol(), "┘");
        let title_row = (0..area.width)
            .map(|x| buffer[(x, 2)].symbol())
            .collect::<String>();
        assert!(title_row.contains(" Commands "), "{title_row:?}");
    }
}
