use crate::calendar::YearMonth;
use crate::popup;
use crate::theme::{
    goto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 15;
const OUTER_HEIGHT: u16 = 8;
const ENTER_POS: usize = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GoTo;

impl StatefulWidget for GoTo {
    type State = GoToState;

    /*
     * ...............
     * .┌─ Go To… ──┐.
     * .│           │.
     * .│  YYYY-MM  │.
     * .│           │.
     * .│  [ENTER]  │.
     * .└───────────┘.
     * ...............
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let outer_area = popup::centered(area, OUTER_WIDTH, OUTER_HEIGHT);
        popup::clear(outer_area, buf, BASE_STYLE);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Go To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Input state of the popup for typing in a month to show
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct GoToState {
    year: [Option<u8>; 4],
    month: [Option<u8>; 2],
    pos: usize,
}

impl GoToState {
    pub(crate) fn new() -> GoToState {
        GoToState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        for (fallback, digits) in [("Y", self.year.as_slice()), ("M", self.month.as_slice())] {
            if !spans.is_empty() {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            for dg in digits {
                spans.push(match dg {
                    Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                    None => Span::styled(fallback, UNFILLED_CELL_STYLE),
                });
            }
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: GoToInput) -> GoToOutput {
        match (input, self.pos) {
            (GoToInput::Digit(d), 0..ENTER_POS) => {
                match self.pos {
                    0..4 => self.year[self.pos] = Some(d),
                    _ => self.month[self.pos - 4] = Some(d),
                }
                self.pos += 1;
                GoToOutput::Ok
            }
            (GoToInput::Backspace, 1..) => {
                self.pos -= 1;
                match self.pos {
                    0..4 => self.year[self.pos] = None,
                    _ => self.month[self.pos - 4] = None,
                }
                GoToOutput::Ok
            }
            (GoToInput::Enter, ENTER_POS) => {
                let year = self
                    .year
                    .iter()
                    .flatten()
                    .fold(0i32, |acc, &d| acc * 10 + i32::from(d));
                let month = self.month.iter().flatten().fold(0u8, |acc, &d| acc * 10 + d);
                let Ok(month) = time::Month::try_from(month) else {
                    return GoToOutput::Invalid;
                };
                match YearMonth::new(year, month) {
                    Some(ym) => GoToOutput::Jump(ym),
                    None => GoToOutput::Invalid,
                }
            }
            _ => GoToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GoToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GoToOutput {
    Ok,
    Invalid,
    Jump(YearMonth),
}
