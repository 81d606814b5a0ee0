use super::picker::{CellKind, DatePicker, DayCell, Target};
use super::util::WeekdayExt;
use crate::theme::{
    AVAILABLE_STYLE, CURSOR_STYLE, EMPTY_STYLE, MISSING_STYLE, NAV_DISABLED_STYLE, NAV_STYLE,
    SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Text,
    widgets::{Paragraph, StatefulWidget, Widget},
};
use std::iter::zip;

static WEEKDAY_HEADER: &str = " Mon  Tue  Wed  Thu  Fri  Sat  Sun ";

static PREVIOUS_BUTTON: &str = "  ←  ";

static NEXT_BUTTON: &str = "  →  ";

/// Number of columns per day of week
const DAY_WIDTH: u16 = 5;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Width of each of the "previous" and "next" buttons, which sit above the
/// first and last columns of days
const BUTTON_WIDTH: u16 = DAY_WIDTH;

/// Width of the space between the buttons in which the month is written
const TITLE_WIDTH: u16 = MAIN_WIDTH - 2 * BUTTON_WIDTH;

const NAV_LINE: u16 = 0;

const WEEKDAY_LINE: u16 = 2;

const RULE_LINE: u16 = 3;

/// Number of lines above the first week
const HEADER_LINES: u16 = 4;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar {
    nav_style: Style,
}

impl Calendar {
    pub(crate) fn new() -> Calendar {
        Calendar {
            nav_style: NAV_STYLE,
        }
    }

    /// Use the given color for the enabled navigation buttons
    pub(crate) fn nav_color(mut self, color: Option<Color>) -> Calendar {
        if let Some(c) = color {
            self.nav_style = self.nav_style.fg(c);
        }
        self
    }
}

impl Default for Calendar {
    fn default() -> Calendar {
        Calendar::new()
    }
}

impl StatefulWidget for Calendar {
    type State = DatePicker;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        state.clear_hits();
        let month = state.visible_month();
        let mut canvas = BufferCanvas::new(area, buf);

        let prev_style = if state.has_previous() {
            self.nav_style
        } else {
            NAV_DISABLED_STYLE
        };
        canvas.mvprint(NAV_LINE, 0, PREVIOUS_BUTTON, prev_style);
        if let Some(r) = canvas.area_at(NAV_LINE, 0, BUTTON_WIDTH) {
            state.add_hit(r, Target::Previous);
        }
        let title = month.to_string();
        let title_width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        canvas.mvprint(
            NAV_LINE,
            BUTTON_WIDTH + TITLE_WIDTH.saturating_sub(title_width) / 2,
            title,
            TITLE_STYLE,
        );
        let next_style = if state.has_next() {
            self.nav_style
        } else {
            NAV_DISABLED_STYLE
        };
        let next_x = MAIN_WIDTH - BUTTON_WIDTH;
        canvas.mvprint(NAV_LINE, next_x, NEXT_BUTTON, next_style);
        if let Some(r) = canvas.area_at(NAV_LINE, next_x, BUTTON_WIDTH) {
            state.add_hit(r, Target::Next);
        }

        canvas.mvprint(WEEKDAY_LINE, 0, WEEKDAY_HEADER, WEEKDAY_STYLE);
        canvas.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);

        for (i, week) in zip(0u16.., month.weeks()) {
            let y = HEADER_LINES + i * WEEK_LINES;
            for (wd, date) in week.days() {
                let x = DAY_WIDTH * wd.index0();
                if let Some(r) = canvas.area_at(y, x, DAY_WIDTH) {
                    state.add_hit(r, Target::Day(date));
                }
                let cell = state.cell(date);
                // Days from neighboring months are left blank
                if cell.in_month {
                    canvas.draw_day(y, x, cell);
                }
            }
        }
    }
}

fn day_style(cell: DayCell) -> Style {
    let mut style = match cell.kind {
        CellKind::Available => AVAILABLE_STYLE,
        CellKind::Missing => MISSING_STYLE,
        CellKind::Empty => EMPTY_STYLE,
    };
    if cell.selected {
        style = style.patch(SELECTED_STYLE);
    }
    if cell.cursor {
        style = style.patch(CURSOR_STYLE);
    }
    style
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    // The day number is drawn one column in from the left edge of its cell
    fn draw_day(&mut self, y: u16, x: u16, cell: DayCell) {
        let s = if cell.selected {
            format!("[{:2}]", cell.date.day())
        } else {
            format!(" {:2} ", cell.date.day())
        };
        self.mvprint(y, x + 1, s, day_style(cell));
    }

    /// Returns the area of the buffer covered by `width` columns starting at
    /// (`x`, `y`) relative to the canvas, truncated to fit within the canvas
    fn area_at(&self, y: u16, x: u16, width: u16) -> Option<Rect> {
        (y < self.area.height && x < self.area.width).then(|| Rect {
            x: x + self.area.x,
            y: y + self.area.y,
            width: (self.area.width - x).min(width),
            height: 1,
        })
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        let text = Text::styled(s.as_ref(), style);
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        // Using a Paragraph lets us truncate text that extends beyond the
        // calendar's area.
        if let Some(area) = self.area_at(y, x, width) {
            Paragraph::new(text).render(area, self.buf);
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}
