use crate::calendar::{format_date, Calendar, DatePicker, SelectError, Target};
use crate::goto::{GoTo, GoToInput, GoToOutput, GoToState};
use crate::help::Help;
use crate::host::Host;
use crate::theme::BASE_STYLE;
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<H> {
    picker: DatePicker,
    host: H,
    state: AppState,
    keep_open: bool,
    nav_color: Option<Color>,
}

impl<H: Host> App<H> {
    pub(crate) fn new(picker: DatePicker, host: H) -> App<H> {
        App {
            picker,
            host,
            state: AppState::Picking,
            keep_open: false,
            nav_color: None,
        }
    }

    /// Keep running after a date is selected instead of quitting
    pub(crate) fn keep_open(mut self, keep_open: bool) -> App<H> {
        self.keep_open = keep_open;
        self
    }

    pub(crate) fn nav_color(mut self, color: Option<Color>) -> App<H> {
        self.nav_color = color;
        self
    }

    /// Run until the user quits or, unless keeping open, selects a date.
    ///
    /// The host is handed back even if reading or drawing fails, so that the
    /// caller can still deliver any values it is holding.
    pub(crate) fn run<B: Backend>(self, terminal: &mut Terminal<B>) -> (H, io::Result<()>) {
        self.run_with(terminal, read)
    }

    fn run_with<B, E>(
        mut self,
        terminal: &mut Terminal<B>,
        mut next_event: E,
    ) -> (H, io::Result<()>)
    where
        B: Backend,
        E: FnMut() -> io::Result<Event>,
    {
        let r = self.event_loop(terminal, &mut next_event);
        (self.host, r)
    }

    fn event_loop<B, E>(
        &mut self,
        terminal: &mut Terminal<B>,
        next_event: &mut E,
    ) -> io::Result<()>
    where
        B: Backend,
        E: FnMut() -> io::Result<Event>,
    {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_event(next_event()?)?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code)? {
                    self.beep()?;
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.handle_click(column, row)?,
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            _ => (),
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> io::Result<bool> {
        let ok = match &mut self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left => self.picker.move_cursor(-1).is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.picker.move_cursor(1).is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.picker.move_cursor(-7).is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.picker.move_cursor(7).is_ok(),
                KeyCode::Char('p') | KeyCode::PageUp => self.picker.previous_month().is_ok(),
                KeyCode::Char('n') | KeyCode::PageDown => self.picker.next_month().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.picker.reset();
                    true
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let outcome = self.picker.select_cursor();
                    self.report(outcome)?
                }
                KeyCode::Char('g') => {
                    self.state = AppState::GoingTo(GoToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::GoingTo(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Picking;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char(c) => match digit(c) {
                            Some(d) => state.handle_input(GoToInput::Digit(d)),
                            None => GoToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(GoToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(GoToInput::Enter),
                        _ => GoToOutput::Invalid,
                    };
                    match output {
                        GoToOutput::Ok => true,
                        GoToOutput::Invalid => false,
                        GoToOutput::Jump(ym) => match self.picker.jump_to(ym) {
                            Ok(_) => {
                                self.state = AppState::Picking;
                                true
                            }
                            Err(e) => {
                                log::debug!("cannot go to {ym}: {e}");
                                false
                            }
                        },
                    }
                }
            }
            AppState::Quitting => false,
        };
        Ok(ok)
    }

    fn handle_click(&mut self, column: u16, row: u16) -> io::Result<()> {
        match self.state {
            AppState::Picking => match self.picker.target_at(column, row) {
                Some(Target::Previous) => {
                    if let Err(e) = self.picker.previous_month() {
                        log::debug!("ignoring click on previous button: {e}");
                    }
                }
                Some(Target::Next) => {
                    if let Err(e) = self.picker.next_month() {
                        log::debug!("ignoring click on next button: {e}");
                    }
                }
                Some(Target::Day(date)) => {
                    let outcome = self.picker.select(date);
                    self.report(outcome)?;
                }
                None => (),
            },
            AppState::Helping => self.state = AppState::Picking,
            AppState::GoingTo(_) | AppState::Quitting => (),
        }
        Ok(())
    }

    // Returns `false` if nothing was selected
    fn report(&mut self, outcome: Result<Date, SelectError>) -> io::Result<bool> {
        match outcome {
            Ok(date) => {
                let value = format_date(date);
                log::info!("selected {value}");
                self.host.set_value(&value)?;
                if !self.keep_open {
                    self.state = AppState::Quitting;
                }
                Ok(true)
            }
            Err(e) => {
                log::debug!("selection ignored: {e}");
                Ok(false)
            }
        }
    }

    // The calendar is drawn on stderr, so that's where the bell goes too.
    fn beep(&self) -> io::Result<()> {
        let mut stderr = io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<H> Widget for &mut App<H> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Calendar::new()
            .nav_color(self.nav_color)
            .render(area, buf, &mut self.picker);
        match self.state {
            AppState::Helping => Help {
                style: BASE_STYLE,
                disabled: self.picker.is_disabled(),
            }
            .render(area, buf),
            AppState::GoingTo(ref mut state) => GoTo.render(area, buf, state),
            AppState::Picking | AppState::Quitting => (),
        }
    }
}

fn digit(c: char) -> Option<u8> {
    c.to_digit(10).and_then(|d| u8::try_from(d).ok())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    GoingTo(GoToState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Availability, YearMonth};
    use crate::theme::{
        AVAILABLE_STYLE, CURSOR_STYLE, EMPTY_STYLE, MISSING_STYLE, NAV_DISABLED_STYLE, NAV_STYLE,
        SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
    };
    use ratatui::backend::TestBackend;
    use time::macros::date;

    fn january() -> App<Vec<String>> {
        let available = Availability::parse([
            "2024-12-30",
            "2025-01-02",
            "2025-01-06",
            "2025-01-15",
            "2025-01-20",
        ])
        .unwrap();
        let picker = DatePicker::new(date!(2025 - 01 - 22), available);
        App::new(picker, Vec::new())
    }

    fn render(app: &mut App<Vec<String>>) -> Buffer {
        let area = Rect::new(0, 0, 35, 14);
        let mut buffer = Buffer::empty(area);
        Widget::render(app, area, &mut buffer);
        buffer
    }

    fn screen_text(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_render_january() {
        let mut app = january();
        let buffer = render(&mut app);
        let mut expected = Buffer::with_lines([
            "  ←        January 2025         →  ",
            "                                   ",
            " Mon  Tue  Wed  Thu  Fri  Sat  Sun ",
            "───────────────────────────────────",
            "             1    2    3    4    5 ",
            "                                   ",
            "   6    7    8    9   10   11   12 ",
            "                                   ",
            "  13   14   15   16   17   18   19 ",
            "                                   ",
            "  20   21   22   23   24   25   26 ",
            "                                   ",
            "  27   28   29   30   31           ",
            "                                   ",
        ]);
        expected.set_style(*expected.area(), BASE_STYLE);
        expected.set_style(Rect::new(0, 0, 5, 1), NAV_STYLE);
        expected.set_style(Rect::new(11, 0, 12, 1), TITLE_STYLE);
        expected.set_style(Rect::new(30, 0, 5, 1), NAV_DISABLED_STYLE);
        expected.set_style(Rect::new(0, 2, 35, 1), WEEKDAY_STYLE);
        expected.set_style(Rect::new(11, 4, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(16, 4, 4, 1), AVAILABLE_STYLE);
        expected.set_style(Rect::new(21, 4, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(26, 4, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(31, 4, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(1, 6, 4, 1), AVAILABLE_STYLE);
        expected.set_style(Rect::new(6, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(11, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(16, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(21, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(26, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(31, 6, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(1, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(6, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(11, 8, 4, 1), AVAILABLE_STYLE);
        expected.set_style(Rect::new(16, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(21, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(26, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(31, 8, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(1, 10, 4, 1), AVAILABLE_STYLE.patch(CURSOR_STYLE));
        expected.set_style(Rect::new(6, 10, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(11, 10, 4, 1), MISSING_STYLE);
        expected.set_style(Rect::new(16, 10, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(21, 10, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(26, 10, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(31, 10, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(1, 12, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(6, 12, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(11, 12, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(16, 12, 4, 1), EMPTY_STYLE);
        expected.set_style(Rect::new(21, 12, 4, 1), EMPTY_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_render_selected() {
        let mut app = january().keep_open(true);
        assert!(app.handle_key(KeyCode::Char('k')).unwrap());
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.host, ["2025-01-15"]);
        let buffer = render(&mut app);
        let text = screen_text(&buffer);
        assert_eq!(text[8], "  13   14  [15]  16   17   18   19 ");
        let cell = &buffer[(12, 8)];
        let style = AVAILABLE_STYLE.patch(SELECTED_STYLE).patch(CURSOR_STYLE);
        assert_eq!(cell.fg, style.fg.unwrap_or_default());
        assert_eq!(cell.bg, style.bg.unwrap_or_default());
        assert_eq!(cell.modifier, style.add_modifier);
    }

    #[test]
    fn test_render_centered() {
        let mut app = january();
        let area = Rect::new(0, 0, 45, 14);
        let mut buffer = Buffer::empty(area);
        Widget::render(&mut app, area, &mut buffer);
        let text = screen_text(&buffer);
        assert_eq!(text[2], "      Mon  Tue  Wed  Thu  Fri  Sat  Sun      ");
        assert_eq!(
            app.picker.target_at(5, 6),
            Some(Target::Day(date!(2025 - 01 - 06)))
        );
        assert_eq!(app.picker.target_at(4, 6), None);
    }

    #[test]
    fn test_click_selects_and_reports() {
        let mut app = january();
        render(&mut app);
        // Tuesday of the second week
        app.handle_click(8, 6).unwrap();
        assert_eq!(app.host, ["2025-01-07"]);
        assert!(app.picker.cell(date!(2025 - 01 - 07)).selected);
        assert!(app.quitting());
    }

    #[test]
    fn test_keep_open_reports_every_selection() {
        let mut app = january().keep_open(true);
        render(&mut app);
        app.handle_click(8, 6).unwrap();
        app.handle_click(12, 8).unwrap();
        assert_eq!(app.host, ["2025-01-07", "2025-01-15"]);
        assert!(app.picker.cell(date!(2025 - 01 - 15)).selected);
        assert!(!app.quitting());
    }

    #[test]
    fn test_click_outside_month_does_nothing() {
        let mut app = january();
        render(&mut app);
        // December 30th, shown as padding before January 1st
        app.handle_click(2, 4).unwrap();
        // February 1st, shown as padding after January 31st
        app.handle_click(27, 12).unwrap();
        assert!(app.host.is_empty());
        assert!(!app.picker.cell(date!(2024 - 12 - 30)).selected);
        assert!(!app.quitting());
    }

    #[test]
    fn test_click_future_does_nothing() {
        let mut app = january();
        render(&mut app);
        // January 25th
        app.handle_click(27, 10).unwrap();
        assert!(app.host.is_empty());
        assert!(!app.picker.cell(date!(2025 - 01 - 25)).selected);
    }

    #[test]
    fn test_click_disabled_does_nothing() {
        let mut app = january();
        app.picker = app.picker.clone().disabled(true);
        render(&mut app);
        app.handle_click(12, 8).unwrap();
        assert!(app.host.is_empty());
        assert!(!app.picker.cell(date!(2025 - 01 - 15)).selected);
        assert!(!app.quitting());
    }

    #[test]
    fn test_click_nav_buttons() {
        let mut app = january();
        render(&mut app);
        app.handle_click(2, 0).unwrap();
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2024 - 12 - 01))
        );
        let buffer = render(&mut app);
        let text = screen_text(&buffer);
        assert_eq!(text[0], "  ←        December 2024        →  ");
        assert_eq!(buffer[(2, 0)].fg, NAV_DISABLED_STYLE.fg.unwrap_or_default());
        // Already on the first month
        app.handle_click(2, 0).unwrap();
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2024 - 12 - 01))
        );
        app.handle_click(32, 0).unwrap();
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2025 - 01 - 01))
        );
    }

    #[test]
    fn test_keyboard_selection() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Left).unwrap());
        assert!(app.handle_key(KeyCode::Char('k')).unwrap());
        assert!(app.handle_key(KeyCode::Char(' ')).unwrap());
        assert_eq!(app.host, ["2025-01-12"]);
        assert!(app.quitting());
    }

    #[test]
    fn test_enter_on_future_date() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('j')).unwrap());
        assert!(!app.handle_key(KeyCode::Enter).unwrap());
        assert!(app.host.is_empty());
        assert!(!app.quitting());
    }

    #[test]
    fn test_cursor_stops_at_range() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('j')).unwrap());
        assert!(!app.handle_key(KeyCode::Char('j')).unwrap());
        assert!(!app.handle_key(KeyCode::PageDown).unwrap());
        assert!(app.handle_key(KeyCode::PageUp).unwrap());
        assert!(!app.handle_key(KeyCode::Char('p')).unwrap());
        assert!(app.handle_key(KeyCode::Home).unwrap());
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2025 - 01 - 01))
        );
    }

    #[test]
    fn test_invalid_key() {
        let mut app = january();
        assert!(!app.handle_key(KeyCode::Char('x')).unwrap());
        assert_eq!(app.state, AppState::Picking);
    }

    #[test]
    fn test_go_to() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('g')).unwrap());
        for c in "202412".chars() {
            assert!(app.handle_key(KeyCode::Char(c)).unwrap());
        }
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.state, AppState::Picking);
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2024 - 12 - 01))
        );
    }

    #[test]
    fn test_go_to_out_of_range() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('g')).unwrap());
        for c in "202302".chars() {
            assert!(app.handle_key(KeyCode::Char(c)).unwrap());
        }
        assert!(!app.handle_key(KeyCode::Enter).unwrap());
        assert!(matches!(app.state, AppState::GoingTo(_)));
        assert!(app.handle_key(KeyCode::Esc).unwrap());
        assert_eq!(app.state, AppState::Picking);
        assert_eq!(
            app.picker.visible_month(),
            YearMonth::containing(date!(2025 - 01 - 01))
        );
    }

    #[test]
    fn test_help() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('?')).unwrap());
        let area = Rect::new(0, 0, 50, 20);
        let mut buffer = Buffer::empty(area);
        Widget::render(&mut app, area, &mut buffer);
        assert!(screen_text(&buffer)
            .iter()
            .any(|ln| ln.contains(" Commands ")));
        assert!(app.handle_key(KeyCode::Char('x')).unwrap());
        assert_eq!(app.state, AppState::Picking);
    }

    #[test]
    fn test_quit() {
        let mut app = january();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.quitting());
        assert!(app.host.is_empty());
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_run_quits_after_click() {
        let mut terminal = Terminal::new(TestBackend::new(35, 14)).unwrap();
        let mut events = [click(8, 6)].into_iter();
        let (host, r) = january().run_with(&mut terminal, || {
            events
                .next()
                .ok_or_else(|| io::Error::other("no more events"))
        });
        assert!(r.is_ok());
        assert_eq!(host, ["2025-01-07"]);
    }

    #[test]
    fn test_run_returns_host_on_error() {
        let mut terminal = Terminal::new(TestBackend::new(35, 14)).unwrap();
        let mut events = [click(8, 6), click(12, 8)].into_iter();
        let (host, r) = january().keep_open(true).run_with(&mut terminal, || {
            events
                .next()
                .ok_or_else(|| io::Error::other("terminal went away"))
        });
        assert_eq!(r.unwrap_err().to_string(), "terminal went away");
        assert_eq!(host, ["2025-01-07", "2025-01-15"]);
    }
}
