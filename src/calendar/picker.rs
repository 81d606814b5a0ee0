use super::availability::Availability;
use super::months::{MonthPager, OutOfRangeError};
use super::util::YearMonth;
use ratatui::layout::{Position, Rect};
use thiserror::Error;
use time::{Date, Duration};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum CellKind {
    /// In the visible month, not in the future, and supplied by the host
    Available,
    /// In the visible month and not in the future, but not supplied by the
    /// host
    Missing,
    /// Outside the visible month or after today
    Empty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) kind: CellKind,
    pub(crate) in_month: bool,
    pub(crate) selected: bool,
    pub(crate) cursor: bool,
}

/// Something on screen that responds to a mouse click
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Target {
    Previous,
    Next,
    Day(Date),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker {
    today: Date,
    available: Availability,
    pager: MonthPager,
    selected: Option<Date>,
    cursor: Date,
    disabled: bool,
    // Screen areas of the clickable parts of the last render
    hits: Vec<(Rect, Target)>,
}

impl DatePicker {
    pub(crate) fn new(today: Date, available: Availability) -> Self {
        let (start, end) = available.span(today);
        DatePicker {
            today,
            pager: MonthPager::new(start, end),
            available,
            selected: None,
            cursor: end,
            disabled: false,
            hits: Vec::new(),
        }
    }

    pub(crate) fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub(crate) fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn visible_month(&self) -> YearMonth {
        self.pager.visible()
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.pager.has_previous()
    }

    pub(crate) fn has_next(&self) -> bool {
        self.pager.has_next()
    }

    pub(crate) fn cell_kind(&self, date: Date) -> CellKind {
        if !self.visible_month().contains(date) || date > self.today {
            CellKind::Empty
        } else if self.available.contains(date) {
            CellKind::Available
        } else {
            CellKind::Missing
        }
    }

    pub(crate) fn cell(&self, date: Date) -> DayCell {
        DayCell {
            date,
            kind: self.cell_kind(date),
            in_month: self.visible_month().contains(date),
            selected: self.selected == Some(date),
            cursor: !self.disabled && self.cursor == date,
        }
    }

    pub(crate) fn previous_month(&mut self) -> Result<YearMonth, OutOfRangeError> {
        let ym = self.pager.previous()?;
        self.follow_page(ym);
        Ok(ym)
    }

    pub(crate) fn next_month(&mut self) -> Result<YearMonth, OutOfRangeError> {
        let ym = self.pager.next()?;
        self.follow_page(ym);
        Ok(ym)
    }

    pub(crate) fn jump_to(&mut self, ym: YearMonth) -> Result<YearMonth, OutOfRangeError> {
        let ym = self.pager.jump_to(ym)?;
        self.follow_page(ym);
        Ok(ym)
    }

    /// Return to the month shown at startup
    pub(crate) fn reset(&mut self) {
        let ym = self.pager.last_page();
        self.follow_page(ym);
    }

    fn follow_page(&mut self, ym: YearMonth) {
        log::debug!("showing {ym}");
        self.cursor = ym.clamp_day(self.cursor.day());
    }

    /// Move the cursor by the given number of days, changing the visible month
    /// if the cursor crosses into another month in range
    pub(crate) fn move_cursor(&mut self, days: i64) -> Result<Date, OutOfRangeError> {
        let target = self
            .cursor
            .checked_add(Duration::days(days))
            .ok_or(OutOfRangeError)?;
        let ym = YearMonth::containing(target);
        if ym != self.visible_month() {
            self.pager.jump_to(ym)?;
            log::debug!("showing {ym}");
        }
        self.cursor = target;
        Ok(target)
    }

    /// Select `date`.  Nothing changes if the picker is disabled or the date's
    /// cell is empty.
    pub(crate) fn select(&mut self, date: Date) -> Result<Date, SelectError> {
        if self.disabled {
            return Err(SelectError::Disabled);
        }
        if !self.visible_month().contains(date) {
            return Err(SelectError::OutsideMonth(date));
        }
        if self.cell_kind(date) == CellKind::Empty {
            return Err(SelectError::Future(date));
        }
        self.selected = Some(date);
        self.cursor = date;
        Ok(date)
    }

    pub(crate) fn select_cursor(&mut self) -> Result<Date, SelectError> {
        self.select(self.cursor)
    }

    pub(super) fn clear_hits(&mut self) {
        self.hits.clear();
    }

    pub(super) fn add_hit(&mut self, area: Rect, target: Target) {
        self.hits.push((area, target));
    }

    /// Returns what was drawn at the given screen position by the last render
    pub(crate) fn target_at(&self, column: u16, row: u16) -> Option<Target> {
        self.hits
            .iter()
            .find(|(area, _)| area.contains(Position::new(column, row)))
            .map(|&(_, target)| target)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum SelectError {
    #[error("the picker is disabled")]
    Disabled,
    #[error("{0} is not in the visible month")]
    OutsideMonth(Date),
    #[error("{0} is after today")]
    Future(Date),
}
