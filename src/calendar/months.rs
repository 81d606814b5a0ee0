use super::util::{month_range, YearMonth};
use thiserror::Error;
use time::Date;

/// The months that can be paged through, and which of them is shown
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthPager {
    // Invariant: `months` is nonempty, sorted, and `index < months.len()`
    months: Vec<YearMonth>,
    index: usize,
}

impl MonthPager {
    /// Create a pager spanning the months from `start` through `end`,
    /// initially showing the last of them
    pub(crate) fn new(start: Date, end: Date) -> Self {
        let months = month_range(start.min(end), start.max(end));
        let index = months.len().saturating_sub(1);
        MonthPager { months, index }
    }

    pub(crate) fn visible(&self) -> YearMonth {
        self.months[self.index]
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub(crate) fn has_next(&self) -> bool {
        self.index + 1 < self.months.len()
    }

    pub(crate) fn previous(&mut self) -> Result<YearMonth, OutOfRangeError> {
        if self.has_previous() {
            self.index -= 1;
            Ok(self.visible())
        } else {
            Err(OutOfRangeError)
        }
    }

    pub(crate) fn next(&mut self) -> Result<YearMonth, OutOfRangeError> {
        if self.has_next() {
            self.index += 1;
            Ok(self.visible())
        } else {
            Err(OutOfRangeError)
        }
    }

    pub(crate) fn jump_to(&mut self, ym: YearMonth) -> Result<YearMonth, OutOfRangeError> {
        let index = self.months.binary_search(&ym).map_err(|_| OutOfRangeError)?;
        self.index = index;
        Ok(ym)
    }

    pub(crate) fn last_page(&mut self) -> YearMonth {
        self.index = self.months.len() - 1;
        self.visible()
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("month is outside of the available range")]
pub(crate) struct OutOfRangeError;
