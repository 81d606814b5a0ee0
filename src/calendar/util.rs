use std::fmt;
use std::iter::successors;
use thiserror::Error;
use time::{
    format_description::FormatItem,
    macros::format_description,
    Date, Month,
    Weekday::{self, Monday, Sunday},
};

pub(crate) const DAYS_IN_WEEK: usize = 7;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(super) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_monday().into()
    }
}

/// Format a date as `YYYY-MM-DD`, the form in which dates are exchanged with
/// the host
pub(crate) fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub(crate) fn parse_date(s: &str) -> Result<Date, InvalidDateError> {
    Date::parse(s, &YMD_FMT).map_err(|source| InvalidDateError {
        value: s.to_owned(),
        source,
    })
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date {value:?}; expected YYYY-MM-DD")]
pub(crate) struct InvalidDateError {
    value: String,
    source: time::error::Parse,
}

/// A calendar month, represented by its first day
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct YearMonth(Date);

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> Option<YearMonth> {
        Date::from_calendar_date(year, month, 1).ok().map(YearMonth)
    }

    pub(crate) fn containing(date: Date) -> YearMonth {
        // Day 1 exists in every month
        YearMonth(date.replace_day(1).unwrap_or(date))
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    pub(crate) fn last_day(self) -> Date {
        self.days().last().unwrap_or(self.0)
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub(crate) fn next(self) -> Option<YearMonth> {
        self.last_day().next_day().map(YearMonth)
    }

    /// Returns the date in this month with the given day number, or the last
    /// day of the month if the month is too short
    pub(crate) fn clamp_day(self, day: u8) -> Date {
        self.days()
            .take(usize::from(day.max(1)))
            .last()
            .unwrap_or(self.0)
    }

    /// Returns the rows of the month's calendar grid, from the week containing
    /// the first of the month through the week containing the last.
    pub(crate) fn weeks(self) -> Vec<Week> {
        let last = self.last_day();
        successors(Some(Week::containing(self.0)), Week::following)
            .take_while(|w| w.first().is_some_and(|d| d <= last))
            .collect()
    }

    fn days(self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.0), |d| d.next_day()).take_while(move |d| d.month() == month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

/// All months from the month of `start` through the month of `end`
/// inclusive
pub(crate) fn month_range(start: Date, end: Date) -> Vec<YearMonth> {
    let last = YearMonth::containing(end);
    successors(Some(YearMonth::containing(start)), |ym| ym.next())
        .take_while(|&ym| ym <= last)
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
// Invariant: At least one element of the array is Some.  Elements are only
// None at the edges of representable time.
pub(crate) struct Week([Option<Date>; DAYS_IN_WEEK]);

impl Week {
    /// Returns the Monday-to-Sunday week containing the given date
    pub(crate) fn containing(date: Date) -> Week {
        let i = usize::from(date.weekday().index0());
        let mut week = Week([None; DAYS_IN_WEEK]);
        week.set(date);
        for d in iter_days_before(date).take(i) {
            week.set(d);
        }
        for d in iter_days_after(date).take(DAYS_IN_WEEK - i - 1) {
            week.set(d);
        }
        week
    }

    fn set(&mut self, date: Date) {
        if let Some(slot) = self.0.get_mut(usize::from(date.weekday().index0())) {
            *slot = Some(date);
        }
    }

    pub(crate) fn get(&self, wd: Weekday) -> Option<Date> {
        self.0.get(usize::from(wd.index0())).copied().flatten()
    }

    pub(crate) fn first(&self) -> Option<Date> {
        self.0.iter().flatten().next().copied()
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = (Weekday, Date)> {
        successors(Some(Monday), |wd| Some(wd.next()))
            .zip(self.0)
            .filter_map(|(wd, d)| d.map(|d| (wd, d)))
    }

    pub(crate) fn following(&self) -> Option<Week> {
        self.get(Sunday)
            .and_then(Date::next_day)
            .map(Week::containing)
    }
}

fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}
