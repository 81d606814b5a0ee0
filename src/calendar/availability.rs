use super::util::{parse_date, InvalidDateError};
use std::collections::BTreeSet;
use time::Date;

/// The set of dates the host has data for
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Availability(BTreeSet<Date>);

impl Availability {
    /// Parse `YYYY-MM-DD` strings into an availability set.  Order and
    /// duplicates in the input do not matter.
    pub(crate) fn parse<I, S>(values: I) -> Result<Availability, InvalidDateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .map(|s| parse_date(s.as_ref().trim()))
            .collect()
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.0.contains(&date)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn first(&self) -> Option<Date> {
        self.0.first().copied()
    }

    pub(crate) fn last(&self) -> Option<Date> {
        self.0.last().copied()
    }

    /// Returns the first and last available dates, using `today` for either
    /// end if there are no dates
    pub(crate) fn span(&self, today: Date) -> (Date, Date) {
        (
            self.first().unwrap_or(today),
            self.last().unwrap_or(today),
        )
    }
}

impl FromIterator<Date> for Availability {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        Availability(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_unsorted() {
        let avail = Availability::parse(["2025-01-15", "2024-12-30", " 2025-01-02 ", "2025-01-15"])
            .unwrap();
        assert_eq!(avail.len(), 3);
        assert_eq!(avail.first(), Some(date!(2024 - 12 - 30)));
        assert_eq!(avail.last(), Some(date!(2025 - 01 - 15)));
        assert!(avail.contains(date!(2025 - 01 - 02)));
        assert!(!avail.contains(date!(2025 - 01 - 03)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Availability::parse(["2025-01-15", "15/01/2025"]).is_err());
    }

    #[test]
    fn test_span_empty() {
        let avail = Availability::default();
        let today = date!(2025 - 01 - 22);
        assert_eq!(avail.span(today), (today, today));
    }

    #[test]
    fn test_span() {
        let avail = [date!(2025 - 03 - 01), date!(2024 - 11 - 11)]
            .into_iter()
            .collect::<Availability>();
        assert_eq!(
            avail.span(date!(2025 - 01 - 22)),
            (date!(2024 - 11 - 11), date!(2025 - 03 - 01))
        );
    }
}
