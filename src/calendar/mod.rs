mod availability;
mod months;
mod picker;
mod util;
mod widget;
pub(crate) use self::availability::Availability;
pub(crate) use self::picker::{DatePicker, SelectError, Target};
pub(crate) use self::util::{format_date, parse_date, InvalidDateError, YearMonth};
pub(crate) use self::widget::Calendar;
