use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Fixed layouts for temporal values embedded into text fixture cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralFormat {
    /// `yyyy-MM-dd`
    Date,
    /// `HH:mm:ss`, 24-hour clock.
    Time,
    /// `yyyy-MM-dd HH:mm:ss.SSSSSSSSS`, nanosecond precision.
    Timestamp,
}

impl LiteralFormat {
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Date => "%Y-%m-%d",
            Self::Time => "%H:%M:%S",
            Self::Timestamp => "%Y-%m-%d %H:%M:%S%.9f",
        }
    }
}

#[must_use]
pub fn format_literal(value: &NaiveDateTime, format: LiteralFormat) -> String {
    value.format(format.pattern()).to_string()
}

#[must_use]
pub fn date(value: &NaiveDate) -> String {
    value.format(LiteralFormat::Date.pattern()).to_string()
}

#[must_use]
pub fn time(value: &NaiveTime) -> String {
    value.format(LiteralFormat::Time.pattern()).to_string()
}

#[must_use]
pub fn timestamp(value: &NaiveDateTime) -> String {
    format_literal(value, LiteralFormat::Timestamp)
}
