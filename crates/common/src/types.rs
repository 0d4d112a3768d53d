use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest sequence value an invoice number can carry within one period.
///
/// The sequence is rendered as four zero-padded digits, so a period that
/// would need a fifth digit is exhausted instead of wrapping.
pub const SEQUENCE_MAX: u32 = 9999;

/// Errors from constructing or parsing periods and invoice numbers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceNumberError {
    /// The input is not a valid `YYYYMM` period.
    #[error("invalid period: {0:?}")]
    InvalidPeriod(String),

    /// The input is not a valid `YYYYMM-NNNN` invoice number.
    #[error("invalid invoice number: {0:?}")]
    InvalidFormat(String),

    /// The sequence value is outside `1..=9999`.
    #[error("invoice sequence out of range: {0}")]
    SequenceOutOfRange(u32),
}

/// Calendar year-month used as the invoice-sequence namespace.
///
/// Rendered as `YYYYMM` (e.g. `202608`). Sequences are allocated per
/// period and reset to 1 when a new period begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period from an explicit year and month.
    pub fn new(year: i32, month: u32) -> Result<Self, InvoiceNumberError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(InvoiceNumberError::InvalidPeriod(format!(
                "{year:04}{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Derives the allocation period from a timestamp.
    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = InvoiceNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvoiceNumberError::InvalidPeriod(s.to_string());
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: i32 = s[..4].parse().map_err(|_| err())?;
        let month: u32 = s[4..].parse().map_err(|_| err())?;
        Period::new(year, month).map_err(|_| err())
    }
}

impl TryFrom<String> for Period {
    type Error = InvoiceNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Unique, human-readable invoice identifier of the form `YYYYMM-NNNN`.
///
/// The prefix is the allocation [`Period`]; the suffix is a 4-digit
/// zero-padded sequence that is unique and strictly increasing within
/// that period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
    period: Period,
    sequence: u32,
}

impl InvoiceNumber {
    /// Creates an invoice number from a period and an already-allocated
    /// sequence value.
    pub fn new(period: Period, sequence: u32) -> Result<Self, InvoiceNumberError> {
        if sequence == 0 || sequence > SEQUENCE_MAX {
            return Err(InvoiceNumberError::SequenceOutOfRange(sequence));
        }
        Ok(Self { period, sequence })
    }

    /// Returns the allocation period.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Returns the sequence value within the period.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl std::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:04}", self.period, self.sequence)
    }
}

impl std::str::FromStr for InvoiceNumber {
    type Err = InvoiceNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvoiceNumberError::InvalidFormat(s.to_string());
        let (period, sequence) = s.split_once('-').ok_or_else(err)?;
        if sequence.len() != 4 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let period: Period = period.parse().map_err(|_| err())?;
        let sequence: u32 = sequence.parse().map_err(|_| err())?;
        InvoiceNumber::new(period, sequence).map_err(|_| err())
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = InvoiceNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(n: InvoiceNumber) -> Self {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_display_zero_pads() {
        let period = Period::new(2026, 8).unwrap();
        assert_eq!(period.to_string(), "202608");
    }

    #[test]
    fn period_from_date() {
        let date = Utc.with_ymd_and_hms(2026, 8, 7, 12, 30, 0).unwrap();
        let period = Period::from_date(date);
        assert_eq!(period.year(), 2026);
        assert_eq!(period.month(), 8);
    }

    #[test]
    fn period_rejects_bad_month() {
        assert!(Period::new(2026, 0).is_err());
        assert!(Period::new(2026, 13).is_err());
    }

    #[test]
    fn period_parse_roundtrip() {
        let period: Period = "202612".parse().unwrap();
        assert_eq!(period, Period::new(2026, 12).unwrap());
        assert_eq!(period.to_string(), "202612");
    }

    #[test]
    fn period_parse_rejects_garbage() {
        assert!("2026".parse::<Period>().is_err());
        assert!("20261".parse::<Period>().is_err());
        assert!("2026xx".parse::<Period>().is_err());
        assert!("202600".parse::<Period>().is_err());
    }

    #[test]
    fn invoice_number_display() {
        let period = Period::new(2026, 8).unwrap();
        let number = InvoiceNumber::new(period, 1).unwrap();
        assert_eq!(number.to_string(), "202608-0001");

        let number = InvoiceNumber::new(period, 9999).unwrap();
        assert_eq!(number.to_string(), "202608-9999");
    }

    #[test]
    fn invoice_number_rejects_out_of_range_sequence() {
        let period = Period::new(2026, 8).unwrap();
        assert_eq!(
            InvoiceNumber::new(period, 0),
            Err(InvoiceNumberError::SequenceOutOfRange(0))
        );
        assert_eq!(
            InvoiceNumber::new(period, 10_000),
            Err(InvoiceNumberError::SequenceOutOfRange(10_000))
        );
    }

    #[test]
    fn invoice_number_parse_roundtrip() {
        let number: InvoiceNumber = "202608-0042".parse().unwrap();
        assert_eq!(number.period(), Period::new(2026, 8).unwrap());
        assert_eq!(number.sequence(), 42);
        assert_eq!(number.to_string(), "202608-0042");
    }

    #[test]
    fn invoice_number_parse_rejects_garbage() {
        assert!("202608".parse::<InvoiceNumber>().is_err());
        assert!("202608-1".parse::<InvoiceNumber>().is_err());
        assert!("202608-00001".parse::<InvoiceNumber>().is_err());
        assert!("202608-00x1".parse::<InvoiceNumber>().is_err());
        assert!("202600-0001".parse::<InvoiceNumber>().is_err());
    }

    #[test]
    fn invoice_number_serialization_roundtrip() {
        let number: InvoiceNumber = "202608-0007".parse().unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"202608-0007\"");
        let deserialized: InvoiceNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(number, deserialized);
    }

    #[test]
    fn invoice_numbers_order_by_period_then_sequence() {
        let a: InvoiceNumber = "202607-9999".parse().unwrap();
        let b: InvoiceNumber = "202608-0001".parse().unwrap();
        let c: InvoiceNumber = "202608-0002".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
