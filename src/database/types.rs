use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError, RoundingMode, ToPrimitive, Zero};
use chrono::{Datelike, Days, Month, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Sqlite, Type, encode::IsNull, error::BoxDynError};

use crate::error::AppError;

/// Fixed two-decimal number used for money and overtime hours.
///
/// Every constructor rounds to two places, so values read back from storage
/// compare equal to the values that were written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "BigDecimal", into = "BigDecimal")]
pub struct Numeric(BigDecimal);

impl Numeric {
    pub fn zero() -> Self {
        Numeric(BigDecimal::zero().with_scale(2))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > BigDecimal::zero()
    }

    /// Lossy conversion for spreadsheet cells.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Value with thousands separators, e.g. `3,350,000.00`.
    pub fn grouped(&self) -> String {
        let text = self.to_string();
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::zero()
    }
}

impl From<BigDecimal> for Numeric {
    fn from(value: BigDecimal) -> Self {
        Numeric(value.with_scale_round(2, RoundingMode::HalfUp))
    }
}

impl From<Numeric> for BigDecimal {
    fn from(value: Numeric) -> Self {
        value.0
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::from(BigDecimal::from(value))
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::from(BigDecimal::from(value))
    }
}

impl FromStr for Numeric {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Numeric::from(BigDecimal::from_str(s.trim())?))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Numeric {
    type Output = Numeric;

    fn add(self, rhs: Numeric) -> Numeric {
        Numeric::from(self.0 + rhs.0)
    }
}

impl Sub for Numeric {
    type Output = Numeric;

    fn sub(self, rhs: Numeric) -> Numeric {
        Numeric::from(self.0 - rhs.0)
    }
}

impl Mul for Numeric {
    type Output = Numeric;

    fn mul(self, rhs: Numeric) -> Numeric {
        Numeric::from(self.0 * rhs.0)
    }
}

impl Sum for Numeric {
    fn sum<I: Iterator<Item = Numeric>>(iter: I) -> Self {
        iter.fold(Numeric::zero(), |acc, value| acc + value)
    }
}

impl<'a> Sum<&'a Numeric> for Numeric {
    fn sum<I: Iterator<Item = &'a Numeric>>(iter: I) -> Self {
        iter.cloned().sum()
    }
}

// Stored as TEXT; aggregate expressions may hand back INTEGER or REAL values.
impl Type<Sqlite> for Numeric {
    fn type_info() -> <Sqlite as Database>::TypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &<Sqlite as Database>::TypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
            || <f64 as Type<Sqlite>>::compatible(ty)
            || <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Numeric {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Numeric {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <String as Decode<'r, Sqlite>>::decode(value)?;
        Ok(text.parse::<Numeric>()?)
    }
}

/// A payroll cycle: one calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Validates `month` (1..=12) and `year` against the configured bounds.
    pub fn new(month: u32, year: i32, bounds: (i32, i32)) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::bad_request("Month must be between 1 and 12"));
        }
        let (min_year, max_year) = bounds;
        if year < min_year || year > max_year {
            return Err(AppError::bad_request(format!(
                "Year must be between {} and {}",
                min_year, max_year
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::bad_request("Invalid period"))?;

        Ok(Period { month, year })
    }

    /// Period of a row already persisted; stored values passed validation on write.
    pub(crate) fn from_stored(month: i32, year: i32) -> Self {
        Period {
            month: month.clamp(1, 12) as u32,
            year,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day() + Months::new(1) - Days::new(1)
    }

    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// Human readable label, e.g. `June 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}
