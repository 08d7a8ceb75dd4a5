//! Date and time transforms.
//!
//! Cells are read through [`parse_datetime`] (or a fixed [`DateFormat`]) and
//! written back as text. Values that do not parse are left unchanged by the
//! in-place transforms and become `Null` in derived columns.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;
use tabula_model::{DateFormat, ParsedDateTime, Table, Value, parse_datetime, parse_time};

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, insert_after, map_cells, require_absent, require_column};

fn parse_cell(cell: &Value) -> Option<ParsedDateTime> {
    cell.as_str().and_then(parse_datetime)
}

/// Maps parseable cells through `f`; `None` from `f` leaves the cell as is.
fn map_datetimes(
    table: &Table,
    column: &str,
    mut f: impl FnMut(ParsedDateTime) -> Option<ParsedDateTime>,
) -> Table {
    map_cells(table, column, |cell| {
        parse_cell(cell)
            .and_then(&mut f)
            .map_or_else(|| cell.clone(), |parsed| Value::Text(parsed.render()))
    })
}

/// Source format of `datetime_format`: auto detection or a fixed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SourceFormat {
    #[default]
    Auto,
    Fixed(DateFormat),
}

impl TryFrom<String> for SourceFormat {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value == "auto" {
            return Ok(Self::Auto);
        }
        DateFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == value)
            .map(Self::Fixed)
            .ok_or_else(|| format!("unknown date format '{value}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeFormatParams {
    #[serde(default)]
    pub source_format: SourceFormat,
    pub target_format: DateFormat,
}

pub fn datetime_format(
    table: &Table,
    column: &str,
    params: &DatetimeFormatParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_cells(table, column, |cell| {
        let parsed = match params.source_format {
            SourceFormat::Auto => parse_cell(cell),
            SourceFormat::Fixed(format) => cell.as_str().and_then(|text| format.parse(text)),
        };
        parsed.map_or_else(
            || cell.clone(),
            |parsed| Value::Text(params.target_format.render(&parsed.value)),
        )
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateComponent {
    Year,
    Month,
    Day,
    /// English weekday name.
    Weekday,
    Quarter,
    Hour,
    Minute,
    Second,
    /// `HH:MM:SS`.
    Time,
    /// `YYYY-MM-DD`.
    Date,
}

impl DateComponent {
    fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Weekday => "weekday",
            Self::Quarter => "quarter",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Time => "time",
            Self::Date => "date",
        }
    }

    fn extract(self, value: &NaiveDateTime) -> Value {
        match self {
            Self::Year => Value::from(i64::from(value.year())),
            Self::Month => Value::from(i64::from(value.month())),
            Self::Day => Value::from(i64::from(value.day())),
            Self::Weekday => Value::Text(value.format("%A").to_string()),
            Self::Quarter => Value::from(i64::from(value.month0() / 3 + 1)),
            Self::Hour => Value::from(i64::from(value.hour())),
            Self::Minute => Value::from(i64::from(value.minute())),
            Self::Second => Value::from(i64::from(value.second())),
            Self::Time => Value::Text(value.format("%H:%M:%S").to_string()),
            Self::Date => Value::Text(value.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeExtractParams {
    pub component: DateComponent,
    #[serde(default)]
    pub new_column_name: Option<String>,
}

/// Writes one component into a new column after the source.
pub fn datetime_extract(
    table: &Table,
    column: &str,
    params: &DatetimeExtractParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let new_name = params
        .new_column_name
        .clone()
        .unwrap_or_else(|| format!("{column}_{}", params.component.name()));
    require_absent(table, &new_name)?;

    let columns = insert_after(table.columns(), column, std::slice::from_ref(&new_name));
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let value = parse_cell(row.get(column))
                .map_or(Value::Null, |parsed| params.component.extract(&parsed.value));
            updated.set(new_name.clone(), value);
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    Ok(TransformOutput::added(table, vec![new_name]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn has_time(self) -> bool {
        matches!(self, Self::Hours | Self::Minutes | Self::Seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeArithmeticParams {
    pub operation: ShiftDirection,
    pub amount: i64,
    pub unit: TimeUnit,
}

fn shift_months(value: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        value.checked_add_months(count)
    } else {
        value.checked_sub_months(count)
    }
}

/// Calendar-aware shift. Month and year steps clamp to the last day of the
/// target month.
pub fn shift_datetime(value: NaiveDateTime, amount: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let delta = match unit {
        TimeUnit::Years => return shift_months(value, amount.checked_mul(12)?),
        TimeUnit::Months => return shift_months(value, amount),
        TimeUnit::Weeks => Duration::try_weeks(amount)?,
        TimeUnit::Days => Duration::try_days(amount)?,
        TimeUnit::Hours => Duration::try_hours(amount)?,
        TimeUnit::Minutes => Duration::try_minutes(amount)?,
        TimeUnit::Seconds => Duration::try_seconds(amount)?,
    };
    value.checked_add_signed(delta)
}

pub fn datetime_arithmetic(
    table: &Table,
    column: &str,
    params: &DatetimeArithmeticParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let amount = match params.operation {
        ShiftDirection::Add => params.amount,
        ShiftDirection::Subtract => params
            .amount
            .checked_neg()
            .ok_or_else(|| TransformError::invalid("Amount is out of range"))?,
    };
    let table = map_datetimes(table, column, |parsed| {
        shift_datetime(parsed.value, amount, params.unit).map(|value| ParsedDateTime {
            value,
            has_time: parsed.has_time || params.unit.has_time(),
        })
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncateUnit {
    Year,
    Quarter,
    Month,
    /// Back to Monday.
    Week,
    Day,
    Hour,
    Minute,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeTruncateParams {
    pub unit: TruncateUnit,
}

/// Zeroes every unit below `unit`.
pub fn truncate_datetime(value: NaiveDateTime, unit: TruncateUnit) -> Option<NaiveDateTime> {
    let date = value.date();
    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);
    match unit {
        TruncateUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).map(midnight),
        TruncateUnit::Quarter => {
            NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1).map(midnight)
        }
        TruncateUnit::Month => date.with_day(1).map(midnight),
        TruncateUnit::Week => {
            let back = Duration::days(i64::from(date.weekday().num_days_from_monday()));
            date.checked_sub_signed(back).map(midnight)
        }
        TruncateUnit::Day => Some(midnight(date)),
        TruncateUnit::Hour => value
            .with_minute(0)
            .and_then(|v| v.with_second(0))
            .and_then(|v| v.with_nanosecond(0)),
        TruncateUnit::Minute => value.with_second(0).and_then(|v| v.with_nanosecond(0)),
    }
}

pub fn datetime_truncate(
    table: &Table,
    column: &str,
    params: &DatetimeTruncateParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_datetimes(table, column, |parsed| {
        truncate_datetime(parsed.value, params.unit).map(|value| ParsedDateTime { value, ..parsed })
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneDirection {
    UtcToLocal,
    LocalToUtc,
}

/// Largest accepted offset from UTC, in minutes.
pub const MAX_OFFSET_MINUTES: i64 = 18 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeTimezoneParams {
    pub direction: TimezoneDirection,
    /// Offset of local time from UTC. Defaults to the system's current offset.
    #[serde(default)]
    pub offset_minutes: Option<i64>,
}

fn system_offset_minutes() -> i64 {
    i64::from(Local::now().offset().local_minus_utc()) / 60
}

/// Shifts by a fixed offset.
pub fn datetime_timezone(
    table: &Table,
    column: &str,
    params: &DatetimeTimezoneParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let offset = params.offset_minutes.unwrap_or_else(system_offset_minutes);
    if offset.abs() > MAX_OFFSET_MINUTES {
        return Err(TransformError::invalid(format!(
            "Offset of {offset} minutes is outside +/-{MAX_OFFSET_MINUTES}"
        )));
    }
    let minutes = match params.direction {
        TimezoneDirection::UtcToLocal => offset,
        TimezoneDirection::LocalToUtc => -offset,
    };
    let table = map_datetimes(table, column, |parsed| {
        parsed
            .value
            .checked_add_signed(Duration::minutes(minutes))
            .map(ParsedDateTime::datetime)
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatetimeCombineParams {
    pub time_column: String,
    #[serde(default)]
    pub new_column_name: Option<String>,
    #[serde(default)]
    pub drop_sources: bool,
}

fn time_of(cell: &Value) -> Option<NaiveTime> {
    let text = cell.as_str()?;
    parse_time(text).or_else(|| parse_datetime(text).filter(|p| p.has_time).map(|p| p.value.time()))
}

/// Joins a date column and a time column into ISO `YYYY-MM-DDTHH:MM:SS`.
pub fn datetime_combine(
    table: &Table,
    column: &str,
    params: &DatetimeCombineParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    require_column(table, &params.time_column)?;
    let time_column = params.time_column.as_str();
    let new_name = params
        .new_column_name
        .clone()
        .unwrap_or_else(|| format!("{column}_datetime"));
    require_absent(table, &new_name)?;

    let mut columns = insert_after(table.columns(), column, std::slice::from_ref(&new_name));
    let mut removed = Vec::new();
    if params.drop_sources {
        columns.retain(|c| c != column && c != time_column);
        removed.push(column.to_string());
        if time_column != column {
            removed.push(time_column.to_string());
        }
    }
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let date = parse_cell(row.get(column)).map(|p| p.value.date());
            let time = time_of(row.get(time_column));
            let value = match (date, time) {
                (Some(date), Some(time)) => {
                    Value::Text(date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string())
                }
                _ => Value::Null,
            };
            updated.set(new_name.clone(), value);
            if params.drop_sources {
                updated.remove(column);
                updated.remove(time_column);
            }
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    Ok(TransformOutput::added(table, vec![new_name]).with_removed(removed))
}

/// Splits into `<col>_date` and `<col>_time` after the source. Date-only
/// values get a `Null` time.
pub fn datetime_split(table: &Table, column: &str) -> Result<TransformOutput> {
    require_column(table, column)?;
    let date_name = format!("{column}_date");
    let time_name = format!("{column}_time");
    require_absent(table, &date_name)?;
    require_absent(table, &time_name)?;

    let new_columns = vec![date_name, time_name];
    let columns = insert_after(table.columns(), column, &new_columns);
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let parsed = parse_cell(row.get(column));
            let date = parsed.map_or(Value::Null, |p| {
                Value::Text(p.value.format("%Y-%m-%d").to_string())
            });
            let time = parsed.filter(|p| p.has_time).map_or(Value::Null, |p| {
                Value::Text(p.value.format("%H:%M:%S").to_string())
            });
            updated.set(new_columns[0].clone(), date);
            updated.set(new_columns[1].clone(), time);
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    Ok(TransformOutput::added(table, new_columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        parse_datetime(text).map(|p| p.value).unwrap()
    }

    #[test]
    fn month_steps_clamp_to_month_end() {
        let shifted = shift_datetime(at("2024-01-31"), 1, TimeUnit::Months).unwrap();
        assert_eq!(shifted, at("2024-02-29"));
        let shifted = shift_datetime(at("2024-02-29"), 1, TimeUnit::Years).unwrap();
        assert_eq!(shifted, at("2025-02-28"));
        let shifted = shift_datetime(at("2024-03-31"), -1, TimeUnit::Months).unwrap();
        assert_eq!(shifted, at("2024-02-29"));
    }

    #[test]
    fn truncation_zeroes_lower_units() {
        let value = at("2024-08-15T13:45:30");
        assert_eq!(truncate_datetime(value, TruncateUnit::Quarter), Some(at("2024-07-01")));
        assert_eq!(truncate_datetime(value, TruncateUnit::Week), Some(at("2024-08-12")));
        assert_eq!(truncate_datetime(value, TruncateUnit::Hour), Some(at("2024-08-15T13:00:00")));
    }

    #[test]
    fn source_format_accepts_vocabulary() {
        assert_eq!(SourceFormat::try_from("auto".to_string()), Ok(SourceFormat::Auto));
        assert_eq!(
            SourceFormat::try_from("DD/MM/YYYY".to_string()),
            Ok(SourceFormat::Fixed(DateFormat::DayMonthYearSlash))
        );
        assert!(SourceFormat::try_from("someday".to_string()).is_err());
    }
}
