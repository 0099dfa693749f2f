use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Ошибки проверки уровней запаса
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StockLevelError {
    #[error("Invalid stock levels payload: {0}")]
    Payload(String),

    #[error("Month {0} is outside 1..=12")]
    MonthOutOfRange(i64),

    #[error("{field} must be an integer, got {value}")]
    NotAnInteger { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    NegativeStock { field: &'static str, value: f64 },

    #[error("minStock {min} is greater than maxStock {max}")]
    MinAboveMax { min: f64, max: f64 },

    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("Bucket {bucket} has no record for month {month}")]
    UnknownMonth { bucket: String, month: u32 },
}

/// Минимальный и максимальный запас одного размера на один месяц.
///
/// Всегда выполняется `1 <= month <= 12` и `0 <= min_stock <= max_stock`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMonthlyStockLevel", rename_all = "camelCase")]
pub struct MonthlyStockLevel {
    month: u32,
    year: i32,
    min_stock: f64,
    max_stock: f64,
}

/// Запись в том виде, в каком она приходит из формы, до проверки.
/// Любое поле принимается как число.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMonthlyStockLevel {
    month: f64,
    year: f64,
    min_stock: f64,
    max_stock: f64,
}

type RawStockLevels = BTreeMap<String, Vec<RawMonthlyStockLevel>>;

fn payload_error(e: serde_json::Error) -> StockLevelError {
    StockLevelError::Payload(e.to_string())
}

impl TryFrom<RawMonthlyStockLevel> for MonthlyStockLevel {
    type Error = StockLevelError;

    fn try_from(raw: RawMonthlyStockLevel) -> Result<Self, Self::Error> {
        let month = integral("month", raw.month)?;
        let year = integral("year", raw.year)?;
        if !(1..=MONTHS_PER_YEAR as i64).contains(&month) {
            return Err(StockLevelError::MonthOutOfRange(month));
        }
        let year = i32::try_from(year).map_err(|_| StockLevelError::NotAnInteger {
            field: "year",
            value: raw.year,
        })?;
        MonthlyStockLevel::new(month as u32, year, raw.min_stock, raw.max_stock)
    }
}

fn integral(field: &'static str, value: f64) -> Result<i64, StockLevelError> {
    if !value.is_finite() {
        return Err(StockLevelError::NotFinite { field });
    }
    if value.fract() != 0.0 {
        return Err(StockLevelError::NotAnInteger { field, value });
    }
    Ok(value as i64)
}

fn stock_amount(field: &'static str, value: f64) -> Result<f64, StockLevelError> {
    if !value.is_finite() {
        return Err(StockLevelError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(StockLevelError::NegativeStock { field, value });
    }
    Ok(value)
}

impl MonthlyStockLevel {
    pub fn new(month: u32, year: i32, min_stock: f64, max_stock: f64) -> Result<Self, StockLevelError> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(StockLevelError::MonthOutOfRange(month as i64));
        }
        let min_stock = stock_amount("minStock", min_stock)?;
        let max_stock = stock_amount("maxStock", max_stock)?;
        if min_stock > max_stock {
            return Err(StockLevelError::MinAboveMax {
                min: min_stock,
                max: max_stock,
            });
        }
        Ok(Self {
            month,
            year,
            min_stock,
            max_stock,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn min_stock(&self) -> f64 {
        self.min_stock
    }

    pub fn max_stock(&self) -> f64 {
        self.max_stock
    }
}

/// Уровни запаса по размерам: размер -> записи по месяцам
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLevelsByBucket(BTreeMap<String, Vec<MonthlyStockLevel>>);

impl StockLevelsByBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Разобрать нетипизированные данные, например отправку формы.
    ///
    /// Ошибка структуры (не объект, размер не массив, запись не объект,
    /// поле отсутствует или не число) возвращается как
    /// [`StockLevelError::Payload`]. Нарушение правил записи возвращается
    /// своим вариантом ошибки. Проверка останавливается на первой ошибке.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, StockLevelError> {
        let raw = RawStockLevels::deserialize(value).map_err(payload_error)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(s: &str) -> Result<Self, StockLevelError> {
        let raw: RawStockLevels = serde_json::from_str(s).map_err(payload_error)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawStockLevels) -> Result<Self, StockLevelError> {
        raw.into_iter()
            .map(|(bucket, records)| -> Result<_, StockLevelError> {
                let levels = records
                    .into_iter()
                    .map(MonthlyStockLevel::try_from)
                    .collect::<Result<Vec<MonthlyStockLevel>, _>>()?;
                Ok((bucket, levels))
            })
            .collect::<Result<BTreeMap<_, _>, StockLevelError>>()
            .map(Self)
    }

    /// Двенадцать нулевых записей на размер, месяцы 1..=12 года `year`.
    /// Повторяющийся размер даёт одну запись.
    pub fn defaults_for<I, S>(buckets: I, year: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let months: Vec<MonthlyStockLevel> = (1..=MONTHS_PER_YEAR)
            .map(|month| MonthlyStockLevel {
                month,
                year,
                min_stock: 0.0,
                max_stock: 0.0,
            })
            .collect();

        Self(
            buckets
                .into_iter()
                .map(|bucket| (bucket.into(), months.clone()))
                .collect(),
        )
    }

    pub fn insert(&mut self, bucket: impl Into<String>, levels: Vec<MonthlyStockLevel>) {
        self.0.insert(bucket.into(), levels);
    }

    pub fn get(&self, bucket: &str) -> Option<&[MonthlyStockLevel]> {
        self.0.get(bucket).map(Vec::as_slice)
    }

    /// Заменить запас размера `bucket` на месяц `month` после проверки
    pub fn set_level(
        &mut self,
        bucket: &str,
        month: u32,
        min_stock: f64,
        max_stock: f64,
    ) -> Result<(), StockLevelError> {
        let levels = self
            .0
            .get_mut(bucket)
            .ok_or_else(|| StockLevelError::UnknownBucket(bucket.to_string()))?;
        let slot = levels
            .iter_mut()
            .find(|level| level.month == month)
            .ok_or_else(|| StockLevelError::UnknownMonth {
                bucket: bucket.to_string(),
                month,
            })?;
        *slot = MonthlyStockLevel::new(month, slot.year, min_stock, max_stock)?;
        Ok(())
    }

    pub fn buckets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MonthlyStockLevel])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<MonthlyStockLevel>> {
        self.0
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
