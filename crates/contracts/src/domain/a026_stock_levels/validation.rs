//! Проверки формы "Уровни запаса по месяцам"

use chrono::Datelike;

use super::aggregate::StockLevelsByBucket;
use crate::shared::ratios::{total_ratio_percentage, RatioMap};

/// Допустимое отклонение суммы пропорций от 100
pub const RATIO_SUM_TOLERANCE: f64 = 0.01;

/// Проверить нетипизированные уровни запаса. Любая ошибка, в структуре или
/// в значениях, даёт `false`; причину возвращает
/// [`StockLevelsByBucket::from_json_value`].
pub fn validate_monthly_stock_levels(payload: &serde_json::Value) -> bool {
    StockLevelsByBucket::from_json_value(payload).is_ok()
}

/// Нулевые уровни запаса для выбранных размеров на текущий год.
/// Год читается один раз и общий для всех размеров.
pub fn get_default_stock_levels<S: AsRef<str>>(selected_buckets: &[S]) -> StockLevelsByBucket {
    let year = chrono::Local::now().year();
    StockLevelsByBucket::defaults_for(selected_buckets.iter().map(AsRef::as_ref), year)
}

/// Сумма пропорций равна 100 с точностью [`RATIO_SUM_TOLERANCE`].
/// Отдельные значения на диапазон не проверяются.
pub fn ratios_sum_to_one_hundred(ratios: &RatioMap) -> bool {
    (total_ratio_percentage(ratios) - 100.0).abs() <= RATIO_SUM_TOLERANCE
}
