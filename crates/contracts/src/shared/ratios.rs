//! Пропорции размеров, общие для планирования мощности и запасов

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a025_style_capacity::ratios_within_bounds;
use crate::domain::a026_stock_levels::ratios_sum_to_one_hundred;

/// Размер (например "M") -> неотрицательный вес
pub type RatioMap = BTreeMap<String, f64>;

/// Сумма всех пропорций, без округления и без проверки границ
pub fn total_ratio_percentage(ratios: &RatioMap) -> f64 {
    ratios.values().sum()
}

/// Состояние набора пропорций для отображения в форме
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioSummary {
    pub total_percentage: f64,
    /// Каждое значение в диапазоне [0, 100]
    pub within_bounds: bool,
    /// Сумма равна 100 с допуском
    pub sums_to_one_hundred: bool,
}

impl RatioSummary {
    pub fn of(ratios: &RatioMap) -> Self {
        Self {
            total_percentage: total_ratio_percentage(ratios),
            within_bounds: ratios_within_bounds(ratios),
            sums_to_one_hundred: ratios_sum_to_one_hundred(ratios),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratios(pairs: &[(&str, f64)]) -> RatioMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_total_ratio_percentage() {
        assert_eq!(total_ratio_percentage(&RatioMap::new()), 0.0);
        assert_eq!(total_ratio_percentage(&ratios(&[("S", 20.0), ("M", 30.5)])), 50.5);
        // значения вне диапазона суммируются как есть
        assert_eq!(total_ratio_percentage(&ratios(&[("S", 150.0), ("M", -50.0)])), 100.0);
    }

    #[test]
    fn test_summary() {
        let summary = RatioSummary::of(&ratios(&[("S", 25.0), ("M", 50.0), ("L", 25.0)]));
        assert_eq!(summary.total_percentage, 100.0);
        assert!(summary.within_bounds);
        assert!(summary.sums_to_one_hundred);

        let summary = RatioSummary::of(&ratios(&[("S", 120.0)]));
        assert!(!summary.within_bounds);
        assert!(!summary.sums_to_one_hundred);
    }
}
