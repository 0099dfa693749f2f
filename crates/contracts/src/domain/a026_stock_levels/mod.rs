pub mod aggregate;
pub mod validation;

pub use aggregate::{MonthlyStockLevel, StockLevelError, StockLevelsByBucket, MONTHS_PER_YEAR};
pub use validation::{
    get_default_stock_levels, ratios_sum_to_one_hundred, validate_monthly_stock_levels,
    RATIO_SUM_TOLERANCE,
};
pub use crate::shared::ratios::{total_ratio_percentage, RatioMap};
