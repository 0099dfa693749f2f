use anyhow::Result;
use contracts::domain::a026_stock_levels::{self as levels, StockLevelsByBucket};

/// Разобрать уровни запаса из формы
pub fn parse(payload: &serde_json::Value) -> Result<StockLevelsByBucket> {
    match StockLevelsByBucket::from_json_value(payload) {
        Ok(parsed) => {
            tracing::debug!("parse: accepted stock levels for {} bucket(s)", parsed.len());
            Ok(parsed)
        }
        Err(e) => {
            tracing::warn!("parse: rejected stock levels payload: {}", e);
            Err(e.into())
        }
    }
}

pub fn validate(payload: &serde_json::Value) -> bool {
    parse(payload).is_ok()
}

/// Уровни запаса по умолчанию для выбранных размеров
pub fn defaults(selected_buckets: &[String]) -> StockLevelsByBucket {
    let result = levels::get_default_stock_levels(selected_buckets);
    tracing::debug!(
        "defaults: generated 12 months for {} bucket(s)",
        result.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a026_stock_levels::StockLevelError;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_reason() {
        let payload = json!({"M": [{"month": 1, "year": 2024, "minStock": 10, "maxStock": 5}]});
        let err = parse(&payload).unwrap_err();
        let reason = err.downcast_ref::<StockLevelError>().unwrap();
        assert_eq!(reason, &StockLevelError::MinAboveMax { min: 10.0, max: 5.0 });

        let err = parse(&json!({"M": [{"month": 1}]})).unwrap_err();
        let reason = err.downcast_ref::<StockLevelError>().unwrap();
        assert!(matches!(reason, StockLevelError::Payload(_)));
    }

    #[test]
    fn test_validate() {
        assert!(validate(&json!({"M": [{"month": 6, "year": 2024, "minStock": 1, "maxStock": 2}]})));
        assert!(!validate(&json!({"M": [{"month": 6, "year": 2024}]})));
        assert!(!validate(&json!(null)));
    }

    #[test]
    fn test_defaults() {
        let buckets = vec!["S".to_string(), "M".to_string(), "L".to_string()];
        let result = defaults(&buckets);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|(_, months)| months.len() == 12));
        assert!(validate(&result.to_json_value()));
    }
}
