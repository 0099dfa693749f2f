use anyhow::Result;
use contracts::domain::a025_style_capacity::{AllocationMap, CapacityAllocation, RatioMap};
use contracts::shared::ratios::RatioSummary;

use crate::shared::config::SizingConfig;

/// Максимальная мощность, при которой квоты в `f64` ещё точны (2^53)
pub const MAX_CAPACITY: i64 = 1 << 53;

/// Распределить мощность модели по размерам согласно настройкам
///
/// Отрицательная мощность, мощность больше [`MAX_CAPACITY`] и пропорции
/// без суммы отклоняются ошибкой, а не превращаются в пустые или
/// отрицательные доли.
pub fn allocate(total_capacity: i64, ratios: &RatioMap, config: &SizingConfig) -> Result<AllocationMap> {
    if total_capacity < 0 {
        anyhow::bail!("Capacity must not be negative: {}", total_capacity);
    }
    if total_capacity > MAX_CAPACITY {
        anyhow::bail!(
            "Capacity {} exceeds the supported maximum {}",
            total_capacity,
            MAX_CAPACITY
        );
    }

    let policy = config.allocation_policy;
    let allocation = policy.allocate(total_capacity, ratios);

    let drift = match &allocation {
        CapacityAllocation::Undefined => {
            tracing::warn!(
                "allocate: ratios of {} bucket(s) define no proportion, capacity {} left unallocated",
                ratios.len(),
                total_capacity
            );
            anyhow::bail!("Size ratios define no proportion, capacity cannot be allocated");
        }
        allocated => allocated.drift(total_capacity).unwrap_or_default(),
    };

    if drift != 0 {
        tracing::info!(
            "allocate: capacity {} with {:?} policy drifted by {}",
            total_capacity,
            policy,
            drift
        );
    }
    tracing::debug!(
        "allocate: capacity {} across {} bucket(s)",
        total_capacity,
        ratios.len()
    );

    Ok(allocation.into_map())
}

pub fn summarize_ratios(ratios: &RatioMap) -> RatioSummary {
    RatioSummary::of(ratios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a025_style_capacity::AllocationPolicy;

    fn ratios(pairs: &[(&str, f64)]) -> RatioMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_allocate_with_default_policy() {
        let config = SizingConfig::default();
        let shares = allocate(10, &ratios(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]), &config).unwrap();
        assert_eq!(shares.values().sum::<i64>(), 9);
    }

    #[test]
    fn test_allocate_with_largest_remainder() {
        let config = SizingConfig {
            allocation_policy: AllocationPolicy::LargestRemainder,
        };
        let shares = allocate(10, &ratios(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]), &config).unwrap();
        assert_eq!(shares["A"], 4);
        assert_eq!(shares.values().sum::<i64>(), 10);
    }

    #[test]
    fn test_allocate_rejects_zero_ratios() {
        let config = SizingConfig::default();
        assert!(allocate(100, &RatioMap::new(), &config).is_err());
        assert!(allocate(100, &ratios(&[("A", 0.0)]), &config).is_err());
    }

    #[test]
    fn test_allocate_rejects_negative_capacity() {
        let config = SizingConfig::default();
        let err = allocate(-1, &ratios(&[("A", 1.0)]), &config).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_allocate_rejects_capacity_above_maximum() {
        let config = SizingConfig::default();
        let input = ratios(&[("A", 1.0), ("B", 1.0)]);
        let err = allocate(i64::MAX, &input, &config).unwrap_err();
        assert!(err.to_string().contains("exceeds the supported maximum"));
        assert!(allocate(MAX_CAPACITY + 1, &input, &config).is_err());

        let shares = allocate(MAX_CAPACITY, &input, &config).unwrap();
        assert_eq!(shares.values().map(|s| *s as i128).sum::<i128>(), MAX_CAPACITY as i128);
    }

    #[test]
    fn test_allocate_max_capacity_with_largest_remainder() {
        let config = SizingConfig {
            allocation_policy: AllocationPolicy::LargestRemainder,
        };
        let input = ratios(&[("S", 17.0), ("M", 33.0), ("L", 50.0)]);
        let shares = allocate(MAX_CAPACITY, &input, &config).unwrap();
        assert_eq!(shares.values().sum::<i64>(), MAX_CAPACITY);
    }

    #[test]
    fn test_allocate_zero_capacity() {
        let config = SizingConfig::default();
        let shares = allocate(0, &ratios(&[("A", 60.0), ("B", 40.0)]), &config).unwrap();
        assert_eq!(shares["A"], 0);
        assert_eq!(shares["B"], 0);
    }

    #[test]
    fn test_summarize_ratios() {
        let summary = summarize_ratios(&ratios(&[("A", 50.0), ("B", 49.0)]));
        assert_eq!(summary.total_percentage, 99.0);
        assert!(summary.within_bounds);
        assert!(!summary.sums_to_one_hundred);
    }
}
