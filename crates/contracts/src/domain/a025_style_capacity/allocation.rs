//! Распределение производственной мощности модели по размерам
//!
//! У модели есть общая мощность (штук за период) и пропорция для каждого
//! размера. Мощность делится пропорционально.
//!
//! Два режима:
//! - [`AllocationPolicy::Rounded`]: каждая доля округляется отдельно, сумма
//!   долей может отличаться от мощности на несколько единиц.
//! - [`AllocationPolicy::LargestRemainder`]: целые части точных квот, остаток
//!   раздаётся по наибольшим дробным частям, сумма всегда равна мощности.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::ratios::{total_ratio_percentage, RatioMap};

/// Размер -> выделенное количество
pub type AllocationMap = BTreeMap<String, i64>;

/// Верхняя граница одной пропорции, в процентах
const MAX_RATIO: f64 = 100.0;

/// Результат пропорционального распределения
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "shares", rename_all = "snake_case")]
pub enum CapacityAllocation {
    Allocated(AllocationMap),
    /// Сумма пропорций равна нулю, делить не по чему
    Undefined,
}

impl CapacityAllocation {
    pub fn is_undefined(&self) -> bool {
        matches!(self, CapacityAllocation::Undefined)
    }

    pub fn shares(&self) -> Option<&AllocationMap> {
        match self {
            CapacityAllocation::Allocated(shares) => Some(shares),
            CapacityAllocation::Undefined => None,
        }
    }

    /// Доли как обычная карта; `Undefined` превращается в пустую карту
    pub fn into_map(self) -> AllocationMap {
        match self {
            CapacityAllocation::Allocated(shares) => shares,
            CapacityAllocation::Undefined => AllocationMap::new(),
        }
    }

    /// Сумма долей. Считается в `i128`, поэтому не переполняется
    pub fn total_allocated(&self) -> Option<i128> {
        self.shares()
            .map(|shares| shares.values().map(|share| *share as i128).sum())
    }

    /// Выделено минус запрошено. Ненулевое значение только при округлении долей
    pub fn drift(&self, total_capacity: i64) -> Option<i128> {
        self.total_allocated()
            .map(|sum| sum - total_capacity as i128)
    }
}

/// Способ округления долей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    #[default]
    Rounded,
    LargestRemainder,
}

impl AllocationPolicy {
    pub fn allocate(&self, total_capacity: i64, ratios: &RatioMap) -> CapacityAllocation {
        match self {
            AllocationPolicy::Rounded => calculate_capacity_allocation(total_capacity, ratios),
            AllocationPolicy::LargestRemainder => {
                calculate_capacity_allocation_exact(total_capacity, ratios)
            }
        }
    }
}

fn has_proportion(total_ratio: f64) -> bool {
    total_ratio != 0.0 && total_ratio.is_finite()
}

/// Делит `total_capacity` по размерам, округляя каждую долю отдельно.
///
/// Доля равна `round(ratio / total_ratio * total_capacity)`, половины
/// округляются от нуля (-2.5 -> -3). Сумма не корректируется, расхождение
/// показывает [`CapacityAllocation::drift`]. Отрицательная мощность здесь
/// не отклоняется и даёт отрицательные доли.
pub fn calculate_capacity_allocation(total_capacity: i64, ratios: &RatioMap) -> CapacityAllocation {
    let total_ratio = total_ratio_percentage(ratios);
    if !has_proportion(total_ratio) {
        return CapacityAllocation::Undefined;
    }

    let shares = ratios
        .iter()
        .map(|(bucket, ratio)| {
            let share = (ratio / total_ratio * total_capacity as f64).round() as i64;
            (bucket.clone(), share)
        })
        .collect();

    CapacityAllocation::Allocated(shares)
}

/// Квота одного размера в методе наибольшего остатка
struct Quota<'a> {
    bucket: &'a String,
    weight: f64,
    share: i128,
    remainder: f64,
}

/// Делит `total_capacity` так, что сумма долей точно равна ей.
///
/// Берутся целые части квот. Недостающие единицы получают размеры с
/// наибольшим остатком (при равенстве по возрастанию id). Лишние единицы,
/// которые появляются из-за погрешности `f64` на больших мощностях,
/// снимаются с наименьших остатков (при равенстве по убыванию id).
/// Корректируются только размеры с положительной пропорцией. Отрицательная
/// пропорция делает распределение неопределённым.
pub fn calculate_capacity_allocation_exact(
    total_capacity: i64,
    ratios: &RatioMap,
) -> CapacityAllocation {
    let total_ratio = total_ratio_percentage(ratios);
    if !has_proportion(total_ratio) || ratios.values().any(|ratio| *ratio < 0.0) {
        return CapacityAllocation::Undefined;
    }

    let mut quotas: Vec<Quota> = ratios
        .iter()
        .map(|(bucket, ratio)| {
            let quota = ratio / total_ratio * total_capacity as f64;
            let floor = quota.floor();
            Quota {
                bucket,
                weight: *ratio,
                share: floor as i128,
                remainder: quota - floor,
            }
        })
        .collect();

    let floors_sum: i128 = quotas.iter().map(|q| q.share).sum();
    let leftover = total_capacity as i128 - floors_sum;

    let mut ranking: Vec<usize> = (0..quotas.len())
        .filter(|&i| quotas[i].weight > 0.0)
        .collect();

    if leftover > 0 {
        ranking.sort_by(|&a, &b| {
            quotas[b]
                .remainder
                .total_cmp(&quotas[a].remainder)
                .then_with(|| quotas[a].bucket.cmp(quotas[b].bucket))
        });
        for &i in ranking.iter().cycle().take(leftover as usize) {
            quotas[i].share += 1;
        }
    } else if leftover < 0 {
        ranking.sort_by(|&a, &b| {
            quotas[a]
                .remainder
                .total_cmp(&quotas[b].remainder)
                .then_with(|| quotas[b].bucket.cmp(quotas[a].bucket))
        });
        for &i in ranking.iter().cycle().take(leftover.unsigned_abs() as usize) {
            quotas[i].share -= 1;
        }
    }

    let shares = quotas
        .into_iter()
        .map(|q| (q.bucket.clone(), to_share(q.share)))
        .collect();

    CapacityAllocation::Allocated(shares)
}

fn to_share(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Каждая пропорция в диапазоне [0, 100]. Сумма не проверяется
pub fn ratios_within_bounds(ratios: &RatioMap) -> bool {
    ratios
        .values()
        .all(|ratio| (0.0..=MAX_RATIO).contains(ratio))
}
