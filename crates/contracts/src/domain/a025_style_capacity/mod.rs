pub mod allocation;

pub use allocation::{
    calculate_capacity_allocation, calculate_capacity_allocation_exact, ratios_within_bounds,
    AllocationMap, AllocationPolicy, CapacityAllocation,
};
pub use crate::shared::ratios::{total_ratio_percentage, RatioMap};
