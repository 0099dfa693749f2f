pub mod a025_style_capacity;
pub mod a026_stock_levels;
