//! Application settings, currently just the bath price.
//!
//! This module contains:
//! - The `Setting` model and its database functions
//! - The route handlers for reading and changing the bath price

mod bath_price;
mod core;

pub use bath_price::{
    BathPrice, SettingState, get_bath_price_endpoint, set_bath_price_endpoint,
    validate_bath_price,
};
pub use core::{
    BATH_PRICE_KEY, DEFAULT_BATH_PRICE, Setting, create_setting_table, ensure_default_bath_price,
    find_or_create_setting, get_setting, update_setting_value,
};

#[cfg(test)]
pub use core::count_settings;
