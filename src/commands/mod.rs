//! CLI command implementations

mod list;
pub mod load;
pub mod platform;

pub use list::{list_clock_rates, list_platforms};
