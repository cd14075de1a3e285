//! Operator endpoints: forced rotation, statistics, state export and import

pub mod force_rotate;
pub mod state;
pub mod statistics;

pub use force_rotate::force_rotate_all;
pub use state::{export_state, import_state};
pub use statistics::get_statistics;
