mod engine;
mod format;
mod types;

pub use engine::compute;
pub use format::{format_count, format_currency, format_percent};
pub use types::{Assumptions, FunnelResult, Toggles};
