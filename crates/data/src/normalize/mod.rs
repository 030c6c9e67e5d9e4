//! Provider table → normalized calendar records.
//!
//! Pipeline, leaf first:
//! - [`classifier`]: map drifting column names to logical roles
//! - [`scalar`]: emptiness checks, display strings, date parsing
//! - [`window`]: split a free-text subscription window into dates
//! - [`status`]: ordered status rules
//! - [`synthesizer`]: assemble the output record per row

pub mod classifier;
pub mod scalar;
pub mod status;
pub mod synthesizer;
pub mod window;

pub use classifier::{find_column, ColumnRole, ColumnRoleMap};
pub use scalar::{
    fold_fullwidth_digits, format_date, is_emptyish, parse_date_text, to_date, to_display_string,
};
pub use status::{compute_status, Milestones};
pub use synthesizer::{combine_price_market_cap, normalize_table, synthesize_row};
pub use window::{parse_window, parse_window_text};
