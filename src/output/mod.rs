pub mod formatter;

pub use formatter::{
    format_error, format_outcome, format_plan_table, format_presets, format_rating,
    should_use_colors,
};
