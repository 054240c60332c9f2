mod formatter;

pub use formatter::{
    format_breakdown, format_game_summary, format_result, format_score_line, format_score_sheet,
    should_use_colors,
};
