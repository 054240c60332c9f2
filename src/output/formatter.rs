use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{ScoreResult, StepContribution, Vulnerability};
use crate::session::{DealRecord, GameState};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a signed trick result: "=" for exact, "+n"/"-n" otherwise
pub fn format_result(signed_result: i32) -> String {
    if signed_result == 0 {
        "=".to_string()
    } else {
        format!("{:+}", signed_result)
    }
}

fn vulnerability_short(vul: Vulnerability) -> &'static str {
    match (vul.ns, vul.ew) {
        (true, true) => "All",
        (true, false) => "NS",
        (false, true) => "EW",
        (false, false) => "-",
    }
}

/// Format one score line: "{points} to {side}" or "NS {n} / EW {m}" when
/// both sides scored (bonus mode can credit both at once).
pub fn format_score_line(score: &ScoreResult, use_colors: bool) -> String {
    let line = match (score.ns_points, score.ew_points) {
        (ns, 0) if ns != 0 => format!("{} to NS", ns),
        (0, ew) if ew != 0 => format!("{} to EW", ew),
        (0, 0) => "no score".to_string(),
        (ns, ew) => format!("NS {} / EW {}", ns, ew),
    };
    match score.raw_score {
        Some(raw) => {
            if use_colors {
                format!("{} {}", line.bold(), format!("(raw {})", raw).dimmed())
            } else {
                format!("{} (raw {})", line, raw)
            }
        }
        None => {
            if use_colors {
                line.bold().to_string()
            } else {
                line
            }
        }
    }
}

/// Format a single scored deal as one score-sheet row.
/// Columns: deal number, contract, result, vulnerability, NS, EW.
/// The vulnerability column is dropped on very narrow terminals.
fn format_deal_row(deal: &DealRecord, use_colors: bool, show_vulnerability: bool) -> String {
    let index = format!("{:>2}.", deal.deal_number);
    let contract = format!("{:<7}", deal.contract);
    let result = format!("{:>3}", format_result(deal.signed_result));
    let vul = if show_vulnerability {
        format!("  {:<4}", vulnerability_short(deal.vulnerability))
    } else {
        String::new()
    };
    let points = format!("{:>6}{:>6}", deal.ns_points, deal.ew_points);

    if use_colors {
        format!(
            "{} {}{}{}{}",
            index.dimmed(),
            contract.bold(),
            result,
            vul,
            points
        )
    } else {
        format!("{} {}{}{}{}", index, contract, result, vul, points)
    }
}

/// Format the score sheet for a game: one row per deal, then a totals row.
pub fn format_score_sheet(state: &GameState, use_colors: bool) -> String {
    if state.deals.is_empty() {
        return "No deals scored yet.".to_string();
    }

    // Drop the vulnerability column when the terminal is too narrow;
    // pipes get the full sheet
    let show_vulnerability = get_terminal_width().map_or(true, |w| w >= 44);

    let mut lines: Vec<String> = state
        .deals
        .iter()
        .map(|deal| format_deal_row(deal, use_colors, show_vulnerability))
        .collect();

    let vul_pad = if show_vulnerability { 6 } else { 0 };
    let totals = format!(
        "{:>2}  {:<7}{:>3}{}{:>6}{:>6}",
        "",
        "Totals",
        "",
        " ".repeat(vul_pad),
        state.ns_total(),
        state.ew_total()
    );
    if use_colors {
        lines.push(totals.bold().to_string());
    } else {
        lines.push(totals);
    }

    lines.join("\n")
}

/// Format the end-of-game summary.
pub fn format_game_summary(state: &GameState, use_colors: bool) -> String {
    let ns = state.ns_total();
    let ew = state.ew_total();
    let verdict = if ns > ew {
        format!("North-South win by {}", ns - ew)
    } else if ew > ns {
        format!("East-West win by {}", ew - ns)
    } else {
        "Scores level".to_string()
    };

    if use_colors {
        format!(
            "Deals played: {}\nNorth-South: {}\nEast-West: {}\n{}",
            state.deals.len(),
            ns.green(),
            ew.green(),
            verdict.bold()
        )
    } else {
        format!(
            "Deals played: {}\nNorth-South: {}\nEast-West: {}\n{}",
            state.deals.len(),
            ns,
            ew,
            verdict
        )
    }
}

/// Format the bonus adjustment trace, one line per pipeline step.
pub fn format_breakdown(steps: &[StepContribution], use_colors: bool) -> String {
    steps
        .iter()
        .map(|step| {
            let values = format!("{:>7.2} -> {:>7.2}", step.before, step.after);
            if use_colors {
                format!(
                    "  {:<20} {}  {}",
                    step.label.cyan(),
                    values,
                    step.description.dimmed()
                )
            } else {
                format!("  {:<20} {}  {}", step.label, values, step.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
