use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use bonus_bridge::config::{self, Config};
use bonus_bridge::output;
use bonus_bridge::scoring::{
    calculate_bonus_score, calculate_standard_score, parse_contract, HandAnalysis, ScoreResult,
    ScoringMode, Vulnerability,
};
use bonus_bridge::session::{self, GameState};
use bonus_bridge::trial::{self, generate_sample_code};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_TRIAL: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single deal without touching any saved game
    Score {
        /// Contract text, e.g. "4♥ N", "3NT EX", "7♠ SXX"
        contract: String,
        /// Signed result: 0 made exactly, +n overtricks, -n undertricks
        result: i32,
        /// Vulnerability: none, ns, ew or both
        #[arg(long, default_value = "none")]
        vul: String,
        /// Scoring mode (party or bonus); overrides the config default
        #[arg(long)]
        mode: Option<String>,
        /// Combined HCP of declarer and dummy, 0-40 (bonus mode)
        #[arg(long)]
        hcp: Option<u8>,
        /// Singletons across the declaring hands (bonus mode)
        #[arg(long, default_value_t = 0)]
        singletons: u8,
        /// Voids across the declaring hands (bonus mode)
        #[arg(long, default_value_t = 0)]
        voids: u8,
        /// Suits of six or more cards (bonus mode)
        #[arg(long, default_value_t = 0)]
        long_suits: u8,
        /// Print the bonus adjustment breakdown
        #[arg(long)]
        breakdown: bool,
    },
    /// Play a game interactively, deal by deal (default if no subcommand)
    Play,
    /// List completed games
    History,
    /// Deal allowance management
    Trial {
        #[command(subcommand)]
        action: TrialAction,
    },
}

#[derive(Subcommand, Debug)]
enum TrialAction {
    /// Show deals played and remaining
    Status,
    /// Apply a 7-character extension code
    Extend { code: String },
    /// Generate a valid sample code for a deal package (100-900)
    Sample { deals: u32 },
}

#[derive(Parser, Debug)]
#[command(name = "bonus-bridge")]
#[command(about = "Bridge scorekeeping with party and bonus scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bonus-bridge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match command {
        Commands::Score {
            contract,
            result,
            vul,
            mode,
            hcp,
            singletons,
            voids,
            long_suits,
            breakdown,
        } => cmd_score(
            &config,
            &contract,
            result,
            &vul,
            mode.as_deref(),
            hcp,
            singletons,
            voids,
            long_suits,
            breakdown,
        ),
        Commands::Play => cmd_play(&config, cli.verbose),
        Commands::History => cmd_history(),
        Commands::Trial { action } => cmd_trial(action),
    };

    std::process::exit(code);
}

#[allow(clippy::too_many_arguments)]
fn cmd_score(
    config: &Config,
    contract: &str,
    result: i32,
    vul: &str,
    mode: Option<&str>,
    hcp: Option<u8>,
    singletons: u8,
    voids: u8,
    long_suits: u8,
    breakdown: bool,
) -> i32 {
    let vulnerability = match parse_vulnerability(vul) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_INPUT;
        }
    };

    let mode = match mode {
        Some(s) => match ScoringMode::from_str(s) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("{}", e);
                return EXIT_INPUT;
            }
        },
        None => config.effective_mode(),
    };

    let fact = match parse_contract(contract, result, vulnerability) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid contract: {}", e);
            return EXIT_INPUT;
        }
    };

    let use_colors = output::should_use_colors();
    println!(
        "{} {} ({})",
        fact,
        output::format_result(result),
        vulnerability.describe()
    );

    match (mode, hcp) {
        (ScoringMode::Bonus, Some(total_hcp)) => {
            if total_hcp > 40 {
                eprintln!("HCP cannot exceed the 40 in the deck.");
                return EXIT_INPUT;
            }
            let hand = HandAnalysis { total_hcp, singletons, voids, long_suits };
            let bonus = calculate_bonus_score(&fact, &hand);
            println!("{}", output::format_score_line(&bonus.score, use_colors));
            if breakdown {
                println!("{}", output::format_breakdown(&bonus.steps, use_colors));
            }
        }
        (ScoringMode::Bonus, None) => {
            eprintln!("Bonus scoring needs --hcp; scoring with the party table instead.");
            let score = calculate_standard_score(&fact);
            println!("{}", output::format_score_line(&score, use_colors));
        }
        (ScoringMode::Party, _) => {
            let score = calculate_standard_score(&fact);
            println!("{}", output::format_score_line(&score, use_colors));
        }
    }

    EXIT_SUCCESS
}

fn cmd_play(config: &Config, verbose: bool) -> i32 {
    let trial_path = trial::get_trial_path();
    let mut trial_state = match trial::load_trial_state(&trial_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
    };

    if trial_state.is_expired() {
        eprintln!(
            "Deal allowance used up. Apply an extension code with 'bonus-bridge trial extend <CODE>'."
        );
        return EXIT_TRIAL;
    }

    let use_colors = output::should_use_colors();
    let state_path = session::get_game_state_path();
    let mut state = match session::load_game_state(&state_path) {
        Ok(Some(saved)) => {
            println!(
                "Found a saved game with {} deals ({} scoring).",
                saved.deals.len(),
                saved.mode
            );
            if prompt_yes_no("Resume it?") {
                saved
            } else {
                GameState::new(config.effective_mode())
            }
        }
        Ok(None) => GameState::new(config.effective_mode()),
        Err(e) => {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
    };

    if verbose {
        eprintln!("Scoring mode: {}", state.mode);
        eprintln!(
            "Deals remaining in allowance: {}",
            trial_state.remaining_deals()
        );
    }

    loop {
        if !trial_state.can_play_deal() {
            println!(
                "Deal allowance used up. Apply an extension code with 'bonus-bridge trial extend <CODE>'."
            );
            break;
        }
        if trial_state.should_warn() {
            println!(
                "{} deals remaining in your allowance.",
                trial_state.remaining_deals()
            );
        }

        println!();
        println!(
            "Deal {} - dealer {}, {}",
            state.next_deal_number(),
            state.next_dealer().name(),
            state.next_vulnerability().describe()
        );

        let contract_text = match prompt("Contract (e.g. 4♥ N, 3NT EX; q to finish): ") {
            Ok(t) => t,
            Err(_) => break,
        };
        if contract_text.is_empty() {
            continue;
        }
        if contract_text.eq_ignore_ascii_case("q") {
            break;
        }

        let result: i32 = match prompt_parsed("Result (0 exact, +n overtricks, -n undertricks): ") {
            Ok(r) => r,
            Err(_) => break,
        };

        let hand = if state.mode == ScoringMode::Bonus {
            match prompt_hand_analysis() {
                Ok(h) => Some(h),
                Err(_) => break,
            }
        } else {
            None
        };

        let record = match state.score_deal(&contract_text, result, hand) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid contract: {}", e);
                continue;
            }
        };

        let score = ScoreResult {
            ns_points: record.ns_points,
            ew_points: record.ew_points,
            raw_score: record.raw_score,
        };
        println!("  {}", output::format_score_line(&score, use_colors));

        if config.effective_show_breakdown() {
            if let Some(h) = record.hand_analysis {
                // The calculators are pure; recompute for the step trace
                if let Ok(fact) =
                    parse_contract(&record.contract, record.signed_result, record.vulnerability)
                {
                    let bonus = calculate_bonus_score(&fact, &h);
                    println!("{}", output::format_breakdown(&bonus.steps, use_colors));
                }
            }
        }

        trial_state.record_deal_played();
        if let Err(e) = trial::save_trial_state(&trial_path, &trial_state) {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
        if let Err(e) = session::save_game_state(&state_path, &state) {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
    }

    if state.deals.is_empty() {
        println!("No deals scored.");
        return EXIT_SUCCESS;
    }

    println!();
    println!("{}", output::format_score_sheet(&state, use_colors));
    println!();
    println!("{}", output::format_game_summary(&state, use_colors));

    if prompt_yes_no("Finish this game and save it to history?") {
        let history_path = session::get_history_path();
        let mut history = match session::load_history(&history_path) {
            Ok(h) => h,
            Err(e) => {
                eprintln!("Storage error: {}", e);
                return EXIT_STORAGE;
            }
        };
        history.record(state.complete());
        if let Err(e) = session::save_history(&history_path, &history) {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }

        trial_state.record_game_completed();
        if let Err(e) = trial::save_trial_state(&trial_path, &trial_state) {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }

        if let Err(e) = session::clear_game_state(&state_path) {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
        println!("Game saved to history.");
    } else {
        println!("Game left in progress; run 'bonus-bridge play' to continue.");
    }

    EXIT_SUCCESS
}

fn cmd_history() -> i32 {
    let history = match session::load_history(&session::get_history_path()) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
    };

    if history.games.is_empty() {
        println!("No completed games yet.");
        return EXIT_SUCCESS;
    }

    for (i, game) in history.games.iter().enumerate() {
        println!(
            "{:>2}. {}  {} deals, {} scoring  {}",
            i + 1,
            game.completed_at.format("%Y-%m-%d %H:%M"),
            game.deals_played(),
            game.mode,
            game.result_line()
        );
    }

    EXIT_SUCCESS
}

fn cmd_trial(action: TrialAction) -> i32 {
    let trial_path = trial::get_trial_path();
    let mut trial_state = match trial::load_trial_state(&trial_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Storage error: {}", e);
            return EXIT_STORAGE;
        }
    };

    match action {
        TrialAction::Status => {
            println!(
                "Deals played: {}/{}",
                trial_state.deals_played, trial_state.max_deals
            );
            println!("Deals remaining: {}", trial_state.remaining_deals());
            println!("Games completed: {}", trial_state.games_completed);
            if !trial_state.extensions.is_empty() {
                println!("Extensions applied: {}", trial_state.extensions.len());
            }
            if trial_state.is_expired() {
                println!("Allowance used up; apply an extension code to continue.");
            }
        }
        TrialAction::Extend { code } => {
            let record = match trial_state.apply_extension_code(&code) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    return EXIT_INPUT;
                }
            };
            if let Err(e) = trial::save_trial_state(&trial_path, &trial_state) {
                eprintln!("Storage error: {}", e);
                return EXIT_STORAGE;
            }
            println!(
                "Extension applied: +{} deals ({} remaining).",
                record.deals_granted,
                trial_state.remaining_deals()
            );
        }
        TrialAction::Sample { deals } => match generate_sample_code(deals) {
            Ok(code) => println!("{}", code),
            Err(e) => {
                eprintln!("{}", e);
                return EXIT_INPUT;
            }
        },
    }

    EXIT_SUCCESS
}

fn parse_vulnerability(s: &str) -> Result<Vulnerability> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => Ok(Vulnerability::NONE),
        "ns" => Ok(Vulnerability { ns: true, ew: false }),
        "ew" => Ok(Vulnerability { ns: false, ew: true }),
        "both" | "all" => Ok(Vulnerability { ns: true, ew: true }),
        other => bail!(
            "unknown vulnerability '{}': expected none, ns, ew or both",
            other
        ),
    }
}

/// Print a prompt and read one trimmed line. End of input is an error so
/// interactive loops can stop cleanly on a closed stdin.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let bytes = io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if bytes == 0 {
        bail!("end of input");
    }
    Ok(line.trim().to_string())
}

/// Prompt until the input parses; errors only on a closed stdin.
fn prompt_parsed<T: FromStr>(message: &str) -> Result<T> {
    loop {
        let line = prompt(message)?;
        match line.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => eprintln!("Please enter a number."),
        }
    }
}

fn prompt_yes_no(message: &str) -> bool {
    loop {
        let answer = match prompt(&format!("{} [y/n]: ", message)) {
            Ok(a) => a,
            Err(_) => return false,
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => eprintln!("Please answer y or n."),
        }
    }
}

fn prompt_hand_analysis() -> Result<HandAnalysis> {
    let total_hcp = loop {
        let value: u8 = prompt_parsed("Combined HCP of declarer and dummy (0-40): ")?;
        if value <= 40 {
            break value;
        }
        eprintln!("HCP cannot exceed the 40 in the deck.");
    };
    let singletons = prompt_parsed("Singletons across the declaring hands: ")?;
    let voids = prompt_parsed("Voids: ")?;
    let long_suits = prompt_parsed("Suits of six or more cards: ")?;

    Ok(HandAnalysis { total_hcp, singletons, voids, long_suits })
}
