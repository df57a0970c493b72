//! Balance simulator CLI.
//!
//! Run Monte Carlo batches of bot-played sessions to analyze scoring.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 1000 sessions
//!   cargo run --bin simulate -- -n 100 -p 5    # 100 sessions, 5 kinds
//!   cargo run --bin simulate -- --seed 42      # Reproducible batch

use gemfall::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              GEMFALL BALANCE SIMULATOR                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Board:          {}x{}", config.width, config.height);
    println!("  Palette:        {} kinds", config.palette_size);
    println!("  Moves:          {}", config.moves_budget);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, json).expect("Failed to write JSON report");
        println!("JSON report saved to: {}", filename);
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-m" | "--moves" => {
                if i + 1 < args.len() {
                    config.moves_budget = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "-p" | "--palette" => {
                if i + 1 < args.len() {
                    config.palette_size = args[i + 1].parse().unwrap_or(6);
                    i += 1;
                }
            }
            "--board" => {
                if i + 1 < args.len() {
                    if let Ok(size) = args[i + 1].parse::<usize>() {
                        config.width = size;
                        config.height = size;
                        i += 1;
                    }
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick_check();
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Gemfall Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of sessions to play (default: 1000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -m, --moves <M>     Move budget per session (default: 20)");
    println!("    -p, --palette <K>   Ordinary kinds in play, 3-7 (default: 6)");
    println!("    --board <N>         Square board size (default: 7)");
    println!("    -v, --verbose       Per-run output");
    println!("    --json              Save JSON report");
    println!("    --quick             Quick check (100 runs)");
    println!("    -h, --help          Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                    # Default run");
    println!("    cargo run --bin simulate -- -n 100 -p 5    # Tighter palette");
    println!("    cargo run --bin simulate -- --seed 42      # Reproducible");
    println!("    cargo run --bin simulate -- --quick --json # Fast, saved to disk");
}
