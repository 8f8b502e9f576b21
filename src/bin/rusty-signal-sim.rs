//! rusty-signal-sim CLI - terminal consumer of the market simulation
//!
//! Plays the presentation layer: runs the tick cadence, draws candle
//! histories and performs delayed analyses through an `AnalysisSession`.
//!
//! ## Example Usage
//!
//! ```bash
//! # List instruments with their seeded prices
//! rusty-signal-sim pairs
//!
//! # Watch EUR/USD tick every 3 seconds
//! rusty-signal-sim watch --pair "EUR/USD" --ticks 20
//!
//! # Export 100 H4 candles
//! rusty-signal-sim candles --pair "USD/JPY" --timeframe H4 --csv usdjpy.csv
//!
//! # Look for a signal
//! rusty-signal-sim --seed 42 analyze --pair "EUR/USD OTC" --timeframe M5
//! ```

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rusty_signal_sim::candles::write_csv;
use rusty_signal_sim::instrument::{self, price_precision};
use rusty_signal_sim::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;

/// rusty-signal-sim: simulated FX/OTC feeds and heuristic signals
#[derive(Parser)]
#[command(name = "rusty-signal-sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Simulated FX/OTC price feeds with heuristic CALL/PUT signals", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the configuration
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List simulated instruments
    Pairs,

    /// Run the tick cadence and print prices
    Watch {
        /// Instrument to follow (default: all)
        #[arg(short = 'p', long)]
        pair: Option<String>,

        /// Number of tick cycles
        #[arg(short = 'n', long, default_value = "10")]
        ticks: usize,

        /// Do not wait between ticks
        #[arg(long)]
        fast: bool,
    },

    /// Synthesize a candle history
    Candles {
        /// Instrument symbol
        #[arg(short = 'p', long, default_value = "EUR/USD")]
        pair: String,

        /// Timeframe symbol (M1, M2, M3, M5, M15, M30, H1, H4, D1)
        #[arg(short = 't', long, default_value = "M1")]
        timeframe: String,

        /// Number of candles (default: from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Write candles to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print candles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze the selection for a CALL/PUT signal
    Analyze {
        /// Instrument symbol
        #[arg(short = 'p', long, default_value = "EUR/USD")]
        pair: String,

        /// Timeframe symbol
        #[arg(short = 't', long, default_value = "M1")]
        timeframe: String,

        /// Skip the artificial analysis delay
        #[arg(long)]
        no_delay: bool,

        /// Print the signal as JSON
        #[arg(long)]
        json: bool,
    },
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".rusty-signal-sim").join("config.toml"))
        .filter(|path| path.exists())
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimulationConfig> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);
    let config = SimulationConfig::load(path.as_deref())
        .with_context(|| format!("failed to load configuration {:?}", path))?;
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn parse_timeframe(symbol: &str) -> Result<Timeframe> {
    symbol
        .parse::<Timeframe>()
        .with_context(|| format!("expected one of {:?}", Timeframe::ALL.map(|tf| tf.as_str())))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.seed) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!(
            "{} v{}",
            "rusty-signal-sim".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        if let Some(seed) = config.seed {
            println!("Seed: {}", seed.to_string().dimmed());
        }
    }

    let result = match cli.command {
        Commands::Pairs => list_pairs(config),
        Commands::Watch { pair, ticks, fast } => watch(config, pair, ticks, fast),
        Commands::Candles {
            pair,
            timeframe,
            count,
            csv,
            json,
        } => show_candles(config, &pair, &timeframe, count, csv, json),
        Commands::Analyze {
            pair,
            timeframe,
            no_delay,
            json,
        } => analyze(config, &pair, &timeframe, no_delay, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn format_price(price: f64) -> String {
    format!("{:.*}", price_precision(price), price)
}

fn format_change(state: &PriceState) -> String {
    let text = format!("{:+.3}%", state.change_percent);
    if state.change > 0.0 {
        text.green().to_string()
    } else if state.change < 0.0 {
        text.red().to_string()
    } else {
        text.dimmed().to_string()
    }
}

fn list_pairs(config: SimulationConfig) -> Result<()> {
    let mut engine = MarketEngine::new(config)?;
    let market = engine.initialize_market();

    println!("{}", "Instruments".cyan().bold());
    println!("{}", "===========".cyan());
    for symbol in engine.universe() {
        let category = instrument::category_of(&symbol);
        let price = market.price(&symbol).map(format_price).unwrap_or_default();
        println!("  {:<14} {:<8} {:>14}", symbol, category.to_string(), price);
    }
    Ok(())
}

fn watch(config: SimulationConfig, pair: Option<String>, ticks: usize, fast: bool) -> Result<()> {
    let interval = std::time::Duration::from_secs(config.tick_interval_secs);
    let mut engine = MarketEngine::new(config)?;
    let mut market = engine.initialize_market();
    if let Some(ref symbol) = pair {
        if !market.contains(symbol) {
            engine.advance_instrument(&mut market, symbol);
        }
    }

    let pb = ProgressBar::new(ticks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks")?
            .progress_chars("#>-"),
    );

    for _ in 0..ticks {
        if !fast {
            thread::sleep(interval);
        }
        market = engine.advance_market(market);

        let rows: Vec<(&String, &PriceState)> = match pair {
            Some(ref symbol) => market.iter().filter(|(s, _)| *s == symbol).collect(),
            None => market.iter().collect(),
        };
        for (symbol, state) in rows {
            pb.println(format!(
                "  {:<14} {:>14} {:>18}  H {} L {}",
                symbol,
                format_price(state.price),
                format_change(state),
                format_price(state.high),
                format_price(state.low)
            ));
        }
        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(())
}

fn show_candles(
    config: SimulationConfig,
    pair: &str,
    timeframe: &str,
    count: Option<usize>,
    csv: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let timeframe = parse_timeframe(timeframe)?;
    let count = count.unwrap_or(config.candle_count);
    let mut engine = MarketEngine::new(config)?;
    let market = engine.initialize_market();

    let reference = engine.reference_price(pair, &market);
    let candles = engine.synthesize_candles(reference, count, timeframe.bar_seconds());

    if let Some(path) = csv {
        let file = File::create(&path).with_context(|| format!("cannot create {:?}", path))?;
        write_csv(&candles, file)?;
        println!(
            "{} {} candles written to {}",
            "✓".green(),
            candles.len(),
            path.display()
        );
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&candles)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} {} ({} candles)", pair, timeframe, candles.len()).cyan().bold()
    );
    for candle in &candles {
        let line = format!(
            "  {}  O {}  H {}  L {}  C {}  V {:.0}",
            candle.timestamp.format("%Y-%m-%d %H:%M"),
            format_price(candle.open),
            format_price(candle.high),
            format_price(candle.low),
            format_price(candle.close),
            candle.volume
        );
        if candle.is_bullish() {
            println!("{}", line.green());
        } else if candle.is_bearish() {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn analyze(
    config: SimulationConfig,
    pair: &str,
    timeframe: &str,
    no_delay: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let timeframe = parse_timeframe(timeframe)?;
    let delay_ms = config.analysis_delay_ms;
    let mut engine = MarketEngine::new(config)?;
    let mut market = engine.initialize_market();
    if !market.contains(pair) {
        engine.advance_instrument(&mut market, pair);
    }

    let mut session = AnalysisSession::new(pair, timeframe, delay_ms);
    let request = session.request(Utc::now(), engine.rng_mut());

    if !no_delay {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(format!("Searching for signals on {} ({})", pair, timeframe));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        thread::sleep(request.delay().to_std().unwrap_or_default());
        pb.finish_and_clear();
    }

    market = engine.advance_market(market);
    let signal = engine.analyze(pair, timeframe, &market, Utc::now());
    let completed_at = Utc::now().max(request.ready_at);

    match session.complete(&request, completed_at, signal) {
        AnalysisOutcome::Delivered(Some(signal)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&signal)?);
                return Ok(());
            }
            print_signal(&signal, verbose);
        }
        AnalysisOutcome::Delivered(None) => {
            if json {
                println!("null");
                return Ok(());
            }
            println!("{}", "No Clear Signal".yellow().bold());
            println!(
                "Could not determine a strong signal for {} on {} at this moment. Try again or adjust parameters.",
                pair, timeframe
            );
        }
        AnalysisOutcome::Pending { .. } | AnalysisOutcome::Superseded => {
            anyhow::bail!("analysis #{} did not complete", request.sequence);
        }
    }
    Ok(())
}

fn print_signal(signal: &Signal, verbose: bool) {
    let direction = match signal.direction {
        Direction::Call => "▲ CALL".green().bold(),
        Direction::Put => "▼ PUT".red().bold(),
    };

    println!("{}", "Signal".cyan().bold());
    println!("{}", "======".cyan());
    println!("  Pair:         {}", signal.instrument);
    println!("  Timeframe:    {}", signal.timeframe);
    println!("  Direction:    {}", direction);
    println!(
        "  Confidence:   {} ({})",
        format!("{}%", signal.confidence_percent()).bold(),
        signal.strength
    );
    println!(
        "  Generated at: {}",
        signal.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    println!("{}", "Reasoning".bold());
    for finding in &signal.reasoning {
        let line = if verbose {
            format!(
                "  • {} [{:.4} → {:+.3}]",
                finding, finding.value, finding.contribution
            )
        } else {
            format!("  • {}", finding)
        };
        match finding.bias() {
            Some(Direction::Call) => println!("{}", line.green()),
            Some(Direction::Put) => println!("{}", line.red()),
            None => println!("{}", line.dimmed()),
        }
    }
}
