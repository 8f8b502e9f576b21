//! Error formatting and configuration loading

use rusty_signal_sim::{
    config::SimulationConfig,
    error::SimError,
    instrument::Instrument,
    timeframe::Timeframe,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_invalid_timeframe_message() {
    let err = "W1".parse::<Timeframe>().unwrap_err();
    assert!(matches!(err, SimError::InvalidTimeframe(_)));
    let msg = err.to_string();
    assert!(msg.contains("Invalid timeframe"));
    assert!(msg.contains("W1"));
}

#[test]
fn test_unknown_instrument_message() {
    let err = Instrument::parse("EURUSD").unwrap_err();
    assert!(err.to_string().contains("EURUSD"));
}

#[test]
fn test_config_error_message() {
    let err = SimError::ConfigError("intra_bar_steps must be greater than 0".to_string());
    assert_eq!(
        err.to_string(),
        "Configuration error: intra_bar_steps must be greater than 0"
    );
}

#[test]
fn test_io_error_conversion() {
    let err = SimulationConfig::load(Some(Path::new("/nonexistent/rusty-signal-sim.toml")))
        .unwrap_err();
    assert!(matches!(err, SimError::IoError(_)));
    assert!(err.to_string().starts_with("IO error"));
}

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
seed = 99
tick_interval_secs = 5
analysis_delay_ms = [100, 200]

[scoring]
threshold = 0.25
"#
    )
    .unwrap();

    let config = SimulationConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.tick_interval_secs, 5);
    assert_eq!(config.analysis_delay_ms, [100, 200]);
    assert_eq!(config.scoring.threshold, 0.25);
    assert_eq!(config.candle_count, 100);
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_tick_step = 3.0").unwrap();

    let err = SimulationConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, SimError::ConfigError(_)));
    assert!(err.to_string().contains("max_tick_step"));
}

#[test]
fn test_malformed_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "candle_count = [").unwrap();

    let err = SimulationConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, SimError::TomlError(_)));
    assert!(err.to_string().starts_with("TOML error"));
}

#[test]
fn test_csv_export_to_file() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rusty_signal_sim::candles::{write_csv, CandleSynthesizer};

    let mut rng = StdRng::seed_from_u64(1);
    let candles = CandleSynthesizer::default().synthesize(1.25, 10, 300, &mut rng);

    let file = NamedTempFile::new().unwrap();
    write_csv(&candles, file.reopen().unwrap()).unwrap();

    let contents = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("timestamp,open,high,low,close,volume"));
    assert_eq!(lines.count(), 10);
}
