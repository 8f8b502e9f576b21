//! Integration tests for rusty_signal_sim

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusty_signal_sim::{
    candles::CandleSynthesizer,
    engine::{timeframe_to_bar_seconds, MarketEngine},
    instrument::ALL_CURRENCY_PAIRS,
    market::{MarketSnapshot, PriceState, SharedMarket, TickGenerator},
    session::{AnalysisOutcome, AnalysisSession},
    signal::score_signal,
    timeframe::Timeframe,
    types::Timestamp,
};
use std::sync::Arc;
use std::thread;

fn fixed_now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 4, 14, 16, 42, 9).unwrap()
}

#[test]
fn test_ten_ticks_stay_within_compounded_bound() {
    let generator = TickGenerator::new(0.001);
    let mut rng = StdRng::seed_from_u64(2024);

    let mut snapshot = MarketSnapshot::new();
    snapshot.insert("EUR/USD", PriceState::seeded(1.10000));

    let mut path = vec![1.10000];
    for _ in 0..10 {
        snapshot = generator.advance_market(snapshot, &mut rng);
        path.push(snapshot.price("EUR/USD").unwrap());
    }

    let state = snapshot.get("EUR/USD").unwrap();
    let lower = 1.10000 * 0.999_f64.powi(10);
    let upper = 1.10000 * 1.001_f64.powi(10);
    assert!(state.price >= lower && state.price <= upper);

    for price in &path {
        assert!(state.low <= *price && *price <= state.high);
    }
    assert_eq!(state.high, path.iter().cloned().fold(f64::MIN, f64::max));
    assert_eq!(state.low, path.iter().cloned().fold(f64::MAX, f64::min));
}

#[test]
fn test_market_invariants_hold_over_many_ticks() {
    let mut engine = MarketEngine::seeded(11);
    let mut snapshot = engine.initialize_market();

    for _ in 0..250 {
        let previous = snapshot.clone();
        snapshot = engine.advance_market(snapshot);

        for (symbol, state) in snapshot.iter() {
            assert!(state.low <= state.price && state.price <= state.high, "{}", symbol);
            assert_eq!(state.previous_price, previous.price(symbol).unwrap());

            let expected = (state.price - state.previous_price) / state.previous_price * 100.0;
            assert!((state.change_percent - expected).abs() < 1e-9);
        }
    }
    assert_eq!(snapshot.len(), ALL_CURRENCY_PAIRS.len());
}

#[test]
fn test_candle_history_shape() {
    let synth = CandleSynthesizer::default();
    let mut rng = StdRng::seed_from_u64(5);
    let candles = synth.synthesize_at(1.2345, 100, 60, fixed_now(), &mut rng);

    assert_eq!(candles.len(), 100);
    for pair in candles.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
        assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::seconds(60));
    }
    for candle in &candles {
        assert!(candle.low <= candle.open.min(candle.close));
        assert!(candle.open.max(candle.close) <= candle.high);
        assert!(candle.volume > 0.0);
    }
}

#[test]
fn test_every_timeframe_synthesizes() {
    let mut engine = MarketEngine::seeded(6);
    let snapshot = engine.initialize_market();

    for timeframe in Timeframe::ALL {
        let candles = engine.candles_for("GBP/JPY", timeframe, &snapshot, fixed_now());
        assert_eq!(candles.len(), 100, "{}", timeframe);
        assert_eq!(
            candles[1].timestamp - candles[0].timestamp,
            timeframe.duration()
        );
        let last = candles.last().unwrap();
        assert!(last.timestamp + timeframe.duration() <= fixed_now());
    }
}

#[test]
fn test_scoring_is_pure() {
    let mut engine = MarketEngine::seeded(21);
    let mut snapshot = engine.initialize_market();
    snapshot = engine.advance_market(snapshot);

    for symbol in ["EUR/USD", "USD/JPY", "AED/CNY OTC", "USD/PKR OTC"] {
        let candles = engine.candles_for(symbol, Timeframe::M15, &snapshot, fixed_now());
        let first = score_signal(symbol, Timeframe::M15, &snapshot, &candles);
        let second = score_signal(symbol, Timeframe::M15, &snapshot, &candles);
        assert_eq!(first, second);

        if let Some(signal) = first {
            assert!((0.0..=1.0).contains(&signal.confidence));
            assert!(!signal.reasoning.is_empty());
            assert_eq!(signal.instrument, symbol);
        }
    }
}

#[test]
fn test_short_history_gives_no_signal() {
    let mut engine = MarketEngine::seeded(9);
    let snapshot = engine.initialize_market();
    let reference = engine.reference_price("EUR/USD", &snapshot);

    for count in [0, 1, 5, 19] {
        let candles = engine.synthesize_candles_at(reference, count, 60, fixed_now());
        assert!(score_signal("EUR/USD", Timeframe::M1, &snapshot, &candles).is_none());
    }
}

#[test]
fn test_timeframe_lookup() {
    assert_eq!(timeframe_to_bar_seconds("H4"), 14400);
    assert_eq!(timeframe_to_bar_seconds("D1"), 86400);
    assert_eq!(timeframe_to_bar_seconds("W1"), 60);
    assert_eq!(timeframe_to_bar_seconds(""), 60);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let mut engine = MarketEngine::seeded(seed);
        let mut snapshot = engine.initialize_market();
        for _ in 0..20 {
            snapshot = engine.advance_market(snapshot);
        }
        let candles = engine.candles_for("EUR/JPY", Timeframe::H1, &snapshot, fixed_now());
        let signal = engine.score_signal("EUR/JPY", Timeframe::H1, &snapshot, &candles);
        (snapshot, candles, signal)
    };

    assert_eq!(run(314), run(314));
    assert_ne!(run(314).0, run(315).0);
}

#[test]
fn test_analysis_session_flow() {
    let mut engine = MarketEngine::seeded(13);
    let mut snapshot = engine.initialize_market();
    let mut session = AnalysisSession::new("EUR/USD", Timeframe::M5, [800, 2300]);

    let stale = session.request(fixed_now(), engine.rng_mut());
    let request = session.request(fixed_now(), engine.rng_mut());
    let delay = request.delay().num_milliseconds();
    assert!((800..=2300).contains(&delay));

    snapshot = engine.advance_market(snapshot);
    let signal = engine.analyze("EUR/USD", Timeframe::M5, &snapshot, request.ready_at);

    assert_eq!(
        session.complete(&stale, request.ready_at, signal.clone()),
        AnalysisOutcome::Superseded
    );
    assert!(matches!(
        session.complete(&request, fixed_now(), signal.clone()),
        AnalysisOutcome::Pending { .. }
    ));
    assert_eq!(
        session.complete(&request, request.ready_at, signal.clone()),
        AnalysisOutcome::Delivered(signal.clone())
    );
    assert_eq!(session.active_signal(), signal.as_ref());
}

#[test]
fn test_shared_market_with_concurrent_readers() {
    let mut rng = StdRng::seed_from_u64(17);
    let generator = TickGenerator::default();
    let market = Arc::new(SharedMarket::new(
        generator.initialize_market(&ALL_CURRENCY_PAIRS, &mut rng),
    ));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let market = Arc::clone(&market);
            thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = market.snapshot();
                    for (_, state) in snapshot.iter() {
                        assert!(state.is_valid());
                    }
                }
            })
        })
        .collect();

    for _ in 0..50 {
        market.tick(&generator, &mut rng);
    }
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(market.len(), ALL_CURRENCY_PAIRS.len());
}
