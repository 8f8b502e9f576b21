//! Property-based tests for the market simulation

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusty_signal_sim::{
    candles::CandleSynthesizer,
    instrument::ALL_CURRENCY_PAIRS,
    market::{MarketSnapshot, PriceState, RandomWalk, TickGenerator},
    signal::score_signal,
    timeframe::{align_to_bar, Timeframe},
    types::{Candle, Timestamp},
};

fn any_timeframe() -> impl Strategy<Value = Timeframe> {
    prop::sample::select(Timeframe::ALL.to_vec())
}

fn any_instrument() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ALL_CURRENCY_PAIRS.to_vec())
}

fn any_now() -> impl Strategy<Value = Timestamp> {
    // 2020-01-01 .. 2030-01-01
    (1_577_836_800i64..1_893_456_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Monotone one-minute candles around a random-walk close path
fn candle_sequence(len: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(-0.002f64..0.002, len..=len).prop_map(|moves| {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut price = 1.1;
        moves
            .into_iter()
            .enumerate()
            .map(|(i, rel)| {
                let open = price;
                price *= 1.0 + rel;
                let high = open.max(price) * 1.0002;
                let low = open.min(price) * 0.9998;
                Candle::new(
                    start + Duration::minutes(i as i64),
                    open,
                    high,
                    low,
                    price,
                    100.0,
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_ticks_keep_price_within_extrema(
        seed in any::<u64>(),
        ticks in 1usize..200,
        max_step in 0.0f64..0.01,
    ) {
        let generator = TickGenerator::new(max_step);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut snapshot = generator.initialize_market(&["EUR/USD", "USD/JPY", "USD/PKR OTC"], &mut rng);

        for _ in 0..ticks {
            snapshot = generator.advance_market(snapshot, &mut rng);
            for (_, state) in snapshot.iter() {
                prop_assert!(state.price > 0.0);
                prop_assert!(state.low <= state.price && state.price <= state.high);
                let expected = (state.price - state.previous_price) / state.previous_price * 100.0;
                prop_assert!((state.change_percent - expected).abs() < 1e-9);
                prop_assert!((state.price / state.previous_price - 1.0).abs() <= max_step + 1e-12);
            }
        }
    }

    #[test]
    fn prop_walk_never_leaves_positive_prices(
        price in 1e-6f64..1e6,
        relative in -2.0f64..2.0,
    ) {
        let next = RandomWalk::apply(price, relative);
        prop_assert!(next.is_finite() && next > 0.0);
    }

    #[test]
    fn prop_candles_are_spaced_and_well_formed(
        seed in any::<u64>(),
        reference in 0.01f64..50_000.0,
        count in 0usize..300,
        timeframe in any_timeframe(),
        now in any_now(),
    ) {
        let synth = CandleSynthesizer::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let bar = timeframe.bar_seconds();
        let candles = synth.synthesize_at(reference, count, bar, now, &mut rng);

        prop_assert_eq!(candles.len(), count);
        for pair in candles.windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::seconds(bar));
            prop_assert_eq!(pair[1].open, pair[0].close);
        }
        for candle in &candles {
            prop_assert!(candle.low <= candle.open.min(candle.close));
            prop_assert!(candle.open.max(candle.close) <= candle.high);
            prop_assert!(candle.low > 0.0);
        }
        if let Some(last) = candles.last() {
            prop_assert_eq!(last.timestamp + Duration::seconds(bar), align_to_bar(now, bar));
        }
    }

    #[test]
    fn prop_scoring_is_deterministic(
        candles in candle_sequence(60),
        symbol in any_instrument(),
        timeframe in any_timeframe(),
        live in 0.5f64..2.0,
    ) {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(symbol, PriceState::seeded(live));

        let first = score_signal(symbol, timeframe, &snapshot, &candles);
        let second = score_signal(symbol, timeframe, &snapshot, &candles);
        prop_assert_eq!(&first, &second);

        if let Some(signal) = first {
            prop_assert!((0.0..=1.0).contains(&signal.confidence));
            prop_assert!(signal.score.is_finite());
            prop_assert_eq!(signal.generated_at, candles[59].timestamp + timeframe.duration());
        }
    }

    #[test]
    fn prop_short_history_never_scores(len in 0usize..20, symbol in any_instrument()) {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(symbol, PriceState::seeded(1.0));

        let mut rng = StdRng::seed_from_u64(len as u64);
        let synth = CandleSynthesizer::default();
        let candles = synth.synthesize_at(1.0, len, 60, Utc::now(), &mut rng);
        prop_assert!(score_signal(symbol, Timeframe::M1, &snapshot, &candles).is_none());
    }
}
