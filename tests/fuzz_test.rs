use mousechat::history::{HistoryRing, HISTORY_MAX};
use mousechat::hotkey::{ComboMatcher, KeyEvent, DEFAULT_DEBOUNCE};
use mousechat::keys::{KeyCombo, KeyId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

const KEYS: [KeyId; 5] = [
    KeyId::Alt,
    KeyId::Letter('Q'),
    KeyId::Shift,
    KeyId::Control,
    KeyId::Letter('W'),
];

#[test]
fn test_key_flood_fires_at_most_once_per_window() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let mut matcher = ComboMatcher::new(KeyCombo::default(), DEFAULT_DEBOUNCE);
        let start = Instant::now();
        let mut now = start;
        let mut fired: Vec<Instant> = Vec::new();

        for _ in 0..2_000 {
            now += Duration::from_millis(rng.gen_range(0..40));
            let key = KEYS[rng.gen_range(0..KEYS.len())];
            let event = if rng.gen_bool(0.6) {
                KeyEvent::Down(key)
            } else {
                KeyEvent::Up(key)
            };
            if matcher.handle(event, now) {
                fired.push(now);
            }
        }

        for pair in fired.windows(2) {
            assert!(
                pair[1] - pair[0] >= DEFAULT_DEBOUNCE,
                "fired twice within {:?}",
                pair[1] - pair[0]
            );
        }
    }
}

#[test]
fn test_history_flood_stays_bounded() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ring = HistoryRing::new();
    let words = ["explain", "summarize", "translate", "", "   ", "explain"];

    for _ in 0..1_000 {
        let word = words[rng.gen_range(0..words.len())];
        let before_last = ring.entries().last().cloned();
        let changed = ring.push(word);

        assert!(ring.len() <= HISTORY_MAX);
        if before_last.as_deref() == Some(word.trim()) || word.trim().is_empty() {
            assert!(!changed);
        }
        let entries = ring.entries();
        for pair in entries.windows(2) {
            assert_ne!(pair[0], pair[1], "consecutive duplicate kept");
        }
    }
}
