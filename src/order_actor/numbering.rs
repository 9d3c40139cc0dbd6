use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 6;

/// Generates human-facing references like `ORD-MB2K1X3Q-7F3K9A`:
/// a prefix, the base-36 millisecond timestamp, and six random characters.
///
/// The timestamp part is strictly increasing per generator: a call in the
/// same millisecond as the previous one uses the previous value plus one.
/// During a burst of several calls per millisecond it therefore runs ahead
/// of the wall clock, by at most the burst length, and falls back in step
/// once calls slow down. It marks ordering, not the exact creation time.
/// References from one generator never collide; the random suffix keeps them
/// hard to guess, and the order store rejects a repeated order number.
#[derive(Debug)]
pub struct ReferenceGenerator {
    prefix: &'static str,
    last_millis: AtomicU64,
}

impl ReferenceGenerator {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, last_millis: AtomicU64::new(0) }
    }

    pub fn orders() -> Self {
        Self::new("ORD")
    }

    pub fn tracking() -> Self {
        Self::new("TRK")
    }

    pub fn next(&self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        let millis = now.max(previous + 1);
        format!("{}-{}-{}", self.prefix, to_base36(millis), random_suffix(SUFFIX_LEN))
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])).collect()
}
