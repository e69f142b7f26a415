use std::cell::Cell;

use chrono::{DateTime, Utc};
use serde::Serialize;

thread_local! {
    static FORCED_SEED: Cell<Option<u64>> = const { Cell::new(None) };
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn force_seed(seed: Option<u64>) {
    FORCED_SEED.with(|forced| forced.set(seed));
}

/// Seed for a new game: the one given on the page hash if any, otherwise a random one.
pub(crate) fn next_seed() -> u64 {
    FORCED_SEED.with(Cell::get).unwrap_or_else(js_random_seed)
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("Could not serialize snapshot: {}", err);
        "null".to_string()
    })
}
