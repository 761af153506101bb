use core::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// hands out millisecond-clock ids that never repeat, even when two entities are
/// created inside the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self { Self::default() }

    /// next id, strictly greater than every id handed out before and than `floor`.
    /// `None` once no such id fits in a `u64`.
    pub fn next_above(&self, floor: u64) -> Option<u64> {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let step = |last: u64| Some(now.max(last.checked_add(1)?).max(floor.checked_add(1)?));

        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, step)
            .ok()
            .and_then(step)
    }
}
