use tokio::sync::RwLock;

use crate::types::LotteryData;

/// How long a stored result stays fresh (2 minutes).
pub const CACHE_DURATION_MS: i64 = 2 * 60 * 1000;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: LotteryData,
    last_update: i64,
}

/// Single-slot cache for the most recent accepted result. The slot is
/// overwritten on every accepted fetch; the lock guards against torn
/// reads under the multithreaded runtime.
#[derive(Debug, Default)]
pub struct LotteryCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl LotteryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<(LotteryData, i64)> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|entry| (entry.data.clone(), entry.last_update))
    }

    pub async fn is_fresh(&self, now_ms: i64, window_ms: i64) -> bool {
        match self.slot.read().await.as_ref() {
            Some(entry) => now_ms - entry.last_update < window_ms,
            None => false,
        }
    }

    pub async fn put(&self, data: LotteryData, now_ms: i64) {
        *self.slot.write().await = Some(CacheEntry {
            data,
            last_update: now_ms,
        });
    }

    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
