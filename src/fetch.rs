use async_trait::async_trait;

use crate::types::LotteryData;

/// One upstream results page. Implementations own their URL, headers and
/// selector strategy; the orchestrator only sees this capability.
#[async_trait]
pub trait LotterySource: Send + Sync {
    fn name(&self) -> &'static str;

    /// One fetch-and-parse pass. Absence covers network errors, non-2xx
    /// responses and unparseable markup alike; callers treat `None` as an
    /// expected outcome, not a defect.
    async fn fetch(&self) -> Option<LotteryData>;
}

/// A result is usable when the grand prize is present and at least 5 of
/// the 9 tiers carry numbers. Tolerates partial page layouts while
/// rejecting clearly broken extractions.
pub fn is_valid_data(data: &LotteryData) -> bool {
    if data.prizes.db.is_empty() {
        return false;
    }
    data.prizes.non_empty_tiers() >= 5
}

/// Try sources strictly in priority order and return the first valid
/// result. Sequential on purpose: backups only see traffic after the
/// sources ahead of them are exhausted.
pub async fn fetch_lottery_data(sources: &[Box<dyn LotterySource>]) -> Option<LotteryData> {
    for source in sources {
        match source.fetch().await {
            Some(data) if is_valid_data(&data) => {
                tracing::info!("Successfully fetched from {}", data.source);
                return Some(data);
            }
            Some(data) => {
                tracing::warn!("Data from {} is incomplete", data.source);
            }
            None => {
                tracing::warn!("Fetcher {} failed", source.name());
            }
        }
    }

    tracing::error!("All sources failed for XSHCM");
    None
}
