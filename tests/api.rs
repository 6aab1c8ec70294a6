use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::extract::{Query, State};

use xshcm_live::api::{AppState, LotteryQuery, clear_cache, get_lottery_hcm};
use xshcm_live::cache::LotteryCache;
use xshcm_live::fetch::LotterySource;
use xshcm_live::types::{LotteryData, Prizes};

struct MockSource {
    name: &'static str,
    result: Option<LotteryData>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    fn new(name: &'static str, result: Option<LotteryData>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                result,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl LotterySource for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self) -> Option<LotteryData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn five_tier_result(source: &str) -> LotteryData {
    let mut data = LotteryData::empty(source);
    data.date = "Xổ số TP.HCM ngày 26/1".to_string();
    data.prizes = Prizes {
        g8: vec!["12".into()],
        g7: vec!["123".into()],
        g6: vec!["1234".into()],
        g5: vec!["1234".into()],
        db: vec!["123456".into()],
        ..Prizes::default()
    };
    data
}

fn state_with(sources: Vec<Box<dyn LotterySource>>) -> AppState {
    AppState {
        cache: Arc::new(LotteryCache::new()),
        sources: Arc::new(sources),
    }
}

fn no_refresh() -> Query<LotteryQuery> {
    Query(LotteryQuery { refresh: None })
}

#[tokio::test]
async fn first_call_fetches_second_call_serves_cache() {
    let (primary, primary_calls) = MockSource::new("primary", Some(five_tier_result("primary")));
    let (backup, backup_calls) = MockSource::new("backup", Some(five_tier_result("backup")));
    let state = state_with(vec![Box::new(primary), Box::new(backup)]);

    let first = get_lottery_hcm(State(state.clone()), no_refresh()).await.0;
    assert!(first.success);
    assert!(!first.cached);
    assert_eq!(first.data.source, "primary");
    assert_eq!(first.data.prizes.db, vec!["123456"]);
    assert_eq!(first.data.prizes.non_empty_tiers(), 5);
    assert_eq!(first.data.is_demo, None);
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backup_calls.load(Ordering::SeqCst), 0);

    let second = get_lottery_hcm(State(state.clone()), no_refresh()).await.0;
    assert!(second.cached);
    assert_eq!(second.data, first.data);
    assert_eq!(second.last_update, first.last_update);
    // Still exactly one fetch: the window is 2 minutes, no source re-invoked.
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backup_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refresh_flag_bypasses_fresh_cache() {
    let (primary, primary_calls) = MockSource::new("primary", Some(five_tier_result("primary")));
    let state = state_with(vec![Box::new(primary)]);

    get_lottery_hcm(State(state.clone()), no_refresh()).await;
    let forced = get_lottery_hcm(
        State(state.clone()),
        Query(LotteryQuery {
            refresh: Some("true".to_string()),
        }),
    )
    .await
    .0;

    assert!(!forced.cached);
    assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn all_sources_down_serves_flagged_demo_data() {
    let (a, _) = MockSource::new("a", None);
    let (b, _) = MockSource::new("b", None);
    let (c, _) = MockSource::new("c", None);
    let state = state_with(vec![Box::new(a), Box::new(b), Box::new(c)]);

    let response = get_lottery_hcm(State(state.clone()), no_refresh()).await.0;

    assert!(response.success);
    assert_eq!(response.data.is_demo, Some(true));
    assert!(!response.data.prizes.db.is_empty());
    assert_eq!(response.data.prizes.non_empty_tiers(), 9);
}

#[tokio::test]
async fn invalid_primary_is_rejected_in_favor_of_backup() {
    let mut headless = five_tier_result("primary");
    headless.prizes.db.clear();

    let (primary, _) = MockSource::new("primary", Some(headless));
    let (backup, _) = MockSource::new("backup", Some(five_tier_result("backup")));
    let state = state_with(vec![Box::new(primary), Box::new(backup)]);

    let response = get_lottery_hcm(State(state.clone()), no_refresh()).await.0;
    assert_eq!(response.data.source, "backup");
}

#[tokio::test]
async fn clear_cache_forces_next_call_to_fetch() {
    let (primary, primary_calls) = MockSource::new("primary", Some(five_tier_result("primary")));
    let state = state_with(vec![Box::new(primary)]);

    get_lottery_hcm(State(state.clone()), no_refresh()).await;

    let cleared = clear_cache(State(state.clone())).await.0;
    assert_eq!(cleared["success"], true);

    let after = get_lottery_hcm(State(state.clone()), no_refresh()).await.0;
    assert!(!after.cached);
    assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
}
