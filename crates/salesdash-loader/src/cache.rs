//! Caller-owned memo of the most recent live dataset.
//!
//! Only live loads are remembered; degraded or unavailable results are
//! returned but never cached, so the next call tries the API again. The
//! lock is held for the whole load, which keeps at most one load in flight
//! per cache.

use std::future::Future;
use std::sync::Arc;

use salesdash_core::{Dataset, DatasetTag, SalesQuery};
use tokio::sync::Mutex;

use crate::loader::{LoadOutcome, Notice, NoticeLevel};

struct Memo {
    query: SalesQuery,
    dataset: Arc<Dataset>,
}

/// Result of [`DatasetCache::get_or_load`].
#[derive(Debug)]
pub struct CachedLoad {
    pub dataset: Arc<Dataset>,
    pub notices: Vec<Notice>,
    /// `true` when served from the memo without loading.
    pub hit: bool,
}

#[derive(Default)]
pub struct DatasetCache {
    memo: Mutex<Option<Memo>>,
}

impl DatasetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized dataset for `query`, or runs `load` and
    /// memoizes its result if it is live.
    pub async fn get_or_load<F, Fut>(&self, query: SalesQuery, load: F) -> CachedLoad
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadOutcome>,
    {
        let mut memo = self.memo.lock().await;

        if let Some(hit) = memo.as_ref().filter(|m| m.query == query) {
            tracing::debug!(records = hit.dataset.len(), "serving cached sales data");
            return CachedLoad {
                dataset: Arc::clone(&hit.dataset),
                notices: vec![Notice {
                    level: NoticeLevel::Info,
                    message: format!("using cached live data: {} records", hit.dataset.len()),
                }],
                hit: true,
            };
        }

        let outcome = load().await;
        let dataset = Arc::new(outcome.dataset);
        if dataset.tag() == DatasetTag::Live {
            *memo = Some(Memo {
                query,
                dataset: Arc::clone(&dataset),
            });
        }

        CachedLoad {
            dataset,
            notices: outcome.notices,
            hit: false,
        }
    }

    /// Drops the memo so the next [`Self::get_or_load`] reloads.
    pub async fn invalidate(&self) {
        *self.memo.lock().await = None;
    }

    /// The memoized dataset, if any.
    pub async fn latest(&self) -> Option<Arc<Dataset>> {
        self.memo
            .lock()
            .await
            .as_ref()
            .map(|m| Arc::clone(&m.dataset))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use salesdash_core::{Region, SalesRecord, UnavailableReason};

    use super::*;
    use crate::retry::FetchReport;

    fn record() -> SalesRecord {
        SalesRecord {
            product: "Lava louças".to_owned(),
            category: "eletrodomesticos".to_owned(),
            price: 2_100.0,
            freight: 110.0,
            purchase_date: None,
            seller: "Bruno Rodrigues".to_owned(),
            purchase_location: "RS".to_owned(),
            rating: 2,
            payment_type: "cartao_credito".to_owned(),
            installments: 12,
            lat: -30.17,
            lon: -53.5,
        }
    }

    fn live() -> LoadOutcome {
        LoadOutcome {
            dataset: Dataset::live(vec![record()]).unwrap(),
            notices: Vec::new(),
            report: FetchReport::default(),
        }
    }

    fn unavailable() -> LoadOutcome {
        LoadOutcome {
            dataset: Dataset::unavailable(UnavailableReason::FallbackMissing {
                path: PathBuf::from("dados_fallback.csv"),
            }),
            notices: Vec::new(),
            report: FetchReport::default(),
        }
    }

    #[tokio::test]
    async fn live_result_is_reused() {
        let cache = DatasetCache::new();
        let loads = AtomicU32::new(0);
        let counter = &loads;
        let query = SalesQuery::default();

        for _ in 0..3 {
            cache
                .get_or_load(query, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    live()
                })
                .await;
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(cache.latest().await.is_some());
    }

    #[tokio::test]
    async fn hit_reports_a_notice() {
        let cache = DatasetCache::new();
        let query = SalesQuery::default();
        let first = cache.get_or_load(query, || async { live() }).await;
        assert!(!first.hit);

        let second = cache.get_or_load(query, || async { live() }).await;
        assert!(second.hit);
        assert!(Arc::ptr_eq(&first.dataset, &second.dataset));
        assert_eq!(second.notices[0].level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn unavailable_result_is_not_cached() {
        let cache = DatasetCache::new();
        let loads = AtomicU32::new(0);
        let counter = &loads;
        let query = SalesQuery::default();

        for _ in 0..2 {
            let result = cache
                .get_or_load(query, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    unavailable()
                })
                .await;
            assert!(result.dataset.is_empty());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert!(cache.latest().await.is_none());
    }

    #[tokio::test]
    async fn different_query_reloads() {
        let cache = DatasetCache::new();
        let loads = AtomicU32::new(0);
        let counter = &loads;

        for query in [
            SalesQuery::default(),
            SalesQuery::new(Region::Sul, Some(2023)),
        ] {
            cache
                .get_or_load(query, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    live()
                })
                .await;
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = DatasetCache::new();
        let loads = AtomicU32::new(0);
        let counter = &loads;
        let query = SalesQuery::default();

        let load = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            live()
        };
        cache.get_or_load(query, load).await;
        cache.invalidate().await;
        assert!(cache.latest().await.is_none());
        cache.get_or_load(query, load).await;

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_triggers_share_one_load() {
        let cache = Arc::new(DatasetCache::new());
        let loads = Arc::new(AtomicU32::new(0));
        let query = SalesQuery::default();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_load(query, || async move {
                        loads.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                        live()
                    })
                    .await
                    .hit
            }));
        }

        let mut hits = 0;
        for handle in handles {
            if handle.await.unwrap() {
                hits += 1;
            }
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(hits, 3);
    }
}
