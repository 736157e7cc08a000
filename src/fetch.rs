//! Background page fetching.
//!
//! Each [`FetchRequest`] runs as its own single-shot tokio task.  The task
//! calls the source once and sends a [`FetchMsg`] to the UI thread over an
//! unbounded channel, which the main loop drains on every tick.
//!
//! ## For contributors
//!
//! Tasks are never cancelled.  A reply that outlives its session (e.g. the
//! category changed meanwhile) still arrives, and [`Feed::apply`] discards it
//! by generation.  Timeouts are enforced by the source's HTTP client.
//!
//! [`Feed::apply`]: crate::feed::Feed::apply

use std::sync::Arc;

use log::{error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::feed::{FetchMsg, FetchRequest};
use crate::source::HeadlineSource;

/// Spawn a task that executes `request` against `source`.
///
/// Must be called from within a tokio runtime.  If the receiver is gone the
/// result is silently dropped.
pub fn spawn(
    source: Arc<dyn HeadlineSource>,
    request: FetchRequest,
    tx: mpsc::UnboundedSender<FetchMsg>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let FetchRequest {
            generation,
            kind,
            query,
        } = request;

        let result = source.fetch_page(&query).await;
        match &result {
            Ok(page) => info!(
                "{}: {} page {} returned {} articles",
                source.name(),
                query.category,
                query.page,
                page.articles.len()
            ),
            Err(e) => error!(
                "{}: {} page {} failed: {e:#}",
                source.name(),
                query.category,
                query.page
            ),
        }

        let _ = tx.send(FetchMsg {
            generation,
            kind,
            page: query.page,
            result,
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use crate::config::Category;
    use crate::feed::FetchKind;
    use crate::source::{Article, HeadlinesPage, PageQuery};

    /// Returns `page` articles for every page up to 2, then fails.
    struct CannedSource;

    #[async_trait]
    impl HeadlineSource for CannedSource {
        fn name(&self) -> &str {
            "canned"
        }

        async fn fetch_page(&self, query: &PageQuery) -> Result<HeadlinesPage> {
            if query.page > 2 {
                bail!("no page {}", query.page);
            }
            Ok(HeadlinesPage {
                articles: vec![Article::default(); query.page as usize],
                total_results: Some(3),
            })
        }
    }

    fn request(generation: u64, kind: FetchKind, page: u32) -> FetchRequest {
        FetchRequest {
            generation,
            kind,
            query: PageQuery {
                country: "us".into(),
                category: Category::General,
                page,
                page_size: 10,
            },
        }
    }

    #[tokio::test]
    async fn sends_the_result_tagged_with_the_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn(Arc::new(CannedSource), request(7, FetchKind::More, 2), tx)
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.generation, 7);
        assert_eq!(msg.kind, FetchKind::More);
        assert_eq!(msg.page, 2);
        assert_eq!(msg.result.unwrap().articles.len(), 2);
    }

    #[tokio::test]
    async fn forwards_errors() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn(Arc::new(CannedSource), request(1, FetchKind::More, 5), tx)
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(msg.result.unwrap_err().to_string().contains("no page 5"));
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = spawn(Arc::new(CannedSource), request(1, FetchKind::Initial, 1), tx);
        assert!(handle.await.is_ok());
    }
}
