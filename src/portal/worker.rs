//! Serializing worker that owns the browser session.
//!
//! Lookups are queued on a channel and executed one at a time against the
//! single session, which is created on the first job and kept until its
//! browser connection dies.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::driver::PortalDriver;
use super::model::ParcelQuery;
use super::page::PortalPage;
use super::PortalError;

const QUEUE_CAPACITY: usize = 32;

/// Creates the browser session on first use.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Page: PortalPage + 'static;

    async fn create(&self) -> Result<Self::Page, PortalError>;
}

struct LookupJob {
    query: ParcelQuery,
    reply: oneshot::Sender<Result<Option<String>, PortalError>>,
}

/// Cloneable entry point to the portal worker.
#[derive(Clone)]
pub struct PortalHandle {
    sender: mpsc::Sender<LookupJob>,
}

impl PortalHandle {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn<F>(factory: F, driver: PortalDriver) -> Self
    where
        F: SessionFactory + 'static,
    {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(start_portal_worker(receiver, factory, Arc::new(driver)));
        Self { sender }
    }

    /// Queue a lookup and wait for its turn on the session.
    pub async fn lookup_parcel(&self, query: ParcelQuery) -> Result<Option<String>, PortalError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(LookupJob { query, reply })
            .await
            .map_err(|_| PortalError::WorkerUnavailable)?;
        response.await.map_err(|_| PortalError::WorkerUnavailable)?
    }
}

async fn start_portal_worker<F>(
    mut receiver: mpsc::Receiver<LookupJob>,
    factory: F,
    driver: Arc<PortalDriver>,
) where
    F: SessionFactory,
{
    log::info!("Portal worker started");
    let mut session: Option<F::Page> = None;

    while let Some(job) = receiver.recv().await {
        if let Some(page) = session.as_ref() {
            if !page.is_alive().await {
                log::warn!("Portal browser session is gone, relaunching");
                session = None;
            }
        }

        if session.is_none() {
            log::info!("Launching portal browser session");
            match factory.create().await {
                Ok(page) => session = Some(page),
                Err(e) => {
                    log::error!("Failed to create portal session: {}", e);
                    let _ = job.reply.send(Err(e));
                    continue;
                }
            }
        }

        let result = match session.as_ref() {
            Some(page) => driver.lookup_parcel(page, &job.query).await,
            None => Err(PortalError::WorkerUnavailable),
        };

        if job.reply.send(result).is_err() {
            log::debug!("Lookup caller went away before the result was ready");
        }
    }

    log::info!("Portal worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::clock::Sleeper;
    use crate::portal::driver::{PortalCredentials, PortalSettings};
    use crate::portal::fake::FakePage;
    use crate::portal::locator;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {
            tokio::task::yield_now().await;
        }
    }

    struct FakeFactory {
        created: Arc<AtomicUsize>,
        fail_first: bool,
        closers: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
    }

    impl FakeFactory {
        fn new(created: Arc<AtomicUsize>, fail_first: bool) -> Self {
            Self {
                created,
                fail_first,
                closers: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl SessionFactory for FakeFactory {
        type Page = FakePage;

        async fn create(&self) -> Result<FakePage, PortalError> {
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(PortalError::DriverMissing("/missing/chromedriver".into()));
            }
            let page = FakePage::new();
            self.closers.lock().push(page.closed_flag());
            page.add(&locator::search_box(), &[""]);
            page.add(&locator::address_submit(), &["SUBMIT"]);
            page.add(&locator::parcel_cell(), &["07-123"]);
            Ok(page)
        }
    }

    fn driver() -> PortalDriver {
        let settings = PortalSettings {
            credentials: Some(PortalCredentials {
                username: "u".into(),
                password: "p".into(),
            }),
            ..PortalSettings::default()
        };
        PortalDriver::new(settings, Arc::new(NoSleep))
    }

    #[tokio::test]
    async fn test_session_created_once_and_reused() {
        let created = Arc::new(AtomicUsize::new(0));
        let handle = PortalHandle::spawn(
            FakeFactory::new(created.clone(), false),
            driver(),
        );

        let queries = (0..4).map(|i| {
            let handle = handle.clone();
            async move {
                handle
                    .lookup_parcel(ParcelQuery::new(format!("{} Main St", i), ""))
                    .await
            }
        });
        let results = futures::future::join_all(queries).await;

        for result in results {
            assert_eq!(result.unwrap().as_deref(), Some("07-123"));
        }
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_launch_reported_then_retried() {
        let created = Arc::new(AtomicUsize::new(0));
        let handle = PortalHandle::spawn(
            FakeFactory::new(created.clone(), true),
            driver(),
        );

        let first = handle
            .lookup_parcel(ParcelQuery::new("1 Main St", ""))
            .await;
        assert!(matches!(first, Err(PortalError::DriverMissing(_))));

        let second = handle
            .lookup_parcel(ParcelQuery::new("1 Main St", ""))
            .await
            .unwrap();
        assert_eq!(second.as_deref(), Some("07-123"));
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dead_session_is_relaunched() {
        let created = Arc::new(AtomicUsize::new(0));
        let factory = FakeFactory::new(created.clone(), false);
        let closers = factory.closers.clone();
        let handle = PortalHandle::spawn(factory, driver());

        let first = handle
            .lookup_parcel(ParcelQuery::new("1 Main St", ""))
            .await
            .unwrap();
        assert_eq!(first.as_deref(), Some("07-123"));

        closers.lock()[0].store(true, Ordering::SeqCst);

        let second = handle
            .lookup_parcel(ParcelQuery::new("1 Main St", ""))
            .await
            .unwrap();
        assert_eq!(second.as_deref(), Some("07-123"));
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }
}
