use async_trait::async_trait;
use cinebook_core::booking::PendingConfirmation;
use cinebook_core::repository::{SessionHandle, SessionState};
use cinebook_core::BackendError;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_TTL: Duration = Duration::from_secs(1800);

/// Staged confirmations held in process memory. Entries older than the
/// session lifetime read as absent.
pub struct InMemorySessionStore {
    ttl: Duration,
    staged: Mutex<HashMap<SessionHandle, (Instant, PendingConfirmation)>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            staged: Mutex::new(HashMap::new()),
        }
    }

    fn is_live(&self, staged_at: Instant) -> bool {
        staged_at.elapsed() < self.ttl
    }
}

#[async_trait]
impl SessionState for InMemorySessionStore {
    async fn stage(
        &self,
        session: &SessionHandle,
        confirmation: PendingConfirmation,
    ) -> Result<(), BackendError> {
        let mut staged = self.staged.lock().await;
        staged.retain(|_, (at, _)| self.is_live(*at));
        staged.insert(*session, (Instant::now(), confirmation));
        Ok(())
    }

    async fn take_and_clear(
        &self,
        session: &SessionHandle,
    ) -> Result<Option<PendingConfirmation>, BackendError> {
        let taken = self.staged.lock().await.remove(session);
        Ok(taken
            .filter(|(at, _)| self.is_live(*at))
            .map(|(_, confirmation)| confirmation))
    }

    async fn clear(&self, session: &SessionHandle) -> Result<(), BackendError> {
        self.staged.lock().await.remove(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;

    #[tokio::test]
    async fn test_take_is_single_use() {
        let store = InMemorySessionStore::new();
        let session = SessionHandle::new();
        let pending = PendingConfirmation::from(&record("BK1"));

        store.stage(&session, pending.clone()).await.unwrap();
        assert_eq!(store.take_and_clear(&session).await.unwrap(), Some(pending));
        assert_eq!(store.take_and_clear(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stage_overwrites() {
        let store = InMemorySessionStore::new();
        let session = SessionHandle::new();

        store.stage(&session, PendingConfirmation::from(&record("BK1"))).await.unwrap();
        store.stage(&session, PendingConfirmation::from(&record("BK2"))).await.unwrap();

        let taken = store.take_and_clear(&session).await.unwrap().unwrap();
        assert_eq!(taken.booking_id.as_str(), "BK2");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        let mine = SessionHandle::new();
        let theirs = SessionHandle::new();

        store.stage(&mine, PendingConfirmation::from(&record("BK1"))).await.unwrap();
        assert_eq!(store.take_and_clear(&theirs).await.unwrap(), None);

        store.clear(&mine).await.unwrap();
        assert_eq!(store.take_and_clear(&mine).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_confirmation_reads_as_absent() {
        let store = InMemorySessionStore::with_ttl(Duration::from_millis(20));
        let session = SessionHandle::new();

        store.stage(&session, PendingConfirmation::from(&record("BK1"))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.take_and_clear(&session).await.unwrap(), None);
        assert!(store.staged.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_staging_sweeps_expired_sessions() {
        let store = InMemorySessionStore::with_ttl(Duration::from_millis(20));
        let abandoned = SessionHandle::new();
        let active = SessionHandle::new();

        store.stage(&abandoned, PendingConfirmation::from(&record("BK1"))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        store.stage(&active, PendingConfirmation::from(&record("BK2"))).await.unwrap();

        let staged = store.staged.lock().await;
        assert_eq!(staged.len(), 1);
        assert!(staged.contains_key(&active));
    }
}
