use async_trait::async_trait;
use cinebook_core::booking::PendingConfirmation;
use cinebook_core::repository::{SessionHandle, SessionState};
use cinebook_core::BackendError;
use redis::AsyncCommands;
use tracing::info;

/// Session scratch state in Redis. Staged confirmations expire together with
/// the session that staged them.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub async fn new(connection_string: &str, ttl_seconds: u64) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        // Fail at startup rather than on the first booking
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        info!("Connected to Redis session store");
        Ok(Self { client, ttl_seconds })
    }

    fn pending_key(session: &SessionHandle) -> String {
        format!("session:{}:pending", session)
    }
}

#[async_trait]
impl SessionState for RedisSessionStore {
    async fn stage(
        &self,
        session: &SessionHandle,
        confirmation: PendingConfirmation,
    ) -> Result<(), BackendError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(&confirmation)?;
        conn.set_ex::<_, _, ()>(Self::pending_key(session), payload, self.ttl_seconds)
            .await?;
        Ok(())
    }

    async fn take_and_clear(
        &self,
        session: &SessionHandle,
    ) -> Result<Option<PendingConfirmation>, BackendError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::pending_key(session);

        // GET and DEL in one MULTI so two readers cannot both see the value
        let (payload,): (Option<String>,) = redis::pipe()
            .atomic()
            .get(&key)
            .del(&key)
            .ignore()
            .query_async(&mut conn)
            .await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn clear(&self, session: &SessionHandle) -> Result<(), BackendError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::pending_key(session)).await?;
        Ok(())
    }
}
