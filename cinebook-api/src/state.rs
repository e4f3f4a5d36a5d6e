use anyhow::Context;
use cinebook_booking::{engine_from_config, BookingWorkflow, IdGenerator, InvoiceRenderer};
use cinebook_core::clock::{Clock, SystemClock};
use cinebook_core::identity::AuthProvider;
use cinebook_core::repository::SessionState;
use cinebook_store::app_config::{Config, SessionBackend};
use cinebook_store::{
    Argon2AccountStore, FsDocumentStore, InMemoryBookingStore, InMemorySessionStore,
    RedisSessionStore,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<BookingWorkflow>,
    pub accounts: Arc<dyn AuthProvider>,
    pub sessions: Arc<dyn SessionState>,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wires the workflow and its backends as configured.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let sessions: Arc<dyn SessionState> = match config.session.backend {
            SessionBackend::Memory => Arc::new(InMemorySessionStore::with_ttl(
                Duration::from_secs(config.auth.session_lifetime_seconds),
            )),
            SessionBackend::Redis => Arc::new(
                RedisSessionStore::new(
                    &config.session.redis_url,
                    config.auth.session_lifetime_seconds,
                )
                .await
                .context("Failed to connect to Redis")?,
            ),
        };

        let documents = FsDocumentStore::new(&config.invoices.directory)
            .await
            .with_context(|| {
                format!(
                    "Failed to create invoice directory {}",
                    config.invoices.directory.display()
                )
            })?;

        let renderer = InvoiceRenderer::new(
            engine_from_config(&config.invoices),
            Arc::new(documents),
            IdGenerator::new(
                config.invoices.handle_prefix.clone(),
                config.bookings.id_scheme,
                clock.clone(),
            )
            .with_suffix(".pdf"),
            Duration::from_millis(config.invoices.render_timeout_ms),
            config.invoices.currency_symbol.clone(),
        );

        let workflow = BookingWorkflow::new(
            Arc::new(InMemoryBookingStore::new()),
            sessions.clone(),
            Arc::new(renderer),
            IdGenerator::new(
                config.bookings.id_prefix.clone(),
                config.bookings.id_scheme,
                clock.clone(),
            ),
            clock,
        );

        let secret = if config.auth.jwt_secret.is_empty() {
            tracing::warn!("No JWT secret configured; tokens will not survive a restart");
            format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
        } else {
            config.auth.jwt_secret.clone()
        };

        Ok(Self {
            workflow: Arc::new(workflow),
            accounts: Arc::new(Argon2AccountStore::new()),
            sessions,
            auth: AuthConfig {
                secret,
                expiration: config.auth.session_lifetime_seconds,
            },
        })
    }
}
