//! Application state and service wiring

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use sf_core::repositories::{
    InMemoryOtpRepository, InMemoryShippingSettings, InMemoryUserDirectory, OtpRepository,
    ShippingSettingsRepository, UserDirectory,
};
use sf_core::services::otp::{OtpService, OtpServiceConfig};
use sf_core::services::rate_limit::{CounterStore, InMemoryCounterStore, RateLimiter};
use sf_core::services::shipping::ShippingService;
use sf_infra::cache::{RedisClient, RedisCounterStore};
use sf_infra::database::{
    DatabasePool, PgOtpRepository, PgShippingSettingsRepository, PgUserDirectory,
};
use sf_infra::sms::create_sms_service;
use sf_shared::{AppConfig, HealthStatus, ServiceHealth};

/// How often elapsed in-memory rate limit windows are dropped
const COUNTER_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// A backing service reported by the health endpoint
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> ServiceHealth;
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> ServiceHealth {
        match self.health_check().await {
            Ok(()) => ServiceHealth::healthy(),
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                ServiceHealth::with_status(HealthStatus::Unhealthy, "database unreachable")
            }
        }
    }
}

#[async_trait]
impl HealthCheck for RedisClient {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn check(&self) -> ServiceHealth {
        match self.health_check().await {
            Ok(true) => ServiceHealth::healthy(),
            Ok(false) => {
                ServiceHealth::with_status(HealthStatus::Degraded, "unexpected PING reply")
            }
            Err(_) => ServiceHealth::with_status(HealthStatus::Unhealthy, "cache unreachable"),
        }
    }
}

/// Shared services handed to every worker
pub struct AppState {
    pub otp_service: Arc<OtpService>,
    pub shipping_service: Arc<ShippingService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    /// Take the client address from proxy headers instead of the socket
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Connect backing services and build the domain services.
    ///
    /// Without a database URL the in-memory repositories are used, which is
    /// refused in production.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let mut health_checks: Vec<Arc<dyn HealthCheck>> = Vec::new();

        let counters: Arc<dyn CounterStore> = if config.cache.enabled {
            let client = RedisClient::new(config.cache.clone()).await?;
            health_checks.push(Arc::new(client.clone()));
            Arc::new(RedisCounterStore::new(client))
        } else {
            let store = Arc::new(InMemoryCounterStore::new());
            spawn_counter_purge(store.clone());
            store
        };
        let rate_limiter = Arc::new(RateLimiter::new(counters, config.rate_limit.clone()));

        let (otp_repository, users, shipping_settings): (
            Arc<dyn OtpRepository>,
            Arc<dyn UserDirectory>,
            Arc<dyn ShippingSettingsRepository>,
        ) = if config.database.is_configured() {
            let db = DatabasePool::new(&config.database).await?;
            let pool = db.get_pool().clone();
            health_checks.push(Arc::new(db));
            (
                Arc::new(PgOtpRepository::new(pool.clone())),
                Arc::new(PgUserDirectory::new(pool.clone())),
                Arc::new(PgShippingSettingsRepository::new(pool)),
            )
        } else if config.environment.is_production() {
            anyhow::bail!("database.url must be set in production");
        } else {
            tracing::warn!("No database configured; using in-memory repositories");
            (
                Arc::new(InMemoryOtpRepository::new()),
                Arc::new(InMemoryUserDirectory::new()),
                Arc::new(InMemoryShippingSettings::from_config(&config.shipping)),
            )
        };

        let sms = create_sms_service(&config.sms, &config.otp, config.environment)?;

        let otp_service = OtpService::new(
            otp_repository,
            users,
            sms,
            rate_limiter.clone(),
            OtpServiceConfig::from_app_config(&config.otp, config.environment),
        );

        Ok(Self {
            otp_service: Arc::new(otp_service),
            shipping_service: Arc::new(ShippingService::new(shipping_settings)),
            rate_limiter,
            health_checks,
            trust_proxy_headers: config.server.trust_proxy_headers,
        })
    }
}

fn spawn_counter_purge(store: Arc<InMemoryCounterStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(COUNTER_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Dropped elapsed rate limit windows");
            }
        }
    });
}
