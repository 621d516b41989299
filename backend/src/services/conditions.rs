//! Current-conditions lookup with a short-lived per-region cache

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use shared::{CurrentConditions, Region};
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::external::ConditionsProvider;

const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, Clone, Copy)]
struct CachedConditions {
    conditions: CurrentConditions,
    fetched_at: DateTime<Utc>,
}

/// Wraps a [`ConditionsProvider`] and reuses observations for `ttl`
#[derive(Clone)]
pub struct ConditionsService {
    provider: Arc<dyn ConditionsProvider>,
    ttl: Duration,
    cache: Arc<RwLock<HashMap<Region, CachedConditions>>>,
}

impl ConditionsService {
    pub fn new(provider: Arc<dyn ConditionsProvider>, ttl_secs: u64) -> Self {
        Self {
            provider,
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn caching_enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    /// Observations at the region's coordinates, from cache when fresh
    pub async fn current(&self, region: Region) -> AppResult<CurrentConditions> {
        let now = Utc::now();

        if self.caching_enabled() {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&region) {
                if now - entry.fetched_at < self.ttl {
                    tracing::debug!("Using cached conditions for {}", region);
                    return Ok(entry.conditions);
                }
            }
        }

        let conditions = self
            .provider
            .current_conditions(region.coordinates())
            .await
            .inspect_err(|e| tracing::warn!("Conditions lookup for {} failed: {}", region, e))?;

        tracing::debug!(
            "Fetched conditions for {}: {:.1} °C, {:.1} mm, {:.0}% humidity",
            region,
            conditions.temperature_celsius,
            conditions.precipitation_mm,
            conditions.humidity_percent
        );

        if self.caching_enabled() {
            self.cache.write().await.insert(
                region,
                CachedConditions {
                    conditions,
                    fetched_at: now,
                },
            );
        }

        Ok(conditions)
    }
}
