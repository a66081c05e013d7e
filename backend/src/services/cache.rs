//! Postgres-backed cache for external API responses
//!
//! Entries are keyed by coordinates rounded to two decimals. Expired entries are kept
//! so they can be served, flagged stale, when the upstream API is unavailable.

use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use shared::GpsCoordinates;
use sqlx::{FromRow, PgPool};
use std::future::Future;

use crate::error::{AppError, AppResult};

/// Data returned by a cached fetch
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    /// Served from an expired cache entry because the upstream fetch failed
    pub is_stale: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            is_stale: false,
        }
    }

    pub fn stale(data: T) -> Self {
        Self {
            data,
            is_stale: true,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            is_stale: self.is_stale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTable {
    Weather,
    Soil,
}

impl CacheTable {
    fn name(self) -> &'static str {
        match self {
            CacheTable::Weather => "weather_cache",
            CacheTable::Soil => "soil_cache",
        }
    }
}

#[derive(Debug, FromRow)]
struct CacheRow {
    data: serde_json::Value,
    expired: bool,
}

/// A cached value and whether its TTL has passed
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: T,
    pub expired: bool,
}

#[derive(Clone)]
pub struct ResponseCache {
    db: PgPool,
    table: CacheTable,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(db: PgPool, table: CacheTable, ttl_hours: i64) -> Self {
        Self {
            db,
            table,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Look up an entry regardless of expiry
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<CacheEntry<T>>> {
        let sql = format!(
            "SELECT data, expires_at <= NOW() AS expired FROM {} WHERE location_key = $1",
            self.table.name()
        );

        let row = sqlx::query_as::<_, CacheRow>(&sql)
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        match serde_json::from_value(row.data) {
            Ok(data) => Ok(Some(CacheEntry {
                data,
                expired: row.expired,
            })),
            Err(e) => {
                // Written by an older schema; treat as a miss
                tracing::warn!("Discarding unreadable {} entry {}: {}", self.table.name(), key, e);
                Ok(None)
            }
        }
    }

    /// Insert or replace an entry, resetting its TTL
    pub async fn store<T: Serialize>(
        &self,
        key: &str,
        coords: GpsCoordinates,
        data: &T,
    ) -> AppResult<()> {
        let json = serde_json::to_value(data).map_err(|e| AppError::Internal(e.to_string()))?;
        let expires_at = Utc::now() + self.ttl;

        let sql = format!(
            r#"
            INSERT INTO {} (location_key, latitude, longitude, data, fetched_at, expires_at)
            VALUES ($1, $2, $3, $4, NOW(), $5)
            ON CONFLICT (location_key) DO UPDATE
            SET data = EXCLUDED.data,
                fetched_at = EXCLUDED.fetched_at,
                expires_at = EXCLUDED.expires_at
            "#,
            self.table.name()
        );

        sqlx::query(&sql)
            .bind(key)
            .bind(coords.latitude)
            .bind(coords.longitude)
            .bind(&json)
            .bind(expires_at)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Serve a fresh entry, otherwise fetch and cache; fall back to a stale entry when the fetch fails
    pub async fn get_or_fetch<T, F, Fut>(&self, coords: GpsCoordinates, fetch: F) -> AppResult<Fetched<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let key = coords.location_key();

        let fallback = match Lookup::from_entry(self.lookup::<T>(&key).await?) {
            Lookup::Fresh(data) => {
                tracing::info!("Using cached {} data for {}", self.table.name(), key);
                return Ok(Fetched::fresh(data));
            }
            Lookup::Refresh { fallback } => fallback,
        };

        tracing::info!("Fetching {} data for {}", self.table.name(), key);
        let fetched = fetch().await;
        if let Err(e) = &fetched {
            tracing::error!("Fetch for {} failed: {}", key, e);
        }

        let result = resolve_fetch(fetched, fallback)?;
        if result.is_stale {
            tracing::warn!("Using stale cached {} data for {}", self.table.name(), key);
        } else if let Err(e) = self.store(&key, coords, &result.data).await {
            tracing::warn!("Failed to cache {} data for {}: {}", self.table.name(), key, e);
        }
        Ok(result)
    }
}

/// Outcome of a cache lookup
#[derive(Debug, PartialEq)]
enum Lookup<T> {
    /// Entry within its TTL, served without fetching
    Fresh(T),
    /// Fetch required; an expired entry is kept as fallback
    Refresh { fallback: Option<T> },
}

impl<T> Lookup<T> {
    fn from_entry(entry: Option<CacheEntry<T>>) -> Self {
        match entry {
            Some(entry) if !entry.expired => Lookup::Fresh(entry.data),
            Some(entry) => Lookup::Refresh {
                fallback: Some(entry.data),
            },
            None => Lookup::Refresh { fallback: None },
        }
    }
}

/// Fresh data on a successful fetch, otherwise the fallback flagged stale
fn resolve_fetch<T>(fetched: AppResult<T>, fallback: Option<T>) -> AppResult<Fetched<T>> {
    match (fetched, fallback) {
        (Ok(data), _) => Ok(Fetched::fresh(data)),
        (Err(_), Some(data)) => Ok(Fetched::stale(data)),
        (Err(e), None) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_map_keeps_staleness() {
        let fetched = Fetched::stale(vec![1, 2, 3]).map(|v| v.len());
        assert_eq!(fetched.data, 3);
        assert!(fetched.is_stale);
    }

    fn entry(data: &str, expired: bool) -> Option<CacheEntry<String>> {
        Some(CacheEntry {
            data: data.to_string(),
            expired,
        })
    }

    #[test]
    fn test_fresh_entry_served_without_fetch() {
        assert_eq!(
            Lookup::from_entry(entry("cached", false)),
            Lookup::Fresh("cached".to_string())
        );
    }

    #[test]
    fn test_expired_entry_kept_as_fallback() {
        assert_eq!(
            Lookup::from_entry(entry("old", true)),
            Lookup::Refresh {
                fallback: Some("old".to_string())
            }
        );
        assert_eq!(
            Lookup::<String>::from_entry(None),
            Lookup::Refresh { fallback: None }
        );
    }

    #[test]
    fn test_successful_fetch_is_fresh() {
        let fetched = resolve_fetch(Ok("new".to_string()), Some("old".to_string())).unwrap();
        assert_eq!(fetched.data, "new");
        assert!(!fetched.is_stale);
    }

    #[test]
    fn test_failed_fetch_falls_back_to_stale_entry() {
        let fetched = resolve_fetch(
            Err(AppError::external("SoilGrids", "timeout")),
            Some("old".to_string()),
        )
        .unwrap();
        assert_eq!(fetched.data, "old");
        assert!(fetched.is_stale);
    }

    #[test]
    fn test_failed_fetch_without_entry_is_error() {
        let err = resolve_fetch::<String>(Err(AppError::external("NASA POWER", "timeout")), None)
            .unwrap_err();
        assert_eq!(err.code(), "EXTERNAL_SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_cache_table_names() {
        assert_eq!(CacheTable::Weather.name(), "weather_cache");
        assert_eq!(CacheTable::Soil.name(), "soil_cache");
    }
}
