//! Cache management for fetched subscription topology.
//!
//! Avoids repeated az calls when re-rendering the same subscriptions on the
//! same day.

use super::source::TopologySource;
use crate::config;
use crate::error::FetchError;
use crate::models::SubscriptionTopology;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Cache file for a subscription on a given day.
pub fn cache_file_path(cache_dir: &Path, subscription_id: &str, day: NaiveDate) -> PathBuf {
    let safe_id: String = subscription_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    cache_dir.join(format!(
        "{}_{safe_id}_{}.json",
        config::CACHE_FILE_PREFIX,
        day.format("%Y-%m-%d")
    ))
}

/// Wraps a [`TopologySource`] with a per-day JSON file cache.
pub struct CachedSource<S> {
    inner: S,
    cache_dir: PathBuf,
    day: NaiveDate,
}

impl<S: TopologySource> CachedSource<S> {
    /// Cache keyed on today's UTC date.
    pub fn new(inner: S, cache_dir: &Path) -> CachedSource<S> {
        CachedSource::for_day(inner, cache_dir, chrono::Utc::now().date_naive())
    }

    pub fn for_day(inner: S, cache_dir: &Path, day: NaiveDate) -> CachedSource<S> {
        CachedSource {
            inner,
            cache_dir: cache_dir.to_path_buf(),
            day,
        }
    }

    fn read_cache(&self, cache_file: &Path) -> Option<SubscriptionTopology> {
        let json = std::fs::read_to_string(cache_file).ok()?;
        match serde_json::from_str(&json) {
            Ok(data) => {
                log::info!("Reading from cache file: {}", cache_file.display());
                Some(data)
            }
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable cache file {}: {e}",
                    cache_file.display()
                );
                None
            }
        }
    }

    fn write_cache(&self, cache_file: &Path, data: &SubscriptionTopology) {
        let result = std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| e.to_string())
            .and_then(|_| serde_json::to_string_pretty(data).map_err(|e| e.to_string()))
            .and_then(|json| std::fs::write(cache_file, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => log::info!("Wrote data to cache file: {}", cache_file.display()),
            Err(e) => log::warn!(
                "Error writing cache file {}: {e}",
                cache_file.display()
            ),
        }
    }
}

impl<S: TopologySource> TopologySource for CachedSource<S> {
    fn fetch_subscription(&self, subscription_id: &str) -> Result<SubscriptionTopology, FetchError> {
        let cache_file = cache_file_path(&self.cache_dir, subscription_id, self.day);
        if let Some(data) = self.read_cache(&cache_file) {
            return Ok(data);
        }
        log::debug!("Cache file not found: {}", cache_file.display());
        let data = self.inner.fetch_subscription(subscription_id)?;
        self.write_cache(&cache_file, &data);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResourceId, Subscription, VirtualNetwork};
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl TopologySource for CountingSource {
        fn fetch_subscription(
            &self,
            subscription_id: &str,
        ) -> Result<SubscriptionTopology, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if subscription_id == "missing" {
                return Err(FetchError::NotFound(subscription_id.to_string()));
            }
            Ok(SubscriptionTopology {
                subscription: Subscription::new(subscription_id),
                vnets: vec![VirtualNetwork {
                    id: ResourceId::virtual_network(subscription_id, "rg", "vnet1"),
                    name: "vnet1".to_string(),
                    resource_group: "rg".to_string(),
                    location: Some("westeurope".to_string()),
                    address_space: vec!["10.0.0.0/16".to_string()],
                    peerings: vec![],
                }],
            })
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_cache_file_path() {
        let path = cache_file_path(Path::new("/tmp/c"), "sub/a b", day());
        assert_eq!(path, PathBuf::from("/tmp/c/vnet_cache_sub_a_b_2024-03-09.json"));
    }

    #[test]
    fn test_second_fetch_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedSource::for_day(
            CountingSource {
                calls: Cell::new(0),
            },
            dir.path(),
            day(),
        );

        let first = source.fetch_subscription("sub-a").unwrap();
        let second = source.fetch_subscription("sub-a").unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.calls.get(), 1);
        assert!(cache_file_path(dir.path(), "sub-a", day()).exists());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedSource::for_day(
            CountingSource {
                calls: Cell::new(0),
            },
            dir.path(),
            day(),
        );
        assert!(source.fetch_subscription("missing").is_err());
        assert!(source.fetch_subscription("missing").is_err());
        assert_eq!(source.inner.calls.get(), 2);
    }

    #[test]
    fn test_corrupt_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(cache_file_path(dir.path(), "sub-a", day()), "{not json").unwrap();
        let source = CachedSource::for_day(
            CountingSource {
                calls: Cell::new(0),
            },
            dir.path(),
            day(),
        );
        let data = source.fetch_subscription("sub-a").unwrap();
        assert_eq!(data.vnets[0].name, "vnet1");
        assert_eq!(source.inner.calls.get(), 1);
    }
}
