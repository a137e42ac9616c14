use std::time::Duration;

use log::warn;

use crate::store::{ConfigMap, ConfigStore};

/// Fixed-interval retry policy for store bootstrap.
///
/// `max_attempts: None` blocks until the operation succeeds, matching a
/// "the app is unusable until the config file exists" policy; bounded
/// policies give up and report failure instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_millis(250))
    }
}

impl RetryPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    /// Run `op` until it returns true, sleeping between attempts.
    /// Returns false only when a bounded policy runs out of attempts.
    pub fn run(&self, mut op: impl FnMut() -> bool) -> bool {
        let mut attempt = 0u32;
        loop {
            if op() {
                return true;
            }
            attempt += 1;
            if let Some(max) = self.max_attempts {
                if attempt >= max {
                    return false;
                }
            }
            warn!("config bootstrap attempt {} failed, retrying in {:?}", attempt, self.interval);
            std::thread::sleep(self.interval);
        }
    }
}

impl ConfigStore {
    /// [`check_and_create`](ConfigStore::check_and_create) under a retry
    /// policy, for transiently unavailable storage.
    pub fn bootstrap(&self, defaults: &ConfigMap, policy: &RetryPolicy) -> bool {
        policy.run(|| self.check_and_create(defaults))
    }
}
