// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("operation cancelled")]
    Cancelled,
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live in milliseconds. Zero means the entry never expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    /// A non-zero duration never maps to zero, sub-millisecond values round up
    pub fn from_duration(ttl: Duration) -> Self {
        if ttl.is_zero() {
            return Self(0);
        }
        Self(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
    }

    /// `None` when the ttl means "no expiration"
    pub fn as_duration(&self) -> Option<Duration> {
        if self.0 == 0 {
            None
        } else {
            Some(Duration::from_millis(self.0))
        }
    }
}

pub mod config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_never_expires() {
        assert_eq!(TtlMs(0).as_duration(), None);
    }

    #[test]
    fn test_ttl_duration_round_trip() {
        let ttl = TtlMs::from_duration(Duration::from_secs(300));
        assert_eq!(ttl, TtlMs(300_000));
        assert_eq!(ttl.as_duration(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_sub_millisecond_ttl_still_expires() {
        assert_eq!(TtlMs::from_duration(Duration::from_micros(1)), TtlMs(1));
        assert_eq!(TtlMs::from_duration(Duration::from_micros(999)), TtlMs(1));
        assert_eq!(TtlMs::from_duration(Duration::ZERO), TtlMs(0));
        assert!(TtlMs::from_duration(Duration::from_nanos(1)).as_duration().is_some());
    }
}
