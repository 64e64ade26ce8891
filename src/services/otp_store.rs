use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::OtpError;

/// A pending code for one phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

impl OtpRecord {
    pub fn new(code: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at,
            attempts: 0,
        }
    }

    /// Expiry is exclusive of the instant itself.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// In-memory OTP records keyed by phone number. Contents do not survive a restart.
#[derive(Clone, Default)]
pub struct OtpStore {
    records: Arc<RwLock<HashMap<String, OtpRecord>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, replacing any pending one for the same number.
    pub async fn put(&self, phone: &str, record: OtpRecord) {
        let mut records = self.records.write().await;
        if records.insert(phone.to_string(), record).is_some() {
            log::debug!("Replaced pending OTP for {phone}");
        }
    }

    #[cfg(test)]
    pub(crate) async fn get(&self, phone: &str) -> Option<OtpRecord> {
        self.records.read().await.get(phone).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Checks `code` against the pending record and applies the consumption rules in
    /// one critical section, so two concurrent checks cannot both succeed.
    ///
    /// `max_attempts == 0` allows unlimited mismatches.
    pub async fn verify(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<(), OtpError> {
        let mut records = self.records.write().await;

        let record = records.get_mut(phone).ok_or(OtpError::NotFound)?;

        if record.is_expired_at(now) {
            records.remove(phone);
            return Err(OtpError::Expired);
        }

        if record.code != code {
            record.attempts += 1;
            if max_attempts > 0 && record.attempts >= max_attempts {
                records.remove(phone);
                return Err(OtpError::TooManyAttempts);
            }
            return Err(OtpError::Mismatch);
        }

        records.remove(phone);
        Ok(())
    }

    /// Drops every record past its expiry, returning how many were removed.
    pub async fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        before - records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(code: &str, expires_at: DateTime<Utc>) -> OtpRecord {
        OtpRecord::new(code.to_string(), expires_at)
    }

    #[tokio::test]
    async fn test_verify_consumes_record() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1555", record("0482", now + Duration::minutes(5))).await;

        assert_eq!(store.verify("+1555", "0482", now, 5).await, Ok(()));
        assert_eq!(
            store.verify("+1555", "0482", now, 5).await,
            Err(OtpError::NotFound)
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_exclusive() {
        let store = OtpStore::new();
        let expires_at = Utc::now();
        store.put("+1555", record("1234", expires_at)).await;

        assert_eq!(store.verify("+1555", "1234", expires_at, 5).await, Ok(()));

        store.put("+1555", record("1234", expires_at)).await;
        let later = expires_at + Duration::milliseconds(1);
        assert_eq!(
            store.verify("+1555", "1234", later, 5).await,
            Err(OtpError::Expired)
        );
        assert_eq!(store.get("+1555").await, None);
    }

    #[tokio::test]
    async fn test_mismatch_keeps_record_and_counts_attempts() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1555", record("1234", now + Duration::minutes(5))).await;

        assert_eq!(
            store.verify("+1555", "9999", now, 5).await,
            Err(OtpError::Mismatch)
        );
        assert_eq!(store.get("+1555").await.map(|r| r.attempts), Some(1));
        assert_eq!(store.verify("+1555", "1234", now, 5).await, Ok(()));
    }

    #[tokio::test]
    async fn test_attempt_bound_discards_record() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1555", record("1234", now + Duration::minutes(5))).await;

        assert_eq!(
            store.verify("+1555", "0000", now, 3).await,
            Err(OtpError::Mismatch)
        );
        assert_eq!(
            store.verify("+1555", "0000", now, 3).await,
            Err(OtpError::Mismatch)
        );
        assert_eq!(
            store.verify("+1555", "0000", now, 3).await,
            Err(OtpError::TooManyAttempts)
        );
        assert_eq!(
            store.verify("+1555", "1234", now, 3).await,
            Err(OtpError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_zero_max_attempts_is_unbounded() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1555", record("1234", now + Duration::minutes(5))).await;

        for _ in 0..50 {
            assert_eq!(
                store.verify("+1555", "0000", now, 0).await,
                Err(OtpError::Mismatch)
            );
        }
        assert_eq!(store.verify("+1555", "1234", now, 0).await, Ok(()));
    }

    #[tokio::test]
    async fn test_put_overwrites_and_resets_attempts() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1555", record("1111", now + Duration::minutes(5))).await;
        let _ = store.verify("+1555", "0000", now, 5).await;

        store.put("+1555", record("2222", now + Duration::minutes(5))).await;
        let pending = store.get("+1555").await.unwrap();
        assert_eq!(pending.code, "2222");
        assert_eq!(pending.attempts, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_expired_only_drops_stale_records() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.put("+1", record("1", now - Duration::seconds(1))).await;
        store.put("+2", record("2", now - Duration::minutes(10))).await;
        store.put("+3", record("3", now + Duration::minutes(5))).await;
        store.put("+4", record("4", now)).await;

        assert_eq!(store.remove_expired(now).await, 2);
        assert_eq!(store.len().await, 2);
        assert!(store.get("+3").await.is_some());
        assert!(store.get("+4").await.is_some());
    }
}
