use std::fmt;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::sources::iam::IamToken;

/// Tokens this close to expiry are fetched again.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Holds the tone analyzer bearer until shortly before it expires.
///
/// Tokens without a reported expiry are never stored.
#[derive(Default)]
pub struct ToneTokenCache {
    inner: RwLock<Option<IamToken>>,
}

impl ToneTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the token if one is stored and still fresh
    pub async fn get(&self) -> Option<String> {
        let now = Utc::now().timestamp();
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|token| is_fresh(token, now))
            .map(|token| token.value.clone())
    }

    pub async fn set(&self, token: IamToken) {
        let mut slot = self.inner.write().await;
        *slot = token.expires_at.is_some().then_some(token);
    }
}

impl fmt::Debug for ToneTokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToneTokenCache").finish_non_exhaustive()
    }
}

fn is_fresh(token: &IamToken, now: i64) -> bool {
    token
        .expires_at
        .is_some_and(|expires_at| now < expires_at - EXPIRY_MARGIN_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: Option<i64>) -> IamToken {
        IamToken {
            value: "tone-token".to_owned(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn fresh_token_is_returned() {
        let cache = ToneTokenCache::new();
        cache.set(token(Some(Utc::now().timestamp() + 3600))).await;
        assert_eq!(cache.get().await.as_deref(), Some("tone-token"));
    }

    #[tokio::test]
    async fn token_inside_margin_is_stale() {
        let cache = ToneTokenCache::new();
        cache.set(token(Some(Utc::now().timestamp() + EXPIRY_MARGIN_SECS / 2))).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn token_without_expiry_is_not_kept() {
        let cache = ToneTokenCache::new();
        cache.set(token(Some(Utc::now().timestamp() + 3600))).await;
        cache.set(token(None)).await;
        assert!(cache.get().await.is_none());
    }
}
