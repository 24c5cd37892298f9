//! Logged-out token ids, kept until the token would have expired anyway

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct RevocationList {
    /// jti -> exp (unix seconds)
    entries: DashMap<String, i64>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the jti was already revoked
    pub fn revoke(&self, jti: &str, exp: i64) -> bool {
        self.entries.insert(jti.to_string(), exp).is_none()
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token has expired; returns how many were removed
    pub fn prune(&self, now_secs: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, exp| *exp > now_secs);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_check() {
        let list = RevocationList::new();
        assert!(!list.is_revoked("a"));
        assert!(list.revoke("a", 100));
        assert!(!list.revoke("a", 100));
        assert!(list.is_revoked("a"));
        assert!(!list.is_revoked("b"));
    }

    #[test]
    fn test_prune_drops_expired_only() {
        let list = RevocationList::new();
        list.revoke("old", 100);
        list.revoke("fresh", 300);

        assert_eq!(list.prune(200), 1);
        assert!(!list.is_revoked("old"));
        assert!(list.is_revoked("fresh"));
        assert_eq!(list.len(), 1);
    }
}
