//! Per-user transient session state.
//!
//! One entry per user: the last uploaded image, the pending interaction mode,
//! and the interface locale. Entries are created lazily on first touch, never
//! expire, and live only for the process lifetime.
//!
//! Backed by a [`DashMap`] so mutations of one user's entry are atomic with
//! respect to that user's own concurrent events without a global lock across
//! users. Guards are never held across await points; image reads hand out a
//! clone of the bytes.

use crate::texts::Locale;
use dashmap::DashMap;

/// Pending multi-turn command awaiting a follow-up text reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No prompt pending.
    #[default]
    None,
    /// Next text is a split specification.
    AwaitingSplitSpec,
    /// Next text is a crop specification.
    AwaitingCropSpec,
    /// Next text is free-form feedback for the operator.
    AwaitingSuggestion,
}

#[derive(Debug, Default)]
struct Session {
    image: Option<Vec<u8>>,
    mode: Mode,
    locale: Locale,
}

/// Process-wide mapping from user id to session.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: DashMap<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the user's latest image, overwriting any prior one. Mode and
    /// locale are untouched.
    pub fn put_image(&self, user_id: i64, bytes: Vec<u8>) {
        self.inner.entry(user_id).or_default().image = Some(bytes);
    }

    /// The user's stored image, if any.
    pub fn image(&self, user_id: i64) -> Option<Vec<u8>> {
        self.inner.get(&user_id).and_then(|s| s.image.clone())
    }

    pub fn set_mode(&self, user_id: i64, mode: Mode) {
        self.inner.entry(user_id).or_default().mode = mode;
    }

    /// Current mode; `Mode::None` for unknown users.
    pub fn mode(&self, user_id: i64) -> Mode {
        self.inner.get(&user_id).map(|s| s.mode).unwrap_or_default()
    }

    /// Current mode, atomically reset to `Mode::None`.
    ///
    /// Mode-consuming interactions use this so the "one attempt per prompt"
    /// reset cannot interleave with another event from the same user.
    pub fn take_mode(&self, user_id: i64) -> Mode {
        self.inner
            .get_mut(&user_id)
            .map(|mut s| std::mem::take(&mut s.mode))
            .unwrap_or_default()
    }

    pub fn set_locale(&self, user_id: i64, locale: Locale) {
        self.inner.entry(user_id).or_default().locale = locale;
    }

    /// Current locale; the default locale for unknown users.
    pub fn locale(&self, user_id: i64) -> Locale {
        self.inner
            .get(&user_id)
            .map(|s| s.locale)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_has_defaults() {
        let store = SessionStore::new();
        assert_eq!(store.mode(1), Mode::None);
        assert_eq!(store.locale(1), Locale::Uz);
        assert!(store.image(1).is_none());
    }

    #[test]
    fn put_image_overwrites_and_keeps_mode() {
        let store = SessionStore::new();
        store.set_mode(7, Mode::AwaitingSplitSpec);
        store.put_image(7, vec![1, 2, 3]);
        store.put_image(7, vec![4, 5]);
        assert_eq!(store.image(7), Some(vec![4, 5]));
        assert_eq!(store.mode(7), Mode::AwaitingSplitSpec);
    }

    #[test]
    fn take_mode_resets_to_none() {
        let store = SessionStore::new();
        store.set_mode(7, Mode::AwaitingCropSpec);
        assert_eq!(store.take_mode(7), Mode::AwaitingCropSpec);
        assert_eq!(store.mode(7), Mode::None);
        // Taking again on an already-reset session is a no-op
        assert_eq!(store.take_mode(7), Mode::None);
    }

    #[test]
    fn sessions_are_independent_per_user() {
        let store = SessionStore::new();
        store.put_image(1, vec![1]);
        store.set_mode(2, Mode::AwaitingSuggestion);
        store.set_locale(3, Locale::En);

        assert!(store.image(2).is_none());
        assert_eq!(store.mode(1), Mode::None);
        assert_eq!(store.locale(1), Locale::Uz);
        assert_eq!(store.locale(3), Locale::En);
    }

    #[test]
    fn image_persists_across_mode_changes() {
        let store = SessionStore::new();
        store.put_image(9, vec![9; 16]);
        store.set_mode(9, Mode::AwaitingCropSpec);
        let _ = store.take_mode(9);
        assert_eq!(store.image(9), Some(vec![9; 16]));
    }

    #[test]
    fn concurrent_users_do_not_corrupt_entries() {
        use std::sync::Arc;
        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();
        for user in 0..8i64 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..100u8 {
                    store.put_image(user, vec![user as u8, i]);
                    store.set_mode(user, Mode::AwaitingSplitSpec);
                    let _ = store.take_mode(user);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        for user in 0..8i64 {
            let img = store.image(user).unwrap();
            assert_eq!(img[0], user as u8);
            assert_eq!(store.mode(user), Mode::None);
        }
    }
}
