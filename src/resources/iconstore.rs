//! Load state of tag icon images.
//!
//! One entry per tag label that references an image. An entry starts
//! `Pending` and moves exactly once to `Ready` or `Failed`; both are
//! terminal. The asset systems are the only writers, the renderer only reads.
//!
//! `Ready` bytes have already been decoded once on the loader thread. If the
//! host later fails to turn them into a texture, the entry stays `Ready` and
//! the chip falls back to its glyph; that is tracked by the host's texture
//! store, not here.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconState {
    Pending,
    /// Encoded image bytes plus the file extension (`.png`, ...) needed to
    /// decode them. The host turns these into a texture.
    Ready { bytes: Vec<u8>, ext: String },
    Failed(String),
}

impl IconState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, IconState::Pending)
    }
}

#[derive(Resource, Debug, Default)]
pub struct IconStore {
    icons: FxHashMap<String, IconState>,
}

impl IconStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an image for `label`.
    pub fn register(&mut self, label: impl Into<String>) {
        self.icons.entry(label.into()).or_insert(IconState::Pending);
    }

    pub fn get(&self, label: &str) -> Option<&IconState> {
        self.icons.get(label)
    }

    /// Settle a pending entry. Returns false if the label is unknown or
    /// already settled.
    pub fn mark_ready(&mut self, label: &str, bytes: Vec<u8>, ext: String) -> bool {
        match self.icons.get_mut(label) {
            Some(state @ IconState::Pending) => {
                *state = IconState::Ready { bytes, ext };
                true
            }
            _ => false,
        }
    }

    /// Settle a pending entry as failed. Returns false if the label is
    /// unknown or already settled.
    pub fn mark_failed(&mut self, label: &str, error: impl Into<String>) -> bool {
        match self.icons.get_mut(label) {
            Some(state @ IconState::Pending) => {
                let error = error.into();
                warn!("Icon for tag '{}' unavailable: {}", label, error);
                *state = IconState::Failed(error);
                true
            }
            _ => false,
        }
    }

    /// Every tracked icon has loaded or failed.
    pub fn all_settled(&self) -> bool {
        self.icons.values().all(IconState::is_settled)
    }

    pub fn pending_count(&self) -> usize {
        self.icons.values().filter(|s| !s.is_settled()).count()
    }

    /// Labels whose bytes are ready for upload.
    pub fn ready_labels(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().filter_map(|(label, state)| match state {
            IconState::Ready { .. } => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_is_settled() {
        assert!(IconStore::new().all_settled());
    }

    #[test]
    fn test_transitions_are_one_shot() {
        let mut store = IconStore::new();
        store.register("Rust");
        store.register("Docs");
        assert_eq!(store.pending_count(), 2);

        assert!(store.mark_ready("Rust", vec![1, 2, 3], ".png".into()));
        assert!(!store.mark_ready("Rust", vec![], ".png".into()));
        assert!(store.mark_failed("Docs", "not found"));
        assert!(!store.mark_failed("Docs", "again"));
        assert!(!store.mark_ready("Docs", vec![], ".png".into()));
        assert!(!store.mark_failed("Rust", "late failure"));
        assert!(matches!(store.get("Rust"), Some(IconState::Ready { .. })));
        assert!(store.all_settled());
        assert_eq!(store.ready_labels().collect::<Vec<_>>(), vec!["Rust"]);
    }

    #[test]
    fn test_register_does_not_reset() {
        let mut store = IconStore::new();
        store.register("Rust");
        store.mark_failed("Rust", "boom");
        store.register("Rust");
        assert!(matches!(store.get("Rust"), Some(IconState::Failed(_))));
    }

    #[test]
    fn test_unknown_label_is_ignored() {
        let mut store = IconStore::new();
        assert!(!store.mark_failed("ghost", "x"));
        assert!(store.is_empty());
    }
}
