//! Messages exchanged with the background asset loader thread.

use std::path::PathBuf;

use bevy_ecs::message::Message;

/// Commands sent *to* the loader thread.
#[derive(Debug, Clone)]
pub enum AssetCmd {
    /// Read the image at `path` for the tag `label`.
    LoadImage { label: String, path: PathBuf },
}

/// Results sent *back* from the loader thread.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AssetMessage {
    /// `ext` includes the leading dot, as raylib expects.
    Loaded {
        label: String,
        bytes: Vec<u8>,
        ext: String,
    },
    Failed { label: String, error: String },
}

impl AssetMessage {
    pub fn label(&self) -> &str {
        match self {
            AssetMessage::Loaded { label, .. } | AssetMessage::Failed { label, .. } => label,
        }
    }
}
