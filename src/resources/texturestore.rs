//! GPU textures of tag icons.
//!
//! Owned by the host next to the raylib handle (textures must stay on the
//! GL thread). Each `Ready` icon in the [`IconStore`] is uploaded once. An
//! upload that fails is remembered and not retried; the painter then draws
//! the chip's glyph fallback, or nothing.

use log::{debug, warn};
use raylib::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::resources::iconstore::{IconState, IconStore};

#[derive(Default)]
pub struct TextureStore {
    textures: FxHashMap<String, Texture2D>,
    rejected: FxHashSet<String>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&Texture2D> {
        self.textures.get(label)
    }

    /// The icon of `label` could not be uploaded.
    pub fn is_rejected(&self, label: &str) -> bool {
        self.rejected.contains(label)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Upload every icon that became ready since the last call.
    pub fn upload_ready(&mut self, rl: &mut RaylibHandle, th: &RaylibThread, icons: &IconStore) {
        let labels: Vec<&str> = icons
            .ready_labels()
            .filter(|label| !self.textures.contains_key(*label) && !self.rejected.contains(*label))
            .collect();

        for label in labels {
            let Some(IconState::Ready { bytes, ext }) = icons.get(label) else {
                continue;
            };
            let texture = Image::load_image_from_mem(ext, bytes)
                .map_err(|e| e.to_string())
                .and_then(|image| {
                    rl.load_texture_from_image(th, &image)
                        .map_err(|e| e.to_string())
                });
            match texture {
                Ok(texture) => {
                    debug!(
                        "Uploaded icon for '{}' ({}x{})",
                        label, texture.width, texture.height
                    );
                    self.textures.insert(label.to_string(), texture);
                }
                Err(e) => {
                    warn!("Icon for tag '{}' could not be uploaded: {}", label, e);
                    self.rejected.insert(label.to_string());
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.rejected.clear();
    }
}
