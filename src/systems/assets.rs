//! Background image loading.
//!
//! [`asset_loader_thread`] runs on its own OS thread and performs all file
//! I/O in response to [`AssetCmd`]s. The systems below bridge its results
//! into the ECS world:
//! - [`poll_asset_messages`] drains the thread's receiver into
//!   `Messages<AssetMessage>` without blocking,
//! - [`update_asset_messages`] advances the message queue,
//! - [`apply_asset_messages`] settles each icon in the [`IconStore`].
//!
//! Images are decoded on the loader thread, so `Loaded` bytes are known to
//! be valid. Texture upload happens on the host thread, since raylib
//! textures are bound to the GL context.

use std::path::Path;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use raylib::prelude::Image;

use crate::events::assets::{AssetCmd, AssetMessage};
use crate::resources::assetloader::AssetBridge;
use crate::resources::iconstore::IconStore;
use crate::scheduler::CancelToken;

/// Image formats raylib can decode from memory.
const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "bmp", "tga", "jpg", "jpeg", "gif"];

pub fn poll_asset_messages(bridge: Res<AssetBridge>, mut writer: MessageWriter<AssetMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

pub fn update_asset_messages(mut messages: ResMut<Messages<AssetMessage>>) {
    messages.update();
}

pub fn apply_asset_messages(
    mut reader: MessageReader<AssetMessage>,
    mut icons: ResMut<IconStore>,
) {
    for msg in reader.read() {
        match msg {
            AssetMessage::Loaded { label, bytes, ext } => {
                if icons.mark_ready(label, bytes.clone(), ext.clone()) {
                    debug!("Icon bytes ready for '{}' ({} bytes)", label, bytes.len());
                }
            }
            AssetMessage::Failed { label, error } => {
                icons.mark_failed(label, error.clone());
            }
        }
    }
}

/// Read one image file and check raylib can decode it.
pub fn load_image_file(label: &str, path: &Path) -> AssetMessage {
    let failed = |error: String| AssetMessage::Failed {
        label: label.to_string(),
        error,
    };
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            format!(".{}", ext.to_ascii_lowercase())
        }
        Some(ext) => return failed(format!("unsupported image format '{}'", ext)),
        None => return failed(format!("{} has no file extension", path.display())),
    };
    match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => failed(format!("{} is empty", path.display())),
        Ok(bytes) => match Image::load_image_from_mem(&ext, &bytes) {
            Ok(_) => AssetMessage::Loaded {
                label: label.to_string(),
                bytes,
                ext,
            },
            Err(e) => failed(format!("{}: cannot decode: {}", path.display(), e)),
        },
        Err(e) => failed(format!("{}: {}", path.display(), e)),
    }
}

/// Entry point of the loader thread.
///
/// Blocks on the command channel and answers every `LoadImage` with exactly
/// one message. Returns once `cancel` is set (checked before each load), or
/// when either side of the canvas channels is dropped.
pub fn asset_loader_thread(
    rx_cmd: Receiver<AssetCmd>,
    tx_msg: Sender<AssetMessage>,
    cancel: CancelToken,
) {
    debug!("Asset loader thread started");
    for AssetCmd::LoadImage { label, path } in rx_cmd.iter() {
        if cancel.is_cancelled() {
            debug!("Asset loader cancelled, skipping '{}'", label);
            break;
        }
        let msg = load_image_file(&label, &path);
        if tx_msg.send(msg).is_err() {
            break;
        }
    }
    debug!("Asset loader thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::path::PathBuf;

    /// A 1x1 RGBA PNG.
    const PIXEL_PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tagfall-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_load_image_file_reads_bytes() {
        let path = temp_file("icon.PNG", &PIXEL_PNG);
        let msg = load_image_file("Rust", &path);
        std::fs::remove_file(&path).ok();
        assert_eq!(
            msg,
            AssetMessage::Loaded {
                label: "Rust".into(),
                bytes: PIXEL_PNG.to_vec(),
                ext: ".png".into(),
            }
        );
    }

    #[test]
    fn test_load_image_file_rejects_undecodable_bytes() {
        let path = temp_file("corrupt.png", &[0x89, b'P', b'N', b'G']);
        let msg = load_image_file("Rust", &path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(msg, AssetMessage::Failed { ref label, .. } if label == "Rust"));
    }

    #[test]
    fn test_load_image_file_failures() {
        assert!(matches!(
            load_image_file("a", Path::new("/nonexistent/icon.png")),
            AssetMessage::Failed { .. }
        ));
        assert!(matches!(
            load_image_file("a", Path::new("icon.svg")),
            AssetMessage::Failed { .. }
        ));
        assert!(matches!(
            load_image_file("a", Path::new("icon")),
            AssetMessage::Failed { .. }
        ));
        let empty = temp_file("empty.png", &[]);
        let msg = load_image_file("a", &empty);
        std::fs::remove_file(&empty).ok();
        assert!(matches!(msg, AssetMessage::Failed { .. }));
    }

    #[test]
    fn test_thread_answers_and_stops() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        let handle =
            std::thread::spawn(move || asset_loader_thread(rx_cmd, tx_msg, CancelToken::new()));
        tx_cmd
            .send(AssetCmd::LoadImage {
                label: "Docs".into(),
                path: PathBuf::from("/nonexistent/docs.png"),
            })
            .unwrap();
        drop(tx_cmd);
        handle.join().unwrap();
        let msgs: Vec<_> = rx_msg.try_iter().collect();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].label(), "Docs");
    }

    #[test]
    fn test_cancelled_thread_skips_queued_loads() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        for label in ["Docs", "Logo"] {
            tx_cmd
                .send(AssetCmd::LoadImage {
                    label: label.into(),
                    path: PathBuf::from("/nonexistent/icon.png"),
                })
                .unwrap();
        }
        let cancel = CancelToken::new();
        cancel.cancel();
        // The sender stays alive: only the token can stop the thread here.
        std::thread::spawn(move || asset_loader_thread(rx_cmd, tx_msg, cancel))
            .join()
            .unwrap();
        assert_eq!(rx_msg.try_iter().count(), 0);
        drop(tx_cmd);
    }

    #[test]
    fn test_apply_asset_messages_settles_icons() {
        let mut world = World::new();
        let mut icons = IconStore::new();
        icons.register("Rust");
        icons.register("Docs");
        world.insert_resource(icons);
        world.insert_resource(Messages::<AssetMessage>::default());
        world
            .resource_mut::<Messages<AssetMessage>>()
            .write(AssetMessage::Failed {
                label: "Docs".into(),
                error: "gone".into(),
            });

        let mut schedule = Schedule::default();
        schedule.add_systems((update_asset_messages, apply_asset_messages).chain());
        schedule.run(&mut world);

        let icons = world.resource::<IconStore>();
        assert!(matches!(
            icons.get("Docs"),
            Some(crate::resources::iconstore::IconState::Failed(_))
        ));
        assert_eq!(icons.pending_count(), 1);
    }
}
