//! ECS resource bridging the canvas with the background asset loader thread.
//!
//! Use [`setup_asset_loader`] once at mount to spawn the thread and insert
//! the [`AssetBridge`] and `Messages<AssetMessage>` resources. Call
//! [`shutdown_asset_loader`] at teardown to stop the thread.

use std::time::Duration;

use crate::events::assets::{AssetCmd, AssetMessage};
use crate::scheduler::CancelToken;
use crate::systems::assets::asset_loader_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, SendError, Sender, bounded, unbounded};
use log::{debug, warn};

/// How long teardown waits for the loader thread to exit before detaching it.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

#[derive(Resource)]
pub struct AssetBridge {
    /// Commands (canvas -> loader thread).
    pub tx_cmd: Sender<AssetCmd>,
    /// Results (loader thread -> canvas).
    pub rx_msg: Receiver<AssetMessage>,
    /// Checked by the thread before every load.
    pub cancel: CancelToken,
    /// Disconnects when the thread returns.
    pub exited: Receiver<()>,
    pub handle: std::thread::JoinHandle<()>,
}

impl AssetBridge {
    pub fn send(&self, cmd: AssetCmd) -> Result<(), SendError<AssetCmd>> {
        self.tx_cmd.send(cmd)
    }
}

/// Spawn the loader thread and register bridge resources.
pub fn setup_asset_loader(world: &mut World) -> std::io::Result<()> {
    let (tx_cmd, rx_cmd) = unbounded::<AssetCmd>();
    let (tx_msg, rx_msg) = unbounded::<AssetMessage>();
    let (tx_exit, exited) = bounded::<()>(0);
    let cancel = CancelToken::new();
    let thread_cancel = cancel.clone();

    let handle = std::thread::Builder::new()
        .name("tagfall-assets".into())
        .spawn(move || {
            let _exit = tx_exit;
            asset_loader_thread(rx_cmd, tx_msg, thread_cancel);
        })?;

    world.insert_resource(AssetBridge {
        tx_cmd,
        rx_msg,
        cancel,
        exited,
        handle,
    });
    world.insert_resource(Messages::<AssetMessage>::default());
    Ok(())
}

/// Stop the loader thread without waiting on file I/O.
///
/// Queued loads are skipped. If the thread is stuck inside a read it is
/// detached after [`SHUTDOWN_GRACE`]; when the read returns, its result has
/// nowhere to go and the thread exits on its own.
pub fn shutdown_asset_loader(world: &mut World) {
    let Some(bridge) = world.remove_resource::<AssetBridge>() else {
        return;
    };
    let AssetBridge {
        tx_cmd,
        rx_msg,
        cancel,
        exited,
        handle,
    } = bridge;
    cancel.cancel();
    drop(tx_cmd);
    drop(rx_msg);

    match exited.recv_timeout(SHUTDOWN_GRACE) {
        Err(RecvTimeoutError::Timeout) => {
            warn!("Asset loader is blocked on a load; detaching it");
        }
        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
            if handle.join().is_err() {
                warn!("Asset loader thread panicked");
            } else {
                debug!("Asset loader joined");
            }
        }
    }
}
