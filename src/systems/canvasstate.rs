use bevy_ecs::prelude::*;
use log::info;

use crate::resources::canvasconfig::CanvasConfig;
use crate::resources::canvasstate::{CanvasState, CanvasStates};
use crate::resources::iconstore::IconStore;

/// Promote `Loading` to `Running`.
///
/// Without render gating this happens on the first frame; with
/// `gate_render` it waits until every icon has loaded or failed.
pub fn promote_when_ready(
    mut state: ResMut<CanvasState>,
    config: Res<CanvasConfig>,
    icons: Res<IconStore>,
) {
    if state.get() != CanvasStates::Loading {
        return;
    }
    if config.gate_render && !icons.all_settled() {
        return;
    }
    if state.advance(CanvasStates::Running) && config.gate_render {
        info!("All {} icons settled, starting render loop", icons.len());
    }
}

pub fn state_is_running(state: Res<CanvasState>) -> bool {
    state.is_running()
}
