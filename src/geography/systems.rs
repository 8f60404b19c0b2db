//! Geography request/apply systems

use bevy::prelude::*;

use crate::geography::fetcher::start_geography_worker;
use crate::geography::parser::build_outline_paths;
use crate::geography::types::{
    GeographyChannels, GeographyCommand, GeographyConfig, GeographyResult, GeographyState,
    OutlineSet,
};

pub fn setup_geography_worker(mut commands: Commands) {
    let channels = start_geography_worker();
    info!("[INIT] Geography worker started");
    commands.insert_resource(channels);
}

/// Queue a fetch once at mount, or again whenever the config changes
pub fn request_geography(
    config: Res<GeographyConfig>,
    mut state: ResMut<GeographyState>,
    channels: Option<Res<GeographyChannels>>,
) {
    let Some(channels) = channels else { return };
    if state.requested && !config.is_changed() {
        return;
    }

    let request_id = state.latest_request + 1;
    let cmd = GeographyCommand::Fetch {
        request_id,
        source: config.source.clone(),
        use_cache: config.use_cache,
        cache_expiration_days: config.cache_expiration_days,
    };
    match channels.cmd_tx.send(cmd) {
        Ok(()) => {
            state.latest_request = request_id;
            state.requested = true;
            state.loading = true;
            state.error = None;
        }
        Err(e) => {
            error!("[GEOGRAPHY] failed to queue fetch: {}", e);
            state.requested = true;
            state.error = Some(format!("Failed to queue fetch: {}", e));
        }
    }
}

/// Drain worker results into the outline set
pub fn apply_geography_results(
    config: Res<GeographyConfig>,
    mut state: ResMut<GeographyState>,
    mut outlines: ResMut<OutlineSet>,
    channels: Option<Res<GeographyChannels>>,
) {
    let Some(channels) = channels else { return };
    let Ok(guard) = channels.res_rx.lock() else {
        return;
    };

    while let Ok(msg) = guard.try_recv() {
        apply_result(msg, &config, &mut state, &mut outlines);
    }
}

/// Apply one worker result. Results for anything but the latest request are dropped.
pub fn apply_result(
    msg: GeographyResult,
    config: &GeographyConfig,
    state: &mut GeographyState,
    outlines: &mut OutlineSet,
) {
    if msg.request_id() != state.latest_request {
        warn!(
            "[GEOGRAPHY] dropping stale result for request={} (latest={})",
            msg.request_id(),
            state.latest_request
        );
        return;
    }

    state.loading = false;
    match msg {
        GeographyResult::Loaded { collection, .. } => {
            let paths = build_outline_paths(&collection, config);
            let points: usize = paths.iter().map(|p| p.points.len()).sum();
            info!(
                "[GEOGRAPHY] {} outline paths, {} points after simplification",
                paths.len(),
                points
            );
            outlines.paths = paths;
            state.error = None;
        }
        GeographyResult::Failed { error, .. } => {
            // Degrade to a bare sphere
            outlines.paths = Vec::new();
            state.error = Some(error);
        }
    }
    outlines.revision += 1;
}
