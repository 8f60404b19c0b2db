//! Geography fetching worker

use crate::geography::cache::{CacheLookup, CachedDataset, GeographyCache};
use crate::geography::parser::parse_feature_collection;
use crate::geography::types::{
    FeatureCollection, GeographyChannels, GeographyCommand, GeographyResult, GeographySource,
};
use anyhow::{Context, Result};
use bevy::prelude::*;
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// Start the background geography worker thread
pub fn start_geography_worker() -> GeographyChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GeographyCommand>();
    let (res_tx, res_rx) = mpsc::channel::<GeographyResult>();

    thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("[GEOGRAPHY] failed to start tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(async move {
            let client = reqwest::Client::new();

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    GeographyCommand::Fetch {
                        request_id,
                        source,
                        use_cache,
                        cache_expiration_days,
                    } => {
                        let cache = if use_cache {
                            GeographyCache::new(cache_expiration_days)
                                .map_err(|e| warn!("[GEOGRAPHY] cache unavailable: {}", e))
                                .ok()
                        } else {
                            None
                        };
                        let msg = match load_collection(&client, &source, cache.as_ref()).await {
                            Ok(collection) => {
                                info!(
                                    "[GEOGRAPHY] request={} loaded {} features",
                                    request_id,
                                    collection.features.len()
                                );
                                GeographyResult::Loaded {
                                    request_id,
                                    collection,
                                }
                            }
                            Err(e) => {
                                error!("[GEOGRAPHY] request={} FAILURE: {:#}", request_id, e);
                                GeographyResult::Failed {
                                    request_id,
                                    error: format!("{:#}", e),
                                }
                            }
                        };
                        let _ = res_tx.send(msg);
                    }
                }
            }
        });
    });

    GeographyChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}

async fn load_collection(
    client: &reqwest::Client,
    source: &GeographySource,
    cache: Option<&GeographyCache>,
) -> Result<FeatureCollection> {
    let url = match source {
        GeographySource::File(path) => return read_geojson_file(path),
        GeographySource::Url(url) => url,
    };

    let key = source.cache_key();
    if let Some(cache) = cache {
        match cache.lookup(&key, url) {
            Ok(CacheLookup::Fresh(entry)) => match parse_feature_collection(&entry.body) {
                Ok(collection) => {
                    info!("[GEOGRAPHY] using cached dataset from {}", entry.fetched_at);
                    return Ok(collection);
                }
                Err(e) => warn!("[GEOGRAPHY] cached dataset unusable: {:#}", e),
            },
            Ok(CacheLookup::Expired { fetched_at }) => {
                info!("[GEOGRAPHY] cached dataset from {} expired", fetched_at)
            }
            Ok(CacheLookup::SourceMismatch { stored }) => {
                warn!("[GEOGRAPHY] cache holds {} not {}, refetching", stored, url)
            }
            Ok(CacheLookup::Missing) => {}
            Err(e) => warn!("[GEOGRAPHY] cache read failed: {:#}", e),
        }
    }

    let body = fetch_body(client, url).await?;
    let collection = parse_feature_collection(&body)?;

    if let Some(cache) = cache {
        let entry = CachedDataset {
            source: url.clone(),
            body,
            fetched_at: Utc::now(),
        };
        if let Err(e) = cache.store(&key, &entry) {
            warn!("[GEOGRAPHY] cache write failed: {:#}", e);
        }
    }
    Ok(collection)
}

/// Local files are small; a blocking read inside the worker is fine.
pub fn read_geojson_file(path: &Path) -> Result<FeatureCollection> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("geography: reading {}", path.display()))?;
    parse_feature_collection(&body).with_context(|| format!("geography: parsing {}", path.display()))
}

async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header("accept", "application/geo+json, application/json")
        .send()
        .await
        .with_context(|| format!("geography: request to {}", url))?;
    let status = resp.status();
    let body = resp.text().await?;
    info!(
        "[GEOGRAPHY FETCH] status={} url={} bytes={}",
        status,
        url,
        body.len()
    );
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_file(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "portfolio-globe-{}-{}-{}.geojson",
            name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_read_local_geojson() {
        let path = scratch_file("local");
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
        ]}"#;
        fs::write(&path, body).unwrap();
        let collection = read_geojson_file(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let path = scratch_file("missing");
        let err = read_geojson_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }
}
