// Source-selection logic run once at startup, before any reporting

use anyhow::{Context, Result};

use crate::Cli;
use crate::config::{DRAW_CACHE_VERSION, SOCRATA};
use crate::data::draws::api_version::ApiVersion;
use crate::data::draws::cache_version::{CacheVersion, check_local_data_validity};
use crate::data::draws::{CreateDrawData, get_draw_data_async};
use crate::models::DrawHistory;

/// Load the draw table from the best available source.
///
/// If `check_local_data_validity` fails the API is the only choice; when the
/// cache is valid, `--prefer-api` decides the order (that flag is the manual
/// "refresh" action, the one way to force a re-fetch).
pub async fn load_draw_data(
    acceptable_age_secs: i64,
    args: &Cli,
) -> Result<(DrawHistory, &'static str)> {
    let providers: Vec<Box<dyn CreateDrawData>> = {
        let api_first = args.prefer_api;
        match (
            api_first,
            check_local_data_validity(
                acceptable_age_secs,
                DRAW_CACHE_VERSION,
                SOCRATA.dataset.dataset_id,
            ),
        ) {
            (false, Ok(_)) => vec![Box::new(CacheVersion), Box::new(ApiVersion)], // local first
            (true, Ok(_)) => vec![Box::new(ApiVersion), Box::new(CacheVersion)], // API first
            (_, Err(e)) => {
                log::warn!("Local cache validation failed: {:#}", e);
                log::warn!("Falling back to the Socrata API...");
                vec![Box::new(ApiVersion)] // API only
            }
        }
    };

    let (history, signature) = get_draw_data_async(&providers)
        .await
        .context("failed to retrieve draw data from any source")?;

    log::info!("Retrieved draw data using: {}", signature);
    Ok((history, signature))
}
