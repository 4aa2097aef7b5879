use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::{DRAW_CACHE_VERSION, SOCRATA};
use crate::data::draws::CreateDrawData;
use crate::data::draws::normalize::normalize;
use crate::data::draws::socrata_client::SocrataClient;
use crate::models::DrawHistory;

pub const API_SIGNATURE: &str = "Socrata API";

pub struct ApiVersion;

#[async_trait]
impl CreateDrawData for ApiVersion {
    fn signature(&self) -> &'static str {
        API_SIGNATURE
    }

    async fn create_draw_data(&self) -> Result<DrawHistory> {
        let client = SocrataClient::from_config()?;
        let start_time = Instant::now();

        let progress = |fetched: usize, total: Option<usize>| match total {
            Some(total) => log::info!("Fetched {} of ~{} records...", fetched, total),
            None => log::info!("Fetched {} records...", fetched),
        };
        let raw_records = client.fetch_all(Some(&progress)).await?;
        if raw_records.is_empty() {
            bail!(
                "Socrata returned no records for dataset {}",
                SOCRATA.dataset.dataset_id
            );
        }

        let rows = normalize(&raw_records);
        if rows.is_empty() {
            bail!("No valid draws survived normalization");
        }

        let mut history = DrawHistory::new("NY Win 4 draw history", DRAW_CACHE_VERSION, rows);
        history.sort_chronological();

        log::info!(
            "Fetched {} records ({} draws) in {:?}",
            raw_records.len(),
            history.len(),
            start_time.elapsed()
        );
        Ok(history)
    }
}
