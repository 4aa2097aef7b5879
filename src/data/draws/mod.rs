pub mod api_version;
pub mod cache_file;
pub mod cache_version;
pub mod normalize;
pub mod socrata_client;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::models::DrawHistory;

#[async_trait]
pub trait CreateDrawData {
    // Either produce a draw table OR return an anyhow::Error
    async fn create_draw_data(&self) -> Result<DrawHistory>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

pub async fn get_draw_data_async(
    implementations: &[Box<dyn CreateDrawData>],
) -> Result<(DrawHistory, &'static str)> {
    for imp in implementations {
        match imp.create_draw_data().await {
            Ok(data) => {
                let signature = imp.signature();
                return Ok((data, signature));
            }
            Err(e) => {
                log::info!("Draw data source {} failed: {:#}", imp.signature(), e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!("All draw data sources failed"))
}
