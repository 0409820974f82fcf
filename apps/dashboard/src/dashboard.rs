use polars::prelude::PolarsResult;
use tgpulse_analysis::frame::{self, PreviewRow};
use tgpulse_analysis::Batch;

/// Everything the dashboard shows, computed once from a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_posts: usize,
    /// Cash tags ranked by count.
    pub mentions: Vec<(String, usize)>,
    /// Posts per sentiment label, most frequent first.
    pub sentiment: Vec<(String, u32)>,
    pub rows: Vec<PreviewRow>,
}

impl Dashboard {
    pub fn build(batch: &Batch, rows: usize) -> PolarsResult<Self> {
        let df = frame::batch_frame(batch)?;

        let mentions = batch.mentions().ranked();

        let sentiment = frame::sentiment_counts(&df)?;
        let rows = frame::preview_rows(&frame::preview(&df, rows)?)?;

        Ok(Self {
            total_posts: df.height(),
            mentions,
            sentiment,
            rows,
        })
    }
}
