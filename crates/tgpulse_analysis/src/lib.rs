pub mod cleaner;
pub mod frame;
pub mod mentions;
pub mod pipeline;

pub use cleaner::clean_text;
pub use mentions::most_mentioned;
pub use pipeline::{parse_channel_list, scrape_channels, Batch, PipelineError, ScrapeRequest};
