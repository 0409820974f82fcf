use crate::pipeline::Batch;
use polars::prelude::*;

pub const CLEAN_CONTEXT: &str = "clean_context";
pub const SUBJECTIVITY: &str = "Subjectivity";
pub const POLARITY: &str = "Polarity";
pub const ANALYSIS: &str = "Analysis";

/// Columns shown in the results table.
pub const PREVIEW_COLUMNS: [&str; 4] = [CLEAN_CONTEXT, SUBJECTIVITY, POLARITY, ANALYSIS];

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub clean_context: String,
    pub subjectivity: f64,
    pub polarity: f64,
    pub analysis: String,
}

/// Builds the batch data frame: one row per post, in batch order.
pub fn batch_frame(batch: &Batch) -> PolarsResult<DataFrame> {
    let posts = &batch.posts;

    let date = Column::new(
        "date".into(),
        posts
            .iter()
            .map(|p| p.date.timestamp_millis())
            .collect::<Vec<_>>(),
    )
    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    let mut df = DataFrame::new(vec![
        Column::new(
            "channel".into(),
            posts.iter().map(|p| p.channel.as_str()).collect::<Vec<_>>(),
        ),
        date,
        Column::new(
            "url".into(),
            posts.iter().map(|p| p.url.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            CLEAN_CONTEXT.into(),
            posts.iter().map(|p| p.clean_context.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "outlinks".into(),
            posts.iter().map(|p| p.outlinks.join(" ")).collect::<Vec<_>>(),
        ),
        Column::new(
            SUBJECTIVITY.into(),
            posts.iter().map(|p| p.subjectivity).collect::<Vec<_>>(),
        ),
        Column::new(
            POLARITY.into(),
            posts.iter().map(|p| p.polarity).collect::<Vec<_>>(),
        ),
        Column::new(
            ANALYSIS.into(),
            posts.iter().map(|p| p.analysis.as_str()).collect::<Vec<_>>(),
        ),
    ])?;

    df.rechunk_mut();

    Ok(df)
}

/// Number of posts per sentiment label, most frequent first.
pub fn sentiment_counts(frame: &DataFrame) -> PolarsResult<Vec<(String, u32)>> {
    let grouped = frame
        .clone()
        .lazy()
        .group_by([col(ANALYSIS)])
        .agg([len().alias("counts")])
        .collect()?;

    let labels = grouped.column(ANALYSIS)?.str()?;
    let counts = grouped.column("counts")?.u32()?;

    let mut pairs: Vec<(String, u32)> = labels
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(label, count)| Some((label?.to_string(), count?)))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(pairs)
}

/// The first `rows` rows of the table columns.
pub fn preview(frame: &DataFrame, rows: usize) -> PolarsResult<DataFrame> {
    Ok(frame.select(PREVIEW_COLUMNS)?.head(Some(rows)))
}

pub fn preview_rows(preview: &DataFrame) -> PolarsResult<Vec<PreviewRow>> {
    let texts = preview.column(CLEAN_CONTEXT)?.str()?;
    let subjectivity = preview.column(SUBJECTIVITY)?.f64()?;
    let polarity = preview.column(POLARITY)?.f64()?;
    let analysis = preview.column(ANALYSIS)?.str()?;

    Ok((0..preview.height())
        .map(|idx| PreviewRow {
            clean_context: texts.get(idx).unwrap_or_default().to_string(),
            subjectivity: subjectivity.get(idx).unwrap_or(f64::NAN),
            polarity: polarity.get(idx).unwrap_or(f64::NAN),
            analysis: analysis.get(idx).unwrap_or_default().to_string(),
        })
        .collect())
}
