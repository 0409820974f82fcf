use crate::dashboard::Dashboard;
use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::{row, Table};
use tgpulse_analysis::frame::PREVIEW_COLUMNS;

pub const TITLE: &str = "Telegram Channel Data Scraper";
pub const MISSING_CHANNELS: &str = "Please enter the list of channels and limit to scrape data.";
pub const NO_DATA: &str = "No data found for the provided channels and limit.";

const BAR_WIDTH: usize = 40;
const TEXT_WIDTH: usize = 80;

pub fn header() -> String {
    format!(
        "{TITLE}\n{}\nEnter the list of Telegram channels and the limit of scraping data.\n",
        "=".repeat(TITLE.len())
    )
}

pub fn terminal(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    out.push_str(&section("Most Mentioned Words"));
    if dashboard.mentions.is_empty() {
        out.push_str("(no cash tags mentioned)\n");
    } else {
        out.push_str(&bar_chart(&dashboard.mentions));
    }

    out.push('\n');
    out.push_str(&section("Sentiment Analysis"));
    out.push_str(&pie_chart(&dashboard.sentiment));

    out.push('\n');
    out.push_str(&format!(
        "Showing {} of {} posts\n",
        dashboard.rows.len(),
        dashboard.total_posts
    ));
    out.push_str(&results_table(dashboard));

    out
}

fn section(title: &str) -> String {
    format!("{title}\n{}\n", "-".repeat(title.len()))
}

fn bar(value: usize, max: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    "█".repeat((value * BAR_WIDTH / max).max(1))
}

fn bar_chart(mentions: &[(String, usize)]) -> String {
    let max = mentions.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let width = mentions.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    mentions
        .iter()
        .map(|(name, count)| format!("{name:<width$} {} {count}\n", bar(*count, max)))
        .collect()
}

fn pie_chart(sentiment: &[(String, u32)]) -> String {
    let total: u32 = sentiment.iter().map(|(_, count)| count).sum();
    let width = sentiment.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    sentiment
        .iter()
        .map(|(label, count)| {
            let share = if total == 0 {
                0.0
            } else {
                f64::from(*count) * 100.0 / f64::from(total)
            };
            format!(
                "{label:<width$} {:>5.1}% ({count}) {}\n",
                share,
                bar(*count as usize, total as usize)
            )
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn results_table(dashboard: &Dashboard) -> String {
    let mut table = Table::new();
    table.set_format(*FORMAT_BOX_CHARS);
    table.set_titles(row![
        PREVIEW_COLUMNS[0],
        PREVIEW_COLUMNS[1],
        PREVIEW_COLUMNS[2],
        PREVIEW_COLUMNS[3]
    ]);

    for row in &dashboard.rows {
        table.add_row(row![
            truncate(row.clean_context.trim(), TEXT_WIDTH),
            format!("{:.3}", row.subjectivity),
            format!("{:.3}", row.polarity),
            row.analysis
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::sample_batch;
    use pretty_assertions::assert_eq;

    #[test]
    fn bars_scale_to_the_largest_value() {
        let chart = bar_chart(&[("$AAPL".to_string(), 4), ("$BTC".to_string(), 1)]);

        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], format!("$AAPL {} 4", "█".repeat(BAR_WIDTH)));
        assert_eq!(lines[1], format!("$BTC  {} 1", "█".repeat(BAR_WIDTH / 4)));
    }

    #[test]
    fn pie_shows_shares() {
        let chart = pie_chart(&[("Positive".to_string(), 3), ("Negative".to_string(), 1)]);

        assert!(chart.contains("Positive  75.0% (3)"), "{chart}");
        assert!(chart.contains("Negative  25.0% (1)"), "{chart}");
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }

    #[test]
    fn terminal_dashboard_has_every_section() {
        let batch = sample_batch(&[("$AAPL rally", 0.4), ("quiet day", 0.0)]);
        let dashboard = Dashboard::build(&batch, 50).unwrap();

        let rendered = terminal(&dashboard);

        assert!(rendered.contains("Most Mentioned Words"));
        assert!(rendered.contains("Sentiment Analysis"));
        assert!(rendered.contains("clean_context"));
        assert!(rendered.contains("$AAPL rally"));
        assert!(rendered.contains("0.400"));
        assert!(rendered.contains("Showing 2 of 2 posts"));
    }

    #[test]
    fn no_mentions_is_stated() {
        let batch = sample_batch(&[("quiet day", 0.0)]);
        let dashboard = Dashboard::build(&batch, 50).unwrap();

        assert!(terminal(&dashboard).contains("(no cash tags mentioned)"));
    }
}
