use crate::dashboard::Dashboard;
use crate::render::TITLE;
use std::path::Path;
use tgpulse_analysis::frame::PREVIEW_COLUMNS;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON for embedding inside a `<script>` block.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Renders the dashboard as a standalone page with Plotly bar and pie charts.
pub fn render_html(dashboard: &Dashboard) -> serde_json::Result<String> {
    let mut html_content = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{TITLE}</title>
    <script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px auto; max-width: 1100px; }}
        .container {{ width: 100%; height: 450px; }}
        h1 {{ color: #333; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
        tr:nth-child(even) {{ background-color: #f9f9f9; }}
    </style>
</head>
<body>
    <h1>{TITLE}</h1>
    <h2>Most Mentioned Words</h2>
    <div class="container" id="mentions"></div>
    <h2>Sentiment Analysis</h2>
    <div class="container" id="sentiment"></div>
    <p>Showing {} of {} posts</p>
    <table>
        <tr>
"#,
        dashboard.rows.len(),
        dashboard.total_posts
    );

    for column in PREVIEW_COLUMNS {
        html_content.push_str(&format!("            <th>{column}</th>\n"));
    }
    html_content.push_str("        </tr>\n");

    for row in &dashboard.rows {
        html_content.push_str(&format!(
            "<tr><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td></tr>\n",
            escape_html(&row.clean_context),
            row.subjectivity,
            row.polarity,
            escape_html(&row.analysis)
        ));
    }

    html_content.push_str("    </table>\n");

    let names: Vec<&str> = dashboard.mentions.iter().map(|(n, _)| n.as_str()).collect();
    let counts: Vec<usize> = dashboard.mentions.iter().map(|(_, c)| *c).collect();
    let labels: Vec<&str> = dashboard.sentiment.iter().map(|(l, _)| l.as_str()).collect();
    let values: Vec<u32> = dashboard.sentiment.iter().map(|(_, v)| *v).collect();

    html_content.push_str(&format!(
        r#"
    <script>
        var mentions = [{{
            x: {},
            y: {},
            type: 'bar'
        }}];

        Plotly.newPlot('mentions', mentions, {{
            xaxis: {{ title: 'names' }},
            yaxis: {{ title: 'counts' }}
        }});

        var sentiment = [{{
            labels: {},
            values: {},
            type: 'pie'
        }}];

        Plotly.newPlot('sentiment', sentiment, {{ title: 'Sentiment Analysis' }});
    </script>
</body>
</html>
"#,
        script_json(&names)?,
        script_json(&counts)?,
        script_json(&labels)?,
        script_json(&values)?
    ));

    Ok(html_content)
}

pub fn write(dashboard: &Dashboard, path: &Path) -> anyhow::Result<()> {
    let html_content = render_html(dashboard)?;
    std::fs::write(path, html_content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::sample_batch;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"fish" & 'chips'</b>"#),
            "&lt;b&gt;&quot;fish&quot; &amp; &#39;chips&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn page_embeds_charts_and_table() {
        let batch = sample_batch(&[
            ("$AAPL <script>alert(1)</script>", 0.5),
            ("$AAPL $BTC", -0.2),
        ]);
        let dashboard = Dashboard::build(&batch, 50).unwrap();

        let html = render_html(&dashboard).unwrap();

        assert!(html.contains("cdn.plot.ly"));
        assert!(html.contains(r#"x: ["$AAPL","$BTC"]"#), "{html}");
        assert!(html.contains("y: [2,1]"), "{html}");
        assert!(html.contains(r#"labels: ["Negative","Positive"]"#), "{html}");
        assert!(html.contains("<th>clean_context</th>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn script_json_cannot_close_the_script_block() {
        let json = script_json(&["</script>"]).unwrap();

        assert_eq!(json, r#"["<\/script>"]"#);
    }
}
