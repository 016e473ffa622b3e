use crate::processing::display::{MISSING, format_km, to_fixed_1};
use crate::processing::{Endpoint, StatBlock, TripSummary};
use crate::session::SessionSnapshot;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

pub fn render_landing_page() -> String {
    include_str!("../templates/landing.html").to_string()
}

fn render_endpoint(title: &str, endpoint: &Endpoint) -> String {
    format!(
        "<div class=\"stat-block\"><h3>{title}</h3><p>DATE: {}</p><p>MILEAGE: {}</p></div>",
        escape_html(endpoint.date.as_deref().unwrap_or(MISSING)),
        format_km(endpoint.mileage_km)
    )
}

fn render_stat_block(block: &StatBlock) -> String {
    let mut html = format!("<div class=\"stat-block\"><h3>{}</h3>", escape_html(&block.label));
    html.push_str(&format!("<p>Max: {}</p>", escape_html(&block.formatted.max)));
    if block.show_min {
        html.push_str(&format!("<p>Min: {}</p>", escape_html(&block.formatted.min)));
    }
    html.push_str(&format!("<p>Avg: {}</p>", escape_html(&block.formatted.average)));
    html.push_str(&format!(
        "<p>Median: {}</p>",
        escape_html(&block.formatted.median)
    ));
    html.push_str("</div>");
    html
}

/// Summary panel: trip distance and duration, endpoints, then one block per field.
pub fn render_summary(summary: &TripSummary) -> String {
    let mut body = String::new();

    let duration = summary
        .duration
        .map(|duration| duration.to_string())
        .unwrap_or_else(|| MISSING.to_string());

    body.push_str(&format!(
        "<div class=\"summary-container\"><p>{} km<br>in {}</p></div>",
        to_fixed_1(summary.distance_km),
        duration
    ));

    body.push_str("<div class=\"stats-container\">");
    body.push_str(&render_endpoint("START", &summary.start));
    body.push_str(&render_endpoint("FINISH", &summary.finish));
    for block in &summary.stats {
        body.push_str(&render_stat_block(block));
    }
    body.push_str("</div>");

    body
}

/// Full page for a loaded session: summary, chart, map and the script wiring them.
pub fn render_session_page(snapshot: &SessionSnapshot) -> String {
    let template = include_str!("../templates/session.html");
    let checked = if snapshot.map.display_enabled {
        "checked"
    } else {
        ""
    };
    let container_class = if snapshot.map.display_enabled {
        "split"
    } else {
        ""
    };

    template
        .replace("{{summary}}", &render_summary(&snapshot.summary))
        .replace("{{rows}}", &snapshot.rows.to_string())
        .replace("{{map_checked}}", checked)
        .replace("{{container_class}}", container_class)
        .replace("{{session_json}}", &script_json(&snapshot.id))
        .replace("{{map_json}}", &script_json(&snapshot.map))
        .replace("{{chart_json}}", &script_json(&snapshot.chart))
}
