//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Base used to read relative schedule links.
const LINK_BASE: &str = "http://rozklad.kpi.ua/Schedules/";

/// Extract the schedule reference (`v=` or `g=` query value) from a link.
///
/// Works for relative links such as `/Schedules/ViewSchedule.aspx?v=<uuid>`
/// as well as absolute ones.
pub fn extract_schedule_ref(href: &str) -> Option<String> {
    let base = Url::parse(LINK_BASE).ok()?;
    if let Ok(parsed) = base.join(href.trim()) {
        let found = parsed
            .query_pairs()
            .find(|(key, value)| (key == "v" || key == "g") && !value.is_empty())
            .map(|(_, value)| value.into_owned());
        if found.is_some() {
            return found;
        }
    }

    // Links with unescaped characters may fail URL parsing
    let pattern = regex::Regex::new(r"[?&][vg]=([^&#]+)").ok()?;
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
