// src/pipeline/parse.rs

//! Group schedule parsing pipeline.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, GroupSchedule};
use crate::services::{
    PairParser, Reconciler, RozkladClient, ScheduleParser, TableShapeIssue,
    TeacherScheduleResolver,
};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub schedule: GroupSchedule,
    pub summary: ParseSummary,
}

/// Run statistics, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ParseSummary {
    /// Group reference or file path the page came from
    pub source: String,
    pub lesson_count: usize,
    pub fingerprint: String,
    pub shape_issues: Vec<TableShapeIssue>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Wire a schedule parser whose teacher lookups go through `client`.
pub fn build_schedule_parser(config: &Config, client: &RozkladClient) -> ScheduleParser {
    let resolver = TeacherScheduleResolver::new(client.clone(), config.retry.clone());
    let reconciler = Reconciler::new(Arc::new(resolver), config.parser.max_concurrent_lookups);
    ScheduleParser::new(PairParser::new(reconciler), config.parser.semester)
}

/// Fetch and parse a group's schedule page.
pub async fn run_group(config: &Config, group_ref: &str) -> Result<ParseReport> {
    let started_at = Utc::now();
    let client = RozkladClient::new(&config.client)?;

    log::info!("Fetching schedule for group {}", group_ref);
    let page = client.group_schedule_page(group_ref).await?;

    parse_page(config, &client, group_ref, &page, started_at).await
}

/// Parse a saved group schedule page. Teacher lookups still go to the site.
pub async fn run_file(config: &Config, path: &Path) -> Result<ParseReport> {
    let started_at = Utc::now();
    let client = RozkladClient::new(&config.client)?;

    log::info!("Reading schedule page from {}", path.display());
    let page = tokio::fs::read_to_string(path).await?;

    parse_page(config, &client, &path.display().to_string(), &page, started_at).await
}

async fn parse_page(
    config: &Config,
    client: &RozkladClient,
    source: &str,
    page: &str,
    started_at: DateTime<Utc>,
) -> Result<ParseReport> {
    let parser = build_schedule_parser(config, client);
    let outcome = parser.parse(page).await?;

    let summary = ParseSummary {
        source: source.to_string(),
        lesson_count: outcome.schedule.lesson_count(),
        fingerprint: outcome.schedule.fingerprint()?,
        shape_issues: outcome.shape_issues,
        started_at,
        finished_at: Utc::now(),
    };

    log::info!(
        "Parsed {} lessons from {} in {} ms",
        summary.lesson_count,
        summary.source,
        (summary.finished_at - summary.started_at).num_milliseconds()
    );
    if !summary.shape_issues.is_empty() {
        log::warn!(
            "{} week table(s) in {} were left empty",
            summary.shape_issues.len(),
            summary.source
        );
    }

    Ok(ParseReport {
        schedule: outcome.schedule,
        summary,
    })
}

/// Write the schedule as pretty JSON to `output`, or to stdout.
pub async fn write_output(schedule: &GroupSchedule, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(schedule)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, json).await?;
            log::info!("Schedule saved to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
