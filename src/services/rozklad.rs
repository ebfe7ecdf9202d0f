//! HTTP access to rozklad.kpi.ua schedule pages.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::models::ClientConfig;
use crate::services::teacher_schedule::TeacherPageSource;
use crate::utils::http::{create_async_client, fetch_text};

const SCHEDULE_PAGE: &str = "ViewSchedule.aspx";

/// Fetches raw group and teacher schedule pages.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RozkladClient {
    client: reqwest::Client,
    base_url: Url,
    teacher_timeout: Duration,
}

impl RozkladClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&base)?,
            teacher_timeout: Duration::from_secs(config.teacher_timeout_secs),
        })
    }

    /// URL of a group's schedule page.
    pub fn group_schedule_url(&self, group_ref: &str) -> Result<Url> {
        self.schedule_url("g", group_ref)
    }

    /// URL of a teacher's schedule page.
    pub fn teacher_schedule_url(&self, teacher_ref: &str) -> Result<Url> {
        self.schedule_url("v", teacher_ref)
    }

    fn schedule_url(&self, key: &str, schedule_ref: &str) -> Result<Url> {
        let mut url = self.base_url.join(SCHEDULE_PAGE)?;
        url.query_pairs_mut().append_pair(key, schedule_ref.trim());
        Ok(url)
    }

    pub async fn group_schedule_page(&self, group_ref: &str) -> Result<String> {
        let url = self.group_schedule_url(group_ref)?;
        log::debug!("Fetching group schedule {}", url);
        fetch_text(&self.client, url.as_str(), None).await
    }

    /// Fetch a teacher page with the long per-attempt timeout.
    pub async fn teacher_schedule_page(&self, teacher_ref: &str) -> Result<String> {
        let url = self.teacher_schedule_url(teacher_ref)?;
        log::debug!("Fetching teacher schedule {}", url);
        fetch_text(&self.client, url.as_str(), Some(self.teacher_timeout)).await
    }
}

#[async_trait]
impl TeacherPageSource for RozkladClient {
    async fn fetch_teacher_page(&self, schedule_ref: &str) -> Result<String> {
        self.teacher_schedule_page(schedule_ref).await
    }
}
