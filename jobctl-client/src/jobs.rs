//! Remote job endpoints
//!
//! The HTTP implementation of [`JobApi`] for [`JenkinsClient`].

use async_trait::async_trait;
use jobctl_core::{BuildStatus, JobSpec};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use crate::JenkinsClient;
use crate::api::JobApi;
use crate::console::ConsoleChunk;
use crate::error::Result;
use crate::xml::freestyle_config_xml;

/// Subset of the job resource we care about
#[derive(Debug, Deserialize)]
struct JobDetails {
    color: Option<String>,
}

/// Escape a job name for use as a single URL path segment
fn path_escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                escaped.push(byte as char)
            }
            _ => escaped.push_str(&format!("%{byte:02X}")),
        }
    }
    escaped
}

#[async_trait]
impl JobApi for JenkinsClient {
    async fn job_exists(&self, name: &str) -> Result<bool> {
        let response = self
            .get(&format!("/job/{}/api/json", path_escape(name)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        self.handle_empty_response(response).await?;
        Ok(true)
    }

    async fn build_status(&self, name: &str) -> Result<BuildStatus> {
        let response = self
            .get(&format!("/job/{}/api/json", path_escape(name)))
            .send()
            .await?;

        let details: JobDetails = self.handle_response(response).await?;
        Ok(details
            .color
            .as_deref()
            .map(BuildStatus::from_color)
            .unwrap_or(BuildStatus::Unknown))
    }

    async fn submit_job_config(&self, spec: &JobSpec) -> Result<()> {
        debug!(name = %spec.name, "creating job");

        let response = self
            .post("/createItem")
            .query(&[("name", spec.name.as_str())])
            .header(CONTENT_TYPE, "application/xml")
            .body(freestyle_config_xml(spec))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    async fn trigger_build(&self, name: &str) -> Result<()> {
        debug!(name, "triggering build");

        let response = self
            .post(&format!("/job/{}/build", path_escape(name)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    async fn stop_build(&self, name: &str) -> Result<()> {
        debug!(name, "stopping build");

        let response = self
            .post(&format!("/job/{}/lastBuild/stop", path_escape(name)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    async fn delete_job(&self, name: &str) -> Result<()> {
        debug!(name, "deleting job");

        let response = self
            .post(&format!("/job/{}/doDelete", path_escape(name)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    async fn console_chunk(&self, name: &str, start: u64) -> Result<ConsoleChunk> {
        let response = self
            .get(&format!(
                "/job/{}/lastBuild/logText/progressiveText",
                path_escape(name)
            ))
            .query(&[("start", start)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(crate::error::ClientError::api_error(
                status.as_u16(),
                error_text,
            ));
        }

        // Headers carry the progressive-output metadata; read them before
        // consuming the body.
        let size = response
            .headers()
            .get("x-text-size")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(start);
        let more = response
            .headers()
            .get("x-more-data")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let text = response.text().await?;
        Ok(ConsoleChunk { text, size, more })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(path_escape("demo-job_1.2"), "demo-job_1.2");
    }

    #[test]
    fn special_characters_are_percent_encoded() {
        assert_eq!(path_escape("my job"), "my%20job");
        assert_eq!(path_escape("a/b?c"), "a%2Fb%3Fc");
    }
}
