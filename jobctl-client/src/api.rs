//! Job lifecycle API
//!
//! [`JobApi`] is the seam between the command dispatcher and the remote
//! server. Backends implement the raw calls; the lifecycle guards (create
//! only when absent, build only when idle) are provided methods so every
//! backend gets the same idempotent behavior.

use async_trait::async_trait;
use jobctl_core::{BuildStatus, JobSpec};

use crate::console::ConsoleChunk;
use crate::error::Result;

/// Remote job-management operations
///
/// The remote server is the sole source of truth for job state; none of
/// these results are cached.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Whether a job with this name exists on the server
    async fn job_exists(&self, name: &str) -> Result<bool>;

    /// Status of the job's last build
    async fn build_status(&self, name: &str) -> Result<BuildStatus>;

    /// Upload the job definition, unconditionally
    async fn submit_job_config(&self, spec: &JobSpec) -> Result<()>;

    /// Trigger a build, unconditionally
    async fn trigger_build(&self, name: &str) -> Result<()>;

    /// Stop the currently running build
    async fn stop_build(&self, name: &str) -> Result<()>;

    /// Delete the job from the server
    async fn delete_job(&self, name: &str) -> Result<()>;

    /// Fetch one chunk of console output starting at a byte offset
    async fn console_chunk(&self, name: &str, start: u64) -> Result<ConsoleChunk>;

    /// Whether a build of this job is currently in progress
    async fn job_building(&self, name: &str) -> Result<bool> {
        Ok(self.build_status(name).await?.is_running())
    }

    /// Create the job unless it already exists
    ///
    /// Returns whether a create call was actually issued.
    async fn create_job(&self, spec: &JobSpec) -> Result<bool> {
        if self.job_exists(&spec.name).await? {
            return Ok(false);
        }
        self.submit_job_config(spec).await?;
        Ok(true)
    }

    /// Trigger a build unless one is already running
    ///
    /// Returns whether a build was actually triggered.
    async fn build_job(&self, name: &str) -> Result<bool> {
        if self.job_building(name).await? {
            return Ok(false);
        }
        self.trigger_build(name).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted backend that records which raw calls were issued
    struct FakeBackend {
        exists: bool,
        status: BuildStatus,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn new(exists: bool, status: BuildStatus) -> Self {
            Self {
                exists,
                status,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobApi for FakeBackend {
        async fn job_exists(&self, _name: &str) -> Result<bool> {
            Ok(self.exists)
        }

        async fn build_status(&self, _name: &str) -> Result<BuildStatus> {
            Ok(self.status)
        }

        async fn submit_job_config(&self, _spec: &JobSpec) -> Result<()> {
            self.calls.lock().unwrap().push("create");
            Ok(())
        }

        async fn trigger_build(&self, _name: &str) -> Result<()> {
            self.calls.lock().unwrap().push("build");
            Ok(())
        }

        async fn stop_build(&self, _name: &str) -> Result<()> {
            self.calls.lock().unwrap().push("stop");
            Ok(())
        }

        async fn delete_job(&self, _name: &str) -> Result<()> {
            self.calls.lock().unwrap().push("delete");
            Ok(())
        }

        async fn console_chunk(&self, _name: &str, _start: u64) -> Result<ConsoleChunk> {
            Ok(ConsoleChunk::default())
        }
    }

    fn spec() -> JobSpec {
        JobSpec {
            name: "demo".to_string(),
            node: None,
            scm: None,
            shell_command: None,
        }
    }

    #[tokio::test]
    async fn create_job_is_a_noop_when_job_exists() {
        let api = FakeBackend::new(true, BuildStatus::NotRun);
        assert!(!api.create_job(&spec()).await.unwrap());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_job_submits_when_job_is_absent() {
        let api = FakeBackend::new(false, BuildStatus::NotRun);
        assert!(api.create_job(&spec()).await.unwrap());
        assert_eq!(api.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn build_job_is_a_noop_when_already_building() {
        let api = FakeBackend::new(true, BuildStatus::Running);
        assert!(!api.build_job("demo").await.unwrap());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn build_job_triggers_when_idle() {
        let api = FakeBackend::new(true, BuildStatus::Success);
        assert!(api.build_job("demo").await.unwrap());
        assert_eq!(api.calls(), vec!["build"]);
    }
}
