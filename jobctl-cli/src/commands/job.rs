//! Job lifecycle command handlers
//!
//! Each handler loads the YAML job configuration, queries the server's
//! current state, branches on it, and prints a human-readable outcome.
//! Remote-state conflicts (already created, already building, absent) are
//! informational messages, not errors; the command still exits normally.

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Duration;

use jobctl_client::{JobApi, Sleep, stream_console};
use jobctl_core::JobSpec;

/// Options for the `start` command
pub struct StartOptions {
    /// Delay between triggering the build and the first console poll
    pub quiet_period: Duration,
    /// Interval between console polls
    pub refresh_rate: Duration,
    /// Delete the job once the build has finished
    pub delete_after: bool,
}

fn load_spec(config: &Path) -> Result<JobSpec> {
    JobSpec::load(config).with_context(|| {
        format!(
            "failed to load job configuration from '{}'",
            config.display()
        )
    })
}

/// Create the job on the server unless it already exists
pub async fn create<A: JobApi + ?Sized>(api: &A, config: &Path) -> Result<()> {
    let spec = load_spec(config)?;

    if api.create_job(&spec).await? {
        println!("{}", format!("Job '{}' created.", spec.name).green());
    } else {
        println!("The job is already created. Please use 'start' to build it.");
    }

    Ok(())
}

/// Create the job if needed, trigger a build, and stream its console output
pub async fn start<A, S>(api: &A, clock: &S, config: &Path, options: StartOptions) -> Result<()>
where
    A: JobApi + ?Sized,
    S: Sleep + ?Sized,
{
    let spec = load_spec(config)?;
    api.create_job(&spec).await?;

    if !api.build_job(&spec.name).await? {
        println!("Build is already running. Use 'attach' to watch its progress.");
        return Ok(());
    }

    // Give the server its quiet period to register the build before the
    // first console poll.
    clock.sleep(options.quiet_period).await;

    let mut stdout = std::io::stdout();
    stream_console(api, &spec.name, options.refresh_rate, clock, &mut stdout).await?;
    println!("Build status: {}", api.build_status(&spec.name).await?);

    if options.delete_after {
        api.delete_job(&spec.name).await?;
        println!("{}", format!("Job '{}' deleted.", spec.name).green());
    }

    Ok(())
}

/// Stop the currently running build, if any
pub async fn stop<A: JobApi + ?Sized>(api: &A, config: &Path) -> Result<()> {
    let spec = load_spec(config)?;

    if !api.job_exists(&spec.name).await? {
        println!("The job doesn't exist.");
    } else if !api.job_building(&spec.name).await? {
        println!("The job is not building, or the build has already finished.");
    } else {
        api.stop_build(&spec.name).await?;
        println!("{}", format!("Build of '{}' stopped.", spec.name).green());
    }

    Ok(())
}

/// Attach to a running build and stream its console output
pub async fn attach<A, S>(
    api: &A,
    clock: &S,
    config: &Path,
    refresh_rate: Duration,
    delete_after: bool,
) -> Result<()>
where
    A: JobApi + ?Sized,
    S: Sleep + ?Sized,
{
    let spec = load_spec(config)?;

    if !api.job_exists(&spec.name).await? {
        println!("The job is not created. Use 'start' to create and build it.");
        return Ok(());
    }
    if !api.job_building(&spec.name).await? {
        println!("The job is not running. Use 'start' to build it.");
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    stream_console(api, &spec.name, refresh_rate, clock, &mut stdout).await?;
    println!("Build status: {}", api.build_status(&spec.name).await?);

    if delete_after {
        api.delete_job(&spec.name).await?;
        println!("{}", format!("Job '{}' deleted.", spec.name).green());
    }

    Ok(())
}

/// Print the console output of the job's last build
pub async fn console<A, S>(
    api: &A,
    clock: &S,
    config: &Path,
    refresh_rate: Duration,
) -> Result<()>
where
    A: JobApi + ?Sized,
    S: Sleep + ?Sized,
{
    let spec = load_spec(config)?;

    if !api.job_exists(&spec.name).await? {
        println!("The job doesn't exist.");
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    stream_console(api, &spec.name, refresh_rate, clock, &mut stdout).await?;
    Ok(())
}

/// Remove the job from the server
pub async fn destroy<A: JobApi + ?Sized>(api: &A, config: &Path, force: bool) -> Result<()> {
    let spec = load_spec(config)?;

    if !api.job_exists(&spec.name).await? {
        println!("The job doesn't exist or was already destroyed.");
        return Ok(());
    }

    if api.job_building(&spec.name).await? && !force {
        println!(
            "The job is currently building. Use 'stop' or wait until the build completes. \
             Pass --force to stop the build and destroy immediately, or use 'attach' to \
             watch the progress."
        );
        return Ok(());
    }

    // A forced destroy stops the build first; the state may also have
    // settled on its own since the check above.
    if force && api.job_building(&spec.name).await? {
        api.stop_build(&spec.name).await?;
    }
    api.delete_job(&spec.name).await?;
    println!("{}", format!("Job '{}' destroyed.", spec.name).green());

    Ok(())
}
