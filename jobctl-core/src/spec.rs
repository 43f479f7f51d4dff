//! Job specification and YAML configuration loading
//!
//! A job is described by a small YAML file with a `name` and a handful of
//! optional keys (`node`, `git`/`svn`, `ref`, `script`). Only `name` is
//! required; everything else degrades to "not configured".

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors produced while loading a job configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path that was attempted
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid YAML
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parsed but the configuration is invalid
    ///
    /// Carries every problem found so the user can fix them all at once.
    #[error("invalid job configuration: {}", .problems.join("; "))]
    Invalid {
        /// All validation problems, in field order
        problems: Vec<String>,
    },
}

/// Source control provider for a freestyle job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmProvider {
    Git,
    Subversion,
}

/// Source control checkout attached to a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScmConfig {
    pub provider: ScmProvider,
    /// Repository URL
    pub url: String,
    /// Branch or ref to build; only meaningful for git
    pub branch: Option<String>,
}

/// Validated description of a freestyle job
///
/// Built once per invocation from a YAML file and immutable afterwards. It
/// exists only to parameterize the remote API calls for one command; there
/// is no local persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    /// Job name, the unique identifier on the remote server
    pub name: String,
    /// Node label restricting where the job may run
    pub node: Option<String>,
    /// Source control checkout, if any
    pub scm: Option<ScmConfig>,
    /// Shell command block, script lines joined with trailing newlines
    pub shell_command: Option<String>,
}

/// Raw YAML shape before validation
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJobConfig {
    name: Option<String>,
    node: Option<String>,
    git: Option<String>,
    svn: Option<String>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    script: Option<Vec<String>>,
}

impl JobSpec {
    /// Load and validate a job spec from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a job spec from YAML text
    ///
    /// Collects every validation problem before failing so the user sees
    /// all of them at once instead of one per run.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawJobConfig = serde_yaml::from_str(content)?;
        let mut problems = Vec::new();

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            Some(_) => {
                problems.push("'name' must not be empty".to_string());
                String::new()
            }
            None => {
                problems.push("'name' is required and not set".to_string());
                String::new()
            }
        };

        // git takes precedence when both providers are configured
        let scm = if let Some(url) = raw.git {
            Some(ScmConfig {
                provider: ScmProvider::Git,
                url,
                branch: Some(raw.git_ref.unwrap_or_else(|| "master".to_string())),
            })
        } else if let Some(url) = raw.svn {
            Some(ScmConfig {
                provider: ScmProvider::Subversion,
                url,
                branch: None,
            })
        } else {
            None
        };

        let shell_command = raw
            .script
            .map(|lines| lines.iter().map(|line| format!("{line}\n")).collect());

        if !problems.is_empty() {
            return Err(ConfigError::Invalid { problems });
        }

        Ok(JobSpec {
            name,
            node: raw.node,
            scm,
            shell_command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_only_needs_a_name() {
        let spec = JobSpec::from_yaml("name: demo").unwrap();
        assert_eq!(spec.name, "demo");
        assert_eq!(spec.node, None);
        assert_eq!(spec.scm, None);
        assert_eq!(spec.shell_command, None);
    }

    #[test]
    fn missing_name_fails_validation() {
        let err = JobSpec::from_yaml("node: agent-1").unwrap_err();
        match err {
            ConfigError::Invalid { problems } => {
                assert_eq!(problems, vec!["'name' is required and not set"]);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_fails_validation() {
        let err = JobSpec::from_yaml("name: '  '").unwrap_err();
        match err {
            ConfigError::Invalid { problems } => {
                assert_eq!(problems, vec!["'name' must not be empty"]);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn git_branch_defaults_to_master() {
        let spec = JobSpec::from_yaml("name: demo\ngit: https://example.com/repo.git").unwrap();
        let scm = spec.scm.unwrap();
        assert_eq!(scm.provider, ScmProvider::Git);
        assert_eq!(scm.url, "https://example.com/repo.git");
        assert_eq!(scm.branch.as_deref(), Some("master"));
    }

    #[test]
    fn explicit_ref_overrides_default_branch() {
        let spec =
            JobSpec::from_yaml("name: demo\ngit: https://example.com/repo.git\nref: develop")
                .unwrap();
        assert_eq!(spec.scm.unwrap().branch.as_deref(), Some("develop"));
    }

    #[test]
    fn svn_has_no_branch() {
        let spec = JobSpec::from_yaml("name: demo\nsvn: https://example.com/trunk").unwrap();
        let scm = spec.scm.unwrap();
        assert_eq!(scm.provider, ScmProvider::Subversion);
        assert_eq!(scm.branch, None);
    }

    #[test]
    fn git_wins_when_both_providers_are_set() {
        let spec = JobSpec::from_yaml(
            "name: demo\ngit: https://example.com/repo.git\nsvn: https://example.com/trunk",
        )
        .unwrap();
        assert_eq!(spec.scm.unwrap().provider, ScmProvider::Git);
    }

    #[test]
    fn script_lines_are_joined_with_trailing_newlines() {
        let spec =
            JobSpec::from_yaml("name: demo\nscript:\n  - echo hi\n  - echo bye").unwrap();
        assert_eq!(spec.shell_command.as_deref(), Some("echo hi\necho bye\n"));
    }

    #[test]
    fn load_reads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: demo\nscript:\n  - echo hi").unwrap();
        let spec = JobSpec::load(file.path()).unwrap();
        assert_eq!(spec.name, "demo");
        assert_eq!(spec.shell_command.as_deref(), Some("echo hi\n"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = JobSpec::load("/nonexistent/job.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(JobSpec::from_yaml("name: demo\nbogus: 1").is_err());
    }
}
