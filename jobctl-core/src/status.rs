//! Build status reported by the remote server
//!
//! The server encodes a job's current state as a "color" string on the job
//! resource. This module maps that string to a typed status.

use std::fmt;

/// Current status of a job's last build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// A build is currently in progress
    Running,
    Success,
    Failure,
    Unstable,
    Aborted,
    Disabled,
    /// Job has never been built
    NotRun,
    /// Server reported a color we do not recognize
    Unknown,
}

impl BuildStatus {
    /// Map the server-reported color string to a status
    ///
    /// A color containing "anime" means the status ball is blinking, i.e.
    /// a build is in progress, regardless of the base color.
    pub fn from_color(color: &str) -> Self {
        if color.contains("anime") {
            return BuildStatus::Running;
        }
        match color {
            "blue" => BuildStatus::Success,
            "red" => BuildStatus::Failure,
            "yellow" => BuildStatus::Unstable,
            "aborted" => BuildStatus::Aborted,
            "disabled" => BuildStatus::Disabled,
            "grey" | "notbuilt" => BuildStatus::NotRun,
            _ => BuildStatus::Unknown,
        }
    }

    /// Whether a build is currently in progress
    pub fn is_running(self) -> bool {
        matches!(self, BuildStatus::Running)
    }

    fn as_str(self) -> &'static str {
        match self {
            BuildStatus::Running => "running",
            BuildStatus::Success => "success",
            BuildStatus::Failure => "failure",
            BuildStatus::Unstable => "unstable",
            BuildStatus::Aborted => "aborted",
            BuildStatus::Disabled => "disabled",
            BuildStatus::NotRun => "not run",
            BuildStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anime_colors_mean_running() {
        assert_eq!(BuildStatus::from_color("blue_anime"), BuildStatus::Running);
        assert_eq!(BuildStatus::from_color("red_anime"), BuildStatus::Running);
        assert!(BuildStatus::from_color("grey_anime").is_running());
    }

    #[test]
    fn base_colors_map_to_results() {
        assert_eq!(BuildStatus::from_color("blue"), BuildStatus::Success);
        assert_eq!(BuildStatus::from_color("red"), BuildStatus::Failure);
        assert_eq!(BuildStatus::from_color("yellow"), BuildStatus::Unstable);
        assert_eq!(BuildStatus::from_color("aborted"), BuildStatus::Aborted);
        assert_eq!(BuildStatus::from_color("disabled"), BuildStatus::Disabled);
        assert_eq!(BuildStatus::from_color("grey"), BuildStatus::NotRun);
        assert_eq!(BuildStatus::from_color("notbuilt"), BuildStatus::NotRun);
    }

    #[test]
    fn unrecognized_colors_are_unknown() {
        assert_eq!(BuildStatus::from_color("chartreuse"), BuildStatus::Unknown);
        assert!(!BuildStatus::from_color("chartreuse").is_running());
    }

    #[test]
    fn display_renders_lowercase_words() {
        assert_eq!(BuildStatus::Running.to_string(), "running");
        assert_eq!(BuildStatus::Success.to_string(), "success");
    }
}
