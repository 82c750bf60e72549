//! Form contexts and viewer roles

use std::fmt;
use std::str::FromStr;

/// Entity family a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormContext {
    /// User profile forms
    #[default]
    Users,
    /// Cohort (class/center) forms
    Cohorts,
}

impl FormContext {
    /// Lowercase name used in storage paths
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Cohorts => "cohorts",
        }
    }
}

impl fmt::Display for FormContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" | "user" => Ok(Self::Users),
            "cohorts" | "cohort" => Ok(Self::Cohorts),
            other => Err(format!("Unknown form context: '{other}'")),
        }
    }
}

/// Which variant of a context's form to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormContextType {
    /// Teacher (facilitator) profile
    #[default]
    Teacher,
    /// Team leader profile
    TeamLeader,
    /// Learner profile
    Learner,
}

impl FormContextType {
    /// Lowercase name used in storage paths
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::TeamLeader => "team_leader",
            Self::Learner => "learner",
        }
    }
}

impl fmt::Display for FormContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "teacher" | "facilitator" => Ok(Self::Teacher),
            "team leader" => Ok(Self::TeamLeader),
            "learner" | "student" => Ok(Self::Learner),
            other => Err(format!("Unknown form context type: '{other}'")),
        }
    }
}

/// Role of the signed-in viewer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Team leader
    TeamLeader,
    /// Teacher
    Teacher,
    /// Any other role, kept verbatim
    Other(String),
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalise(s).as_str() {
            "team leader" => Self::TeamLeader,
            "teacher" => Self::Teacher,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

/// Lowercase with `_`/`-` treated as spaces
fn normalise(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', '-'], " ")
}
