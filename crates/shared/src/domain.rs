use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model identifier used for every role until the operator picks another one.
pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Researcher,
    Coder,
    Manager,
    Reviewer,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Researcher,
        AgentRole::Coder,
        AgentRole::Reviewer,
        AgentRole::Manager,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::Researcher => "researcher",
            AgentRole::Coder => "coder",
            AgentRole::Manager => "manager",
            AgentRole::Reviewer => "reviewer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentRole::Researcher => "Researcher",
            AgentRole::Coder => "Coder",
            AgentRole::Manager => "Manager",
            AgentRole::Reviewer => "Reviewer",
        }
    }

    pub fn duty(self) -> &'static str {
        match self {
            AgentRole::Researcher => "Information Gathering",
            AgentRole::Coder => "Analysis & Computation",
            AgentRole::Manager => "Team Coordination",
            AgentRole::Reviewer => "Quality Assurance",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AgentRole::Researcher => "🔍",
            AgentRole::Coder => "💻",
            AgentRole::Manager => "🎯",
            AgentRole::Reviewer => "🔎",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for AgentRole {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "researcher" => Ok(AgentRole::Researcher),
            "coder" => Ok(AgentRole::Coder),
            "manager" => Ok(AgentRole::Manager),
            "reviewer" => Ok(AgentRole::Reviewer),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

/// Kind of an activity-log entry. The backend may send kinds this side does
/// not know about; those are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    System,
    Progress,
    Success,
    Error,
    Researcher,
    Coder,
    Manager,
    Reviewer,
    Other(String),
}

impl ActivityKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::System => "system",
            ActivityKind::Progress => "progress",
            ActivityKind::Success => "success",
            ActivityKind::Error => "error",
            ActivityKind::Researcher => "researcher",
            ActivityKind::Coder => "coder",
            ActivityKind::Manager => "manager",
            ActivityKind::Reviewer => "reviewer",
            ActivityKind::Other(kind) => kind,
        }
    }
}

impl From<String> for ActivityKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "system" => ActivityKind::System,
            "progress" => ActivityKind::Progress,
            "success" => ActivityKind::Success,
            "error" => ActivityKind::Error,
            "researcher" => ActivityKind::Researcher,
            "coder" => ActivityKind::Coder,
            "manager" => ActivityKind::Manager,
            "reviewer" => ActivityKind::Reviewer,
            _ => ActivityKind::Other(value),
        }
    }
}

impl From<ActivityKind> for String {
    fn from(value: ActivityKind) -> Self {
        match value {
            ActivityKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_activity_kinds_survive_deserialization() {
        let kind: ActivityKind = serde_json::from_str("\"planner\"").expect("kind");
        assert_eq!(kind, ActivityKind::Other("planner".to_string()));
        assert_eq!(serde_json::to_string(&kind).expect("json"), "\"planner\"");
    }

    #[test]
    fn known_activity_kinds_map_to_variants() {
        let kind: ActivityKind = serde_json::from_str("\"researcher\"").expect("kind");
        assert_eq!(kind, ActivityKind::Researcher);
        assert_eq!(kind.to_string(), "researcher");
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Reviewer".parse::<AgentRole>(), Ok(AgentRole::Reviewer));
        assert!("planner".parse::<AgentRole>().is_err());
    }
}
