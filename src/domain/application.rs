//! Console application model

use super::ids::AppId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application type as reported by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    /// Basic chatbot
    Chat,
    /// Text generator
    Completion,
    /// Agent
    AgentChat,
    /// Chatflow
    AdvancedChat,
    /// Workflow
    Workflow,
    /// Any mode this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl AppMode {
    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Chat => "chat",
            AppMode::Completion => "completion",
            AppMode::AgentChat => "agent-chat",
            AppMode::AdvancedChat => "advanced-chat",
            AppMode::Workflow => "workflow",
            AppMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "chat" => Ok(AppMode::Chat),
            "completion" => Ok(AppMode::Completion),
            "agent-chat" => Ok(AppMode::AgentChat),
            "advanced-chat" => Ok(AppMode::AdvancedChat),
            "workflow" => Ok(AppMode::Workflow),
            other => Err(format!(
                "Invalid app mode '{other}'. Must be one of: chat, completion, agent-chat, advanced-chat, workflow"
            )),
        }
    }
}

/// One application listed by the console
///
/// Identity is [`Application::id`]; the remaining fields are informational and
/// only used for filtering and naming output files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application identifier
    pub id: AppId,

    /// Display name
    pub name: String,

    /// Application type
    pub mode: AppMode,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Icon (emoji or image reference)
    #[serde(default)]
    pub icon: Option<String>,

    /// Icon type ("emoji" or "image")
    #[serde(default)]
    pub icon_type: Option<String>,

    /// Icon background colour
    #[serde(default)]
    pub icon_background: Option<String>,
}

impl Application {
    /// Create an application with no description or icon metadata
    pub fn new(id: AppId, name: impl Into<String>, mode: AppMode) -> Self {
        Self {
            id,
            name: name.into(),
            mode,
            description: None,
            icon: None,
            icon_type: None,
            icon_background: None,
        }
    }
}
