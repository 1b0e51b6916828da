//! Tool names, argument records and the advertised input schemas.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The four operations the coordinator exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Configure,
    Sync,
    Status,
    Log,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Configure, Tool::Sync, Tool::Status, Tool::Log];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Configure => "backup_configure",
            Tool::Sync => "backup_sync",
            Tool::Status => "backup_status",
            Tool::Log => "backup_log",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Tool::Configure => "Configure the backup-sync plugin with a GitHub repository",
            Tool::Sync => "Run the backup-sync script to sync Claude config to GitHub",
            Tool::Status => "Check the current backup-sync status and pending changes",
            Tool::Log => "Read the backup-sync log file",
        }
    }

    fn input_schema(self) -> Value {
        match self {
            Tool::Configure => json!({
                "type": "object",
                "properties": {
                    "repo": {
                        "type": "string",
                        "description": "GitHub repository in owner/repo format"
                    },
                    "branch": {
                        "type": "string",
                        "description": "Branch to sync to (default: main)"
                    },
                    "gh_host": {
                        "type": "string",
                        "description": "GitHub host (default: github.com)"
                    }
                },
                "required": ["repo"]
            }),
            Tool::Sync | Tool::Status => json!({
                "type": "object",
                "properties": {}
            }),
            Tool::Log => json!({
                "type": "object",
                "properties": {
                    "lines": {
                        "type": "number",
                        "description": "Number of lines to read from the end of the log (default: 20)"
                    }
                }
            }),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry of a `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    Tool::ALL
        .into_iter()
        .map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

/// Arguments of `backup_log`. Any JSON number is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub lines: Option<f64>,
}

impl LogRequest {
    /// Requested line count; missing, non-positive or sub-1 values mean the
    /// default. Fractions are truncated.
    pub fn line_count(&self, default: usize) -> usize {
        match self.lines {
            Some(n) if n.is_finite() && n >= 1.0 => n as usize,
            _ => default,
        }
    }
}
