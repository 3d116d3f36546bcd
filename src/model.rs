use serde::{Deserialize, Serialize};

/// Editable command state: a base command plus its ordered arguments.
/// Argument order is positional and preserved across every mutation
/// except an explicit removal or indexed replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub base: String,
    pub args: Vec<String>,
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self {
            base: "curl".to_string(),
            args: vec!["-X".to_string(), "GET".to_string()],
        }
    }
}

/// One argument-list mutation. Index-based variants must use an index
/// observed from a current read of the list.
#[derive(Clone, Debug)]
pub enum ArgEdit {
    ReplaceAll(Vec<String>),
    SetAt { index: usize, value: String },
    RemoveAt(usize),
    Append(String),
}

/// Wire payload handed to the executor. Built fresh per dispatch; the
/// last element of `args` is the resolved URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPayload {
    #[serde(rename = "Command")]
    pub command: String,

    #[serde(rename = "Args")]
    pub args: Vec<String>,
}

/// On-disk envelope for one persisted entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredEntry<T> {
    pub version: u32,
    pub value: T,
}
