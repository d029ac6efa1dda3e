//! `core-<pid>.json`: per-task core state

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::image::CriuImage;

/// `task_state` value of a live task
pub const TASK_ALIVE: u32 = 1;

/// Decoded `core` image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreImage {
    pub magic: String,
    pub entries: Vec<CoreEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc: Option<TaskCore>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCore {
    pub task_state: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CriuImage for CoreImage {
    const MAGIC: &'static str = "CORE";

    fn magic(&self) -> &str {
        &self.magic
    }
}

impl CoreImage {
    /// Set every task's state to [`TASK_ALIVE`]; returns how many changed
    pub fn mark_alive(&mut self) -> usize {
        let mut updated = 0;
        for tc in self.entries.iter_mut().filter_map(|entry| entry.tc.as_mut()) {
            if tc.task_state != TASK_ALIVE {
                info!("task_state {} -> {TASK_ALIVE}", tc.task_state);
                tc.task_state = TASK_ALIVE;
                updated += 1;
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_alive_counts_changes() {
        let json = r#"{
            "magic": "CORE",
            "entries": [
                { "mtype": "X86_64", "tc": { "task_state": 3, "exit_code": 0, "comm": "app" } },
                { "mtype": "X86_64", "tc": { "task_state": 1, "comm": "worker" } },
                { "mtype": "X86_64" }
            ]
        }"#;
        let mut image = CoreImage::from_json(json).unwrap();

        assert_eq!(image.mark_alive(), 1);
        assert_eq!(image.entries[0].tc.as_ref().unwrap().task_state, TASK_ALIVE);
        assert_eq!(image.mark_alive(), 0);

        let out: Value = serde_json::from_str(&image.to_json().unwrap()).unwrap();
        assert_eq!(out["entries"][0]["tc"]["comm"], "app");
        assert_eq!(out["entries"][0]["mtype"], "X86_64");
    }
}
