//! Turning free-form AI replies into tasks.
//!
//! Models rarely answer with bare JSON. [`parse_task_suggestions`] tries the
//! strict reading first and then progressively looser ones, and gives up with
//! an empty list rather than guessing. Rewards are clamped only when a
//! suggestion becomes a [`Task`].

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use shared::Task;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::domain::prompts::task_generation_prompt;
use crate::io::gemini::TextGenerator;

pub const MIN_AI_REWARD: u64 = 10;
pub const MAX_AI_REWARD: u64 = 150;
/// Reward used when the model gave none, or not a number
pub const FALLBACK_AI_REWARD: u64 = 50;
pub const FALLBACK_TITLE: &str = "AI Generated Task";
pub const FALLBACK_DESCRIPTION: &str = "Complete this AI generated task.";

/// A task as suggested by the model, before any defaults are applied
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskSuggestion {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<f64>,
}

impl TaskSuggestion {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            title: text("title"),
            description: text("description"),
            reward: object.get("reward").and_then(Value::as_f64).filter(|r| r.is_finite()),
        })
    }

    /// Reward clamped into the allowed range
    pub fn clamped_reward(&self) -> u64 {
        match self.reward {
            Some(reward) => reward
                .clamp(MIN_AI_REWARD as f64, MAX_AI_REWARD as f64)
                .round() as u64,
            None => FALLBACK_AI_REWARD,
        }
    }

    pub fn into_task(self, child_id: &str, id: String, created_at: DateTime<Utc>) -> Task {
        let reward = self.clamped_reward();
        Task {
            id,
            title: self.title.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            description: self.description.unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            reward,
            child_id: child_id.to_string(),
            completed: false,
            created_at,
        }
    }
}

fn fenced_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid regex"))
}

fn flat_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{}]+\}").expect("valid regex"))
}

fn suggestions_from_array(value: &Value) -> Option<Vec<TaskSuggestion>> {
    let items = value.as_array()?;
    Some(items.iter().filter_map(TaskSuggestion::from_value).collect())
}

fn parse_array(text: &str) -> Option<Vec<TaskSuggestion>> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .and_then(|value| suggestions_from_array(&value))
}

/// First well-formed JSON array embedded anywhere in `text`
fn first_embedded_array(text: &str) -> Option<Vec<TaskSuggestion>> {
    text.match_indices('[').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => suggestions_from_array(&value),
            _ => None,
        }
    })
}

/// Every flat `{...}` object in `text` that parses on its own
fn loose_objects(text: &str) -> Vec<TaskSuggestion> {
    flat_object_regex()
        .find_iter(text)
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .filter_map(|value| TaskSuggestion::from_value(&value))
        .collect()
}

/// Extract task suggestions from a model reply.
///
/// Tried in order: the whole reply as a JSON array, a fenced code block, the
/// first array embedded in surrounding prose, then any flat objects. Returns
/// an empty list when none of these yield anything.
pub fn parse_task_suggestions(text: &str) -> Vec<TaskSuggestion> {
    if let Some(tasks) = parse_array(text) {
        return tasks;
    }

    if let Some(captures) = fenced_block_regex().captures(text) {
        if let Some(tasks) = captures.get(1).and_then(|m| parse_array(m.as_str())) {
            return tasks;
        }
    }

    if let Some(tasks) = first_embedded_array(text) {
        debug!("Recovered task array from surrounding text");
        return tasks;
    }

    let tasks = loose_objects(text);
    if tasks.is_empty() {
        warn!("Failed to parse AI task response: {}", text);
    }
    tasks
}

/// Ask the collaborator for suggestions for one child
pub async fn generate_structured_tasks(
    generator: &dyn TextGenerator,
    child_name: &str,
    child_age: u32,
) -> Vec<TaskSuggestion> {
    let prompt = task_generation_prompt(child_name, child_age);
    let reply = generator.generate_text(&prompt).await;
    parse_task_suggestions(&reply)
}
