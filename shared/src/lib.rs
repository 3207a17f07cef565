use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emoji used on a card when a child has no avatar of their own
pub const DEFAULT_CARD_EMOJI: &str = "👦";

/// Background class applied to cards that were saved without a design
pub const DEFAULT_CARD_BACKGROUND: &str = "bg-gradient-to-br from-blue-400 to-purple-500";

/// Card name used when a persisted child record has no name
pub const DEFAULT_CARD_NAME: &str = "Child Name";

/// Kind of account behind a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Parent,
    Child,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Parent => write!(f, "parent"),
            UserType::Child => write!(f, "child"),
        }
    }
}

/// Whoever is currently logged in. Always replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Empty for child sessions
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// Owning parent, set for child sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// Purely presentational card styling for a child's wallet card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDesign {
    pub emoji: String,
    pub background: String,
    pub name: String,
}

impl CardDesign {
    /// Design derived for children persisted before card customization existed
    pub fn derived_default(avatar: &str, child_name: &str) -> Self {
        let emoji = if avatar.is_empty() { DEFAULT_CARD_EMOJI } else { avatar };
        let name = if child_name.is_empty() { DEFAULT_CARD_NAME } else { child_name };
        Self {
            emoji: emoji.to_string(),
            background: DEFAULT_CARD_BACKGROUND.to_string(),
            name: name.to_string(),
        }
    }
}

/// What a child is saving towards. Read-only in the modeled action set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub title: String,
    pub target: u64,
    pub current: u64,
}

impl SavingsGoal {
    /// Progress towards the target as a whole percentage, capped at 100
    pub fn progress_percent(&self) -> u8 {
        if self.target == 0 {
            return 100;
        }
        let percent = self.current.saturating_mul(100) / self.target;
        percent.min(100) as u8
    }

    pub fn is_reached(&self) -> bool {
        self.current >= self.target
    }

    /// Rupees still missing, zero once reached
    pub fn remaining(&self) -> u64 {
        self.target.saturating_sub(self.current)
    }
}

/// A managed sub-account owned by a parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    /// Expected 8 to 18, not enforced
    pub age: u32,
    pub avatar: String,
    /// Main wallet, in Rupees
    pub balance: u64,
    /// Pocket money wallet, in Rupees
    pub internal_wallet_balance: u64,
    pub parent_id: String,
    pub card_design: CardDesign,
    pub savings_goal: Option<SavingsGoal>,
}

impl Child {
    /// Generate a child ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("child-{}", epoch_millis)
    }
}

/// A unit of assignable work that pays a reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Reward in Pakistani Rupees
    pub reward: u64,
    pub child_id: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Generate an ID for a manually created task
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("task-{}", epoch_millis)
    }

    /// Generate an ID for an AI generated task. The suffix keeps IDs unique
    /// when a whole batch is created within the same millisecond.
    pub fn generate_ai_id(epoch_millis: u64, suffix: &str) -> String {
        format!("task-ai-{}-{}", epoch_millis, suffix)
    }

    pub fn is_ai_generated(&self) -> bool {
        self.id.starts_with("task-ai-")
    }
}

/// Child record as found in storage. Older snapshots may lack any of the
/// optional fields; `into_child` fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedChild {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub balance: Option<u64>,
    #[serde(default)]
    pub internal_wallet_balance: Option<u64>,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub card_design: Option<CardDesign>,
    #[serde(default)]
    pub savings_goal: Option<SavingsGoal>,
}

impl PersistedChild {
    /// Apply the hydration defaults
    pub fn into_child(self) -> Child {
        let card_design = self
            .card_design
            .unwrap_or_else(|| CardDesign::derived_default(&self.avatar, &self.name));

        Child {
            id: self.id,
            name: self.name,
            age: self.age,
            avatar: self.avatar,
            balance: self.balance.unwrap_or(0),
            internal_wallet_balance: self.internal_wallet_balance.unwrap_or(0),
            parent_id: self.parent_id,
            card_design,
            savings_goal: self.savings_goal,
        }
    }
}

impl From<Child> for PersistedChild {
    fn from(child: Child) -> Self {
        Self {
            id: child.id,
            name: child.name,
            age: child.age,
            avatar: child.avatar,
            balance: Some(child.balance),
            internal_wallet_balance: Some(child.internal_wallet_balance),
            parent_id: child.parent_id,
            card_design: Some(child.card_design),
            savings_goal: child.savings_goal,
        }
    }
}

/// Partial state read back from storage. Every key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub current_user: Option<User>,
    #[serde(default)]
    pub children: Option<Vec<PersistedChild>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl StoreSnapshot {
    /// Snapshot used when nothing usable was stored
    pub fn empty() -> Self {
        Self {
            current_user: None,
            children: Some(Vec::new()),
            tasks: Some(Vec::new()),
        }
    }
}

/// Serializable projection of the store written after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub current_user: Option<User>,
    pub children: Vec<Child>,
    pub tasks: Vec<Task>,
}

impl From<PersistedState> for StoreSnapshot {
    fn from(state: PersistedState) -> Self {
        Self {
            current_user: state.current_user,
            children: Some(state.children.into_iter().map(PersistedChild::from).collect()),
            tasks: Some(state.tasks),
        }
    }
}

/// Request for logging in (or signing up) as the parent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentLoginRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Request for starting a child session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildLoginRequest {
    pub child_id: String,
}

/// Request for creating a new child account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateChildRequest {
    pub name: String,
    pub age: u32,
    pub avatar: String,
    pub card_background: String,
}

/// Request for changing how a child's card looks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCardDesignRequest {
    pub emoji: String,
    pub background: String,
    pub name: Option<String>,
}

/// Request for assigning a task by hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub reward: u64,
    pub child_id: String,
}

/// Amount for any of the wallet operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletAmountRequest {
    pub amount: i64,
}

/// Result of a budget battle round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameResultRequest {
    pub correct_answers: u32,
}

/// Where a child stands with their savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoalProgressResponse {
    pub title: String,
    pub target: u64,
    pub current: u64,
    pub progress_percent: u8,
    pub remaining: u64,
    pub reached: bool,
}

impl From<&SavingsGoal> for SavingsGoalProgressResponse {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            title: goal.title.clone(),
            target: goal.target,
            current: goal.current,
            progress_percent: goal.progress_percent(),
            remaining: goal.remaining(),
            reached: goal.is_reached(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRewardResponse {
    pub money_earned: u64,
    pub xp_earned: u64,
    pub child: Child,
}

/// Response after a task has been marked done
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteTaskResponse {
    pub task: Task,
    /// Rupees credited by this call; zero when the task was already completed
    pub reward_credited: u64,
    pub child: Child,
}

/// An item children can buy in the rewards store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseRewardResponse {
    pub reward: RewardItem,
    pub child: Child,
    pub success_message: String,
}

/// Free-form prompt for the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateTextRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateTextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskListQuery {
    pub child_id: Option<String>,
}
