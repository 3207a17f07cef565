use chrono::Utc;
use shared::{
    CardDesign, Child, CompleteTaskResponse, CreateChildRequest, CreateTaskRequest,
    GameRewardResponse, PurchaseRewardResponse, SavingsGoalProgressResponse, Task, UpdateCardDesignRequest,
    User, UserType,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ai_tasks::generate_structured_tasks;
use crate::domain::prompts::{chat_prompt, offline_welcome, welcome_prompt};
use crate::domain::rewards::{find_reward, GameReward};
use crate::domain::store::{Action, Store, StoreState};
use crate::domain::validation::ValidationError;
use crate::io::gemini::{TextGenerator, SERVICE_ERROR_MESSAGE};

/// Id given to the parent account; there is a single hardcoded parent login
pub const DEFAULT_PARENT_ID: &str = "parent-1";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Child not found: {0}")]
    ChildNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Reward not found: {0}")]
    RewardNotFound(String),
    #[error("{0}")]
    InvalidRequest(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service for everything parents and children do in the app.
///
/// Each operation checks its inputs, then dispatches ordinary store actions.
/// The store lock is held only for the synchronous part of an operation, never
/// across a call to the AI collaborator.
#[derive(Clone)]
pub struct FamilyService {
    store: Arc<Mutex<Store>>,
    generator: Arc<dyn TextGenerator>,
}

impl FamilyService {
    pub fn new(store: Store, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            generator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Transitions replace the state wholesale, so a poisoned lock still
        // guards a consistent state
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_millis() -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }

    /// Id for the first millisecond at or after now that no record uses yet
    fn unused_id(generate: fn(u64) -> String, taken: impl Fn(&str) -> bool) -> String {
        let now = Self::now_millis();
        (now..).map(generate).find(|id| !taken(id)).unwrap_or_else(|| generate(now))
    }

    pub fn state(&self) -> StoreState {
        self.lock().state().clone()
    }

    /// Apply a raw action without validation
    pub fn dispatch(&self, action: Action) -> StoreState {
        self.lock().dispatch(action).clone()
    }

    /// Apply a raw action after validating it
    pub fn dispatch_checked(&self, action: Action) -> ServiceResult<StoreState> {
        Ok(self.lock().dispatch_checked(action)?.clone())
    }

    /// Log in (or sign up) as the parent
    pub fn login_parent(&self, name: Option<&str>, email: &str, password: &str) -> ServiceResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidRequest("Email and password are required".to_string()));
        }

        let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Parent");
        let user = User {
            id: DEFAULT_PARENT_ID.to_string(),
            name: name.to_string(),
            email: email.trim().to_string(),
            user_type: UserType::Parent,
            parent_id: None,
            avatar: None,
            age: None,
        };

        self.lock().dispatch(Action::SetUser(Some(user.clone())));
        info!("Parent logged in: {}", user.name);
        Ok(user)
    }

    /// Start a session as one of the children
    pub fn login_child(&self, child_id: &str) -> ServiceResult<User> {
        let mut store = self.lock();
        let child = store
            .state()
            .find_child(child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))?;

        let user = User {
            id: child.id,
            name: child.name,
            email: String::new(),
            user_type: UserType::Child,
            parent_id: Some(child.parent_id),
            avatar: Some(child.avatar),
            age: Some(child.age),
        };

        store.dispatch(Action::SetUser(Some(user.clone())));
        info!("Child logged in: {}", user.name);
        Ok(user)
    }

    pub fn logout(&self) {
        self.lock().dispatch(Action::SetUser(None));
        info!("Logged out");
    }

    pub fn list_children(&self) -> Vec<Child> {
        self.lock().state().children.clone()
    }

    pub fn get_child(&self, child_id: &str) -> ServiceResult<Child> {
        self.lock()
            .state()
            .find_child(child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))
    }

    /// Progress towards the child's savings goal; `None` when no goal is set
    pub fn savings_goal_progress(&self, child_id: &str) -> ServiceResult<Option<SavingsGoalProgressResponse>> {
        let child = self.get_child(child_id)?;
        Ok(child.savings_goal.as_ref().map(SavingsGoalProgressResponse::from))
    }

    /// Create a child account with empty wallets
    pub fn create_child(&self, request: CreateChildRequest) -> ServiceResult<Child> {
        info!("Creating child: name={}, age={}", request.name, request.age);

        let mut store = self.lock();
        let parent_id = store
            .state()
            .current_user
            .as_ref()
            .map(|user| user.id.clone())
            .unwrap_or_else(|| DEFAULT_PARENT_ID.to_string());

        let name = request.name.trim().to_string();
        let child = Child {
            id: Self::unused_id(Child::generate_id, |id| store.state().find_child(id).is_some()),
            name: name.clone(),
            age: request.age,
            avatar: request.avatar.clone(),
            balance: 0,
            internal_wallet_balance: 0,
            parent_id,
            card_design: CardDesign {
                emoji: request.avatar,
                background: request.card_background,
                name,
            },
            savings_goal: None,
        };

        store.dispatch_checked(Action::AddChild(child.clone()))?;
        info!("Created child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    /// Replace a child's card design, keeping the rest of the record
    pub fn update_card_design(&self, child_id: &str, request: UpdateCardDesignRequest) -> ServiceResult<Child> {
        let mut store = self.lock();
        let mut child = store
            .state()
            .find_child(child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))?;

        let card_name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| child.name.clone());
        child.card_design = CardDesign {
            emoji: request.emoji,
            background: request.background,
            name: card_name,
        };

        store.dispatch_checked(Action::UpdateChild(child.clone()))?;
        info!("Updated card design for child {}", child.id);
        Ok(child)
    }

    pub fn create_task(&self, request: CreateTaskRequest) -> ServiceResult<Task> {
        let mut store = self.lock();
        let task = Task {
            id: Self::unused_id(Task::generate_id, |id| store.state().find_task(id).is_some()),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            reward: request.reward,
            child_id: request.child_id,
            completed: false,
            created_at: Utc::now(),
        };

        store.dispatch_checked(Action::AddTask(task.clone()))?;
        info!("Task created: {} for child {} (Rs. {})", task.title, task.child_id, task.reward);
        Ok(task)
    }

    /// All tasks in creation order
    pub fn list_tasks(&self) -> Vec<Task> {
        self.lock().state().tasks.clone()
    }

    pub fn tasks_for_child(&self, child_id: &str) -> Vec<Task> {
        self.lock().state().tasks_for_child(child_id).cloned().collect()
    }

    /// Mark a task done and credit its reward to the child's main balance.
    /// The reward is credited only on the first completion.
    pub fn complete_task(&self, task_id: &str) -> ServiceResult<CompleteTaskResponse> {
        let mut store = self.lock();
        let task = store
            .state()
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ServiceError::TaskNotFound(task_id.to_string()))?;
        let mut child = store
            .state()
            .find_child(&task.child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(task.child_id.clone()))?;

        if task.completed {
            warn!("Task {} was already completed; no reward credited", task.id);
            return Ok(CompleteTaskResponse { task, reward_credited: 0, child });
        }

        store.dispatch(Action::CompleteTask(task.id.clone()));
        child.balance = child.balance.saturating_add(task.reward);
        store.dispatch(Action::UpdateChild(child.clone()));

        let task = store.state().find_task(task_id).cloned().unwrap_or(task);
        info!("Task {} completed, Rs. {} credited to {}", task.id, task.reward, child.name);
        Ok(CompleteTaskResponse { reward_credited: task.reward, task, child })
    }

    /// Dispatch a validated wallet action and return the updated child
    fn wallet_action(&self, child_id: &str, action: Action) -> ServiceResult<Child> {
        let mut store = self.lock();
        if store.state().find_child(child_id).is_none() {
            return Err(ServiceError::ChildNotFound(child_id.to_string()));
        }

        let kind = action.kind();
        let state = store.dispatch_checked(action)?;
        let child = state
            .find_child(child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))?;

        info!(
            "{} for {}: balance Rs. {}, pocket money Rs. {}",
            kind, child.name, child.balance, child.internal_wallet_balance
        );
        Ok(child)
    }

    /// Parent adds to a child's pocket money
    pub fn top_up_pocket_money(&self, child_id: &str, amount: i64) -> ServiceResult<Child> {
        self.wallet_action(
            child_id,
            Action::TopUpInternalWallet { child_id: child_id.to_string(), amount },
        )
    }

    /// Parent adds to a child's main balance
    pub fn deposit_to_main_balance(&self, child_id: &str, amount: i64) -> ServiceResult<Child> {
        self.wallet_action(
            child_id,
            Action::ParentDepositToMainBalance { child_id: child_id.to_string(), amount },
        )
    }

    /// Parent takes money out of a child's main balance
    pub fn withdraw_from_main_balance(&self, child_id: &str, amount: i64) -> ServiceResult<Child> {
        self.wallet_action(
            child_id,
            Action::WithdrawFromChildBalance { child_id: child_id.to_string(), amount },
        )
    }

    /// Child moves pocket money into their main balance
    pub fn move_pocket_money_to_main(&self, child_id: &str, amount: i64) -> ServiceResult<Child> {
        self.wallet_action(
            child_id,
            Action::DepositToMainWallet { child_id: child_id.to_string(), amount },
        )
    }

    /// Buy an item from the rewards store
    pub fn purchase_reward(&self, child_id: &str, reward_id: &str) -> ServiceResult<PurchaseRewardResponse> {
        let reward = find_reward(reward_id).ok_or_else(|| ServiceError::RewardNotFound(reward_id.to_string()))?;
        let cost = i64::try_from(reward.price).unwrap_or(i64::MAX);

        let child = self.wallet_action(
            child_id,
            Action::PurchaseReward {
                child_id: child_id.to_string(),
                cost,
                reward_name: reward.name.clone(),
            },
        )?;

        let success_message = format!("You got {}! Rs. {} has been deducted.", reward.name, reward.price);
        Ok(PurchaseRewardResponse { reward, child, success_message })
    }

    /// Credit the payout for a finished Budget Battle round
    pub fn record_game_result(&self, child_id: &str, correct_answers: u32) -> ServiceResult<GameRewardResponse> {
        let payout = GameReward::budget_battle(correct_answers);

        let mut store = self.lock();
        let mut child = store
            .state()
            .find_child(child_id)
            .cloned()
            .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))?;

        child.balance = child.balance.saturating_add(payout.money);
        store.dispatch(Action::UpdateChild(child.clone()));

        info!("{} earned Rs. {} and {} XP in Budget Battle", child.name, payout.money, payout.xp);
        Ok(GameRewardResponse { money_earned: payout.money, xp_earned: payout.xp, child })
    }

    /// Pass a prompt straight to the collaborator
    pub async fn generate_text(&self, prompt: &str) -> ServiceResult<String> {
        if prompt.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Prompt cannot be empty".to_string()));
        }
        Ok(self.generator.generate_text(prompt).await)
    }

    /// Ask the collaborator for tasks for a child and assign them.
    /// Returns the tasks that were added, possibly none.
    pub async fn generate_ai_tasks(&self, child_id: &str) -> ServiceResult<Vec<Task>> {
        let child = self.get_child(child_id)?;
        info!("Generating AI tasks for {}", child.name);

        let suggestions = generate_structured_tasks(self.generator.as_ref(), &child.name, child.age).await;

        let now = Utc::now();
        let millis = now.timestamp_millis().max(0) as u64;
        let tasks: Vec<Task> = suggestions
            .into_iter()
            .map(|suggestion| {
                let suffix = Uuid::new_v4().simple().to_string();
                let id = Task::generate_ai_id(millis, &suffix[..7]);
                suggestion.into_task(&child.id, id, now)
            })
            .collect();

        if tasks.is_empty() {
            warn!("No AI tasks generated for {}", child.name);
            return Ok(tasks);
        }

        self.lock().dispatch(Action::AddMultipleTasks(tasks.clone()));
        info!("{} AI tasks added for {}", tasks.len(), child.name);
        Ok(tasks)
    }

    /// Personal greeting for a child's dashboard
    pub async fn welcome_message(&self, child_id: &str) -> ServiceResult<String> {
        let (child, completed) = {
            let store = self.lock();
            let child = store
                .state()
                .find_child(child_id)
                .cloned()
                .ok_or_else(|| ServiceError::ChildNotFound(child_id.to_string()))?;
            let completed = store.state().tasks_for_child(child_id).filter(|t| t.completed).count();
            (child, completed)
        };

        let reply = self.generator.generate_text(&welcome_prompt(&child, completed)).await;
        if reply.trim().is_empty() || reply == SERVICE_ERROR_MESSAGE {
            return Ok(offline_welcome(&child));
        }
        Ok(reply)
    }

    /// One FinBuddy chat turn
    pub async fn chat(&self, child_id: &str, message: &str) -> ServiceResult<String> {
        if message.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Message cannot be empty".to_string()));
        }
        let child = self.get_child(child_id)?;
        Ok(self.generator.generate_text(&chat_prompt(&child, message)).await)
    }
}
