//! # State Store
//!
//! The single source of truth for the current session, child accounts, tasks
//! and wallet balances.
//!
//! All changes go through [`transition`], a pure function from the current
//! state and an [`Action`] to the next state. [`Store`] wraps the state with an
//! injected [`StateStorage`] so every committed change is mirrored to storage
//! once hydration has finished.
//!
//! The reducer accepts unvalidated amounts for the wallet actions. Positivity
//! and affordability checks live in front of it, in
//! [`crate::domain::validation`], and are applied by [`Store::dispatch_checked`].

use serde::{Deserialize, Serialize};
use shared::{Child, PersistedState, StoreSnapshot, Task, User};
use tracing::{debug, info, warn};

use crate::domain::validation::{ActionValidator, ValidationError};
use crate::storage::StateStorage;

/// Aggregate state held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub current_user: Option<User>,
    /// Insertion order
    pub children: Vec<Child>,
    /// Insertion order
    pub tasks: Vec<Task>,
    /// True only while the persisted snapshot is being hydrated
    pub is_loading: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            current_user: None,
            children: Vec::new(),
            tasks: Vec::new(),
            is_loading: true,
        }
    }
}

impl StoreState {
    pub fn find_child(&self, child_id: &str) -> Option<&Child> {
        self.children.iter().find(|child| child.id == child_id)
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn tasks_for_child<'a>(&'a self, child_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |task| task.child_id == child_id)
    }

    /// Projection written to storage
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            current_user: self.current_user.clone(),
            children: self.children.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

/// Every change the store understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    /// `None` logs out
    #[serde(rename = "SET_USER")]
    SetUser(Option<User>),
    #[serde(rename = "ADD_CHILD")]
    AddChild(Child),
    #[serde(rename = "UPDATE_CHILD")]
    UpdateChild(Child),
    #[serde(rename = "ADD_TASK")]
    AddTask(Task),
    #[serde(rename = "ADD_MULTIPLE_TASKS")]
    AddMultipleTasks(Vec<Task>),
    #[serde(rename = "COMPLETE_TASK")]
    CompleteTask(String),
    #[serde(rename = "SET_LOADING")]
    SetLoading(bool),
    #[serde(rename = "LOAD_DATA")]
    LoadData(StoreSnapshot),
    /// Parent adds to a child's pocket money
    #[serde(rename = "TOPUP_INTERNAL_WALLET", rename_all = "camelCase")]
    TopUpInternalWallet { child_id: String, amount: i64 },
    /// Parent adds to a child's main balance
    #[serde(rename = "PARENT_DEPOSIT_TO_CHILD_MAIN_BALANCE", rename_all = "camelCase")]
    ParentDepositToMainBalance { child_id: String, amount: i64 },
    /// Parent takes money out of a child's main balance
    #[serde(rename = "WITHDRAW_FROM_CHILD_BALANCE", rename_all = "camelCase")]
    WithdrawFromChildBalance { child_id: String, amount: i64 },
    /// Child moves pocket money into the main balance
    #[serde(rename = "DEPOSIT_TO_MAIN_WALLET", rename_all = "camelCase")]
    DepositToMainWallet { child_id: String, amount: i64 },
    #[serde(rename = "PURCHASE_REWARD", rename_all = "camelCase")]
    PurchaseReward {
        child_id: String,
        cost: i64,
        #[serde(default)]
        reward_name: String,
    },
}

impl Action {
    /// Wire name of the action, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetUser(_) => "SET_USER",
            Action::AddChild(_) => "ADD_CHILD",
            Action::UpdateChild(_) => "UPDATE_CHILD",
            Action::AddTask(_) => "ADD_TASK",
            Action::AddMultipleTasks(_) => "ADD_MULTIPLE_TASKS",
            Action::CompleteTask(_) => "COMPLETE_TASK",
            Action::SetLoading(_) => "SET_LOADING",
            Action::LoadData(_) => "LOAD_DATA",
            Action::TopUpInternalWallet { .. } => "TOPUP_INTERNAL_WALLET",
            Action::ParentDepositToMainBalance { .. } => "PARENT_DEPOSIT_TO_CHILD_MAIN_BALANCE",
            Action::WithdrawFromChildBalance { .. } => "WITHDRAW_FROM_CHILD_BALANCE",
            Action::DepositToMainWallet { .. } => "DEPOSIT_TO_MAIN_WALLET",
            Action::PurchaseReward { .. } => "PURCHASE_REWARD",
        }
    }
}

/// Apply a signed amount to a wallet, clamping at zero and saturating on overflow
fn apply_delta(balance: u64, delta: i64) -> u64 {
    balance.saturating_add_signed(delta)
}

/// In-place update of every child with `child_id`. Order is preserved and a
/// missing id leaves the list untouched.
fn update_child_by_id(children: &mut [Child], child_id: &str, update: impl FnMut(&mut Child)) {
    children.iter_mut().filter(|child| child.id == child_id).for_each(update);
}

/// Compute the next state. Pure and total: every action either fully applies
/// or leaves the state as it was.
pub fn transition(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::SetUser(user) => {
            state.current_user = user;
        }
        Action::AddChild(child) => {
            state.children.push(child);
        }
        Action::UpdateChild(updated) => {
            state
                .children
                .iter_mut()
                .filter(|child| child.id == updated.id)
                .for_each(|child| *child = updated.clone());
        }
        Action::AddTask(task) => {
            state.tasks.push(task);
        }
        Action::AddMultipleTasks(tasks) => {
            state.tasks.extend(tasks);
        }
        Action::CompleteTask(task_id) => {
            // Sets, never toggles: completing twice is a no-op
            state
                .tasks
                .iter_mut()
                .filter(|task| task.id == task_id)
                .for_each(|task| task.completed = true);
        }
        Action::SetLoading(is_loading) => {
            state.is_loading = is_loading;
        }
        Action::LoadData(snapshot) => {
            state.current_user = snapshot.current_user;
            state.tasks = snapshot.tasks.unwrap_or_default();
            state.children = snapshot
                .children
                .unwrap_or_default()
                .into_iter()
                .map(|child| child.into_child())
                .collect();
        }
        Action::TopUpInternalWallet { child_id, amount } => {
            update_child_by_id(&mut state.children, &child_id, |child| {
                child.internal_wallet_balance = apply_delta(child.internal_wallet_balance, amount);
            });
        }
        Action::ParentDepositToMainBalance { child_id, amount } => {
            update_child_by_id(&mut state.children, &child_id, |child| {
                child.balance = apply_delta(child.balance, amount);
            });
        }
        Action::WithdrawFromChildBalance { child_id, amount } => {
            update_child_by_id(&mut state.children, &child_id, |child| {
                child.balance = apply_delta(child.balance, amount.saturating_neg());
            });
        }
        Action::DepositToMainWallet { child_id, amount } => {
            update_child_by_id(&mut state.children, &child_id, |child| {
                // Capped by the pocket money available; a negative amount moves
                // money back into the pocket
                let available = i64::try_from(child.internal_wallet_balance).unwrap_or(i64::MAX);
                let moved = amount.min(available);
                child.balance = apply_delta(child.balance, moved);
                child.internal_wallet_balance = apply_delta(child.internal_wallet_balance, moved.saturating_neg());
            });
        }
        Action::PurchaseReward { child_id, cost, .. } => {
            update_child_by_id(&mut state.children, &child_id, |child| {
                child.balance = apply_delta(child.balance, cost.saturating_neg());
            });
        }
    }
    state
}

/// Stateful wrapper around [`transition`] that mirrors every committed change
/// to the injected storage
pub struct Store {
    state: StoreState,
    storage: Box<dyn StateStorage>,
    validator: ActionValidator,
}

impl Store {
    /// Create a store in its loading state. Call [`Store::hydrate`] before use.
    pub fn new(storage: Box<dyn StateStorage>) -> Self {
        Self {
            state: StoreState::default(),
            storage,
            validator: ActionValidator::new(),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Load the persisted snapshot into the store and leave the loading window.
    /// A missing or unreadable snapshot yields an empty state.
    pub fn hydrate(&mut self) -> &StoreState {
        let snapshot = match self.storage.load() {
            Ok(Some(snapshot)) => {
                info!("Loaded saved data");
                snapshot
            }
            Ok(None) => {
                info!("No saved data found, starting empty");
                StoreSnapshot::empty()
            }
            Err(e) => {
                warn!("Failed to load saved data: {:#}. Starting empty.", e);
                StoreSnapshot::empty()
            }
        };

        self.dispatch(Action::LoadData(snapshot));
        self.dispatch(Action::SetLoading(false));

        info!(
            "Store hydrated with {} children and {} tasks",
            self.state.children.len(),
            self.state.tasks.len()
        );
        &self.state
    }

    /// Apply an action without validation and persist the result
    pub fn dispatch(&mut self, action: Action) -> &StoreState {
        debug!("Dispatching {}", action.kind());

        let current = std::mem::take(&mut self.state);
        self.state = transition(current, action);

        if !self.state.is_loading {
            self.persist();
        }
        &self.state
    }

    /// Validate an action against the current state before applying it
    pub fn dispatch_checked(&mut self, action: Action) -> Result<&StoreState, ValidationError> {
        if let Err(e) = self.validator.validate(&self.state, &action) {
            warn!("Rejected {}: {}", action.kind(), e);
            return Err(e);
        }
        Ok(self.dispatch(action))
    }

    /// Save the serializable projection. Failures are logged, never retried;
    /// the in-memory state stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state.to_persisted()) {
            warn!("Failed to save data: {:#}", e);
        }
    }
}
