//! Validation that runs in front of the reducer.
//!
//! The reducer deliberately accepts unvalidated amounts. Callers that want the
//! stricter behavior (positive amounts, no overdraft, known ids) run actions
//! through [`ActionValidator`] first, which keeps `transition` pure and total.

use shared::Task;

use crate::domain::store::{Action, StoreState};

/// Reasons an action is refused in strict mode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid amount")]
    AmountNotPositive,
    #[error("Child not found: {0}")]
    UnknownChild(String),
    #[error("Task not found: {0}")]
    UnknownTask(String),
    #[error("A child with id {0} already exists")]
    DuplicateChild(String),
    #[error("Child name cannot be empty")]
    EmptyChildName,
    #[error("Task title cannot be empty")]
    EmptyTaskTitle,
    #[error("Task reward must be greater than 0")]
    RewardNotPositive,
    #[error("Insufficient balance in main wallet: requested Rs. {requested}, available Rs. {available}")]
    InsufficientBalance { requested: u64, available: u64 },
    #[error("Not enough pocket money: requested Rs. {requested}, available Rs. {available}")]
    InsufficientPocketMoney { requested: u64, available: u64 },
}

/// Checks an action against the state it would be applied to
#[derive(Debug, Clone, Default)]
pub struct ActionValidator;

impl ActionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, state: &StoreState, action: &Action) -> Result<(), ValidationError> {
        match action {
            Action::SetUser(_) | Action::SetLoading(_) | Action::LoadData(_) => Ok(()),
            Action::AddChild(child) => {
                if child.name.trim().is_empty() {
                    return Err(ValidationError::EmptyChildName);
                }
                if state.find_child(&child.id).is_some() {
                    return Err(ValidationError::DuplicateChild(child.id.clone()));
                }
                Ok(())
            }
            Action::UpdateChild(child) => {
                self.require_child(state, &child.id)?;
                if child.name.trim().is_empty() {
                    return Err(ValidationError::EmptyChildName);
                }
                Ok(())
            }
            Action::AddTask(task) => self.validate_task(state, task),
            Action::AddMultipleTasks(tasks) => {
                tasks.iter().try_for_each(|task| self.validate_task(state, task))
            }
            Action::CompleteTask(task_id) => match state.find_task(task_id) {
                Some(_) => Ok(()),
                None => Err(ValidationError::UnknownTask(task_id.clone())),
            },
            Action::TopUpInternalWallet { child_id, amount }
            | Action::ParentDepositToMainBalance { child_id, amount } => {
                positive(*amount)?;
                self.require_child(state, child_id)?;
                Ok(())
            }
            Action::WithdrawFromChildBalance { child_id, amount } => {
                let requested = positive(*amount)?;
                let child = self.require_child(state, child_id)?;
                if child.balance < requested {
                    return Err(ValidationError::InsufficientBalance {
                        requested,
                        available: child.balance,
                    });
                }
                Ok(())
            }
            Action::PurchaseReward { child_id, cost, .. } => {
                let requested = positive(*cost)?;
                let child = self.require_child(state, child_id)?;
                if child.balance < requested {
                    return Err(ValidationError::InsufficientBalance {
                        requested,
                        available: child.balance,
                    });
                }
                Ok(())
            }
            Action::DepositToMainWallet { child_id, amount } => {
                let requested = positive(*amount)?;
                let child = self.require_child(state, child_id)?;
                if child.internal_wallet_balance < requested {
                    return Err(ValidationError::InsufficientPocketMoney {
                        requested,
                        available: child.internal_wallet_balance,
                    });
                }
                Ok(())
            }
        }
    }

    fn require_child<'a>(
        &self,
        state: &'a StoreState,
        child_id: &str,
    ) -> Result<&'a shared::Child, ValidationError> {
        state
            .find_child(child_id)
            .ok_or_else(|| ValidationError::UnknownChild(child_id.to_string()))
    }

    fn validate_task(&self, state: &StoreState, task: &Task) -> Result<(), ValidationError> {
        if task.title.trim().is_empty() {
            return Err(ValidationError::EmptyTaskTitle);
        }
        if task.reward == 0 {
            return Err(ValidationError::RewardNotPositive);
        }
        self.require_child(state, &task.child_id)?;
        Ok(())
    }
}

fn positive(amount: i64) -> Result<u64, ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(amount as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{CardDesign, Child};

    fn state_with_child(balance: u64, pocket: u64) -> StoreState {
        StoreState {
            children: vec![Child {
                id: "child-1".to_string(),
                name: "Sana".to_string(),
                age: 13,
                avatar: "😊".to_string(),
                balance,
                internal_wallet_balance: pocket,
                parent_id: "parent-1".to_string(),
                card_design: CardDesign::derived_default("😊", "Sana"),
                savings_goal: None,
            }],
            is_loading: false,
            ..StoreState::default()
        }
    }

    fn task(reward: u64, title: &str) -> Task {
        Task {
            id: "task-1".to_string(),
            title: title.to_string(),
            description: String::new(),
            reward,
            child_id: "child-1".to_string(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let validator = ActionValidator::new();
        let state = state_with_child(100, 100);

        for amount in [0, -5] {
            let actions = [
                Action::TopUpInternalWallet { child_id: "child-1".to_string(), amount },
                Action::ParentDepositToMainBalance { child_id: "child-1".to_string(), amount },
                Action::WithdrawFromChildBalance { child_id: "child-1".to_string(), amount },
                Action::DepositToMainWallet { child_id: "child-1".to_string(), amount },
            ];
            for action in actions {
                assert_eq!(
                    validator.validate(&state, &action),
                    Err(ValidationError::AmountNotPositive)
                );
            }
        }
    }

    #[test]
    fn test_rejects_overdraft() {
        let validator = ActionValidator::new();
        let state = state_with_child(30, 10);

        let withdraw = Action::WithdrawFromChildBalance { child_id: "child-1".to_string(), amount: 31 };
        assert_eq!(
            validator.validate(&state, &withdraw),
            Err(ValidationError::InsufficientBalance { requested: 31, available: 30 })
        );

        let purchase = Action::PurchaseReward {
            child_id: "child-1".to_string(),
            cost: 100,
            reward_name: "Extra 30min Screen Time".to_string(),
        };
        assert!(validator.validate(&state, &purchase).is_err());

        let move_money = Action::DepositToMainWallet { child_id: "child-1".to_string(), amount: 11 };
        assert_eq!(
            validator.validate(&state, &move_money),
            Err(ValidationError::InsufficientPocketMoney { requested: 11, available: 10 })
        );
    }

    #[test]
    fn test_accepts_exact_balance() {
        let validator = ActionValidator::new();
        let state = state_with_child(30, 10);

        let withdraw = Action::WithdrawFromChildBalance { child_id: "child-1".to_string(), amount: 30 };
        assert_eq!(validator.validate(&state, &withdraw), Ok(()));

        let move_money = Action::DepositToMainWallet { child_id: "child-1".to_string(), amount: 10 };
        assert_eq!(validator.validate(&state, &move_money), Ok(()));
    }

    #[test]
    fn test_rejects_unknown_ids() {
        let validator = ActionValidator::new();
        let state = state_with_child(30, 10);

        let top_up = Action::TopUpInternalWallet { child_id: "ghost".to_string(), amount: 5 };
        assert_eq!(
            validator.validate(&state, &top_up),
            Err(ValidationError::UnknownChild("ghost".to_string()))
        );

        let complete = Action::CompleteTask("task-404".to_string());
        assert_eq!(
            validator.validate(&state, &complete),
            Err(ValidationError::UnknownTask("task-404".to_string()))
        );
    }

    #[test]
    fn test_task_rules() {
        let validator = ActionValidator::new();
        let state = state_with_child(0, 0);

        assert_eq!(validator.validate(&state, &Action::AddTask(task(25, "Tidy room"))), Ok(()));
        assert_eq!(
            validator.validate(&state, &Action::AddTask(task(0, "Tidy room"))),
            Err(ValidationError::RewardNotPositive)
        );
        assert_eq!(
            validator.validate(&state, &Action::AddMultipleTasks(vec![task(25, "Ok"), task(10, "  ")])),
            Err(ValidationError::EmptyTaskTitle)
        );
        assert_eq!(validator.validate(&state, &Action::AddMultipleTasks(Vec::new())), Ok(()));
    }

    #[test]
    fn test_duplicate_child_is_rejected() {
        let validator = ActionValidator::new();
        let state = state_with_child(0, 0);
        let duplicate = state.children[0].clone();

        assert_eq!(
            validator.validate(&state, &Action::AddChild(duplicate)),
            Err(ValidationError::DuplicateChild("child-1".to_string()))
        );
    }
}
