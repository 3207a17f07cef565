//! # Domain Module
//!
//! Business logic for KidsBank, independent of HTTP and of where state is saved.
//!
//! ## Module Organization
//!
//! - **store**: The application state, the closed set of actions, the pure
//!   `transition` function and the `Store` that persists after each dispatch
//! - **validation**: Optional strict checks run before an action reaches the reducer
//! - **family_service**: Parent and child operations built on top of the store
//! - **ai_tasks**: Parsing task suggestions out of free-form model replies
//! - **prompts**: Prompt text for the AI collaborator
//! - **rewards**: Rewards store catalog and game payouts
//!
//! ## Business Rules
//!
//! - Wallet balances never go below zero
//! - Moving pocket money to the main balance conserves the child's total
//! - A task's reward is credited once, when it is first completed
//! - Children and tasks keep their insertion order

pub mod ai_tasks;
pub mod family_service;
pub mod prompts;
pub mod rewards;
pub mod store;
pub mod validation;

pub use family_service::{FamilyService, ServiceError, ServiceResult};
pub use store::{transition, Action, Store, StoreState};
pub use validation::{ActionValidator, ValidationError};
