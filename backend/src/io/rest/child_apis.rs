//! # REST API for Child Accounts
//!
//! Creating children, customizing their cards, and everything that moves
//! money in or out of their wallets.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use shared::{
    Child, CreateChildRequest, GameRewardResponse, GameResultRequest, PurchaseRewardResponse,
    SavingsGoalProgressResponse, UpdateCardDesignRequest, WalletAmountRequest,
};
use tracing::info;

use crate::io::rest::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children).post(create_child))
        .route("/children/:child_id/card", put(update_card_design))
        .route("/children/:child_id/savings-goal", get(savings_goal_progress))
        .route("/children/:child_id/wallet/top-up", post(top_up_pocket_money))
        .route("/children/:child_id/wallet/deposit", post(deposit_to_main_balance))
        .route("/children/:child_id/wallet/withdraw", post(withdraw_from_main_balance))
        .route("/children/:child_id/wallet/move-to-main", post(move_pocket_money_to_main))
        .route("/children/:child_id/rewards/:reward_id", post(purchase_reward))
        .route("/children/:child_id/games/budget-battle", post(record_budget_battle))
}

/// List all children in insertion order
pub async fn list_children(State(state): State<AppState>) -> Json<Vec<Child>> {
    info!("GET /api/children");
    Json(state.family_service.list_children())
}

pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> ApiResult<(StatusCode, Json<Child>)> {
    info!("POST /api/children - request: {:?}", request);
    let child = state.family_service.create_child(request)?;
    Ok((StatusCode::CREATED, Json(child)))
}

pub async fn update_card_design(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateCardDesignRequest>,
) -> ApiResult<Json<Child>> {
    info!("PUT /api/children/{}/card - request: {:?}", child_id, request);
    Ok(Json(state.family_service.update_card_design(&child_id, request)?))
}

/// Savings goal progress, `null` when the child has no goal
pub async fn savings_goal_progress(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Option<SavingsGoalProgressResponse>>> {
    info!("GET /api/children/{}/savings-goal", child_id);
    Ok(Json(state.family_service.savings_goal_progress(&child_id)?))
}

pub async fn top_up_pocket_money(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> ApiResult<Json<Child>> {
    info!("POST /api/children/{}/wallet/top-up - amount: {}", child_id, request.amount);
    Ok(Json(state.family_service.top_up_pocket_money(&child_id, request.amount)?))
}

pub async fn deposit_to_main_balance(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> ApiResult<Json<Child>> {
    info!("POST /api/children/{}/wallet/deposit - amount: {}", child_id, request.amount);
    Ok(Json(state.family_service.deposit_to_main_balance(&child_id, request.amount)?))
}

pub async fn withdraw_from_main_balance(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> ApiResult<Json<Child>> {
    info!("POST /api/children/{}/wallet/withdraw - amount: {}", child_id, request.amount);
    Ok(Json(state.family_service.withdraw_from_main_balance(&child_id, request.amount)?))
}

pub async fn move_pocket_money_to_main(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> ApiResult<Json<Child>> {
    info!("POST /api/children/{}/wallet/move-to-main - amount: {}", child_id, request.amount);
    Ok(Json(state.family_service.move_pocket_money_to_main(&child_id, request.amount)?))
}

pub async fn purchase_reward(
    State(state): State<AppState>,
    Path((child_id, reward_id)): Path<(String, String)>,
) -> ApiResult<Json<PurchaseRewardResponse>> {
    info!("POST /api/children/{}/rewards/{}", child_id, reward_id);
    Ok(Json(state.family_service.purchase_reward(&child_id, &reward_id)?))
}

pub async fn record_budget_battle(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<GameResultRequest>,
) -> ApiResult<Json<GameRewardResponse>> {
    info!(
        "POST /api/children/{}/games/budget-battle - correct answers: {}",
        child_id, request.correct_answers
    );
    Ok(Json(state.family_service.record_game_result(&child_id, request.correct_answers)?))
}
