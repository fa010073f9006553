// src/handlers/voos.rs

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Local;

use crate::{common::error::AppError, config::AppState};

// GET /api/voos/amanha
pub async fn voos_amanha(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let hoje = Local::now().date_naive();
    let voos = app_state.lembrete_service.voos_de_amanha(&repo, hoje).await?;
    Ok(Json(voos))
}
