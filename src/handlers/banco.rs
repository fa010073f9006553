// src/handlers/banco.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct TrocaBancoPayload {
    #[validate(length(min = 1, message = "Informe o caminho do banco."))]
    pub caminho: String,
}

// GET /api/banco
pub async fn get_banco(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    Ok(Json(json!({ "caminho": repo.path().display().to_string() })))
}

// POST /api/banco
pub async fn trocar_banco(
    State(app_state): State<AppState>,
    Json(payload): Json<TrocaBancoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let caminho = app_state.switch_database(payload.caminho.trim()).await?;
    Ok(Json(json!({ "caminho": caminho.display().to_string() })))
}
