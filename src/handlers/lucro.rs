// src/handlers/lucro.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, models::relatorio::LucroPreviewRequest};

// POST /api/lucro/preview
// Calcula o lucro sem gravar nada; valorLucro preenchido é respeitado.
pub async fn preview(
    State(app_state): State<AppState>,
    Json(req): Json<LucroPreviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.cliente_service.lucro_preview(&req)))
}
