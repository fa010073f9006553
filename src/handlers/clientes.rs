// src/handlers/clientes.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::cliente::ClienteForm,
    services::{cliente_service::SortColumn, ExportService},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListaQuery {
    #[serde(default)]
    pub busca: String,
    pub ordenar: Option<SortColumn>,
    #[serde(default = "padrao_asc")]
    pub asc: bool,
}

fn padrao_asc() -> bool {
    true
}

// GET /api/clientes
pub async fn list_clientes(
    State(app_state): State<AppState>,
    Query(q): Query<ListaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let clientes = app_state
        .cliente_service
        .list(&repo, &q.busca, q.ordenar.map(|col| (col, q.asc)))
        .await?;

    Ok(Json(clientes))
}

// POST /api/clientes
pub async fn create_cliente(
    State(app_state): State<AppState>,
    Json(form): Json<ClienteForm>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let cliente = app_state.cliente_service.create(&repo, &form).await?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/clientes/{id}
pub async fn update_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ClienteForm>,
) -> Result<Response, AppError> {
    let repo = app_state.repo().await;

    // ID inexistente não é erro: nada muda
    match app_state.cliente_service.update(&repo, id, &form).await? {
        Some(cliente) => Ok(Json(cliente).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

// DELETE /api/clientes/{id}
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    app_state.cliente_service.delete(&repo, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/clientes/export.csv
pub async fn export_clientes_csv(
    State(app_state): State<AppState>,
    Query(q): Query<ListaQuery>,
) -> Result<Response, AppError> {
    // Mesmas linhas e mesma ordem da tabela exibida
    let repo = app_state.repo().await;
    let clientes = app_state
        .cliente_service
        .list(&repo, &q.busca, q.ordenar.map(|col| (col, q.asc)))
        .await?;
    let bytes = ExportService::clientes_csv(&clientes)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=\"clientes.csv\""),
    ];

    Ok((headers, bytes).into_response())
}

// GET /api/clientes/{id}/documento-voo
pub async fn documento_voo(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let repo = app_state.repo().await;
    let (path, bytes) = app_state.cliente_service.documento_voo(&repo, id).await?;

    let nome = path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .unwrap_or_else(|| format!("documento_{id}"));
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    };

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{nome}\"")),
    ];

    Ok((headers, bytes).into_response())
}
