// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::relatorio::PeriodoQuery,
    services::ExportService,
};

// GET /api/relatorios/anos
pub async fn list_anos(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let anos = app_state.relatorio_service.anos(&repo).await?;
    Ok(Json(anos))
}

// GET /api/relatorios/totais?ano=&mes=
pub async fn get_totais(
    State(app_state): State<AppState>,
    Query(q): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let totais = app_state.relatorio_service.totais(&repo, q.ano, q.mes).await?;
    Ok(Json(totais))
}

// GET /api/relatorios/vendas?ano=&mes=
pub async fn get_vendas(
    State(app_state): State<AppState>,
    Query(q): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.repo().await;
    let vendas = app_state.relatorio_service.vendas(&repo, q.ano, q.mes).await?;
    Ok(Json(vendas))
}

// GET /api/relatorios/vendas.csv?ano=&mes=
pub async fn export_vendas_csv(
    State(app_state): State<AppState>,
    Query(q): Query<PeriodoQuery>,
) -> Result<Response, AppError> {
    let repo = app_state.repo().await;
    let vendas = app_state.relatorio_service.vendas(&repo, q.ano, q.mes).await?;
    let bytes = ExportService::vendas_csv(&vendas.clientes)?;

    let arquivo = match vendas.mes {
        Some(m) => format!("vendas_{}_{:02}.csv", vendas.ano, m),
        None => format!("vendas_{}.csv", vendas.ano),
    };
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{arquivo}\"")),
    ];

    Ok((headers, bytes).into_response())
}
