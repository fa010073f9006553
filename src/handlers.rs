pub mod banco;
pub mod clientes;
pub mod lucro;
pub mod relatorios;
pub mod voos;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::config::AppState;

/// Todas as rotas da API com o estado já aplicado.
pub fn router(app_state: AppState) -> Router {
    let relatorio_routes = Router::new()
        .route("/anos", get(relatorios::list_anos))
        .route("/totais", get(relatorios::get_totais))
        .route("/vendas", get(relatorios::get_vendas))
        .route("/vendas.csv", get(relatorios::export_vendas_csv));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/clientes"
               ,get(clientes::list_clientes)
               .post(clientes::create_cliente)
        )
        .route("/api/clientes/export.csv", get(clientes::export_clientes_csv))
        .route("/api/clientes/{id}"
               ,put(clientes::update_cliente)
               .delete(clientes::delete_cliente)
        )
        .route("/api/clientes/{id}/documento-voo", get(clientes::documento_voo))
        .nest("/api/relatorios", relatorio_routes)
        .route("/api/lucro/preview", post(lucro::preview))
        .route("/api/voos/amanha", get(voos::voos_amanha))
        .route("/api/banco"
               ,get(banco::get_banco)
               .post(banco::trocar_banco)
        )
        .with_state(app_state)
}
