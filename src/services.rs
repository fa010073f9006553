pub mod cliente_service;
pub use cliente_service::ClienteService;
pub mod relatorio_service;
pub use relatorio_service::RelatorioService;
pub mod export_service;
pub use export_service::ExportService;
pub mod lembrete_service;
pub use lembrete_service::LembreteService;
