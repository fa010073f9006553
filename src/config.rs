// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use tokio::sync::RwLock;

use crate::{
    common::{error::AppError, lucro::LucroMode},
    db::{ClienteRepository, DatabaseConfig},
    services::{cliente_service::DOCUMENTOS_PADRAO, ClienteService, LembreteService, RelatorioService},
};

pub const DB_PADRAO: &str = "agencia_viagens.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub bind_addr: String,
    pub lembrete_intervalo: Duration,
    pub lucro_mode: LucroMode,
    pub documentos_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::new(DB_PADRAO),
            bind_addr: "127.0.0.1:3000".to_string(),
            lembrete_intervalo: Duration::from_secs(3600),
            lucro_mode: LucroMode::default(),
            documentos_dir: PathBuf::from(DOCUMENTOS_PADRAO),
        }
    }
}

impl AppConfig {
    /// Lê o `.env` e as variáveis de ambiente; o que faltar fica no padrão.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = var("TRAVELCRM_DB") {
            config.database = DatabaseConfig::new(path);
        }
        if let Some(addr) = var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = var("DOCUMENTOS_DIR") {
            config.documentos_dir = PathBuf::from(dir);
        }
        if let Some(secs) = var("LEMBRETE_INTERVALO_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("LEMBRETE_INTERVALO_SECS inválido: {secs}"))?;
            anyhow::ensure!(secs > 0, "LEMBRETE_INTERVALO_SECS deve ser maior que zero");
            config.lembrete_intervalo = Duration::from_secs(secs);
        }
        if let Some(modo) = var("LUCRO_MODO") {
            config.lucro_mode = modo.parse().map_err(anyhow::Error::msg)?;
        }

        Ok(config)
    }
}

#[derive(Clone)]
pub struct AppState {
    // Trocado inteiro quando o usuário escolhe outro arquivo de banco
    pub repo: Arc<RwLock<ClienteRepository>>,
    pub cliente_service: ClienteService,
    pub relatorio_service: RelatorioService,
    pub lembrete_service: LembreteService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repo = ClienteRepository::connect(config.database.clone())
            .await
            .with_context(|| format!("Falha ao abrir o banco {}", config.database.path.display()))?;

        tracing::info!("✅ Banco de dados pronto em {}", repo.path().display());

        Ok(Self {
            repo: Arc::new(RwLock::new(repo)),
            cliente_service: ClienteService::new(config.lucro_mode)
                .with_documentos_dir(&config.documentos_dir),
            relatorio_service: RelatorioService::new(),
            lembrete_service: LembreteService::new(),
        })
    }

    /// Cópia do repositório atual, para não segurar o lock durante a consulta.
    pub async fn repo(&self) -> ClienteRepository {
        self.repo.read().await.clone()
    }

    /// Abre (ou cria) outro arquivo e passa a usá-lo. Em caso de falha o banco atual continua.
    /// O pool antigo não é fechado aqui: quem já pegou uma cópia termina a consulta
    /// e o pool fecha quando a última cópia sai de escopo.
    pub async fn switch_database(&self, path: impl Into<PathBuf>) -> Result<PathBuf, AppError> {
        let mut config = self.repo.read().await.config().clone();
        config.path = path.into();

        let novo = ClienteRepository::connect(config).await.map_err(|e| {
            tracing::warn!("Falha ao trocar de banco: {}", e);
            AppError::validation("Não foi possível abrir o banco de dados selecionado.")
        })?;
        let caminho = novo.path().to_path_buf();

        *self.repo.write().await = novo;

        tracing::info!("Banco de dados alterado para {}", caminho.display());
        Ok(caminho)
    }
}
