// src/services/lembrete_service.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::{
    common::{datas::format_br_date, error::AppError},
    db::ClienteRepository,
    models::{cliente::VooResumo, relatorio::VoosAmanha},
};

/// Texto de um voo no alerta.
pub fn flight_line(v: &VooResumo) -> String {
    let volta = v.data_volta.map(format_br_date).unwrap_or_else(|| "—".to_string());
    let tem_doc = if v.doc_voo_path.is_some() { "Sim" } else { "Não" };
    format!(
        "ID {} — {}\nIda: {} | Volta: {} | {}: {}\nDocumento salvo: {}",
        v.id,
        v.nome_completo,
        format_br_date(v.data_ida),
        volta,
        v.doc_tipo,
        v.doc_valor,
        tem_doc
    )
}

pub fn resumo(voos: &[VooResumo]) -> String {
    if voos.is_empty() {
        return "Nenhum voo com ida amanhã.".to_string();
    }
    let linhas: Vec<String> = voos.iter().map(flight_line).collect();
    format!(
        "Encontramos {} voo(s) com ida amanhã:\n\n{}",
        voos.len(),
        linhas.join("\n\n")
    )
}

#[derive(Clone, Default)]
pub struct LembreteService;

impl LembreteService {
    pub fn new() -> Self {
        Self
    }

    pub async fn voos_de_amanha(
        &self,
        repo: &ClienteRepository,
        hoje: NaiveDate,
    ) -> Result<VoosAmanha, AppError> {
        let amanha = hoje
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::format("Data fora do intervalo suportado."))?;

        let voos = repo.flights_departing_on(amanha).await?;
        Ok(VoosAmanha {
            quantidade: voos.len(),
            mensagem: resumo(&voos),
            voos,
        })
    }

    /// Checa na hora e depois a cada `intervalo`. Só avisa quando há voos.
    /// O repositório é relido a cada rodada, então uma troca de banco vale na próxima checagem.
    pub fn spawn(
        self,
        repo: Arc<RwLock<ClienteRepository>>,
        intervalo: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(intervalo);
            loop {
                ticker.tick().await;

                let hoje = Local::now().date_naive();
                let repo = repo.read().await.clone();
                match self.voos_de_amanha(&repo, hoje).await {
                    Ok(v) if v.quantidade > 0 => {
                        tracing::info!("✈️ {} voo(s) com ida amanhã.", v.quantidade);
                        for voo in &v.voos {
                            tracing::info!("{}", flight_line(voo).replace('\n', " | "));
                        }
                    }
                    Ok(_) => tracing::debug!("Nenhum voo com ida amanhã."),
                    Err(e) => tracing::error!("Falha ao checar voos de amanhã: {}", e),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        cliente_repo::tests::{date, novo},
        DatabaseConfig,
    };
    use crate::models::cliente::DocumentType;

    fn voo() -> VooResumo {
        VooResumo {
            id: 3,
            nome_completo: "Ana Souza".to_string(),
            data_ida: date(2025, 1, 2),
            data_volta: None,
            doc_tipo: DocumentType::Passaporte,
            doc_valor: "FX1".to_string(),
            doc_voo_path: Some("/docs/ana.pdf".to_string()),
        }
    }

    #[test]
    fn test_flight_line() {
        assert_eq!(
            flight_line(&voo()),
            "ID 3 — Ana Souza\nIda: 02/01/2025 | Volta: — | Passaporte: FX1\nDocumento salvo: Sim"
        );
    }

    #[test]
    fn test_resumo() {
        assert_eq!(resumo(&[]), "Nenhum voo com ida amanhã.");
        assert!(resumo(&[voo(), voo()]).starts_with("Encontramos 2 voo(s) com ida amanhã:\n\nID 3"));
    }

    #[tokio::test]
    async fn test_voos_de_amanha_crosses_month() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ClienteRepository::connect(DatabaseConfig::new(dir.path().join("l.db")))
            .await
            .unwrap();

        let mut c = novo("Viaja dia 1º", date(2024, 1, 1), 0);
        c.data_ida = date(2024, 3, 1);
        repo.insert(&c).await.unwrap();

        let service = LembreteService::new();
        let v = service.voos_de_amanha(&repo, date(2024, 2, 29)).await.unwrap();
        assert_eq!(v.quantidade, 1);
        assert_eq!(v.voos[0].nome_completo, "Viaja dia 1º");

        let v = service.voos_de_amanha(&repo, date(2024, 3, 1)).await.unwrap();
        assert_eq!(v.quantidade, 0);
        assert_eq!(v.mensagem, "Nenhum voo com ida amanhã.");
    }
}
