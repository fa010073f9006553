// src/services/relatorio_service.rs

use crate::{
    common::{error::AppError, moeda::format_cents_br},
    db::ClienteRepository,
    models::relatorio::{TotaisLucro, VendasPeriodo},
};

fn check_mes(mes: Option<u32>) -> Result<(), AppError> {
    match mes {
        Some(m) if !(1..=12).contains(&m) => {
            Err(AppError::validation(format!("Mês inválido: {m}. Use 1 a 12.")))
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Default)]
pub struct RelatorioService;

impl RelatorioService {
    pub fn new() -> Self {
        Self
    }

    pub async fn anos(&self, repo: &ClienteRepository) -> Result<Vec<i32>, AppError> {
        repo.available_years().await
    }

    /// Totais do rodapé: mês só aparece quando há mês selecionado;
    /// o total do ano cai para "todos os anos" quando não há ano.
    pub async fn totais(
        &self,
        repo: &ClienteRepository,
        ano: Option<i32>,
        mes: Option<u32>,
    ) -> Result<TotaisLucro, AppError> {
        check_mes(mes)?;

        let total_mes_cents = match mes {
            Some(m) => Some(repo.sum_lucro(ano, Some(m)).await?),
            None => None,
        };
        let total_ano_cents = repo.sum_lucro(ano, None).await?;

        Ok(TotaisLucro {
            total_mes_cents,
            total_mes: total_mes_cents.map(|c| format_cents_br(Some(c))),
            total_ano_cents,
            total_ano: format_cents_br(Some(total_ano_cents)),
        })
    }

    /// A tela "Vendas por Mês/Ano": lista do período e o lucro somado das linhas.
    pub async fn vendas(
        &self,
        repo: &ClienteRepository,
        ano: Option<i32>,
        mes: Option<u32>,
    ) -> Result<VendasPeriodo, AppError> {
        let ano = ano.ok_or_else(|| AppError::validation("Selecione um ano válido."))?;
        check_mes(mes)?;

        let clientes = repo.list_by_month_year(ano, mes).await?;
        let total_lucro_cents: i64 = clientes.iter().map(|c| c.valor_lucro_cents).sum();

        tracing::debug!(
            "Vendas {}/{:?}: {} registro(s), lucro {}",
            ano,
            mes,
            clientes.len(),
            total_lucro_cents
        );

        Ok(VendasPeriodo {
            ano,
            mes,
            clientes,
            total_lucro_cents,
            total_lucro: format_cents_br(Some(total_lucro_cents)),
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

    async fn seeded(dir: &tempfile::TempDir) -> ClienteRepository {
        let repo = ClienteRepository::connect(DatabaseConfig::new(dir.path().join("r.db")))
            .await
            .unwrap();
        repo.insert(&novo("A", date(2024, 5, 2), 12_345)).await.unwrap();
        repo.insert(&novo("B", date(2024, 5, 20), -345)).await.unwrap();
        repo.insert(&novo("C", date(2024, 8, 1), 1_000)).await.unwrap();
        repo.insert(&novo("D", date(2022, 8, 1), 50)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_totais() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded(&dir).await;
        let service = RelatorioService::new();

        let t = service.totais(&repo, Some(2024), Some(5)).await.unwrap();
        assert_eq!(t.total_mes_cents, Some(12_000));
        assert_eq!(t.total_mes.as_deref(), Some("R$ 120,00"));
        assert_eq!(t.total_ano_cents, 13_000);

        let t = service.totais(&repo, Some(2024), None).await.unwrap();
        assert_eq!(t.total_mes, None);
        assert_eq!(t.total_ano, "R$ 130,00");

        let t = service.totais(&repo, None, None).await.unwrap();
        assert_eq!(t.total_ano_cents, 13_050);

        assert!(service.totais(&repo, Some(2024), Some(13)).await.is_err());
    }

    #[tokio::test]
    async fn test_vendas() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded(&dir).await;
        let service = RelatorioService::new();

        let v = service.vendas(&repo, Some(2024), Some(5)).await.unwrap();
        assert_eq!(v.clientes.len(), 2);
        assert_eq!(v.total_lucro_cents, 12_000);

        let v = service.vendas(&repo, Some(2024), None).await.unwrap();
        assert_eq!(v.clientes.len(), 3);
        assert_eq!(v.total_lucro, "R$ 130,00");

        assert_eq!(service.anos(&repo).await.unwrap(), vec![2022, 2024]);
        assert!(service.vendas(&repo, None, None).await.is_err());
    }
}
