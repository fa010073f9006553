// src/models/relatorio.rs

use serde::{Deserialize, Serialize};

use crate::models::cliente::{Cliente, VooResumo};

// Filtro Ano/Mês usado pelos totais e pela tela "Vendas por Mês/Ano"
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PeriodoQuery {
    pub ano: Option<i32>,
    pub mes: Option<u32>,
}

// Rodapé da tela principal
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TotaisLucro {
    pub total_mes_cents: Option<i64>, // Só quando há mês selecionado
    pub total_mes: Option<String>,
    pub total_ano_cents: i64,
    pub total_ano: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendasPeriodo {
    pub ano: i32,
    pub mes: Option<u32>,
    pub clientes: Vec<Cliente>,
    pub total_lucro_cents: i64,
    pub total_lucro: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoosAmanha {
    pub quantidade: usize,
    pub voos: Vec<VooResumo>,
    pub mensagem: String,
}

// Pré-visualização do campo Lucro enquanto o usuário digita
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LucroPreviewRequest {
    pub valor_venda: String,
    pub valor_pago: Option<String>,
    pub valor_lucro: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LucroPreview {
    pub valor_lucro_cents: Option<i64>,
    pub valor_lucro: Option<String>,
    pub automatico: bool,
}
