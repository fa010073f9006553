// src/models/cliente.rs

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

// --- ENUMS ---

// Mapeia o CHECK(doc_tipo IN ('CPF','Passaporte')) da tabela
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum DocumentType {
    #[sqlx(rename = "CPF")]
    #[serde(rename = "CPF")]
    Cpf,
    #[sqlx(rename = "Passaporte")]
    #[serde(rename = "Passaporte")]
    Passaporte,
}

impl DocumentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "CPF" => Some(DocumentType::Cpf),
            "Passaporte" => Some(DocumentType::Passaporte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Cpf => "CPF",
            DocumentType::Passaporte => "Passaporte",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- CLIENTE (linha da tabela `clientes`) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    pub nome_completo: String,
    pub data_nascimento: NaiveDate,
    pub data_compra_voo: NaiveDate,

    pub doc_tipo: DocumentType,
    pub doc_valor: String, // Só dígitos quando CPF

    // Valores sempre em centavos. Pago e lucro podem ser negativos (estornos).
    pub valor_venda_cents: i64,
    pub valor_lucro_cents: i64,
    pub valor_pago_cents: i64,

    pub data_ida: NaiveDate,
    pub data_volta: Option<NaiveDate>,
    pub doc_voo_path: Option<String>,

    pub created_at: Option<NaiveDate>,
    pub updated_at: Option<NaiveDate>,
}

impl Cliente {
    /// Texto da coluna "Documento" da tabela: `CPF: 52998224725`
    pub fn documento(&self) -> String {
        format!("{}: {}", self.doc_tipo, self.doc_valor)
    }
}

/// Dados já validados e normalizados, prontos para INSERT/UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct NovoCliente {
    pub nome_completo: String,
    pub data_nascimento: NaiveDate,
    pub data_compra_voo: NaiveDate,
    pub doc_tipo: DocumentType,
    pub doc_valor: String,
    pub valor_venda_cents: i64,
    pub valor_lucro_cents: i64,
    pub valor_pago_cents: i64,
    pub data_ida: NaiveDate,
    pub data_volta: Option<NaiveDate>,
    pub doc_voo_path: Option<String>,
}

// Resumo usado nos alertas de voo
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VooResumo {
    pub id: i64,
    pub nome_completo: String,
    pub data_ida: NaiveDate,
    pub data_volta: Option<NaiveDate>,
    pub doc_tipo: DocumentType,
    pub doc_valor: String,
    pub doc_voo_path: Option<String>,
}

// --- FORMULÁRIO ---

fn validate_doc_tipo(value: &str) -> Result<(), ValidationError> {
    if DocumentType::parse(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("doc_tipo");
    err.message = Some(Cow::from("Selecione o tipo de documento (CPF ou Passaporte)."));
    Err(err)
}

/// O formulário como o usuário preenche: tudo texto, datas em DD/MM/AAAA e
/// valores como `R$ 1.234,56`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ClienteForm {
    #[validate(length(min = 1, message = "Informe o Nome completo."))]
    pub nome_completo: String,

    #[validate(length(min = 1, message = "Informe a Data de nascimento."))]
    pub data_nascimento: String,

    #[validate(length(min = 1, message = "Informe a Data de compra do voo."))]
    pub data_compra_voo: String,

    #[validate(length(min = 1, message = "Informe a Data de ida."))]
    pub data_ida: String,

    pub data_volta: Option<String>,

    #[validate(custom(function = "validate_doc_tipo"))]
    pub doc_tipo: String,

    #[validate(length(min = 1, message = "Informe o número do documento."))]
    pub doc_valor: String,

    #[validate(length(min = 1, message = "Informe o Valor de compra."))]
    pub valor_venda: String,

    pub valor_pago: Option<String>,

    // Em branco = calcular automaticamente
    pub valor_lucro: Option<String>,

    pub doc_voo_path: Option<String>,
}

// Placeholders que a tela coloca nos campos vazios
const PLACEHOLDERS: [&str; 5] = [
    "DD/MM/AAAA",
    "DD/MM/AAAA (opcional)",
    "Somente números p/ CPF",
    "R$ 0,00",
    "caminho/arquivo.pdf",
];

fn clean(s: &str) -> String {
    let t = s.trim();
    if PLACEHOLDERS.contains(&t) { String::new() } else { t.to_string() }
}

fn clean_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(clean).filter(|t| !t.is_empty())
}

impl ClienteForm {
    /// Remove espaços e placeholders antes da validação.
    pub fn normalized(&self) -> Self {
        Self {
            nome_completo: clean(&self.nome_completo),
            data_nascimento: clean(&self.data_nascimento),
            data_compra_voo: clean(&self.data_compra_voo),
            data_ida: clean(&self.data_ida),
            data_volta: clean_opt(&self.data_volta),
            doc_tipo: self.doc_tipo.trim().to_string(),
            doc_valor: clean(&self.doc_valor),
            valor_venda: clean(&self.valor_venda),
            valor_pago: clean_opt(&self.valor_pago),
            valor_lucro: clean_opt(&self.valor_lucro),
            doc_voo_path: clean_opt(&self.doc_voo_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parse() {
        assert_eq!(DocumentType::parse("CPF"), Some(DocumentType::Cpf));
        assert_eq!(DocumentType::parse(" Passaporte "), Some(DocumentType::Passaporte));
        assert_eq!(DocumentType::parse("RG"), None);
    }

    #[test]
    fn test_normalized_strips_placeholders() {
        let form = ClienteForm {
            nome_completo: "  Ana  ".into(),
            data_volta: Some("DD/MM/AAAA (opcional)".into()),
            valor_pago: Some("R$ 0,00".into()),
            doc_voo_path: Some("   ".into()),
            ..Default::default()
        };
        let n = form.normalized();
        assert_eq!(n.nome_completo, "Ana");
        assert_eq!(n.data_volta, None);
        assert_eq!(n.valor_pago, None);
        assert_eq!(n.doc_voo_path, None);
    }

    #[test]
    fn test_form_deserializes_camel_case() {
        let form: ClienteForm = serde_json::from_str(
            r#"{"nomeCompleto":"Ana","docTipo":"CPF","valorVenda":"R$ 10,00"}"#,
        )
        .unwrap();
        assert_eq!(form.nome_completo, "Ana");
        assert_eq!(form.valor_venda, "R$ 10,00");
        assert!(form.valor_lucro.is_none());
    }
}
