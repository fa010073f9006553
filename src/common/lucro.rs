// src/common/lucro.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::moeda::{format_cents_br, parse_currency_to_cents};

fn parse_pago(pago_str: Option<&str>) -> Option<i64> {
    match pago_str.map(str::trim) {
        None | Some("") => Some(0),
        Some(s) => parse_currency_to_cents(Some(s)).ok(),
    }
}

/// Lucro em centavos (= pago - venda). Pode ser negativo.
/// `None` quando algum dos lados não é um valor válido.
pub fn compute_lucro_cents_from_strings(venda_str: &str, pago_str: Option<&str>) -> Option<i64> {
    LucroMode::PagoMenosVenda.compute(venda_str, pago_str)
}

// Política de negócio: o banco guarda o lucro já calculado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LucroMode {
    #[default]
    PagoMenosVenda,
    VendaMenosPago,
}

impl LucroMode {
    pub fn apply(self, venda_cents: i64, pago_cents: i64) -> i64 {
        match self {
            LucroMode::PagoMenosVenda => pago_cents - venda_cents,
            LucroMode::VendaMenosPago => venda_cents - pago_cents,
        }
    }

    pub fn compute(self, venda_str: &str, pago_str: Option<&str>) -> Option<i64> {
        let venda = parse_currency_to_cents(Some(venda_str)).ok()?;
        let pago = parse_pago(pago_str)?;
        Some(self.apply(venda, pago))
    }
}

impl FromStr for LucroMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pago-menos-venda" => Ok(LucroMode::PagoMenosVenda),
            "venda-menos-pago" => Ok(LucroMode::VendaMenosPago),
            other => Err(format!("modo de lucro desconhecido: '{other}'")),
        }
    }
}

/// Estado do campo "Lucro" do formulário.
///
/// Em `Auto` o lucro acompanha venda/pago; depois que o usuário digita um
/// valor o campo fica em `UserOverridden` até um "Recalcular" explícito.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LucroField {
    #[default]
    Auto,
    UserOverridden(String),
}

impl LucroField {
    /// Lucro digitado no formulário: em branco significa cálculo automático.
    pub fn from_input(lucro: Option<&str>) -> Self {
        match lucro.map(str::trim) {
            None | Some("") => LucroField::Auto,
            Some(s) => LucroField::UserOverridden(s.to_string()),
        }
    }

    pub fn lucro_edited(&mut self, text: impl Into<String>) {
        *self = LucroField::UserOverridden(text.into());
    }

    pub fn recalcular(&mut self) {
        *self = LucroField::Auto;
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self, LucroField::UserOverridden(_))
    }

    /// Texto a exibir depois de uma mudança de venda/pago.
    /// Valor do usuário é preservado; em `Auto`, `None` se não der para calcular.
    pub fn price_changed(&self, venda: &str, pago: Option<&str>, mode: LucroMode) -> Option<String> {
        self.resolve(venda, pago, mode)
    }

    pub fn resolve(&self, venda: &str, pago: Option<&str>, mode: LucroMode) -> Option<String> {
        match self {
            LucroField::UserOverridden(text) => Some(text.clone()),
            LucroField::Auto => mode
                .compute(venda, pago)
                .map(|cents| format_cents_br(Some(cents))),
        }
    }
}
