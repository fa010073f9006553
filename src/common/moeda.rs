// src/common/moeda.rs

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::common::error::AppError;

const MSG_FORMATO_INVALIDO: &str = "Formato de valor inválido";

/// Converte uma string de moeda (BR ou US) para centavos.
///
/// Aceita `R$ 1.234,56`, `1.234.567,89`, `1,234,567.89` e os negativos
/// `-R$ 1.234,56`, `R$ -1.234,56`, `1.234,56-`, `(1.234,56)`.
/// Vazio ou `None` vira 0.
pub fn parse_currency_to_cents(value: Option<&str>) -> Result<i64, AppError> {
    let Some(raw) = value else {
        return Ok(0);
    };

    let mut s = raw.trim().to_string();
    if s.is_empty() {
        return Ok(0);
    }

    // Sinal por parênteses
    let mut negative = false;
    if s.contains('(') && s.contains(')') {
        negative = true;
        s = s.replace(['(', ')'], "");
    }

    // Remove prefixo e espaços (inclui NBSP)
    let mut s = s.replace("R$", "").replace('\u{a0}', " ").trim().to_string();

    // Sinal na frente/atrás. Os marcadores ligam o sinal, não alternam.
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest.trim().to_string();
    }
    if let Some(rest) = s.strip_suffix('-') {
        negative = true;
        s = rest.trim().to_string();
    }
    if let Some(rest) = s.strip_prefix('+') {
        s = rest.trim().to_string();
    }

    // Mantém só dígitos e separadores
    let s: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let normalized = normalize_separators(&s);

    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::format(MSG_FORMATO_INVALIDO));
    }

    let mut dec =
        Decimal::from_str(&normalized).map_err(|_| AppError::format(MSG_FORMATO_INVALIDO))?;
    if negative {
        dec = -dec;
    }

    // Arredonda para centavos (ROUND_HALF_UP)
    dec.checked_mul(Decimal::ONE_HUNDRED)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_i64())
        .ok_or_else(|| AppError::format(MSG_FORMATO_INVALIDO))
}

// O último separador que aparece é o decimal; uma vírgula sozinha é decimal BR.
fn normalize_separators(s: &str) -> String {
    match (s.rfind('.'), s.rfind(',')) {
        (Some(last_dot), Some(last_com)) if last_com > last_dot => {
            s.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    }
}

/// Formata centavos como `R$ 1.234,56` (ou `-R$ ...`).
pub fn format_cents_br(cents: Option<i64>) -> String {
    let cents = cents.unwrap_or(0);
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let reais = abs / 100;
    let centavos = abs % 100;

    let txt = format!("R$ {},{:02}", group_thousands(reais), centavos);
    if negative { format!("-{txt}") } else { txt }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
