// src/common/datas.rs

use chrono::NaiveDate;

use crate::common::error::AppError;

pub const FORMATO_BR: &str = "%d/%m/%Y";
pub const FORMATO_ISO: &str = "%Y-%m-%d";

/// `DD/MM/YYYY` -> `NaiveDate`. Exige uma data de calendário válida.
pub fn parse_br_date(date_str: &str) -> Result<NaiveDate, AppError> {
    let s = date_str.trim();
    // chrono aceita "1/2/2024"; a tela sempre exige os dez caracteres.
    if s.len() != 10 {
        return Err(AppError::format(format!("Data inválida: '{s}'. Use DD/MM/AAAA.")));
    }
    NaiveDate::parse_from_str(s, FORMATO_BR)
        .map_err(|_| AppError::format(format!("Data inválida: '{s}'. Use DD/MM/AAAA.")))
}

pub fn format_br_date(date: NaiveDate) -> String {
    date.format(FORMATO_BR).to_string()
}

pub fn br_to_iso(date_str: &str) -> Result<String, AppError> {
    Ok(parse_br_date(date_str)?.format(FORMATO_ISO).to_string())
}

/// `YYYY-MM-DD` -> `DD/MM/YYYY`. Vazio ou `None` vira string vazia.
pub fn iso_to_br(date_str: Option<&str>) -> Result<String, AppError> {
    match date_str {
        None | Some("") => Ok(String::new()),
        // Mesma regra dos dez caracteres: nada de "2024-2-3" ou "+2024-02-03"
        Some(s) if s.len() != 10 => Err(AppError::format(format!("Data ISO inválida: '{s}'"))),
        Some(s) => NaiveDate::parse_from_str(s, FORMATO_ISO)
            .map(format_br_date)
            .map_err(|_| AppError::format(format!("Data ISO inválida: '{s}'"))),
    }
}
