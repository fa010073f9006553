// src/common/cpf.rs

pub fn somente_digitos(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Soma ponderada com pesos decrescentes de (len + 1) até 2, módulo 11.
fn calc_digito(nums: &[u32]) -> u32 {
    let weights = (2..=nums.len() as u32 + 1).rev();
    let sum: u32 = nums.iter().zip(weights).map(|(d, w)| d * w).sum();
    let r = 11 - (sum % 11);
    if r >= 10 { 0 } else { r }
}

/// Valida um CPF pelos dois dígitos verificadores. Aceita máscara (`000.000.000-00`).
pub fn valido_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let mut base = digits[..9].to_vec();
    let d1 = calc_digito(&base);
    base.push(d1);
    let d2 = calc_digito(&base);

    digits[9] == d1 && digits[10] == d2
}
