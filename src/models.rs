pub mod cliente;
pub mod relatorio;
