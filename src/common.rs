pub mod cpf;
pub mod datas;
pub mod error;
pub mod lucro;
pub mod moeda;
