pub mod cliente_repo;
pub use cliente_repo::{ClienteRepository, DatabaseConfig};
