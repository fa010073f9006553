// src/db/cliente_repo.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::cliente::{Cliente, NovoCliente, VooResumo},
};

/// Onde fica o arquivo do banco. Trocar de banco = criar outro repositório.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 4,
        }
    }
}

const SELECT_CLIENTE: &str = r#"
    SELECT id, nome_completo, data_nascimento, data_compra_voo,
           doc_tipo, doc_valor, valor_venda_cents, valor_lucro_cents, valor_pago_cents,
           data_ida, data_volta, doc_voo_path, created_at, updated_at
    FROM clientes
"#;

const ORDER_BY_COMPRA: &str = " ORDER BY data_compra_voo DESC, id DESC";

// Colunas que bancos antigos podem não ter
const EXTENSION_COLUMNS: [(&str, &str); 4] = [
    (
        "valor_pago_cents",
        "ALTER TABLE clientes ADD COLUMN valor_pago_cents INTEGER DEFAULT 0 NOT NULL",
    ),
    (
        "data_ida",
        "ALTER TABLE clientes ADD COLUMN data_ida TEXT NOT NULL DEFAULT ''",
    ),
    ("data_volta", "ALTER TABLE clientes ADD COLUMN data_volta TEXT"),
    ("doc_voo_path", "ALTER TABLE clientes ADD COLUMN doc_voo_path TEXT"),
];

// O repositório de clientes, responsável por todas as interações com a tabela 'clientes'
#[derive(Clone)]
pub struct ClienteRepository {
    pool: SqlitePool,
    config: DatabaseConfig,
}

impl ClienteRepository {
    pub fn new(pool: SqlitePool, config: DatabaseConfig) -> Self {
        Self { pool, config }
    }

    /// Abre (ou cria) o arquivo SQLite e garante o schema.
    pub async fn connect(config: DatabaseConfig) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Banco de dados aberto: {}", config.path.display());

        let repo = Self::new(pool, config);
        repo.init_schema().await?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    // =========================================================================
    //  SCHEMA
    // =========================================================================

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await?;

        Ok(found > 0)
    }

    /// Idempotente: cria a tabela, adiciona colunas faltantes e os índices.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clientes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome_completo TEXT NOT NULL,
                data_nascimento TEXT NOT NULL,
                data_compra_voo TEXT NOT NULL,
                doc_tipo TEXT NOT NULL CHECK(doc_tipo IN ('CPF','Passaporte')),
                doc_valor TEXT NOT NULL,
                valor_venda_cents INTEGER NOT NULL,
                valor_lucro_cents INTEGER NOT NULL,
                valor_pago_cents INTEGER DEFAULT 0 NOT NULL,
                data_ida TEXT NOT NULL,
                data_volta TEXT,
                doc_voo_path TEXT,
                created_at TEXT DEFAULT (DATE('now')),
                updated_at TEXT DEFAULT (DATE('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for (column, ddl) in EXTENSION_COLUMNS {
            if !self.column_exists("clientes", column).await? {
                tracing::info!("Migrando banco: adicionando coluna '{}'", column);
                sqlx::query(ddl).execute(&self.pool).await?;

                // SQLite não aceita DEFAULT (DATE('now')) em ADD COLUMN.
                // Registros antigos herdam a data de compra como data de ida.
                if column == "data_ida" {
                    sqlx::query("UPDATE clientes SET data_ida = data_compra_voo WHERE data_ida = ''")
                        .execute(&self.pool)
                        .await?;
                }
            }
        }

        for ddl in [
            "CREATE INDEX IF NOT EXISTS idx_clientes_data_compra ON clientes (data_compra_voo)",
            "CREATE INDEX IF NOT EXISTS idx_clientes_nome ON clientes (nome_completo)",
            "CREATE INDEX IF NOT EXISTS idx_clientes_data_ida ON clientes (data_ida)",
        ] {
            sqlx::query(ddl).execute(&self.pool).await?;
        }

        Ok(())
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    /// Insere e devolve o ID gerado.
    pub async fn insert(&self, data: &NovoCliente) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clientes (
                nome_completo, data_nascimento, data_compra_voo, doc_tipo, doc_valor,
                valor_venda_cents, valor_lucro_cents, valor_pago_cents,
                data_ida, data_volta, doc_voo_path, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, DATE('now'))
            "#,
        )
        .bind(&data.nome_completo)
        .bind(data.data_nascimento)
        .bind(data.data_compra_voo)
        .bind(data.doc_tipo)
        .bind(&data.doc_valor)
        .bind(data.valor_venda_cents)
        .bind(data.valor_lucro_cents)
        .bind(data.valor_pago_cents)
        .bind(data.data_ida)
        .bind(data.data_volta)
        .bind(data.doc_voo_path.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Atualiza no lugar. Retorna quantas linhas mudaram (0 = ID inexistente).
    pub async fn update(&self, id: i64, data: &NovoCliente) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE clientes SET
                nome_completo = ?1, data_nascimento = ?2, data_compra_voo = ?3,
                doc_tipo = ?4, doc_valor = ?5, valor_venda_cents = ?6,
                valor_lucro_cents = ?7, valor_pago_cents = ?8,
                data_ida = ?9, data_volta = ?10, doc_voo_path = ?11,
                updated_at = DATE('now')
            WHERE id = ?12
            "#,
        )
        .bind(&data.nome_completo)
        .bind(data.data_nascimento)
        .bind(data.data_compra_voo)
        .bind(data.doc_tipo)
        .bind(&data.doc_valor)
        .bind(data.valor_venda_cents)
        .bind(data.valor_lucro_cents)
        .bind(data.valor_pago_cents)
        .bind(data.data_ida)
        .bind(data.data_volta)
        .bind(data.doc_voo_path.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Cliente>, AppError> {
        let sql = format!("{SELECT_CLIENTE} WHERE id = ?1");
        let cliente = sqlx::query_as::<_, Cliente>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cliente)
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    /// Busca por trecho do nome ou do documento. Em branco lista tudo.
    pub async fn list(&self, search: &str) -> Result<Vec<Cliente>, AppError> {
        let search = search.trim();

        let clientes = if search.is_empty() {
            let sql = format!("{SELECT_CLIENTE}{ORDER_BY_COMPRA}");
            sqlx::query_as::<_, Cliente>(&sql)
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!(
                "{SELECT_CLIENTE} WHERE nome_completo LIKE ?1 OR doc_valor LIKE ?1{ORDER_BY_COMPRA}"
            );
            sqlx::query_as::<_, Cliente>(&sql)
                .bind(format!("%{}%", search))
                .fetch_all(&self.pool)
                .await?
        };

        Ok(clientes)
    }

    /// Clientes cuja data de compra cai no ano (e mês, se informado).
    pub async fn list_by_month_year(
        &self,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<Cliente>, AppError> {
        let clientes = match month {
            Some(m) => {
                let sql = format!(
                    "{SELECT_CLIENTE} WHERE strftime('%Y', data_compra_voo) = ?1 AND strftime('%m', data_compra_voo) = ?2{ORDER_BY_COMPRA}"
                );
                sqlx::query_as::<_, Cliente>(&sql)
                    .bind(format!("{:04}", year))
                    .bind(format!("{:02}", m))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{SELECT_CLIENTE} WHERE strftime('%Y', data_compra_voo) = ?1{ORDER_BY_COMPRA}"
                );
                sqlx::query_as::<_, Cliente>(&sql)
                    .bind(format!("{:04}", year))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(clientes)
    }

    /// Soma do lucro. O mês só vale junto com o ano; sem ano soma tudo.
    pub async fn sum_lucro(&self, year: Option<i32>, month: Option<u32>) -> Result<i64, AppError> {
        let total = match (year, month) {
            (Some(y), Some(m)) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COALESCE(SUM(valor_lucro_cents), 0) FROM clientes WHERE strftime('%Y', data_compra_voo) = ?1 AND strftime('%m', data_compra_voo) = ?2",
                )
                .bind(format!("{:04}", y))
                .bind(format!("{:02}", m))
                .fetch_one(&self.pool)
                .await?
            }
            (Some(y), None) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COALESCE(SUM(valor_lucro_cents), 0) FROM clientes WHERE strftime('%Y', data_compra_voo) = ?1",
                )
                .bind(format!("{:04}", y))
                .fetch_one(&self.pool)
                .await?
            }
            (None, _) => {
                sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(valor_lucro_cents), 0) FROM clientes")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(total)
    }

    /// Anos com compras, em ordem crescente. Banco vazio devolve o ano atual.
    pub async fn available_years(&self) -> Result<Vec<i32>, AppError> {
        let rows = sqlx::query_scalar::<_, Option<String>>(
            "SELECT DISTINCT strftime('%Y', data_compra_voo) AS y FROM clientes ORDER BY y ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut years: Vec<i32> = rows
            .into_iter()
            .flatten()
            .filter_map(|y| y.parse().ok())
            .collect();

        if years.is_empty() {
            years.push(Local::now().year());
        }

        Ok(years)
    }

    pub async fn flights_departing_on(&self, target: NaiveDate) -> Result<Vec<VooResumo>, AppError> {
        let voos = sqlx::query_as::<_, VooResumo>(
            r#"
            SELECT id, nome_completo, data_ida, data_volta, doc_tipo, doc_valor, doc_voo_path
            FROM clientes
            WHERE data_ida = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(target)
        .fetch_all(&self.pool)
        .await?;

        Ok(voos)
    }
}
