// src/services/cliente_service.rs

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::{
    common::{
        cpf::{somente_digitos, valido_cpf},
        datas::parse_br_date,
        error::AppError,
        lucro::{LucroField, LucroMode},
        moeda::{format_cents_br, parse_currency_to_cents},
    },
    db::ClienteRepository,
    models::{
        cliente::{Cliente, ClienteForm, DocumentType, NovoCliente},
        relatorio::{LucroPreview, LucroPreviewRequest},
    },
};

pub const DOCUMENTOS_PADRAO: &str = "documentos";

// Ordem em que a tela confere os campos obrigatórios
const ORDEM_CAMPOS: [&str; 7] = [
    "nome_completo",
    "data_nascimento",
    "data_compra_voo",
    "data_ida",
    "doc_tipo",
    "doc_valor",
    "valor_venda",
];

fn primeira_mensagem(errors: &ValidationErrors) -> Option<String> {
    let field_errors = errors.field_errors();
    ORDEM_CAMPOS.iter().find_map(|campo| {
        field_errors
            .get(*campo)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
    })
}

// Colunas ordenáveis da tabela principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Nome,
    Nascimento,
    Compra,
    Ida,
    Volta,
    Doc,
    Venda,
    Pago,
    Lucro,
}

impl SortColumn {
    fn compare(self, a: &Cliente, b: &Cliente) -> Ordering {
        match self {
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::Nome => a.nome_completo.to_lowercase().cmp(&b.nome_completo.to_lowercase()),
            SortColumn::Nascimento => a.data_nascimento.cmp(&b.data_nascimento),
            SortColumn::Compra => a.data_compra_voo.cmp(&b.data_compra_voo),
            SortColumn::Ida => a.data_ida.cmp(&b.data_ida),
            // Sem volta fica antes de qualquer data
            SortColumn::Volta => a.data_volta.cmp(&b.data_volta),
            SortColumn::Doc => a.documento().to_lowercase().cmp(&b.documento().to_lowercase()),
            SortColumn::Venda => a.valor_venda_cents.cmp(&b.valor_venda_cents),
            SortColumn::Pago => a.valor_pago_cents.cmp(&b.valor_pago_cents),
            SortColumn::Lucro => a.valor_lucro_cents.cmp(&b.valor_lucro_cents),
        }
    }
}

/// Ordenação estável, como o clique no cabeçalho da tabela.
pub fn sort_clientes(clientes: &mut [Cliente], column: SortColumn, ascending: bool) {
    if ascending {
        clientes.sort_by(|a, b| column.compare(a, b));
    } else {
        clientes.sort_by(|a, b| column.compare(b, a));
    }
}

#[derive(Clone)]
pub struct ClienteService {
    lucro_mode: LucroMode,
    // Único lugar de onde documentos de voo podem ser lidos
    documentos_dir: PathBuf,
}

impl ClienteService {
    pub fn new(lucro_mode: LucroMode) -> Self {
        Self {
            lucro_mode,
            documentos_dir: PathBuf::from(DOCUMENTOS_PADRAO),
        }
    }

    pub fn with_documentos_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documentos_dir = dir.into();
        self
    }

    pub fn documentos_dir(&self) -> &Path {
        &self.documentos_dir
    }

    pub fn lucro_mode(&self) -> LucroMode {
        self.lucro_mode
    }

    // --- MOTOR DE VALIDAÇÃO ---
    // Um erro por vez: a mensagem do primeiro campo que falhar.
    pub fn validate_form(&self, form: &ClienteForm) -> Result<NovoCliente, AppError> {
        let f = form.normalized();

        if let Err(errors) = f.validate() {
            return Err(match primeira_mensagem(&errors) {
                Some(msg) => AppError::validation(msg),
                None => AppError::InvalidPayload(errors),
            });
        }

        let pago_str = f.valor_pago.as_deref();
        let lucro_str = LucroField::from_input(f.valor_lucro.as_deref())
            .resolve(&f.valor_venda, pago_str, self.lucro_mode)
            .ok_or_else(|| AppError::validation("Informe o Valor lucrado."))?;

        let data_nascimento = parse_br_date(&f.data_nascimento)
            .map_err(|_| AppError::format("Data de nascimento inválida. Use DD/MM/AAAA."))?;
        let data_compra_voo = parse_br_date(&f.data_compra_voo)
            .map_err(|_| AppError::format("Data de compra do voo inválida. Use DD/MM/AAAA."))?;
        let data_ida = parse_br_date(&f.data_ida)
            .map_err(|_| AppError::format("Data de ida inválida. Use DD/MM/AAAA."))?;
        let data_volta = f
            .data_volta
            .as_deref()
            .map(parse_br_date)
            .transpose()
            .map_err(|_| AppError::format("Data de volta inválida. Use DD/MM/AAAA."))?;

        // Já validado pelo `validator`
        let doc_tipo = DocumentType::parse(&f.doc_tipo).ok_or_else(|| {
            AppError::validation("Selecione o tipo de documento (CPF ou Passaporte).")
        })?;

        if doc_tipo == DocumentType::Cpf && !valido_cpf(&f.doc_valor) {
            return Err(AppError::validation(
                "CPF inválido. Verifique os dígitos (11 números).",
            ));
        }

        let valor_venda_cents = parse_currency_to_cents(Some(f.valor_venda.as_str()))
            .map_err(|_| AppError::format("Valor de compra inválido."))?;
        let valor_pago_cents = parse_currency_to_cents(pago_str)
            .map_err(|_| AppError::format("Valor pago inválido."))?;
        let valor_lucro_cents = parse_currency_to_cents(Some(lucro_str.as_str()))
            .map_err(|_| AppError::format("Valor lucrado inválido."))?;

        // Venda não pode ser negativa; Pago e Lucro podem.
        if valor_venda_cents < 0 {
            return Err(AppError::validation(
                "Valor de compra não pode ser negativo. 'Valor pago' e 'Lucro' podem ser negativos.",
            ));
        }

        let doc_valor = match doc_tipo {
            DocumentType::Cpf => somente_digitos(&f.doc_valor),
            DocumentType::Passaporte => f.doc_valor,
        };

        Ok(NovoCliente {
            nome_completo: f.nome_completo,
            data_nascimento,
            data_compra_voo,
            doc_tipo,
            doc_valor,
            valor_venda_cents,
            valor_lucro_cents,
            valor_pago_cents,
            data_ida,
            data_volta,
            doc_voo_path: f.doc_voo_path,
        })
    }

    pub async fn create(&self, repo: &ClienteRepository, form: &ClienteForm) -> Result<Cliente, AppError> {
        let data = self.validate_form(form)?;
        let id = repo.insert(&data).await?;
        tracing::info!("Cliente criado com ID {}.", id);

        repo.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("cliente {id} sumiu após INSERT")))
    }

    /// `None` quando o ID não existe: a atualização vira no-op.
    pub async fn update(
        &self,
        repo: &ClienteRepository,
        id: i64,
        form: &ClienteForm,
    ) -> Result<Option<Cliente>, AppError> {
        let data = self.validate_form(form)?;
        if repo.update(id, &data).await? == 0 {
            tracing::debug!("Atualização ignorada: cliente ID {} não existe.", id);
            return Ok(None);
        }
        tracing::info!("Cliente ID {} atualizado com sucesso.", id);
        repo.find_by_id(id).await
    }

    pub async fn delete(&self, repo: &ClienteRepository, id: i64) -> Result<(), AppError> {
        if repo.delete(id).await? == 0 {
            tracing::debug!("Exclusão ignorada: cliente ID {} não existe.", id);
        } else {
            tracing::info!("Cliente ID {} excluído.", id);
        }
        Ok(())
    }

    pub async fn list(
        &self,
        repo: &ClienteRepository,
        busca: &str,
        sort: Option<(SortColumn, bool)>,
    ) -> Result<Vec<Cliente>, AppError> {
        let mut clientes = repo.list(busca).await?;
        if let Some((column, ascending)) = sort {
            sort_clientes(&mut clientes, column, ascending);
        }
        Ok(clientes)
    }

    pub fn lucro_preview(&self, req: &LucroPreviewRequest) -> LucroPreview {
        let field = LucroField::from_input(req.valor_lucro.as_deref());
        let automatico = !field.is_overridden();

        let valor_lucro_cents = match &field {
            LucroField::Auto => self
                .lucro_mode
                .compute(&req.valor_venda, req.valor_pago.as_deref()),
            LucroField::UserOverridden(text) => parse_currency_to_cents(Some(text.as_str())).ok(),
        };

        LucroPreview {
            valor_lucro_cents,
            valor_lucro: valor_lucro_cents.map(|c| format_cents_br(Some(c))),
            automatico,
        }
    }

    /// Caminho e conteúdo do documento do voo de um cliente.
    /// Só serve arquivos dentro da pasta de documentos.
    pub async fn documento_voo(
        &self,
        repo: &ClienteRepository,
        id: i64,
    ) -> Result<(PathBuf, Vec<u8>), AppError> {
        let cliente = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente ID {id} não encontrado.")))?;

        let salvo = cliente
            .doc_voo_path
            .map(PathBuf::from)
            .ok_or_else(|| AppError::NotFound("Nenhum arquivo definido.".to_string()))?;

        let path = self.resolve_documento(&salvo).await?;
        let bytes = tokio::fs::read(&path).await?;
        Ok((path, bytes))
    }

    // Caminho relativo é relativo à pasta de documentos.
    // A comparação é feita depois de canonicalizar: ".." e links simbólicos não escapam.
    async fn resolve_documento(&self, salvo: &Path) -> Result<PathBuf, AppError> {
        let nao_encontrado =
            || AppError::NotFound("Arquivo não encontrado no caminho salvo.".to_string());

        let candidato = if salvo.is_relative() {
            self.documentos_dir.join(salvo)
        } else {
            salvo.to_path_buf()
        };

        let pasta = match tokio::fs::canonicalize(&self.documentos_dir).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(
                    "Pasta de documentos indisponível ({}): {}",
                    self.documentos_dir.display(),
                    e
                );
                return Err(nao_encontrado());
            }
        };
        let arquivo = match tokio::fs::canonicalize(&candidato).await {
            Ok(p) => p,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(nao_encontrado()),
            Err(e) => return Err(e.into()),
        };

        if !arquivo.starts_with(&pasta) || !arquivo.is_file() {
            tracing::warn!("Documento recusado fora da pasta: {}", candidato.display());
            return Err(nao_encontrado());
        }
        Ok(arquivo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form_valido() -> ClienteForm {
        ClienteForm {
            nome_completo: "Maria da Silva".into(),
            data_nascimento: "20/05/1990".into(),
            data_compra_voo: "01/03/2024".into(),
            data_ida: "10/07/2024".into(),
            data_volta: Some("20/07/2024".into()),
            doc_tipo: "CPF".into(),
            doc_valor: "529.982.247-25".into(),
            valor_venda: "R$ 1.000,00".into(),
            valor_pago: Some("R$ 1.250,50".into()),
            valor_lucro: None,
            doc_voo_path: None,
        }
    }

    fn erro(form: &ClienteForm) -> String {
        ClienteService::new(LucroMode::default())
            .validate_form(form)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_valid_form_computes_lucro() {
        let data = ClienteService::new(LucroMode::default())
            .validate_form(&form_valido())
            .unwrap();
        assert_eq!(data.doc_valor, "52998224725");
        assert_eq!(data.valor_venda_cents, 100_000);
        assert_eq!(data.valor_pago_cents, 125_050);
        assert_eq!(data.valor_lucro_cents, 25_050);
        assert_eq!(data.data_ida, NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
        assert_eq!(data.data_volta, NaiveDate::from_ymd_opt(2024, 7, 20));
    }

    #[test]
    fn test_user_lucro_is_kept() {
        let mut form = form_valido();
        form.valor_lucro = Some("R$ 10,00".into());
        let data = ClienteService::new(LucroMode::default()).validate_form(&form).unwrap();
        assert_eq!(data.valor_lucro_cents, 1000);
    }

    #[test]
    fn test_lucro_mode_changes_auto_value() {
        let data = ClienteService::new(LucroMode::VendaMenosPago)
            .validate_form(&form_valido())
            .unwrap();
        assert_eq!(data.valor_lucro_cents, -25_050);
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let mut form = ClienteForm::default();
        assert_eq!(erro(&form), "Informe o Nome completo.");

        form.nome_completo = "Ana".into();
        form.data_ida = "10/07/2024".into();
        assert_eq!(erro(&form), "Informe a Data de nascimento.");

        let mut form = form_valido();
        form.doc_tipo = "RG".into();
        form.doc_valor = String::new();
        assert_eq!(erro(&form), "Selecione o tipo de documento (CPF ou Passaporte).");

        let mut form = form_valido();
        form.valor_venda = "R$ 0,00".into();
        assert_eq!(erro(&form), "Informe o Valor de compra.");
    }

    #[test]
    fn test_unparseable_lucro_is_required() {
        let mut form = form_valido();
        form.valor_venda = "abc".into();
        assert_eq!(erro(&form), "Informe o Valor lucrado.");
    }

    #[test]
    fn test_invalid_dates() {
        let mut form = form_valido();
        form.data_compra_voo = "31/02/2024".into();
        assert_eq!(erro(&form), "Data de compra do voo inválida. Use DD/MM/AAAA.");

        let mut form = form_valido();
        form.data_volta = Some("2024-07-20".into());
        assert_eq!(erro(&form), "Data de volta inválida. Use DD/MM/AAAA.");
    }

    #[test]
    fn test_invalid_cpf_and_passport() {
        let mut form = form_valido();
        form.doc_valor = "529.982.247-26".into();
        assert_eq!(erro(&form), "CPF inválido. Verifique os dígitos (11 números).");

        form.doc_tipo = "Passaporte".into();
        form.doc_valor = " FX 12345 ".into();
        let data = ClienteService::new(LucroMode::default()).validate_form(&form).unwrap();
        assert_eq!(data.doc_valor, "FX 12345");
    }

    #[test]
    fn test_negative_sale_rejected_negative_paid_allowed() {
        let mut form = form_valido();
        form.valor_venda = "-R$ 10,00".into();
        form.valor_lucro = Some("R$ 1,00".into());
        assert!(erro(&form).starts_with("Valor de compra não pode ser negativo."));

        let mut form = form_valido();
        form.valor_pago = Some("(R$ 200,00)".into());
        let data = ClienteService::new(LucroMode::default()).validate_form(&form).unwrap();
        assert_eq!(data.valor_pago_cents, -20_000);
        assert_eq!(data.valor_lucro_cents, -120_000);
    }

    #[test]
    fn test_invalid_paid_value() {
        let mut form = form_valido();
        form.valor_pago = Some("1.2.3".into());
        form.valor_lucro = Some("R$ 5,00".into());
        assert_eq!(erro(&form), "Valor pago inválido.");
    }

    #[test]
    fn test_lucro_preview() {
        let service = ClienteService::new(LucroMode::default());
        let auto = service.lucro_preview(&LucroPreviewRequest {
            valor_venda: "R$100,00".into(),
            valor_pago: Some("R$150,00".into()),
            valor_lucro: None,
        });
        assert!(auto.automatico);
        assert_eq!(auto.valor_lucro_cents, Some(5000));
        assert_eq!(auto.valor_lucro.as_deref(), Some("R$ 50,00"));

        let manual = service.lucro_preview(&LucroPreviewRequest {
            valor_venda: "R$100,00".into(),
            valor_pago: None,
            valor_lucro: Some("R$ 7,00".into()),
        });
        assert!(!manual.automatico);
        assert_eq!(manual.valor_lucro_cents, Some(700));
    }

    #[test]
    fn test_sort_clientes() {
        let base = crate::db::cliente_repo::tests::novo(
            "x",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            0,
        );
        let make = |id: i64, nome: &str, lucro: i64| Cliente {
            id,
            nome_completo: nome.to_string(),
            data_nascimento: base.data_nascimento,
            data_compra_voo: base.data_compra_voo,
            doc_tipo: base.doc_tipo,
            doc_valor: base.doc_valor.clone(),
            valor_venda_cents: 0,
            valor_lucro_cents: lucro,
            valor_pago_cents: 0,
            data_ida: base.data_ida,
            data_volta: None,
            doc_voo_path: None,
            created_at: None,
            updated_at: None,
        };
        let mut clientes = vec![make(1, "bruno", 50), make(2, "Ana", -10), make(3, "carla", 50)];

        sort_clientes(&mut clientes, SortColumn::Nome, true);
        assert_eq!(clientes.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        sort_clientes(&mut clientes, SortColumn::Lucro, false);
        assert_eq!(clientes.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    async fn repo_com_documento(
        dir: &tempfile::TempDir,
        caminho: Option<String>,
    ) -> (ClienteRepository, i64) {
        use crate::db::{cliente_repo::tests::novo, DatabaseConfig};

        let repo = ClienteRepository::connect(DatabaseConfig::new(dir.path().join("doc.db")))
            .await
            .unwrap();
        let mut c = novo("Com documento", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0);
        c.doc_voo_path = caminho;
        let id = repo.insert(&c).await.unwrap();
        (repo, id)
    }

    #[tokio::test]
    async fn test_documento_voo_inside_folder() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        std::fs::write(docs.join("bilhete.pdf"), b"pdf").unwrap();

        let service = ClienteService::new(LucroMode::default()).with_documentos_dir(&docs);

        let (repo, id) =
            repo_com_documento(&dir, Some(docs.join("bilhete.pdf").display().to_string())).await;
        let (path, bytes) = service.documento_voo(&repo, id).await.unwrap();
        assert_eq!(bytes, b"pdf");
        assert!(path.ends_with("bilhete.pdf"));

        // Relativo à pasta de documentos
        let c = repo.find_by_id(id).await.unwrap().unwrap();
        let mut form_rel = crate::db::cliente_repo::tests::novo("Rel", c.data_compra_voo, 0);
        form_rel.doc_voo_path = Some("bilhete.pdf".to_string());
        let rel = repo.insert(&form_rel).await.unwrap();
        assert_eq!(service.documento_voo(&repo, rel).await.unwrap().1, b"pdf");
    }

    #[tokio::test]
    async fn test_documento_voo_refuses_paths_outside_folder() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        let fora = dir.path().join("segredo.txt");
        std::fs::write(&fora, b"nao pode").unwrap();

        let service = ClienteService::new(LucroMode::default()).with_documentos_dir(&docs);

        let (repo, id) = repo_com_documento(&dir, Some(fora.display().to_string())).await;
        assert!(matches!(
            service.documento_voo(&repo, id).await,
            Err(AppError::NotFound(_))
        ));

        let escapando = docs.join("..").join("segredo.txt").display().to_string();
        let (repo, id) = repo_com_documento(&dir, Some(escapando)).await;
        assert!(matches!(
            service.documento_voo(&repo, id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_documento_voo_missing() {
        let dir = tempfile::tempdir().unwrap();
        let service = ClienteService::new(LucroMode::default()).with_documentos_dir(dir.path());

        let (repo, id) = repo_com_documento(&dir, None).await;
        assert!(matches!(
            service.documento_voo(&repo, id).await,
            Err(AppError::NotFound(_))
        ));

        let sumido = dir.path().join("sumido.pdf").display().to_string();
        let (repo, id) = repo_com_documento(&dir, Some(sumido)).await;
        assert!(matches!(
            service.documento_voo(&repo, id).await,
            Err(AppError::NotFound(_))
        ));

        assert!(matches!(
            service.documento_voo(&repo, 9999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
