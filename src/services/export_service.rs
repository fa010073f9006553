// src/services/export_service.rs

use std::io::Write;

use csv::WriterBuilder;

use crate::{
    common::{datas::format_br_date, error::AppError, moeda::format_cents_br},
    models::cliente::Cliente,
};

pub const CABECALHO_CLIENTES: [&str; 10] = [
    "ID", "Nome", "Nascimento", "Compra", "Ida", "Volta", "Documento", "Venda", "Pago", "Lucro",
];

pub const CABECALHO_VENDAS: [&str; 9] = [
    "ID", "Nome", "Ida", "Volta", "Compra", "Documento", "Venda", "Pago", "Lucro",
];

// Uma linha como aparece na tabela: datas DD/MM/AAAA e dinheiro formatado
struct LinhaCliente {
    id: String,
    nome: String,
    nascimento: String,
    compra: String,
    ida: String,
    volta: String,
    documento: String,
    venda: String,
    pago: String,
    lucro: String,
}

impl From<&Cliente> for LinhaCliente {
    fn from(c: &Cliente) -> Self {
        Self {
            id: c.id.to_string(),
            nome: c.nome_completo.clone(),
            nascimento: format_br_date(c.data_nascimento),
            compra: format_br_date(c.data_compra_voo),
            ida: format_br_date(c.data_ida),
            volta: c.data_volta.map(format_br_date).unwrap_or_default(),
            documento: c.documento(),
            venda: format_cents_br(Some(c.valor_venda_cents)),
            pago: format_cents_br(Some(c.valor_pago_cents)),
            lucro: format_cents_br(Some(c.valor_lucro_cents)),
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Lista principal (`ID;Nome;Nascimento;Compra;Ida;Volta;Documento;Venda;Pago;Lucro`).
    pub fn write_clientes<W: Write>(writer: W, clientes: &[Cliente]) -> Result<W, AppError> {
        let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(writer);
        wtr.write_record(CABECALHO_CLIENTES)?;

        for c in clientes {
            let l = LinhaCliente::from(c);
            wtr.write_record([
                &l.id, &l.nome, &l.nascimento, &l.compra, &l.ida, &l.volta, &l.documento,
                &l.venda, &l.pago, &l.lucro,
            ])?;
        }

        wtr.into_inner().map_err(|e| AppError::IoError(e.into_error()))
    }

    /// Tela Mês/Ano: mesma informação sem nascimento, com a ida primeiro.
    pub fn write_vendas<W: Write>(writer: W, clientes: &[Cliente]) -> Result<W, AppError> {
        let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(writer);
        wtr.write_record(CABECALHO_VENDAS)?;

        for c in clientes {
            let l = LinhaCliente::from(c);
            wtr.write_record([
                &l.id, &l.nome, &l.ida, &l.volta, &l.compra, &l.documento, &l.venda, &l.pago,
                &l.lucro,
            ])?;
        }

        wtr.into_inner().map_err(|e| AppError::IoError(e.into_error()))
    }

    pub fn clientes_csv(clientes: &[Cliente]) -> Result<Vec<u8>, AppError> {
        Self::write_clientes(Vec::new(), clientes)
    }

    pub fn vendas_csv(clientes: &[Cliente]) -> Result<Vec<u8>, AppError> {
        Self::write_vendas(Vec::new(), clientes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cliente::DocumentType;
    use chrono::NaiveDate;

    fn cliente() -> Cliente {
        Cliente {
            id: 7,
            nome_completo: "João; \"Jota\" Pereira".to_string(),
            data_nascimento: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
            data_compra_voo: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            doc_tipo: DocumentType::Cpf,
            doc_valor: "52998224725".to_string(),
            valor_venda_cents: 123_456,
            valor_lucro_cents: -5,
            valor_pago_cents: 123_451,
            data_ida: NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
            data_volta: None,
            doc_voo_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_clientes_csv() {
        let bytes = ExportService::clientes_csv(&[cliente()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID;Nome;Nascimento;Compra;Ida;Volta;Documento;Venda;Pago;Lucro"));
        assert_eq!(
            lines.next(),
            Some("7;\"João; \"\"Jota\"\" Pereira\";02/01/1985;04/03/2024;10/09/2024;;CPF: 52998224725;R$ 1.234,56;R$ 1.234,51;-R$ 0,05")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_vendas_csv_reads_back() {
        let bytes = ExportService::vendas_csv(&[cliente()]).unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(bytes.as_slice());

        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CABECALHO_VENDAS.to_vec());

        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "João; \"Jota\" Pereira");
        assert_eq!(&row[2], "10/09/2024");
        assert_eq!(&row[3], "");
        assert_eq!(&row[8], "-R$ 0,05");
    }

    #[test]
    fn test_empty_list_has_only_header() {
        let text = String::from_utf8(ExportService::clientes_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
