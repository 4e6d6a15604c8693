//! CSV product row transform
//!
//! Pure transform from raw CSV text to validated [`Product`] records,
//! independent of how the bytes arrived. Expected header (any column
//! order, case-insensitive): `pagina,nome,ref,qtd_multiplo,preco`.
//!
//! Row rules:
//! - `pagina` must be a positive integer, `ref` and `nome` non-empty;
//!   rows failing these are silently skipped, not fatal to the batch
//! - `qtd_multiplo` defaults to 1 and is floored at 1
//! - `preco` accepts `10.90`, `10,90` and `1.234,56`, clamped at >= 0

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::types::Product;

const REQUIRED_COLUMNS: [&str; 5] = ["pagina", "nome", "ref", "qtd_multiplo", "preco"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("CSV missing required columns: {0}")]
    MissingColumns(String),
}

/// Parse catalog CSV text into normalized product records.
///
/// Empty input yields an empty record set; a malformed header is an error.
pub fn parse_catalog_csv(text: &str) -> Result<Vec<Product>, ImportError> {
    let normalized = text
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let lines: Vec<&str> = normalized
        .split('\n')
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let delimiter = detect_delimiter(lines[0]);
    let header: Vec<String> = split_line(lines[0], delimiter)
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect();

    let position = |name: &str| header.iter().position(|h| h == name);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| position(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing.join(", ")));
    }

    let idx_pagina = position("pagina").unwrap();
    let idx_nome = position("nome").unwrap();
    let idx_ref = position("ref").unwrap();
    let idx_multiplo = position("qtd_multiplo").unwrap();
    let idx_preco = position("preco").unwrap();

    let mut records = Vec::new();
    for line in &lines[1..] {
        let cols = split_line(line, delimiter);
        let col = |i: usize| cols.get(i).map(|s| s.trim()).unwrap_or("");

        let Some(pagina) = parse_int(col(idx_pagina)).filter(|p| *p > 0) else {
            continue;
        };
        let nome = col(idx_nome).to_string();
        let r#ref = col(idx_ref).to_string();
        if nome.is_empty() || r#ref.is_empty() {
            continue;
        }

        records.push(Product {
            pagina,
            nome,
            r#ref,
            qtd_multiplo: parse_int(col(idx_multiplo)).unwrap_or(1).max(1),
            preco: parse_price(col(idx_preco)),
        });
    }

    Ok(records)
}

/// Parse a price with either decimal separator, clamped at zero.
///
/// `1.234,56` is read as Brazilian notation (dots group thousands); a plain
/// dot decimal like `10.90` passes through unchanged.
pub fn parse_price(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };

    Decimal::from_str(&normalized)
        .map(|d| d.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

/// Semicolon exports (common from Brazilian spreadsheets) are recognized by
/// the header line; comma is the default.
fn detect_delimiter(header_line: &str) -> char {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// Split one CSV line, honoring double quotes (`""` escapes a quote).
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                cur.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
            continue;
        }
        if ch == delimiter && !in_quotes {
            out.push(cur.trim().to_string());
            cur = String::new();
            continue;
        }
        cur.push(ch);
    }
    out.push(cur.trim().to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parses_basic_rows() {
        let csv = "pagina,nome,ref,qtd_multiplo,preco\n1,Boneca X,A1,3,10.00\n2,Carrinho,B2,,5.90";
        let rows = parse_catalog_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].r#ref, "A1");
        assert_eq!(rows[0].qtd_multiplo, 3);
        assert_eq!(rows[0].preco, Decimal::new(1000, 2));
        // empty qtd_multiplo defaults to 1
        assert_eq!(rows[1].qtd_multiplo, 1);
    }

    #[test]
    fn test_header_is_order_independent_and_case_insensitive() {
        let csv = "PRECO,REF,NOME,QTD_MULTIPLO,PAGINA\n10.90,A1,Boneca X,3,7";
        let rows = parse_catalog_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pagina, 7);
        assert_eq!(rows[0].nome, "Boneca X");
        assert_eq!(rows[0].preco, Decimal::new(1090, 2));
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let err = parse_catalog_csv("pagina,nome,ref\n1,X,A1").unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumns("qtd_multiplo, preco".into())
        );
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let csv = concat!(
            "pagina,nome,ref,qtd_multiplo,preco\n",
            "0,Pagina invalida,A1,1,1.00\n",
            "abc,Pagina invalida,A2,1,1.00\n",
            "2,,A3,1,1.00\n",
            "2,Sem ref,,1,1.00\n",
            "3,Valida,A4,2,1.00\n",
        );
        let rows = parse_catalog_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].r#ref, "A4");
    }

    #[test]
    fn test_semicolon_delimiter_and_quotes() {
        let csv = "pagina;nome;ref;qtd_multiplo;preco\n1;\"Kit; 2 pecas\";\"A\"\"1\";3;1.234,56";
        let rows = parse_catalog_csv(csv).unwrap();
        assert_eq!(rows[0].nome, "Kit; 2 pecas");
        assert_eq!(rows[0].r#ref, "A\"1");
        assert_eq!(rows[0].preco, Decimal::new(123456, 2));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(parse_catalog_csv("").unwrap().is_empty());
        assert!(parse_catalog_csv("\n \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_price_variants() {
        assert_eq!(parse_price("10.90"), Decimal::new(1090, 2));
        assert_eq!(parse_price("10,90"), Decimal::new(1090, 2));
        assert_eq!(parse_price("1.234,56"), Decimal::new(123456, 2));
        assert_eq!(parse_price(""), Decimal::ZERO);
        assert_eq!(parse_price("abc"), Decimal::ZERO);
        // negatives clamp to zero
        assert_eq!(parse_price("-5,00"), Decimal::ZERO);
    }
}
