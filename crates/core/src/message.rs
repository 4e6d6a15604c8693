//! Order message presentation
//!
//! Pure formatting of a cart/order into the plain text shared over
//! WhatsApp, plus the `wa.me` link itself. No transport concerns here.

use rust_decimal::Decimal;

use crate::types::{order_total, Catalog, OrderItem};

/// Format a value as Brazilian currency, e.g. `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

/// Build the plain-text order summary shared with the seller.
pub fn order_text(catalog: &Catalog, items: &[OrderItem], order_link: Option<&str>) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Pedido B2B — {}", catalog.nome));
    if let Some(empresa) = catalog.empresa_nome.as_deref() {
        lines.push(format!("Empresa: {}", empresa));
    }
    if let Some(politica) = catalog.politica.as_deref() {
        lines.push(format!("Política: {}", politica));
    }
    lines.push(String::new());
    lines.push("Itens:".to_string());

    for item in items {
        lines.push(format!(
            "• {} | Ref: {} | Qtd: {} | {} | Sub: {}",
            item.nome,
            item.r#ref,
            item.qtd,
            format_brl(item.preco),
            format_brl(item.subtotal()),
        ));
    }

    lines.push(String::new());
    lines.push(format!("Total: {}", format_brl(order_total(items))));

    if let Some(link) = order_link {
        lines.push(String::new());
        lines.push(format!("Link do pedido: {}", link));
    }

    lines.join("\n")
}

/// Build a `wa.me` link carrying `text`. A phone with formatting characters
/// is reduced to its digits; without a phone the link opens the recipient
/// picker.
pub fn whatsapp_link(phone: Option<&str>, text: &str) -> String {
    let digits: String = phone
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let base = if digits.is_empty() {
        "https://wa.me/".to_string()
    } else {
        format!("https://wa.me/{}", digits)
    };

    format!("{}?text={}", base, encode_component(text))
}

/// Percent-encode for a URL query component (RFC 3986 unreserved set).
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn catalog() -> Catalog {
        Catalog {
            id: 1,
            nome: "Brinquedos 2026".into(),
            ano: Some(2026),
            pdf_url: "https://example.com/catalogo.pdf".into(),
            empresa_nome: Some("ACME Ltda".into()),
            whatsapp_phone: Some("+55 (11) 98765-4321".into()),
            politica: None,
            created_at: Utc::now(),
        }
    }

    fn item() -> OrderItem {
        OrderItem {
            r#ref: "A1".into(),
            nome: "Boneca X".into(),
            pagina: Some(1),
            qtd: 3,
            qtd_multiplo: 3,
            preco: Decimal::new(1000, 2),
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(1000, 2)), "R$ 10,00");
        assert_eq!(format_brl(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(format_brl(Decimal::new(123456789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_order_text_lines() {
        let text = order_text(&catalog(), &[item()], Some("https://loja.example/p/abc"));
        assert!(text.contains("Pedido B2B — Brinquedos 2026"));
        assert!(text.contains("Empresa: ACME Ltda"));
        assert!(text.contains("• Boneca X | Ref: A1 | Qtd: 3 | R$ 10,00 | Sub: R$ 30,00"));
        assert!(text.contains("Total: R$ 30,00"));
        assert!(text.ends_with("Link do pedido: https://loja.example/p/abc"));
    }

    #[test]
    fn test_whatsapp_link_strips_phone_formatting() {
        let link = whatsapp_link(Some("+55 (11) 98765-4321"), "oi");
        assert_eq!(link, "https://wa.me/5511987654321?text=oi");
    }

    #[test]
    fn test_whatsapp_link_encodes_text() {
        let link = whatsapp_link(None, "Pedido: 2 itens\nTotal R$ 10,00");
        assert!(link.starts_with("https://wa.me/?text="));
        assert!(link.contains("%0A"));
        assert!(link.contains("%20"));
        assert!(!link.contains(' '));
    }
}
