//! WhatsApp message templating and deep links
//!
//! Checkout hands the shopper off to the store's WhatsApp with a formatted
//! order message; the engagement monitor and the recovery panel reuse the
//! same `wa.me` link building.

use chrono_tz::Tz;
use shared::models::OrderItemSnapshot;
use shared::util::digits_only;

use crate::money::{line_total, to_decimal, to_f64};
use crate::utils::time::now_display;

/// Default nudge used by the human-handoff prompt
const HANDOFF_TEXT: &str = "Olá! Gostaria de falar com uma vendedora.";

/// Everything the order message template needs
pub struct OrderMessage<'a> {
    pub store_slug: &'a str,
    pub order_number: &'a str,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub notes: &'a str,
    pub items: &'a [OrderItemSnapshot],
}

/// Format a price in BRL convention: comma decimal separator, 2 places
pub fn format_brl(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

/// Formata a mensagem de pedido para WhatsApp
pub fn format_order_message(msg: &OrderMessage<'_>, tz: Tz) -> String {
    let total = to_f64(
        msg.items
            .iter()
            .map(|i| line_total(i.price, i.qty))
            .fold(to_decimal(0.0), |acc, t| acc + t),
    );

    let item_lines: Vec<String> = msg
        .items
        .iter()
        .map(|item| {
            let subtotal = format_brl(to_f64(line_total(item.price, item.qty)));
            let color = if item.color.is_empty() {
                String::new()
            } else {
                format!(" — {}", item.color)
            };
            format!(
                "• {}{} — {} ({}x) — R$\u{a0}{}",
                item.name, color, item.size, item.qty, subtotal
            )
        })
        .collect();

    let mut lines = vec![
        format!("🛍️ *Novo Pedido #{} — vend.ai*", msg.order_number),
        String::new(),
        format!("👤 *Cliente:* {}", msg.customer_name),
        format!("📱 *WhatsApp:* {}", msg.customer_phone),
        String::new(),
        "━━━━━━━━━━━━━━━".to_string(),
        "🧾 *Itens do Pedido:*".to_string(),
        item_lines.join("\n"),
        "━━━━━━━━━━━━━━━".to_string(),
        format!("💰 *Total: R$\u{a0}{}*", format_brl(total)),
    ];

    if !msg.notes.is_empty() {
        lines.push(format!("\n📝 *Obs:* {}", msg.notes));
    }

    lines.push(String::new());
    lines.push(format!("⏰ {}", now_display(tz)));
    lines.push(String::new());
    lines.push(format!("Pedido feito via vend.ai/\u{200b}{}", msg.store_slug));

    lines.join("\n")
}

/// Gera URL wa.me — número só com dígitos, mensagem percent-encoded
pub fn build_whatsapp_url(whatsapp: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        digits_only(whatsapp),
        urlencoding::encode(message)
    )
}

/// `wa.me` link preloaded with the human-handoff nudge
pub fn handoff_url(whatsapp: &str) -> String {
    build_whatsapp_url(whatsapp, HANDOFF_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Sao_Paulo;

    fn items() -> Vec<OrderItemSnapshot> {
        vec![
            OrderItemSnapshot {
                product_id: "product:a".to_string(),
                name: "Vestido Midi".to_string(),
                size: "M".to_string(),
                color: "Azul".to_string(),
                qty: 1,
                price: 50.0,
            },
            OrderItemSnapshot {
                product_id: "product:b".to_string(),
                name: "Blusa Canelada".to_string(),
                size: "P".to_string(),
                color: String::new(),
                qty: 2,
                price: 30.0,
            },
        ]
    }

    fn message<'a>(items: &'a [OrderItemSnapshot]) -> OrderMessage<'a> {
        OrderMessage {
            store_slug: "bella-moda",
            order_number: "4821",
            customer_name: "Ana Souza",
            customer_phone: "11 98888-7777",
            notes: "Entregar após as 18h",
            items,
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(110.0), "110,00");
        assert_eq!(format_brl(49.9), "49,90");
        assert_eq!(format_brl(0.0), "0,00");
    }

    #[test]
    fn test_order_message_structure() {
        let items = items();
        let text = format_order_message(&message(&items), Sao_Paulo);

        assert!(text.starts_with("🛍️ *Novo Pedido #4821 — vend.ai*"));
        assert!(text.contains("👤 *Cliente:* Ana Souza"));
        assert!(text.contains("• Vestido Midi — Azul — M (1x) — R$\u{a0}50,00"));
        // Colorless item omits the color segment
        assert!(text.contains("• Blusa Canelada — P (2x) — R$\u{a0}60,00"));
        assert!(text.contains("💰 *Total: R$\u{a0}110,00*"));
        assert!(text.contains("📝 *Obs:* Entregar após as 18h"));
        assert!(text.ends_with("Pedido feito via vend.ai/\u{200b}bella-moda"));
    }

    #[test]
    fn test_order_message_without_notes() {
        let items = items();
        let mut msg = message(&items);
        msg.notes = "";
        let text = format_order_message(&msg, Sao_Paulo);
        assert!(!text.contains("*Obs:*"));
    }

    #[test]
    fn test_whatsapp_url_strips_non_digits_and_encodes() {
        let url = build_whatsapp_url("+55 (11) 98888-7777", "Olá, tudo bem?");
        assert!(url.starts_with("https://wa.me/5511988887777?text="));
        assert!(!url.contains(' '));
        assert!(url.contains("Ol%C3%A1"));
    }

    #[test]
    fn test_handoff_url() {
        let url = handoff_url("5511988887777");
        assert!(url.starts_with("https://wa.me/5511988887777?text=Ol%C3%A1"));
    }
}
