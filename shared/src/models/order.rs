//! Order wire types shared between the server and merchant clients

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Serialized in the Portuguese ALL-CAPS form used across the platform
/// (`NOVO`, `CONFIRMADO`, `EM_ENTREGA`, `ENTREGUE`, `CANCELADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Novo,
    Confirmado,
    EmEntrega,
    Entregue,
    Cancelado,
}

impl OrderStatus {
    /// Merchant-facing display label (pt-BR)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Novo => "Novo",
            Self::Confirmado => "Confirmado",
            Self::EmEntrega => "Em Entrega",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
        }
    }

    /// Whether this status accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregue | Self::Cancelado)
    }

    /// The transitions the order flow expects from this status.
    ///
    /// Advisory only — the write path persists whatever status the merchant
    /// sends and merely logs when a transition falls outside this map.
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            Self::Novo => &[Self::Confirmado, Self::Cancelado],
            Self::Confirmado => &[Self::EmEntrega, Self::Cancelado],
            Self::EmEntrega => &[Self::Entregue],
            Self::Entregue | Self::Cancelado => &[],
        }
    }

    /// Check whether `target` is an expected transition from this status
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.next_statuses().contains(&target)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Novo => "NOVO",
            Self::Confirmado => "CONFIRMADO",
            Self::EmEntrega => "EM_ENTREGA",
            Self::Entregue => "ENTREGUE",
            Self::Cancelado => "CANCELADO",
        };
        write!(f, "{}", s)
    }
}

/// One line of an order's frozen item snapshot.
///
/// Copied from the cart at order creation; later catalog edits never
/// alter it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    pub product_id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub qty: i32,
    /// Unit price at add-to-cart time
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::EmEntrega).unwrap(),
            "\"EM_ENTREGA\""
        );
        let status: OrderStatus = serde_json::from_str("\"NOVO\"").unwrap();
        assert_eq!(status, OrderStatus::Novo);
        assert!(serde_json::from_str::<OrderStatus>("\"DESPACHADO\"").is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Novo.can_transition_to(OrderStatus::Confirmado));
        assert!(OrderStatus::Novo.can_transition_to(OrderStatus::Cancelado));
        assert!(!OrderStatus::Novo.can_transition_to(OrderStatus::Entregue));

        assert!(OrderStatus::Confirmado.can_transition_to(OrderStatus::EmEntrega));
        assert!(OrderStatus::Confirmado.can_transition_to(OrderStatus::Cancelado));
        assert!(!OrderStatus::Confirmado.can_transition_to(OrderStatus::Novo));

        assert!(OrderStatus::EmEntrega.can_transition_to(OrderStatus::Entregue));
        assert!(!OrderStatus::EmEntrega.can_transition_to(OrderStatus::Cancelado));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Entregue.is_terminal());
        assert!(OrderStatus::Cancelado.is_terminal());
        assert!(!OrderStatus::Novo.is_terminal());
        assert!(OrderStatus::Entregue.next_statuses().is_empty());
        assert!(OrderStatus::Cancelado.next_statuses().is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::EmEntrega.label(), "Em Entrega");
        assert_eq!(OrderStatus::Novo.label(), "Novo");
    }
}
