//! Request/response DTOs shared between the server and its clients
//!
//! Keeping these in one place keeps the merchant dashboard, the storefront
//! page and the server agreeing on the wire format.

use crate::models::{BannerMessage, ChatMessage, OrderItemSnapshot, OrderStatus};
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Merchant registration payload — creates the merchant account and its store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub store_name: String,
    pub whatsapp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Slug of the freshly created store
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticated merchant info returned on login and `/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantInfo {
    pub id: String,
    pub email: String,
    pub store_id: String,
    pub store_slug: String,
    pub store_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub merchant: MerchantInfo,
}

// =============================================================================
// Store settings
// =============================================================================

/// Partial store update; settings fields use merge semantics — absent
/// fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdateRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frete_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagamento_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_messages: Option<Vec<BannerMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_delay_secs: Option<u64>,
}

// =============================================================================
// Storefront session / cart
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    /// Vi's opening message for this store
    pub welcome_message: String,
}

/// Add-to-cart payload. `size` omitted means "first size in stock for the
/// selected variant"; the server refuses the add when nothing is in stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub variant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeQtyRequest {
    /// Usually ±1
    pub delta: i32,
}

/// One cart line as shown to the shopper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
    pub product_id: String,
    pub variant_id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub qty: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: f64,
    pub total_qty: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_whatsapp: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_number: String,
    pub order_id: String,
    /// `wa.me` deep link carrying the formatted order message
    pub whatsapp_url: String,
}

/// Engagement monitor state for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementView {
    /// True when the inactivity window elapsed and the handoff prompt
    /// should be shown
    pub prompt_pending: bool,
    /// Human-handoff deep link for the store
    pub whatsapp_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptView {
    pub messages: Vec<ChatMessage>,
}

// =============================================================================
// Merchant orders / dashboard
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Order as listed in the merchant dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_whatsapp: String,
    pub items: Vec<OrderItemSnapshot>,
    pub total: f64,
    pub notes: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_sent_at: Option<String>,
    pub created_at: String,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Orders currently in NOVO
    pub novos: i64,
    /// Orders confirmed today
    pub confirmados: i64,
    /// Orders currently in EM_ENTREGA
    pub em_entrega: i64,
    /// Today's revenue, cancelled orders excluded
    pub total_hoje: f64,
}

/// Suggested outreach message for a stalled order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverySuggestion {
    pub label: String,
    pub message: String,
}

/// A NOVO order that stalled long enough to be worth recovering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryCandidate {
    pub order: OrderView,
    pub suggestions: Vec<RecoverySuggestion>,
    /// `wa.me` link to the customer, preloaded with the default nudge
    pub whatsapp_url: String,
}

/// The stock outreach templates offered in the recovery panel
pub fn recovery_suggestions() -> Vec<RecoverySuggestion> {
    vec![
        RecoverySuggestion {
            label: "Parcelar em 2x".to_string(),
            message: "Olá! Vi que você montou um pedido e não finalizou. Posso parcelar \
                      em 2x sem juros para você. Quer que eu reserve?"
                .to_string(),
        },
        RecoverySuggestion {
            label: "10% desconto".to_string(),
            message: "Olá! Que tal 10% de desconto para fechar seu pedido hoje? É por \
                      tempo limitado!"
                .to_string(),
        },
        RecoverySuggestion {
            label: "Entrega grátis".to_string(),
            message: "Olá! Retirada na loja sai com frete grátis. Quer que eu feche seu \
                      pedido com essa condição?"
                .to_string(),
        },
    ]
}

// =============================================================================
// Product analysis / upload
// =============================================================================

/// Photo analysis input: base64 images, data-URL prefixes tolerated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub size: usize,
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_cart_item_request_optional_size() {
        let req: AddCartItemRequest =
            serde_json::from_str(r#"{"product_id":"product:a","variant_id":"v1"}"#).unwrap();
        assert!(req.size.is_none());

        let req: AddCartItemRequest = serde_json::from_str(
            r#"{"product_id":"product:a","variant_id":"v1","size":"M"}"#,
        )
        .unwrap();
        assert_eq!(req.size.as_deref(), Some("M"));
    }

    #[test]
    fn test_checkout_request_defaults_notes() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"customer_name":"Ana","customer_whatsapp":"11 98888-7777"}"#,
        )
        .unwrap();
        assert!(req.notes.is_empty());
    }

    #[test]
    fn test_recovery_suggestions_are_three() {
        let suggestions = recovery_suggestions();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| !s.message.is_empty()));
    }
}
