//! Store wire types — settings, plans and banner messages

use serde::{Deserialize, Serialize};

/// Billing plan of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorePlan {
    #[default]
    Free,
    Starter,
    Pro,
    Loja,
}

/// Time-boxed banner message shown at the top of the storefront.
///
/// Dates are local `YYYY-MM-DD` strings; a missing bound is unbounded on
/// that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl BannerMessage {
    /// Whether the banner is visible on `today` (`YYYY-MM-DD`).
    ///
    /// Inclusive on both bounds; string comparison is sufficient for the
    /// fixed date format.
    pub fn visible_on(&self, today: &str) -> bool {
        if let Some(start) = &self.start_date
            && start.as_str() > today
        {
            return false;
        }
        if let Some(end) = &self.end_date
            && end.as_str() < today
        {
            return false;
        }
        true
    }
}

/// Merchant-editable store settings, stored as one JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Welcome message shown when Vi opens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Free-text shipping info, fed into the assistant context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frete_info: Option<String>,
    /// Free-text payment info, fed into the assistant context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagamento_info: Option<String>,
    /// Rotating storefront banners
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub banner_messages: Vec<BannerMessage>,
    /// Override for the engagement timer window, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_delay_secs: Option<u64>,
}
