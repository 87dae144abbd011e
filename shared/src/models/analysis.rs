//! Product photo analysis result types
//!
//! Wire shape follows the JSON the vision backend is instructed to emit
//! (Portuguese keys: `nome`, `descricao`, `categoria`, `variantes`).

use serde::{Deserialize, Serialize};

/// One color variant detected in the product photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedVariant {
    /// Color name in pt-BR
    #[serde(rename = "cor")]
    pub color: String,
    /// Approximate display color, `#RRGGBB`
    #[serde(rename = "corHex")]
    pub color_hex: String,
}

/// Structured product description extracted from photos.
///
/// Best-effort: any field the model omits degrades to its default and is
/// left for manual entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "variantes", default)]
    pub variants: Vec<AnalyzedVariant>,
}
