//! Vi prompt building
//!
//! The system prompt is rebuilt on every call from a fresh catalog
//! snapshot, so Vi always answers against current stock.

use shared::models::StoreContext;

/// Static apology used when a stream dies mid-reply
pub const FALLBACK_APOLOGY: &str =
    "Desculpe, tive um problema. Tente novamente ou fale com nossa vendedora no WhatsApp! 😊";

/// Vi's opening message for a store
pub fn welcome_message(store_name: &str, custom: Option<&str>) -> String {
    match custom {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => format!(
            "Olá! 👋 Sou a **Vi**, assistente da {}. Me conta o que você está procurando \
             hoje? Posso buscar por estilo, ocasião, cor ou tamanho!",
            store_name
        ),
    }
}

/// Vi System Prompt
pub fn build_vi_system_prompt(ctx: &StoreContext) -> String {
    let product_lines: Vec<String> = ctx
        .products
        .iter()
        .map(|p| {
            let sizes = if p.sizes.is_empty() {
                "indisponível".to_string()
            } else {
                p.sizes.join(", ")
            };
            let colors = if p.colors.is_empty() {
                "-".to_string()
            } else {
                p.colors.join(", ")
            };
            let stock = if p.in_stock {
                "✓ em estoque"
            } else {
                "✗ esgotado"
            };
            format!(
                "- {} ({}) | R${:.2} | Cores: {} | Tamanhos: {} | {}",
                p.name, p.category, p.price, colors, sizes, stock
            )
        })
        .collect();

    let stock_section = if product_lines.is_empty() {
        "Nenhum produto cadastrado ainda.".to_string()
    } else {
        product_lines.join("\n")
    };

    let mut info_lines = String::new();
    if let Some(frete) = ctx.frete_info.as_deref().filter(|s| !s.trim().is_empty()) {
        info_lines.push_str(&format!("\n- Frete/entrega: {}", frete));
    }
    if let Some(pagamento) = ctx
        .pagamento_info
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        info_lines.push_str(&format!("\n- Pagamento: {}", pagamento));
    }
    let info_section = if info_lines.is_empty() {
        String::new()
    } else {
        format!("\n\n## INFORMAÇÕES DA LOJA{}", info_lines)
    };

    format!(
        "Você é a Vi, assistente virtual da loja \"{}\" no vend.ai.\n\
         Sua missão é ajudar clientes a encontrar a roupa perfeita e concluir a compra.\n\
         \n\
         ## ESTOQUE ATUAL\n\
         {}{}\n\
         \n\
         ## DIRETRIZES\n\
         - Seja simpática, próxima e use emojis com moderação\n\
         - Quando o cliente descrever o que quer, sugira produtos específicos do estoque acima\n\
         - Sempre mencione o preço e tamanhos disponíveis ao sugerir um produto\n\
         - Se um produto estiver esgotado, não o sugira (a menos que o cliente pergunte diretamente)\n\
         - Se não souber responder ou o cliente quiser falar com uma humana, diga: \"Vou te conectar com nossa vendedora no WhatsApp!\"\n\
         - Seja direta: no máximo 3 frases por resposta\n\
         - Nunca invente produtos que não existem no estoque acima\n\
         - Fale sempre em português do Brasil",
        ctx.name, stock_section, info_section
    )
}

/// Product Analysis Prompt — fixed instruction sent with the photos
pub const PRODUCT_ANALYSIS_PROMPT: &str = "Você é um especialista em moda feminina. Analise as imagens de produtos de roupas enviadas e retorne um JSON com:

{
  \"nome\": \"nome comercial do produto (ex: Vestido Midi Floral Manga Bufante)\",
  \"descricao\": \"descrição de 2-3 frases sobre o produto, destacando tecido, estilo e ocasião\",
  \"categoria\": \"um de: vestido | blusa | calca | conjunto | saia | outro\",
  \"variantes\": [
    {
      \"cor\": \"nome da cor em português\",
      \"corHex\": \"#RRGGBB (cor aproximada)\"
    }
  ]
}

Se houver múltiplas fotos com cores diferentes, liste cada cor como uma variante separada.
Retorne APENAS o JSON, sem markdown, sem explicação extra.";

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProductContext;

    fn ctx() -> StoreContext {
        StoreContext {
            name: "Bella Moda".to_string(),
            frete_info: Some("Envio em 24h para todo o Brasil".to_string()),
            pagamento_info: None,
            products: vec![
                ProductContext {
                    name: "Vestido Midi".to_string(),
                    category: "vestido".to_string(),
                    price: 129.9,
                    sizes: vec!["P".to_string(), "M".to_string()],
                    colors: vec!["Azul".to_string()],
                    in_stock: true,
                },
                ProductContext {
                    name: "Blusa Canelada".to_string(),
                    category: "blusa".to_string(),
                    price: 49.9,
                    sizes: vec![],
                    colors: vec!["Preto".to_string()],
                    in_stock: false,
                },
            ],
        }
    }

    #[test]
    fn test_prompt_lists_products_with_stock_flags() {
        let prompt = build_vi_system_prompt(&ctx());
        assert!(prompt.contains("loja \"Bella Moda\""));
        assert!(prompt.contains("- Vestido Midi (vestido) | R$129.90 | Cores: Azul | Tamanhos: P, M | ✓ em estoque"));
        assert!(prompt.contains("- Blusa Canelada (blusa) | R$49.90 | Cores: Preto | Tamanhos: indisponível | ✗ esgotado"));
        assert!(prompt.contains("Frete/entrega: Envio em 24h"));
        assert!(!prompt.contains("Pagamento:"));
    }

    #[test]
    fn test_prompt_with_empty_catalog() {
        let ctx = StoreContext {
            name: "Loja Nova".to_string(),
            ..Default::default()
        };
        let prompt = build_vi_system_prompt(&ctx);
        assert!(prompt.contains("Nenhum produto cadastrado ainda."));
        assert!(!prompt.contains("INFORMAÇÕES DA LOJA"));
    }

    #[test]
    fn test_welcome_message_custom_wins() {
        let msg = welcome_message("Bella Moda", None);
        assert!(msg.contains("assistente da Bella Moda"));

        let msg = welcome_message("Bella Moda", Some("Oi! Bem-vinda à Bella 💕"));
        assert_eq!(msg, "Oi! Bem-vinda à Bella 💕");

        // Blank custom message falls back to the default
        let msg = welcome_message("Bella Moda", Some("   "));
        assert!(msg.contains("Sou a **Vi**"));
    }
}
