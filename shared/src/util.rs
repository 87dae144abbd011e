//! Small helpers shared across the platform

use rand::Rng;

/// Generate a human-readable 4-digit order number ("1000".."9999").
///
/// Random with no uniqueness check — collisions across a store's order
/// history are possible and accepted.
pub fn generate_order_number() -> String {
    let n: u32 = rand::thread_rng().gen_range(1000..10000);
    n.to_string()
}

/// Strip every non-digit character from a phone number.
///
/// WhatsApp numbers are stored and dialed digits-only.
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Slugify a store name: lowercase ASCII, accents folded, spaces to dashes,
/// anything else dropped, max 40 chars.
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.to_lowercase().chars() {
        let mapped = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            ' ' | '\t' => '-',
            c => c,
        };
        if mapped.is_ascii_lowercase() || mapped.is_ascii_digit() || mapped == '-' {
            slug.push(mapped);
        }
        if slug.len() >= 40 {
            break;
        }
    }
    // Collapse runs of dashes and trim the edges
    let mut out = String::with_capacity(slug.len());
    let mut prev_dash = true;
    for c in slug.chars() {
        if c == '-' {
            if !prev_dash {
                out.push('-');
            }
            prev_dash = true;
        } else {
            out.push(c);
            prev_dash = false;
        }
    }
    out.trim_end_matches('-').to_string()
}
