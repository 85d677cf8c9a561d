//! URL slugs for product pages.

/// Build the public slug for a product: `{title}-{sku}`, both slugified.
///
/// ```
/// use autopart_core::slug::product_slug;
///
/// assert_eq!(
///     product_slug("Motor Parcial Corolla 2.0", "TOY-COR-2016"),
///     "motor-parcial-corolla-2-0-toy-cor-2016"
/// );
/// assert_eq!(product_slug("Câmbio Automático", "VW 01"), "cambio-automatico-vw-01");
/// ```
#[must_use]
pub fn product_slug(title: &str, sku: &str) -> String {
    let title = slugify(title);
    let sku = slugify(sku);
    match (title.is_empty(), sku.is_empty()) {
        (_, true) => title,
        (true, false) => sku,
        (false, false) => format!("{title}-{sku}"),
    }
}

/// Lowercase, fold accents, and collapse every non-alphanumeric run to `-`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
