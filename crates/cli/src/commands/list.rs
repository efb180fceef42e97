//! Print the products of a catalog document.

use std::io::Write;
use std::path::Path;

use catalog_api::store::JsonFileStore;
use catalog_core::CatalogDocument;

use super::CommandError;

/// Print one line per product to stdout.
///
/// # Errors
///
/// Returns an error if the document cannot be read or stdout is closed.
pub async fn run(file: &Path) -> Result<(), CommandError> {
    let document = JsonFileStore::new(file).read().await?;
    let stdout = std::io::stdout();
    render(&document, &mut stdout.lock())?;
    Ok(())
}

/// Write `id  price  name  [category, ...]` lines.
///
/// Category references that do not resolve are shown as the raw id.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn render(document: &CatalogDocument, out: &mut impl Write) -> std::io::Result<()> {
    for product in &document.products {
        let labels: Vec<&str> = product
            .categories
            .iter()
            .map(|id| document.category_label(id))
            .collect();
        writeln!(
            out,
            "{}\t{}\t{}\t[{}]",
            product.id,
            product.price,
            product.name,
            labels.join(", ")
        )?;
    }
    writeln!(
        out,
        "{} products, {} categories",
        document.products.len(),
        document.categories.len()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_fallback_labels() {
        let document: CatalogDocument = serde_json::from_str(
            r#"{
  "products": [{"id": "p1", "name": "Phone", "price": 999, "description": "A phone", "categories": ["c1", "gone"]}],
  "categories": [{"id": "c1", "name": "Electronics"}]
}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        render(&document, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "p1\t999.00\tPhone\t[Electronics, gone]\n1 products, 1 categories\n"
        );
    }
}
