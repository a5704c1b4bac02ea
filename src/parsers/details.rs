use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::{CompiledPdpSelectors, ProductDetail, Specifications};
use crate::parsers::{element_text, image_source};

/// Extracts a product page into a [`ProductDetail`]. Missing elements leave
/// the corresponding field absent; this never fails.
pub fn extract_detail(html: &str, selectors: &CompiledPdpSelectors) -> ProductDetail {
    let document = Html::parse_document(html);

    let main_image_url = document
        .select(&selectors.main_image)
        .next()
        .and_then(|img| image_source(img, selectors.image_attribute.as_deref()));

    let sku = selectors
        .sku
        .as_ref()
        .and_then(|selector| first_in_document(&document, selector));

    let specifications = match document.select(&selectors.specifications_table).next() {
        Some(table) => parse_specifications(
            table,
            &selectors.spec_row_key,
            &selectors.spec_row_value,
        ),
        None => Specifications::new(),
    };

    ProductDetail {
        title: first_in_document(&document, &selectors.title),
        price: first_in_document(&document, &selectors.price),
        description: first_in_document(&document, &selectors.description),
        specifications,
        main_image_url,
        sku,
    }
}

fn first_in_document(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().and_then(element_text)
}

fn parse_specifications(
    table: ElementRef<'_>,
    key_selector: &Selector,
    value_selector: &Selector,
) -> Specifications {
    let mut specs = Specifications::new();

    for key_element in table.select(key_selector) {
        let Some(key) = element_text(key_element) else {
            continue;
        };

        let Some(value) = row_value(key_element, value_selector) else {
            debug!("No value found for specification key '{}'", key);
            continue;
        };

        if let Some(previous) = specs.insert(key.clone(), value) {
            debug!("Specification '{}' repeated, replacing '{}'", key, previous);
        }
    }

    specs
}

/// Value for a key cell: the next element sibling if it matches the value
/// selector, otherwise the first match anywhere under the key's parent.
fn row_value(key_element: ElementRef<'_>, value_selector: &Selector) -> Option<String> {
    let sibling = key_element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|sibling| value_selector.matches(sibling))
        .and_then(element_text);

    sibling.or_else(|| {
        key_element
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.select(value_selector).next())
            .and_then(element_text)
    })
}
