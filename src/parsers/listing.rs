use scraper::Html;
use tracing::debug;
use url::Url;

use crate::models::{CompiledSrpSelectors, ProductSummary};
use crate::parsers::{attribute, first_text, image_source, resolve_link};

/// Extracts one summary per list item, in document order.
///
/// Items whose link is missing or cannot be made absolute are dropped, so
/// the output is never longer than the number of matched items.
pub fn extract_list(
    html: &str,
    selectors: &CompiledSrpSelectors,
    base_url: &Url,
) -> Vec<ProductSummary> {
    let document = Html::parse_document(html);
    let mut products = Vec::new();

    for item in document.select(&selectors.product_list_item) {
        let Some(href) = item
            .select(&selectors.link)
            .next()
            .and_then(|link| attribute(link, "href"))
        else {
            debug!("Skipping list item without a link");
            continue;
        };

        let Some(link) = resolve_link(&href, base_url) else {
            debug!("Skipping list item with unresolvable link: {}", href);
            continue;
        };

        let image_url = item
            .select(&selectors.image_url)
            .next()
            .and_then(|img| image_source(img, selectors.image_attribute.as_deref()));

        products.push(ProductSummary {
            title: first_text(item, &selectors.title),
            price: first_text(item, &selectors.price),
            link: link.to_string(),
            image_url,
        });
    }

    products
}
