// Metadata extraction over a parsed HTML document

use crate::result::Metadata;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

/// Walk `html` in document order and collect title, description and favicon.
///
/// Never fails: malformed markup is repaired by the parser and anything that
/// cannot be found is simply left unset.
pub fn extract_metadata(html: &str, base_url: &Url) -> Metadata {
    let document = Html::parse_document(html);
    let mut metadata = Metadata::new();

    // Explicit stack instead of recursion; children pushed in reverse so they
    // pop in document order.
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        if let Node::Element(element) = node.value() {
            match element.name() {
                "title" => {
                    if metadata.title.is_none()
                        && let Some(el) = ElementRef::wrap(node)
                    {
                        let text: String = el.text().collect();
                        metadata.offer_title(&text);
                    }
                }
                "meta" => apply_meta(&mut metadata, element),
                "link" => apply_link(&mut metadata, element, base_url),
                _ => {}
            }
        }
        stack.extend(node.children().rev());
    }

    metadata
}

fn apply_meta(metadata: &mut Metadata, element: &Element) {
    let mut name = "";
    let mut content = "";
    for (key, value) in element.attrs() {
        match key {
            "name" | "property" => name = value,
            "content" => content = value,
            _ => {}
        }
    }

    match name {
        "description" | "og:description" => metadata.offer_description(content),
        "og:title" => metadata.offer_title(content),
        _ => {}
    }
}

fn apply_link(metadata: &mut Metadata, element: &Element, base_url: &Url) {
    let mut rel = "";
    let mut href = "";
    for (key, value) in element.attrs() {
        match key {
            "rel" => rel = value,
            "href" => href = value,
            _ => {}
        }
    }

    if (rel == "icon" || rel == "shortcut icon") && !href.is_empty() {
        match base_url.join(href) {
            Ok(resolved) => metadata.set_favicon(resolved.to_string()),
            Err(e) => debug!("Skipping unresolvable favicon href {:?}: {}", href, e),
        }
    }
}
