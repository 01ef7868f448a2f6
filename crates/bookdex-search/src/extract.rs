//! Plain-text extraction from rendered HTML.
//!
//! Text nodes are taken in document order, each one trimmed, and the
//! non-empty ones joined with a single space: `<p>Hello <b>World</b></p>`
//! becomes `"Hello World"`. Whitespace inside a text node is kept as is.
//!
//! The parser runs with scripting enabled, so `<noscript>` content arrives as
//! a single raw-text node. That text is parsed again so its fallback copy is
//! indexed without the tags. Other raw-text containers are skipped.

use scraper::{Html, Node};
use tracing::debug;

/// Elements whose text content is not page text.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "template", "iframe", "noembed", "noframes", "xmp",
];

/// Raw-text element whose content is markup to be extracted again.
const REPARSED_ELEMENT: &str = "noscript";

/// Extract search text from an HTML fragment.
///
/// Never fails: malformed markup is recovered by the parser and whatever text
/// it yields is returned.
pub fn extract(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);

    if !fragment.errors.is_empty() {
        debug!(
            errors = fragment.errors.len(),
            first = %fragment.errors[0],
            "recovered from malformed markup"
        );
    }

    let mut text = String::with_capacity(markup.len() / 2);

    for node in fragment.tree.root().descendants() {
        let Node::Text(token) = node.value() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if skipped {
            continue;
        }

        let reparse = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| el.name() == REPARSED_ELEMENT);

        if reparse {
            push_token(&mut text, &extract(token));
        } else {
            push_token(&mut text, token);
        }
    }

    text
}

fn push_token(text: &mut String, token: &str) {
    let token = token.trim();
    if token.is_empty() {
        return;
    }

    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(token);
}
