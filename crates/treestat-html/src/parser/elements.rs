//! Element categories used by tree construction.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//! "The elements in the stack of open elements fall into the following categories"

use treestat_dom::{ElementData, Namespace};

/// "Special" HTML elements.
const SPECIAL_HTML: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main", "marquee",
    "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p", "param",
    "plaintext", "pre", "script", "search", "section", "select", "source", "style", "summary",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title", "tr",
    "track", "ul", "wbr", "xmp",
];

/// "The following HTML elements are formatting elements"
pub const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// Start tags "in body" hands to the "in head" rules.
pub const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Start tags that cause a head element to be synthesized before the body.
/// `noscript` is head content too, but "in body" treats it as raw text.
pub const HEAD_ONLY: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "noscript", "script", "style",
    "template", "title",
];

/// Block-level start tags that close an open `p` first.
pub const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// End tags handled by "generate implied end tags, pop until".
pub const BLOCK_END: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// h1 through h6.
pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// Elements that may stay open at end of input without a parse error.
pub const OPEN_AT_EOF: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

/// Void elements inserted and popped immediately by "in body".
pub const VOID_IN_BODY: &[&str] = &["area", "br", "embed", "img", "keygen", "wbr", "input"];

/// Table section elements.
pub const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

/// Elements whose current-node status makes character tokens go through
/// "in table text".
pub const TABLE_TEXT_CONTEXT: &[&str] = &["table", "tbody", "template", "tfoot", "thead", "tr"];

/// Foster parenting applies when the target is one of these.
pub const FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
/// Start tags that break out of foreign content.
pub const FOREIGN_BREAKOUT: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// Which scope a "has an element in scope" query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// [has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    Default,
    /// [has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    ListItem,
    /// [has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    Button,
    /// [has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    Table,
}

/// Whether `element` terminates a scope query of kind `scope`.
pub fn is_scope_boundary(element: &ElementData, scope: Scope) -> bool {
    let tag = element.tag_name.as_str();
    match (element.namespace, scope) {
        (Namespace::Html, Scope::Table) => matches!(tag, "html" | "table" | "template"),
        (Namespace::Html, _) => {
            matches!(
                tag,
                "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                    | "template"
            ) || (scope == Scope::ListItem && matches!(tag, "ol" | "ul"))
                || (scope == Scope::Button && tag == "button")
        }
        (_, Scope::Table) => false,
        (Namespace::MathMl, _) => {
            matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
        }
        (Namespace::Svg, _) => matches!(tag, "foreignobject" | "desc" | "title"),
    }
}

/// "Special" category membership.
pub fn is_special(element: &ElementData) -> bool {
    let tag = element.tag_name.as_str();
    match element.namespace {
        Namespace::Html => SPECIAL_HTML.contains(&tag),
        Namespace::MathMl => matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        Namespace::Svg => matches!(tag, "foreignobject" | "desc" | "title"),
    }
}

/// [MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
pub fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && matches!(element.tag_name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// [HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
pub fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => {
            element.tag_name == "annotation-xml"
                && element.get_attribute("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
        }
        Namespace::Svg => matches!(element.tag_name.as_str(), "foreignobject" | "desc" | "title"),
        Namespace::Html => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, namespace: Namespace) -> ElementData {
        ElementData {
            namespace,
            ..ElementData::new(tag)
        }
    }

    #[test]
    fn test_button_scope_includes_button() {
        let button = element("button", Namespace::Html);
        assert!(is_scope_boundary(&button, Scope::Button));
        assert!(!is_scope_boundary(&button, Scope::Default));
    }

    #[test]
    fn test_table_scope_is_narrow() {
        assert!(!is_scope_boundary(&element("td", Namespace::Html), Scope::Table));
        assert!(is_scope_boundary(&element("table", Namespace::Html), Scope::Table));
        assert!(!is_scope_boundary(&element("mi", Namespace::MathMl), Scope::Table));
    }

    #[test]
    fn test_special_depends_on_namespace() {
        assert!(is_special(&element("title", Namespace::Svg)));
        assert!(is_special(&element("p", Namespace::Html)));
        assert!(!is_special(&element("p", Namespace::Svg)));
        assert!(!is_special(&element("b", Namespace::Html)));
    }
}
