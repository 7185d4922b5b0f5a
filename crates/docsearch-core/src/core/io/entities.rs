use phf::phf_set;
use std::borrow::Cow;

/// Elements that never have content or an end tag.
pub(crate) static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
};

/// Elements whose content is raw text up to the matching end tag.
pub(crate) static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "script", "style",
};

/// Decodes named, decimal and hexadecimal character references in `raw`.
/// Text that is not a reference is left untouched.
pub(crate) fn decode(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

pub(crate) fn escape_attribute(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
