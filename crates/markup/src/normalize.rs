//! Pre-parse rewrites that turn loosely written editor markup into strict JSX.
//!
//! - `strip_expression_braces`: removes `{...}` expressions, keeping their text.
//! - `close_void_elements`: `<br>` becomes `<br />`.
//! - `normalize_attribute_names`: framework spellings (`className`) become
//!   markup attributes (`class`).

use lol_html::errors::RewritingError;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use std::borrow::Cow;

/// Framework attribute spellings and their markup equivalents.
pub const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[("className", "class"), ("htmlFor", "for")];

/// HTML elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Removes expression braces.
///
/// Inside a tag, `attr={expr}` becomes `attr="expr"` and spread expressions
/// are dropped. In text, `{expr}` is replaced by its inner text. A single
/// string literal keeps only its contents. Stray closing braces vanish.
///
/// # Examples
///
/// ```
/// use propkit_markup::normalize::strip_expression_braces;
///
/// assert_eq!(strip_expression_braces("Hi {name}!"), "Hi name!");
/// assert_eq!(strip_expression_braces("{\"quoted\"}"), "quoted");
/// assert_eq!(
///     strip_expression_braces("<div style={{color: \"red\"}}>x</div>"),
///     "<div style=\"color: 'red'\">x</div>"
/// );
/// assert_eq!(strip_expression_braces("<Box {...rest} id=\"a\" />"), "<Box  id=\"a\" />");
/// ```
pub fn strip_expression_braces(input: &str) -> Cow<'_, str> {
    if !input.contains(['{', '}']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    let mut i = 0;

    while let Some(c) = input[i..].chars().next() {
        let len = c.len_utf8();

        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            i += len;
            continue;
        }

        match c {
            '<' if !in_tag && opens_tag(&input[i + len..]) => {
                in_tag = true;
                out.push(c);
            }
            '>' if in_tag => {
                in_tag = false;
                out.push(c);
            }
            '"' | '\'' if in_tag => {
                quote = Some(c);
                out.push(c);
            }
            '{' => {
                let close = matching_brace(input, i);
                let inner = &input[i + 1..close];
                if in_tag {
                    // Only `attr={...}` keeps a value; spreads are dropped.
                    if out.trim_end().ends_with('=') {
                        out.truncate(out.trim_end().len());
                        out.push('"');
                        out.push_str(&expression_text(inner).replace('"', "'"));
                        out.push('"');
                    }
                } else {
                    out.push_str(&expression_text(inner));
                }
                i = (close + 1).min(input.len());
                continue;
            }
            '}' => {}
            _ => out.push(c),
        }
        i += len;
    }

    Cow::Owned(out)
}

/// True if the text after `<` starts a tag (`<a`, `</a`, `<>`).
fn opens_tag(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '>')
}

/// Returns the byte index of the brace closing the one at `open`, or the
/// input length when it is never closed. String literals are skipped.
fn matching_brace(input: &str, open: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in input[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return open + idx;
                }
            }
            _ => {}
        }
    }
    input.len()
}

/// Text left after removing the braces of an expression body.
fn expression_text(inner: &str) -> String {
    let trimmed = inner.trim();
    if let Some(literal) = string_literal_body(trimmed) {
        return literal.to_string();
    }
    trimmed.chars().filter(|c| *c != '{' && *c != '}').collect()
}

/// Body of a single quoted string literal (`"a"`, `'a'`, `` `a` ``).
fn string_literal_body(s: &str) -> Option<&str> {
    let first = s.chars().next()?;
    if !matches!(first, '"' | '\'' | '`') || s.len() < 2 || !s.ends_with(first) {
        return None;
    }
    let body = &s[1..s.len() - 1];
    // `"a" + "b"` is not a single literal.
    if body.contains(first) {
        return None;
    }
    Some(body)
}

/// Rewrites `<br>`-style void tags into self-closing JSX.
///
/// # Examples
///
/// ```
/// use propkit_markup::normalize::close_void_elements;
///
/// assert_eq!(close_void_elements("a<br>b"), "a<br />b");
/// assert_eq!(close_void_elements("<img src=\"x.png\">"), "<img src=\"x.png\" />");
/// assert_eq!(close_void_elements("<hr/>"), "<hr/>");
/// assert_eq!(close_void_elements("<Input>"), "<Input>");
/// ```
pub fn close_void_elements(input: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0;
    let mut search = 0;

    while let Some(offset) = input[search..].find('<') {
        let name_start = search + offset + 1;
        let name_len = input[name_start..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(input.len() - name_start);
        if name_len == 0 {
            search = name_start;
            continue;
        }
        let name = &input[name_start..name_start + name_len];
        let Some(end) = find_tag_end(input, name_start + name_len) else {
            break;
        };
        if VOID_ELEMENTS.contains(&name) && !input[name_start..end].trim_end().ends_with('/') {
            out.push_str(input[last..end].trim_end());
            out.push_str(" /");
            last = end;
        }
        search = end + 1;
    }

    if last == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[last..]);
    Cow::Owned(out)
}

/// Index of the `>` ending a tag, skipping quoted attribute values.
fn find_tag_end(input: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in input[from..].char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(from + idx),
            None => {}
        }
    }
    None
}

/// Rewrites framework attribute spellings to their markup names.
///
/// An existing target attribute is merged (`class="a" className="b"` becomes
/// `class="a b"`).
pub fn normalize_attribute_names(input: &str) -> Result<Cow<'_, str>, RewritingError> {
    if !ATTRIBUTE_ALIASES
        .iter()
        .any(|(alias, _)| input.contains(alias))
    {
        return Ok(Cow::Borrowed(input));
    }

    let output = rewrite_str(
        input,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                for (alias, name) in ATTRIBUTE_ALIASES {
                    let Some(value) = el.get_attribute(alias) else {
                        continue;
                    };
                    el.remove_attribute(alias);
                    let merged = match el.get_attribute(name) {
                        Some(existing) if !existing.trim().is_empty() => {
                            format!("{} {}", existing.trim(), value.trim())
                        }
                        _ => value,
                    };
                    el.set_attribute(name, &merged)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(Cow::Owned(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(strip_expression_braces("plain"), Cow::Borrowed(_)));
        assert!(matches!(close_void_elements("plain"), Cow::Borrowed(_)));
        assert!(matches!(
            normalize_attribute_names("<p class=\"a\">x</p>").unwrap(),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_attribute_expression_becomes_literal() {
        assert_eq!(
            strip_expression_braces(r#"<span className={"badge"}>New</span>"#),
            r#"<span className="badge">New</span>"#
        );
        assert_eq!(
            strip_expression_braces("<Meter value={42} />"),
            r#"<Meter value="42" />"#
        );
    }

    #[test]
    fn test_braces_inside_quoted_attributes_are_kept() {
        assert_eq!(
            strip_expression_braces(r#"<code title="{a}">{b}</code>"#),
            r#"<code title="{a}">b</code>"#
        );
    }

    #[test]
    fn test_only_braces() {
        assert_eq!(strip_expression_braces("{}"), "");
        assert_eq!(strip_expression_braces("}}{{"), "");
        assert_eq!(strip_expression_braces("{ {"), "");
    }

    #[test]
    fn test_unclosed_expression_consumes_rest() {
        assert_eq!(strip_expression_braces("before {after"), "before after");
    }

    #[test]
    fn test_multibyte_text_survives() {
        assert_eq!(strip_expression_braces("héllo {'wörld'} ✓"), "héllo wörld ✓");
    }

    #[test]
    fn test_class_name_is_renamed() {
        let out = normalize_attribute_names(r#"<div className="card">x</div>"#).unwrap();
        assert_eq!(out, r#"<div class="card">x</div>"#);
    }

    #[test]
    fn test_class_name_merges_with_class() {
        let out =
            normalize_attribute_names(r#"<div class="a" className="b">x</div>"#).unwrap();
        assert!(out.contains(r#"class="a b""#), "got {out}");
        assert!(!out.to_ascii_lowercase().contains("classname"));
    }

    #[test]
    fn test_html_for_is_renamed() {
        let out = normalize_attribute_names(r#"<label htmlFor="name">Name</label>"#).unwrap();
        assert_eq!(out, r#"<label for="name">Name</label>"#);
    }

    #[test]
    fn test_void_element_with_attributes_after_quote() {
        assert_eq!(
            close_void_elements(r#"<input value="a>b">"#),
            r#"<input value="a>b" />"#
        );
    }
}
