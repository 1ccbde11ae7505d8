//! Children content parsing.
//!
//! Input is live editor text, so the public entry points never fail: when
//! the strict parser rejects the input, tag-like substrings are stripped and
//! the remainder is returned as a single text node (or nothing, when no text
//! is left).

use crate::error::ContentParseError;
use crate::normalize::{
    ATTRIBUTE_ALIASES, close_void_elements, normalize_attribute_names, strip_expression_braces,
};
use crate::types::ContentNode;
use markdown::mdast::{AttributeContent, AttributeValue, Node};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Content parser options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Rewrite `className`/`htmlFor` to `class`/`for`.
    pub normalize_class_name: bool,
    /// Replace `{...}` expressions with their text before parsing.
    pub strip_expressions: bool,
}

impl ParseOptions {
    fn to_markdown(self) -> markdown::ParseOptions {
        let constructs = markdown::Constructs {
            autolink: false,
            code_indented: false,
            html_flow: false,
            html_text: false,
            gfm_strikethrough: true,
            // Setext underlines after JSX can hit an unreachable branch in
            // the mdast builder.
            heading_setext: false,
            mdx_expression_flow: true,
            mdx_expression_text: true,
            mdx_jsx_flow: true,
            mdx_jsx_text: true,
            ..Default::default()
        };
        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize_class_name: true,
            strip_expressions: true,
        }
    }
}

/// Parses children content with default options. Never fails.
///
/// # Examples
///
/// ```
/// use propkit_markup::{ContentNode, parse};
///
/// let nodes = parse(r#"<span className="badge">New</span>"#);
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].name(), Some("span"));
/// assert_eq!(nodes[0].attribute("class"), Some("badge"));
///
/// assert_eq!(parse("<div><b>oops</div>"), vec![ContentNode::text("oops")]);
/// ```
pub fn parse(input: &str) -> Vec<ContentNode> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses children content. Never fails.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Vec<ContentNode> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    match catch_unwind(AssertUnwindSafe(|| try_parse_with_options(input, options))) {
        Ok(Ok(nodes)) => nodes,
        Ok(Err(err)) => {
            log::debug!("Content parse failed, falling back to text: {}", err);
            fallback(input)
        }
        Err(_) => {
            log::debug!("Content parser panicked, falling back to text");
            fallback(input)
        }
    }
}

fn fallback(input: &str) -> Vec<ContentNode> {
    match plain_text(input) {
        ContentNode::Text { value } if value.is_empty() => Vec::new(),
        node => vec![node],
    }
}

/// Strict variant of [`parse`] that reports parser errors.
pub fn try_parse(input: &str) -> Result<Vec<ContentNode>, ContentParseError> {
    try_parse_with_options(input, &ParseOptions::default())
}

/// Strict variant of [`parse_with_options`].
pub fn try_parse_with_options(
    input: &str,
    options: &ParseOptions,
) -> Result<Vec<ContentNode>, ContentParseError> {
    let prepared = prepare(input, options)?;
    let root = markdown::to_mdast(&prepared, &options.to_markdown())
        .map_err(|err| ContentParseError::from_message(&err))?;

    let converter = Converter {
        // Without brace stripping, expression attributes never reach the
        // text rewrite and are renamed on the tree instead.
        rename_attributes: options.normalize_class_name && !options.strip_expressions,
    };
    let mut nodes = Vec::new();
    converter.children(root.children().map(Vec::as_slice).unwrap_or_default(), &mut nodes);
    Ok(nodes)
}

/// Removes tag-like substrings and returns the remaining text as one node.
///
/// ```
/// use propkit_markup::{ContentNode, plain_text};
///
/// assert_eq!(plain_text("<p>Hello <b>there</b></p>"), ContentNode::text("Hello there"));
/// assert_eq!(plain_text("1 < 2"), ContentNode::text("1 < 2"));
/// ```
pub fn plain_text(input: &str) -> ContentNode {
    let mut text = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start..].find('>') else {
            break;
        };
        text.push_str(&rest[..start]);
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);
    ContentNode::text(text.trim())
}

fn prepare<'a>(input: &'a str, options: &ParseOptions) -> Result<Cow<'a, str>, ContentParseError> {
    let mut text = Cow::Borrowed(input);
    if options.strip_expressions {
        text = apply(text, strip_expression_braces);
    }
    text = apply(text, close_void_elements);
    if options.normalize_class_name && options.strip_expressions {
        let renamed = match normalize_attribute_names(&text)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(next) => Some(next),
        };
        if let Some(next) = renamed {
            text = Cow::Owned(next);
        }
    }
    Ok(text)
}

fn apply<'a, F>(text: Cow<'a, str>, step: F) -> Cow<'a, str>
where
    F: for<'b> Fn(&'b str) -> Cow<'b, str>,
{
    let changed = match step(&text) {
        Cow::Borrowed(_) => None,
        Cow::Owned(next) => Some(next),
    };
    match changed {
        Some(next) => Cow::Owned(next),
        None => text,
    }
}

struct Converter {
    rename_attributes: bool,
}

impl Converter {
    fn children(&self, nodes: &[Node], out: &mut Vec<ContentNode>) {
        // A lone paragraph is just a text wrapper.
        if let [Node::Paragraph(paragraph)] = nodes {
            self.children(&paragraph.children, out);
            return;
        }
        for node in nodes {
            self.node(node, out);
        }
    }

    fn collect(&self, nodes: &[Node]) -> Vec<ContentNode> {
        let mut out = Vec::new();
        self.children(nodes, &mut out);
        out
    }

    fn wrap(&self, name: &str, nodes: &[Node]) -> ContentNode {
        ContentNode::element(name, self.collect(nodes))
    }

    fn node(&self, node: &Node, out: &mut Vec<ContentNode>) {
        match node {
            Node::Text(text) => push_text(out, &text.value),
            Node::Paragraph(paragraph) => {
                let mut children = Vec::new();
                for child in &paragraph.children {
                    self.node(child, &mut children);
                }
                out.push(ContentNode::element("p", children));
            }
            Node::Emphasis(node) => out.push(self.wrap("em", &node.children)),
            Node::Strong(node) => out.push(self.wrap("strong", &node.children)),
            Node::Delete(node) => out.push(self.wrap("del", &node.children)),
            Node::Blockquote(node) => out.push(self.wrap("blockquote", &node.children)),
            Node::ListItem(node) => out.push(self.wrap("li", &node.children)),
            Node::List(list) => {
                let mut element = self.wrap(if list.ordered { "ol" } else { "ul" }, &list.children);
                if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
                    element = element.with_attribute("start", start.to_string());
                }
                out.push(element);
            }
            Node::Heading(heading) => {
                out.push(self.wrap(&format!("h{}", heading.depth), &heading.children));
            }
            Node::InlineCode(code) => {
                out.push(ContentNode::element("code", vec![ContentNode::text(&code.value)]));
            }
            Node::Code(code) => {
                let mut inner = ContentNode::element("code", vec![ContentNode::text(&code.value)]);
                if let Some(lang) = &code.lang {
                    inner = inner.with_attribute("class", format!("language-{}", lang));
                }
                out.push(ContentNode::element("pre", vec![inner]));
            }
            Node::Break(_) => out.push(ContentNode::element("br", Vec::new())),
            Node::ThematicBreak(_) => out.push(ContentNode::element("hr", Vec::new())),
            Node::Link(link) => {
                let mut element = self.wrap("a", &link.children).with_attribute("href", &link.url);
                if let Some(title) = &link.title {
                    element = element.with_attribute("title", title);
                }
                out.push(element);
            }
            Node::Image(image) => {
                let mut element = ContentNode::element("img", Vec::new())
                    .with_attribute("src", &image.url)
                    .with_attribute("alt", &image.alt);
                if let Some(title) = &image.title {
                    element = element.with_attribute("title", title);
                }
                out.push(element);
            }
            Node::MdxJsxFlowElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out);
            }
            Node::MdxJsxTextElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out);
            }
            Node::MdxTextExpression(expression) => push_text(out, &expression.value),
            Node::MdxFlowExpression(expression) => push_text(out, &expression.value),
            other => {
                log::debug!("Flattening unsupported content node to text: {:?}", other);
                push_text(out, &other.to_string());
            }
        }
    }

    fn jsx(
        &self,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[Node],
        out: &mut Vec<ContentNode>,
    ) {
        let children = self.collect(children);

        // Fragments contribute their children directly.
        let Some(name) = name else {
            for child in children {
                match child {
                    ContentNode::Text { value } => push_text(out, &value),
                    element => out.push(element),
                }
            }
            return;
        };

        let mut attrs: BTreeMap<String, String> = BTreeMap::new();
        for attribute in attributes {
            match attribute {
                AttributeContent::Property(prop) => {
                    let value = match &prop.value {
                        Some(AttributeValue::Literal(s)) => s.clone(),
                        Some(AttributeValue::Expression(expr)) => expr.value.clone(),
                        None => String::new(),
                    };
                    let key = self.attribute_name(&prop.name);
                    if key == "class" {
                        if let Some(existing) =
                            attrs.get_mut(key).filter(|existing| !existing.is_empty())
                        {
                            existing.push(' ');
                            existing.push_str(&value);
                            continue;
                        }
                    }
                    attrs.insert(key.to_string(), value);
                }
                AttributeContent::Expression(expr) => {
                    log::debug!("Dropping spread attribute on <{}>: {}", name, expr.value);
                }
            }
        }

        out.push(ContentNode::Element {
            name: name.to_string(),
            attributes: attrs,
            children,
        });
    }

    fn attribute_name<'a>(&self, name: &'a str) -> &'a str {
        if self.rename_attributes {
            if let Some((_, markup)) = ATTRIBUTE_ALIASES.iter().find(|(alias, _)| *alias == name) {
                return markup;
            }
        }
        name
    }
}

fn push_text(out: &mut Vec<ContentNode>, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(ContentNode::Text { value: last }) = out.last_mut() {
        last.push_str(value);
        return;
    }
    out.push(ContentNode::text(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined_text(nodes: &[ContentNode]) -> String {
        nodes.iter().map(ContentNode::text_content).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("  \n ").is_empty());
    }

    #[test]
    fn test_plain_sentence_is_single_text() {
        assert_eq!(parse("Click me"), vec![ContentNode::text("Click me")]);
    }

    #[test]
    fn test_card_title_children() {
        let nodes = parse(r#"<h3 className="card-title">Tilt me</h3>"#);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name(), Some("h3"));
        assert_eq!(nodes[0].attribute("class"), Some("card-title"));
        assert_eq!(nodes[0].attribute("className"), None);
        assert_eq!(nodes[0].text_content(), "Tilt me");
    }

    #[test]
    fn test_expression_attribute_is_unwrapped() {
        let nodes = parse(r#"<span className={"badge"}>{"New"}</span>"#);
        assert_eq!(nodes[0].attribute("class"), Some("badge"));
        assert_eq!(nodes[0].text_content(), "New");
    }

    #[test]
    fn test_void_elements_are_accepted() {
        let nodes = parse("Line one<br>Line two");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].name(), Some("br"));
        assert_eq!(joined_text(&nodes), "Line oneLine two");
    }

    #[test]
    fn test_unbalanced_tags_fall_back_to_text() {
        let nodes = parse("<div><span>hi</div>");
        assert_eq!(nodes, vec![ContentNode::text("hi")]);
        assert!(try_parse("<div><span>hi</div>").is_err());
    }

    #[test]
    fn test_only_braces() {
        assert!(parse("{}").is_empty());
        assert!(parse("{{}}").is_empty());
        let nodes = parse("}{");
        assert_eq!(joined_text(&nodes), "");
    }

    #[test]
    fn test_markup_reducing_to_nothing_is_empty() {
        assert!(parse("<>").is_empty());
        assert!(parse("<div><span></div>").is_empty());
    }

    #[test]
    fn test_setext_underline_after_fragment() {
        for input in [":[<>((a(\n=", "<_>]*.;&!\n-", "<>\n===", "<b>x</b>\n---"] {
            let _ = try_parse(input);
            let _ = parse(input);
        }
        let nodes = parse("Title\n=====");
        assert_eq!(joined_text(&nodes), "Title\n=====");
        assert!(nodes.iter().all(|node| node.name() != Some("h1")));
    }

    #[test]
    fn test_strict_parser_survives_generated_input() {
        const ALPHABET: &[u8] = b"<>/_a(){}[]=-*#.:;&!\"' \n";
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        for _ in 0..20_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let len = (seed >> 59) as usize + 1;
            let input: String = (0..len)
                .map(|i| {
                    let bits = seed.rotate_left(7 * i as u32);
                    ALPHABET[(bits % ALPHABET.len() as u64) as usize] as char
                })
                .collect();
            let _ = try_parse(&input);
        }
    }

    #[test]
    fn test_less_than_in_text() {
        assert_eq!(joined_text(&parse("a < b")), "a < b");
    }

    #[test]
    fn test_inline_markdown() {
        let nodes = parse("Hello **world**");
        assert_eq!(nodes[0], ContentNode::text("Hello "));
        assert_eq!(nodes[1].name(), Some("strong"));
        assert_eq!(nodes[1].text_content(), "world");
    }

    #[test]
    fn test_fragment_is_flattened() {
        let nodes = parse("<>Just <em>text</em></>");
        assert_eq!(nodes[0], ContentNode::text("Just "));
        assert_eq!(nodes[1].name(), Some("em"));
    }

    #[test]
    fn test_multiple_blocks_keep_paragraphs() {
        let nodes = parse("First\n\nSecond");
        let names: Vec<_> = nodes.iter().map(ContentNode::name).collect();
        assert_eq!(names, vec![Some("p"), Some("p")]);
    }

    #[test]
    fn test_attributes_renamed_on_tree_without_stripping() {
        let options = ParseOptions {
            normalize_class_name: true,
            strip_expressions: false,
        };
        let nodes = parse_with_options(r#"<b className={"x"}>y</b>"#, &options);
        assert_eq!(nodes[0].attribute("class"), Some("\"x\""));
    }

    #[test]
    fn test_class_name_kept_when_disabled() {
        let options = ParseOptions {
            normalize_class_name: false,
            strip_expressions: true,
        };
        let nodes = parse_with_options(r#"<b className="x">y</b>"#, &options);
        assert_eq!(nodes[0].attribute("className"), Some("x"));
    }
}
