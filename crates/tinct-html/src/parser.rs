use core::fmt::Write as _;

use tinct_common::warning::warn_once;
use tinct_dom::{DomTree, NodeId, NodeType};

use crate::is_void_element;
use crate::tokenizer::{Attribute, HTMLTokenizer, Token};

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "The handling of parse errors is well-defined": every issue here was
/// recovered from, and the tree is still usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the parse error.
    pub message: String,
    /// Index into the token stream where this error was encountered.
    pub token_index: usize,
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Tree construction for the content of an editable host. The context
/// element is the root of the stack of open elements: tokens are inserted
/// under it and it is never popped.
///
/// Only the "in body" rules that matter for phrasing content are applied.
/// Void elements are never pushed, unmatched end tags are ignored, and an
/// end tag closes every element opened after its match.
pub struct FragmentParser<'a> {
    tree: &'a mut DomTree,
    context: NodeId,
    tokens: Vec<Token>,
    token_index: usize,
    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,
    issues: Vec<ParseIssue>,
}

impl<'a> FragmentParser<'a> {
    /// Tokenize `html` and prepare to insert it under `context`.
    #[must_use]
    pub fn new(tree: &'a mut DomTree, context: NodeId, html: &str) -> Self {
        Self {
            tree,
            context,
            tokens: HTMLTokenizer::tokenize(html),
            token_index: 0,
            stack_of_open_elements: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser, appending the parsed nodes to the context node.
    pub fn run(self) {
        let _ = self.run_with_issues();
    }

    /// Run the parser and return the parse issues it recovered from.
    pub fn run_with_issues(mut self) -> Vec<ParseIssue> {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.iter().enumerate() {
            self.token_index = index;
            if token.is_eof() {
                break;
            }
            self.process_token(token);
        }
        if !self.stack_of_open_elements.is_empty() {
            tracing::trace!(
                open = self.stack_of_open_elements.len(),
                "elements implicitly closed at end of fragment"
            );
        }
        self.issues
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn process_token(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::StartTag {
                name, attributes, ..
            } => self.insert_html_element(name, attributes),
            // "An end tag whose tag name is "br" - Parse error. Drop the
            // attributes from the token, and act as described in the next
            // entry; i.e. act as if this was a "br" start tag token with no
            // attributes, rather than the end tag token that it actually is."
            Token::EndTag { name } if name == "br" => {
                self.parse_error("</br> treated as <br>");
                self.insert_html_element(name, &[]);
            }
            Token::EndTag { name } => self.any_other_end_tag(name),
            Token::EndOfFile => {}
        }
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(self.context)
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        // STEP 2: "If there is a Text node immediately before the adjusted
        //         insertion location, then append data to that Text node's data."
        if let Some(last) = self.tree.last_child(parent)
            && let Some(node) = self.tree.get_mut(last)
            && let NodeType::Text(ref mut text) = node.node_type
        {
            text.push(c);
            return;
        }
        // STEP 3: "Otherwise, create a new Text node whose data is data ...
        //         and insert the newly created node at the adjusted insertion
        //         location."
        let text = self.tree.create_text(String::from(c));
        self.tree.append_child(parent, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str) {
        let parent = self.current_node();
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "A start tag whose tag name is one of: area, br, embed, img, keygen,
    /// wbr - ... Insert an HTML element for the token. Immediately pop the
    /// current node off the stack of open elements." The self-closing flag
    /// has no effect on other HTML elements.
    fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) {
        let parent = self.current_node();
        let element = self.tree.create_element(name);
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in attributes {
                data.attrs.set(&attribute.name, attribute.value.clone());
            }
        }
        self.tree.append_child(parent, element);
        if !is_void_element(name) {
            self.stack_of_open_elements.push(element);
        }
    }

    /// [§ 13.2.6.4.7 "Any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// 1. "Initialize node to be the current node (the bottommost node of the stack)."
    /// 2. "Loop: If node is an HTML element with the same tag name as the
    ///    token, then ... pop all the nodes from the current node up to node,
    ///    including node, then stop these steps."
    /// 3. "Otherwise, if node is in the special category, then this is a
    ///    parse error; ignore the token, and return."
    /// 4. "Set node to the previous entry in the stack of open elements and
    ///    return to the step labeled loop."
    fn any_other_end_tag(&mut self, tag_name: &str) {
        let mut i = self.stack_of_open_elements.len();
        while i > 0 {
            i -= 1;
            let node = self.stack_of_open_elements[i];
            let Some(node_tag) = self.tree.as_element(node).map(|e| e.tag_name.as_str()) else {
                continue;
            };
            if node_tag == tag_name {
                self.stack_of_open_elements.truncate(i);
                return;
            }
            if is_special_element(node_tag) {
                break;
            }
        }
        self.parse_error(&format!("unmatched end tag </{tag_name}> ignored"));
    }

    fn parse_error(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }
}

/// [§ 13.2.4.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// The members of the special category that can appear in editable content.
/// An end tag never closes past one of these.
fn is_special_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "address"
            | "blockquote"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "li"
            | "ol"
            | "p"
            | "pre"
            | "table"
            | "td"
            | "th"
            | "tr"
            | "ul"
    )
}

/// Parse `html` and append the resulting nodes to `context`.
pub fn parse_fragment(tree: &mut DomTree, context: NodeId, html: &str) {
    FragmentParser::new(tree, context, html).run();
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    format_node(tree, id, 0, &mut out);
    out
}

fn format_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document"),
        NodeType::DocumentFragment => writeln!(out, "{prefix}#fragment"),
        NodeType::Element(data) if data.attrs.is_empty() => {
            writeln!(out, "{prefix}<{}>", data.tag_name)
        }
        NodeType::Element(data) => {
            let attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        k.to_string()
                    } else {
                        format!("{k}=\"{v}\"")
                    }
                })
                .collect();
            writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
        }
        NodeType::Text(data) => {
            let display = data
                .replace('\n', "\\n")
                .replace(' ', "\u{00B7}")
                .replace('\u{200B}', "\\u200b");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        format_node(tree, child, indent + 1, out);
    }
}

/// Print the subtree at `id` to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
