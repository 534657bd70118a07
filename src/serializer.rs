/// Markdown serializer for note nodes (partial inverse of the tokenizer)
use crate::ast::{BlockNode, InlineNode};
use serde::{Deserialize, Serialize};

/// How inline children are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InlineStyle {
    /// Flatten spans to their text; styling and link targets are dropped.
    #[default]
    Plain,
    /// Re-emit span syntax so styled lines survive a round trip.
    Markdown,
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    style: InlineStyle,
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        MarkdownSerializer {
            style: InlineStyle::Plain,
        }
    }

    pub fn with_style(style: InlineStyle) -> Self {
        MarkdownSerializer { style }
    }

    pub fn style(&self) -> InlineStyle {
        self.style
    }

    /// One line per block node (three for code blocks), joined with '\n'.
    pub fn serialize(&self, nodes: &[BlockNode]) -> String {
        let lines: Vec<String> = nodes.iter().map(|node| self.serialize_block(node)).collect();
        lines.join("\n")
    }

    fn serialize_block(&self, node: &BlockNode) -> String {
        match node {
            BlockNode::CodeBlock { language, content } => {
                format!("```{}\n{}\n```", language, content)
            }
            BlockNode::Blockquote { children } => format!("> {}", self.inline(children)),
            BlockNode::TaskListItem {
                indent,
                complete,
                children,
                ..
            } => {
                let checkbox = if *complete { "[x]" } else { "[ ]" };
                format!("{}- {} {}", "  ".repeat(*indent), checkbox, self.inline(children))
            }
            BlockNode::UnorderedListItem {
                symbol,
                indent,
                children,
            } => format!("{}{} {}", "  ".repeat(*indent), symbol, self.inline(children)),
            BlockNode::OrderedListItem {
                number,
                indent,
                children,
            } => format!("{}{}. {}", "  ".repeat(*indent), number, self.inline(children)),
            BlockNode::Heading { level, children } => {
                format!("{} {}", "#".repeat(*level as usize), self.inline(children))
            }
            BlockNode::HorizontalRule { symbol } => symbol.clone(),
            BlockNode::Paragraph { children } => self.inline(children),
            BlockNode::LineBreak => String::new(),
        }
    }

    fn inline(&self, nodes: &[InlineNode]) -> String {
        match self.style {
            InlineStyle::Plain => plain_text(nodes),
            InlineStyle::Markdown => markdown_text(nodes),
        }
    }
}

/// Concatenate the literal payload of each span. Tags keep their '#'.
pub fn plain_text(nodes: &[InlineNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            InlineNode::Text { content } | InlineNode::Code { content } => content.clone(),
            InlineNode::Image { alt_text, .. } => alt_text.clone(),
            InlineNode::Link { content, .. } => plain_text(content),
            InlineNode::AutoLink { url, .. } => url.clone(),
            InlineNode::Tag { content } => format!("#{}", content),
            InlineNode::Bold { children, .. } | InlineNode::Italic { children, .. } => {
                plain_text(children)
            }
        })
        .collect()
}

fn markdown_text(nodes: &[InlineNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            InlineNode::Text { content } => content.clone(),
            InlineNode::Code { content } => format!("`{}`", content),
            InlineNode::Image { alt_text, url } => format!("![{}]({})", alt_text, url),
            InlineNode::Link { content, url } => format!("[{}]({})", markdown_text(content), url),
            InlineNode::AutoLink { url, .. } => url.clone(),
            InlineNode::Tag { content } => format!("#{}", content),
            InlineNode::Bold { children, .. } => format!("**{}**", markdown_text(children)),
            InlineNode::Italic { children, .. } => format!("*{}*", markdown_text(children)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn roundtrip(source: &str, style: InlineStyle) -> String {
        let nodes = Parser::new().tokenize(source);
        MarkdownSerializer::with_style(style).serialize(&nodes)
    }

    #[test]
    fn test_plain_grammar_roundtrips() {
        let source = "# Title\nSome words here\n\n- one\n  - two\n```rust\nfn main() {}\n```\n2. second";
        assert_eq!(roundtrip(source, InlineStyle::Plain), source);
    }

    #[test]
    fn test_task_items_and_rules() {
        let source = "- [x] done\n  - [ ] todo\n***\n> quote #tag";
        assert_eq!(roundtrip(source, InlineStyle::Plain), source);
    }

    #[test]
    fn test_plain_style_drops_inline_syntax() {
        assert_eq!(
            roundtrip("see **[docs](/d)** and *`x`* ![logo](/l.png)", InlineStyle::Plain),
            "see docs and x logo"
        );
    }

    #[test]
    fn test_markdown_style_keeps_inline_syntax() {
        let source = "see **[docs](/d)** and *`x`* ![logo](/l.png) https://a.io #t";
        assert_eq!(roundtrip(source, InlineStyle::Markdown), source);
    }

    #[test]
    fn test_empty_code_block() {
        let nodes = vec![BlockNode::CodeBlock {
            language: String::new(),
            content: String::new(),
        }];
        assert_eq!(MarkdownSerializer::new().serialize(&nodes), "```\n\n```");
    }

    #[test]
    fn test_line_breaks_are_empty_lines() {
        let nodes = vec![BlockNode::LineBreak, BlockNode::LineBreak];
        assert_eq!(MarkdownSerializer::new().serialize(&nodes), "\n");
        assert_eq!(MarkdownSerializer::new().serialize(&[]), "");
    }
}
