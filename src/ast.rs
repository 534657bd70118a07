/// Node types produced by the note tokenizer
use serde::{Deserialize, Serialize};

/// One source line (or a fenced run of lines) of note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum BlockNode {
    CodeBlock {
        language: String,
        content: String, // Raw lines joined with '\n', no trailing newline
    },
    Blockquote {
        children: Vec<InlineNode>,
    },
    TaskListItem {
        symbol: String,
        indent: usize, // Leading whitespace length / 2, floored
        complete: bool,
        children: Vec<InlineNode>,
    },
    UnorderedListItem {
        symbol: String,
        indent: usize,
        children: Vec<InlineNode>,
    },
    OrderedListItem {
        number: String, // Literal digits as written
        indent: usize,
        children: Vec<InlineNode>,
    },
    Heading {
        level: u8,
        children: Vec<InlineNode>,
    },
    HorizontalRule {
        symbol: String, // "---" or "***"
    },
    Paragraph {
        children: Vec<InlineNode>,
    },
    LineBreak, // Blank source line
}

/// A styled or linked span inside a block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum InlineNode {
    Text {
        content: String,
    },
    Image {
        alt_text: String,
        url: String,
    },
    Link {
        content: Vec<InlineNode>,
        url: String,
    },
    AutoLink {
        url: String,
        is_raw_text: bool,
    },
    Tag {
        content: String, // Without the leading '#'
    },
    Code {
        content: String,
    },
    Bold {
        children: Vec<InlineNode>,
        symbol: String,
    },
    Italic {
        children: Vec<InlineNode>,
        symbol: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    CodeBlock,
    Blockquote,
    TaskListItem,
    UnorderedListItem,
    OrderedListItem,
    Heading,
    HorizontalRule,
    Paragraph,
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InlineKind {
    Text,
    Image,
    Link,
    AutoLink,
    Tag,
    Code,
    Bold,
    Italic,
}

impl BlockNode {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockNode::CodeBlock { .. } => BlockKind::CodeBlock,
            BlockNode::Blockquote { .. } => BlockKind::Blockquote,
            BlockNode::TaskListItem { .. } => BlockKind::TaskListItem,
            BlockNode::UnorderedListItem { .. } => BlockKind::UnorderedListItem,
            BlockNode::OrderedListItem { .. } => BlockKind::OrderedListItem,
            BlockNode::Heading { .. } => BlockKind::Heading,
            BlockNode::HorizontalRule { .. } => BlockKind::HorizontalRule,
            BlockNode::Paragraph { .. } => BlockKind::Paragraph,
            BlockNode::LineBreak => BlockKind::LineBreak,
        }
    }

    /// Inline children of the block; empty for code blocks, rules and line breaks.
    pub fn children(&self) -> &[InlineNode] {
        match self {
            BlockNode::Blockquote { children }
            | BlockNode::TaskListItem { children, .. }
            | BlockNode::UnorderedListItem { children, .. }
            | BlockNode::OrderedListItem { children, .. }
            | BlockNode::Heading { children, .. }
            | BlockNode::Paragraph { children } => children,
            BlockNode::CodeBlock { .. } | BlockNode::HorizontalRule { .. } | BlockNode::LineBreak => {
                &[]
            }
        }
    }
}

impl InlineNode {
    pub fn text(content: impl Into<String>) -> Self {
        InlineNode::Text {
            content: content.into(),
        }
    }

    pub fn kind(&self) -> InlineKind {
        match self {
            InlineNode::Text { .. } => InlineKind::Text,
            InlineNode::Image { .. } => InlineKind::Image,
            InlineNode::Link { .. } => InlineKind::Link,
            InlineNode::AutoLink { .. } => InlineKind::AutoLink,
            InlineNode::Tag { .. } => InlineKind::Tag,
            InlineNode::Code { .. } => InlineKind::Code,
            InlineNode::Bold { .. } => InlineKind::Bold,
            InlineNode::Italic { .. } => InlineKind::Italic,
        }
    }

    /// Nested inline nodes (link text, bold and italic spans).
    pub fn children(&self) -> &[InlineNode] {
        match self {
            InlineNode::Link { content, .. } => content,
            InlineNode::Bold { children, .. } | InlineNode::Italic { children, .. } => children,
            _ => &[],
        }
    }
}

/// Depth-first walk over every inline node under `nodes`, nested spans included.
pub fn walk_inline<'a>(nodes: &'a [InlineNode], visit: &mut impl FnMut(&'a InlineNode)) {
    for node in nodes {
        visit(node);
        walk_inline(node.children(), visit);
    }
}
