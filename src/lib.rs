/// Markdown tokenizer for note content: block/inline node trees, their
/// markdown and JSON encodings, and the tag/statistics views built on them
pub mod ast;
pub mod config;
pub mod error;
pub mod memo;
pub mod parser;
pub mod serializer;
pub mod wire;

pub use ast::{BlockKind, BlockNode, InlineKind, InlineNode};
pub use error::{Error, Result};
pub use parser::{Parser, ParserOptions};
pub use serializer::{InlineStyle, MarkdownSerializer};

/// Parse note content into block nodes with default options
pub fn parse_markdown(markdown: &str) -> Vec<BlockNode> {
    let parser = Parser::new();
    parser.tokenize(markdown)
}

/// Write block nodes back to markdown, flattening inline styling
pub fn restore_markdown(nodes: &[BlockNode]) -> String {
    let serializer = MarkdownSerializer::new();
    serializer.serialize(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_markdown(""), vec![BlockNode::LineBreak]);
        assert_eq!(restore_markdown(&parse_markdown("")), "");
    }

    #[test]
    fn test_basic_image() {
        let nodes = parse_markdown("![foo](/url)");
        assert_eq!(
            nodes,
            vec![BlockNode::Paragraph {
                children: vec![InlineNode::Image {
                    alt_text: "foo".to_string(),
                    url: "/url".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn test_trailing_newline_adds_line_break() {
        let nodes = parse_markdown("text\n");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1], BlockNode::LineBreak);
        assert_eq!(restore_markdown(&nodes), "text\n");
    }
}
