use memomark::{BlockNode, InlineNode, MarkdownSerializer, Parser, ParserOptions};
use proptest::prelude::*;

fn assert_no_adjacent_text(nodes: &[InlineNode]) {
    for pair in nodes.windows(2) {
        assert!(
            !matches!(pair, [InlineNode::Text { .. }, InlineNode::Text { .. }]),
            "adjacent text nodes in {:?}",
            nodes
        );
    }
    for node in nodes {
        assert_no_adjacent_text(node.children());
    }
}

/// Text built from the characters the tokenizer cares about.
fn markdownish() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("*"),
            Just("**"),
            Just("#"),
            Just("`"),
            Just("["),
            Just("]"),
            Just("("),
            Just(")"),
            Just("!"),
            Just("h"),
            Just("https://"),
            Just("- "),
            Just("- [x] "),
            Just("1. "),
            Just("> "),
            Just("```"),
            Just("---"),
            Just(" "),
            Just("\n"),
            Just("\t"),
            Just("word"),
            Just("é"),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// A line of plain words that cannot start any inline span.
fn plain_words() -> impl Strategy<Value = String> {
    "[a-gi-z][a-gi-z ]{0,20}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn tokenize_is_total(source in any::<String>()) {
        let nodes = Parser::new().tokenize(&source);
        prop_assert!(!nodes.is_empty());
    }

    #[test]
    fn inline_text_is_merged_and_lossless(text in markdownish()) {
        let parser = Parser::new();
        for block in parser.tokenize(&text) {
            assert_no_adjacent_text(block.children());
        }
        // Text without span syntax comes back as a single text node
        let line: String = text.chars().filter(|c| c.is_ascii_lowercase() && *c != 'h').collect();
        let nodes = parser.tokenize_inline(&line);
        if line.is_empty() {
            prop_assert!(nodes.is_empty());
        } else {
            prop_assert_eq!(nodes, vec![InlineNode::text(line.clone())]);
        }
    }

    #[test]
    fn depth_limit_is_total(text in markdownish(), depth in 0usize..4) {
        let parser = Parser::with_options(ParserOptions {
            max_inline_depth: depth,
            ..ParserOptions::default()
        });
        let _ = parser.tokenize(&text);
    }

    #[test]
    fn indent_is_half_the_leading_spaces(spaces in 0usize..12, word in plain_words()) {
        let nodes = Parser::new().tokenize(&format!("{}- {}", " ".repeat(spaces), word));
        match &nodes[0] {
            BlockNode::UnorderedListItem { indent, .. } => prop_assert_eq!(*indent, spaces / 2),
            other => prop_assert!(false, "expected list item, got {:?}", other),
        }
    }

    #[test]
    fn plain_documents_roundtrip(
        lines in proptest::collection::vec(
            prop_oneof![
                plain_words().prop_map(|w| format!("x{}", w)),
                plain_words().prop_map(|w| format!("## {}", w)),
                (0usize..3, plain_words()).prop_map(|(i, w)| format!("{}- {}", "  ".repeat(i), w)),
                plain_words().prop_map(|w| format!("```\n{}\n```", w)),
                Just(String::new()),
            ],
            1..8,
        )
    ) {
        let source = lines.join("\n");
        let nodes = Parser::new().tokenize(&source);
        prop_assert_eq!(MarkdownSerializer::new().serialize(&nodes), source);
    }
}
