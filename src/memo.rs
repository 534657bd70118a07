//! Facts derived from a parsed note: its tags, content properties, and
//! per-user statistics across many notes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::{BlockNode, InlineNode, walk_inline};
use crate::parser::{Parser, trim_blank};

/// One note: its raw content plus the nodes parsed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Memo {
    pub content: String,
    pub nodes: Vec<BlockNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoProperty {
    pub has_link: bool,
    pub has_task_list: bool,
    pub has_code: bool,
    pub has_incomplete_tasks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoTypeStats {
    pub link_count: usize,
    pub code_count: usize,
    pub todo_count: usize,
    pub undo_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_memo_count: usize,
    pub memo_type_stats: MemoTypeStats,
    pub tag_count: BTreeMap<String, usize>,
}

impl Memo {
    /// Blank content yields no nodes, unlike a bare `tokenize` call.
    pub fn from_content(content: impl Into<String>, parser: &Parser) -> Self {
        let content = content.into();
        let nodes = if trim_blank(&content).is_empty() {
            Vec::new()
        } else {
            parser.tokenize(&content)
        };
        Memo { content, nodes }
    }

    /// Tag names in first-seen order, without duplicates.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        self.for_each_inline(|node| {
            if let InlineNode::Tag { content } = node
                && !tags.contains(content)
            {
                tags.push(content.clone());
            }
        });
        tags
    }

    pub fn property(&self) -> MemoProperty {
        let mut property = MemoProperty::default();

        for block in &self.nodes {
            match block {
                BlockNode::CodeBlock { .. } => property.has_code = true,
                BlockNode::TaskListItem { complete, .. } => {
                    property.has_task_list = true;
                    if !complete {
                        property.has_incomplete_tasks = true;
                    }
                }
                _ => {}
            }
        }

        self.for_each_inline(|node| match node {
            InlineNode::Link { .. } | InlineNode::AutoLink { .. } => property.has_link = true,
            InlineNode::Code { .. } => property.has_code = true,
            _ => {}
        });

        property
    }

    fn for_each_inline<'a>(&'a self, mut visit: impl FnMut(&'a InlineNode)) {
        for block in &self.nodes {
            walk_inline(block.children(), &mut visit);
        }
    }
}

impl UserStats {
    /// Count memos per property and per tag. A tag used twice in one memo counts once.
    pub fn collect<'a>(memos: impl IntoIterator<Item = &'a Memo>) -> Self {
        let mut stats = UserStats::default();

        for memo in memos {
            stats.total_memo_count += 1;

            let property = memo.property();
            let counts = &mut stats.memo_type_stats;
            counts.link_count += usize::from(property.has_link);
            counts.code_count += usize::from(property.has_code);
            counts.todo_count += usize::from(property.has_task_list);
            counts.undo_count += usize::from(property.has_incomplete_tasks);

            for tag in memo.tags() {
                *stats.tag_count.entry(tag).or_insert(0) += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn memo(content: &str) -> Memo {
        Memo::from_content(content, &Parser::new())
    }

    #[test]
    fn test_blank_content_has_no_nodes() {
        assert!(memo("").nodes.is_empty());
        assert!(memo(" \n ").nodes.is_empty());
        assert_eq!(memo("x").nodes.len(), 1);
    }

    #[test]
    fn test_tags_are_unique_and_include_nested_spans() {
        let memo = memo("#work notes\n- **#urgent** [#work](/w)\n> *#later*");
        assert_eq!(memo.tags(), vec!["work", "urgent", "later"]);
    }

    #[test]
    fn test_tags_inside_code_are_ignored() {
        let memo = memo("`#nope` #yes\n```\n#also-nope\n```");
        assert_eq!(memo.tags(), vec!["yes"]);
    }

    #[test]
    fn test_property_flags() {
        assert_eq!(memo("plain").property(), MemoProperty::default());

        let property = memo("- [x] done\n- [ ] open\nsee https://a.io").property();
        assert!(property.has_task_list);
        assert!(property.has_incomplete_tasks);
        assert!(property.has_link);
        assert!(!property.has_code);

        let property = memo("- [x] done\n**`x`**").property();
        assert!(!property.has_incomplete_tasks);
        assert!(property.has_code);
    }

    #[test]
    fn test_user_stats() {
        let memos = vec![
            memo("#a #b #a\n- [ ] todo"),
            memo("```\ncode\n```\n#a"),
            memo("[link](/x)"),
        ];
        let stats = UserStats::collect(&memos);

        assert_eq!(stats.total_memo_count, 3);
        assert_eq!(
            stats.memo_type_stats,
            MemoTypeStats {
                link_count: 1,
                code_count: 1,
                todo_count: 1,
                undo_count: 1,
            }
        );
        assert_eq!(stats.tag_count.get("a"), Some(&2));
        assert_eq!(stats.tag_count.get("b"), Some(&1));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["memoTypeStats"]["undoCount"], 1);
        assert_eq!(json["tagCount"]["a"], 2);
    }
}
