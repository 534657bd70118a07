//! JSON encodings of the node tree.
//!
//! `Compact` is the serde form of [`BlockNode`] itself:
//! `{"type":"HEADING","level":1,"children":[...]}`.
//!
//! `Service` is the shape the note service exchanges, with each payload
//! nested under a `<kind>Node` key:
//! `{"type":"HEADING","headingNode":{"level":1,"children":[...]}}`.
//!
//! Both are written wrapped as `{"nodes": [...]}`; decoding also accepts a bare array.

use serde::{Deserialize, Serialize};

use crate::ast::{BlockKind, BlockNode, InlineKind, InlineNode};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Service,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_block_node: Option<CodeBlockPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockquote_node: Option<ChildrenPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list_item_node: Option<TaskListItemPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unordered_list_item_node: Option<UnorderedListItemPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_list_item_node: Option<OrderedListItemPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_node: Option<HeadingPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_rule_node: Option<HorizontalRulePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_node: Option<ChildrenPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_break_node: Option<EmptyPayload>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeBlockPayload {
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildrenPayload {
    pub children: Vec<ServiceInline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListItemPayload {
    pub symbol: String,
    pub indent: usize,
    pub complete: bool,
    pub children: Vec<ServiceInline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnorderedListItemPayload {
    pub symbol: String,
    pub indent: usize,
    pub children: Vec<ServiceInline>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderedListItemPayload {
    pub number: String,
    pub indent: usize,
    pub children: Vec<ServiceInline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingPayload {
    pub level: u8,
    pub children: Vec<ServiceInline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HorizontalRulePayload {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmptyPayload {}

impl Default for TaskListItemPayload {
    fn default() -> Self {
        TaskListItemPayload {
            symbol: "-".to_string(),
            indent: 0,
            complete: false,
            children: Vec::new(),
        }
    }
}

impl Default for UnorderedListItemPayload {
    fn default() -> Self {
        UnorderedListItemPayload {
            symbol: "-".to_string(),
            indent: 0,
            children: Vec::new(),
        }
    }
}

impl Default for HeadingPayload {
    fn default() -> Self {
        HeadingPayload {
            level: 1,
            children: Vec::new(),
        }
    }
}

impl Default for HorizontalRulePayload {
    fn default() -> Self {
        HorizontalRulePayload {
            symbol: "---".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInline {
    #[serde(rename = "type")]
    pub kind: InlineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_node: Option<ContentPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_node: Option<ImagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_node: Option<LinkPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_link_node: Option<AutoLinkPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_node: Option<ContentPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_node: Option<ContentPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_node: Option<StyledPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic_node: Option<StyledPayload>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPayload {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePayload {
    pub alt_text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPayload {
    pub content: Vec<ServiceInline>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoLinkPayload {
    pub url: String,
    pub is_raw_text: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyledPayload {
    pub symbol: String,
    pub children: Vec<ServiceInline>,
}

impl Default for AutoLinkPayload {
    fn default() -> Self {
        AutoLinkPayload {
            url: String::new(),
            is_raw_text: true,
        }
    }
}

impl Default for StyledPayload {
    fn default() -> Self {
        StyledPayload {
            symbol: "*".to_string(),
            children: Vec::new(),
        }
    }
}

impl ServiceBlock {
    fn empty(kind: BlockKind) -> Self {
        ServiceBlock {
            kind,
            code_block_node: None,
            blockquote_node: None,
            task_list_item_node: None,
            unordered_list_item_node: None,
            ordered_list_item_node: None,
            heading_node: None,
            horizontal_rule_node: None,
            paragraph_node: None,
            line_break_node: None,
        }
    }
}

impl ServiceInline {
    fn empty(kind: InlineKind) -> Self {
        ServiceInline {
            kind,
            text_node: None,
            image_node: None,
            link_node: None,
            auto_link_node: None,
            tag_node: None,
            code_node: None,
            bold_node: None,
            italic_node: None,
        }
    }
}

impl From<&BlockNode> for ServiceBlock {
    fn from(node: &BlockNode) -> Self {
        let mut block = ServiceBlock::empty(node.kind());
        match node {
            BlockNode::CodeBlock { language, content } => {
                block.code_block_node = Some(CodeBlockPayload {
                    language: language.clone(),
                    content: content.clone(),
                });
            }
            BlockNode::Blockquote { children } => {
                block.blockquote_node = Some(ChildrenPayload {
                    children: to_service_inlines(children),
                });
            }
            BlockNode::TaskListItem {
                symbol,
                indent,
                complete,
                children,
            } => {
                block.task_list_item_node = Some(TaskListItemPayload {
                    symbol: symbol.clone(),
                    indent: *indent,
                    complete: *complete,
                    children: to_service_inlines(children),
                });
            }
            BlockNode::UnorderedListItem {
                symbol,
                indent,
                children,
            } => {
                block.unordered_list_item_node = Some(UnorderedListItemPayload {
                    symbol: symbol.clone(),
                    indent: *indent,
                    children: to_service_inlines(children),
                });
            }
            BlockNode::OrderedListItem {
                number,
                indent,
                children,
            } => {
                block.ordered_list_item_node = Some(OrderedListItemPayload {
                    number: number.clone(),
                    indent: *indent,
                    children: to_service_inlines(children),
                });
            }
            BlockNode::Heading { level, children } => {
                block.heading_node = Some(HeadingPayload {
                    level: *level,
                    children: to_service_inlines(children),
                });
            }
            BlockNode::HorizontalRule { symbol } => {
                block.horizontal_rule_node = Some(HorizontalRulePayload {
                    symbol: symbol.clone(),
                });
            }
            BlockNode::Paragraph { children } => {
                block.paragraph_node = Some(ChildrenPayload {
                    children: to_service_inlines(children),
                });
            }
            BlockNode::LineBreak => block.line_break_node = Some(EmptyPayload {}),
        }
        block
    }
}

impl From<&InlineNode> for ServiceInline {
    fn from(node: &InlineNode) -> Self {
        let mut inline = ServiceInline::empty(node.kind());
        match node {
            InlineNode::Text { content } => {
                inline.text_node = Some(ContentPayload {
                    content: content.clone(),
                });
            }
            InlineNode::Image { alt_text, url } => {
                inline.image_node = Some(ImagePayload {
                    alt_text: alt_text.clone(),
                    url: url.clone(),
                });
            }
            InlineNode::Link { content, url } => {
                inline.link_node = Some(LinkPayload {
                    content: to_service_inlines(content),
                    url: url.clone(),
                });
            }
            InlineNode::AutoLink { url, is_raw_text } => {
                inline.auto_link_node = Some(AutoLinkPayload {
                    url: url.clone(),
                    is_raw_text: *is_raw_text,
                });
            }
            InlineNode::Tag { content } => {
                inline.tag_node = Some(ContentPayload {
                    content: content.clone(),
                });
            }
            InlineNode::Code { content } => {
                inline.code_node = Some(ContentPayload {
                    content: content.clone(),
                });
            }
            InlineNode::Bold { children, symbol } => {
                inline.bold_node = Some(StyledPayload {
                    symbol: symbol.clone(),
                    children: to_service_inlines(children),
                });
            }
            InlineNode::Italic { children, symbol } => {
                inline.italic_node = Some(StyledPayload {
                    symbol: symbol.clone(),
                    children: to_service_inlines(children),
                });
            }
        }
        inline
    }
}

impl TryFrom<ServiceBlock> for BlockNode {
    type Error = Error;

    fn try_from(block: ServiceBlock) -> Result<Self> {
        let kind = block.kind;
        let missing = || Error::MissingBlockPayload { kind };

        let node = match kind {
            BlockKind::CodeBlock => {
                let payload = block.code_block_node.ok_or_else(missing)?;
                BlockNode::CodeBlock {
                    language: payload.language,
                    content: payload.content,
                }
            }
            BlockKind::Blockquote => BlockNode::Blockquote {
                children: from_service_inlines(block.blockquote_node.ok_or_else(missing)?.children)?,
            },
            BlockKind::TaskListItem => {
                let payload = block.task_list_item_node.ok_or_else(missing)?;
                BlockNode::TaskListItem {
                    symbol: payload.symbol,
                    indent: payload.indent,
                    complete: payload.complete,
                    children: from_service_inlines(payload.children)?,
                }
            }
            BlockKind::UnorderedListItem => {
                let payload = block.unordered_list_item_node.ok_or_else(missing)?;
                BlockNode::UnorderedListItem {
                    symbol: payload.symbol,
                    indent: payload.indent,
                    children: from_service_inlines(payload.children)?,
                }
            }
            BlockKind::OrderedListItem => {
                let payload = block.ordered_list_item_node.ok_or_else(missing)?;
                BlockNode::OrderedListItem {
                    number: payload.number,
                    indent: payload.indent,
                    children: from_service_inlines(payload.children)?,
                }
            }
            BlockKind::Heading => {
                let payload = block.heading_node.ok_or_else(missing)?;
                if !(1..=6).contains(&payload.level) {
                    return Err(Error::InvalidHeadingLevel(payload.level));
                }
                BlockNode::Heading {
                    level: payload.level,
                    children: from_service_inlines(payload.children)?,
                }
            }
            BlockKind::HorizontalRule => BlockNode::HorizontalRule {
                symbol: block.horizontal_rule_node.unwrap_or_default().symbol,
            },
            BlockKind::Paragraph => BlockNode::Paragraph {
                children: from_service_inlines(block.paragraph_node.ok_or_else(missing)?.children)?,
            },
            // The service omits the empty payload on line breaks
            BlockKind::LineBreak => BlockNode::LineBreak,
        };
        Ok(node)
    }
}

impl TryFrom<ServiceInline> for InlineNode {
    type Error = Error;

    fn try_from(inline: ServiceInline) -> Result<Self> {
        let kind = inline.kind;
        let missing = || Error::MissingInlinePayload { kind };

        let node = match kind {
            InlineKind::Text => InlineNode::Text {
                content: inline.text_node.ok_or_else(missing)?.content,
            },
            InlineKind::Image => {
                let payload = inline.image_node.ok_or_else(missing)?;
                InlineNode::Image {
                    alt_text: payload.alt_text,
                    url: payload.url,
                }
            }
            InlineKind::Link => {
                let payload = inline.link_node.ok_or_else(missing)?;
                InlineNode::Link {
                    content: from_service_inlines(payload.content)?,
                    url: payload.url,
                }
            }
            InlineKind::AutoLink => {
                let payload = inline.auto_link_node.ok_or_else(missing)?;
                InlineNode::AutoLink {
                    url: payload.url,
                    is_raw_text: payload.is_raw_text,
                }
            }
            InlineKind::Tag => InlineNode::Tag {
                content: inline.tag_node.ok_or_else(missing)?.content,
            },
            InlineKind::Code => InlineNode::Code {
                content: inline.code_node.ok_or_else(missing)?.content,
            },
            InlineKind::Bold => {
                let payload = inline.bold_node.ok_or_else(missing)?;
                InlineNode::Bold {
                    children: from_service_inlines(payload.children)?,
                    symbol: payload.symbol,
                }
            }
            InlineKind::Italic => {
                let payload = inline.italic_node.ok_or_else(missing)?;
                InlineNode::Italic {
                    children: from_service_inlines(payload.children)?,
                    symbol: payload.symbol,
                }
            }
        };
        Ok(node)
    }
}

fn to_service_inlines(nodes: &[InlineNode]) -> Vec<ServiceInline> {
    nodes.iter().map(ServiceInline::from).collect()
}

fn from_service_inlines(nodes: Vec<ServiceInline>) -> Result<Vec<InlineNode>> {
    nodes.into_iter().map(InlineNode::try_from).collect()
}

pub fn to_service(nodes: &[BlockNode]) -> Vec<ServiceBlock> {
    nodes.iter().map(ServiceBlock::from).collect()
}

pub fn from_service(blocks: Vec<ServiceBlock>) -> Result<Vec<BlockNode>> {
    blocks.into_iter().map(BlockNode::try_from).collect()
}

#[derive(Serialize)]
struct NodesOut<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodesIn<T> {
    Wrapped { nodes: Vec<T> },
    Bare(Vec<T>),
}

impl<T> NodesIn<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            NodesIn::Wrapped { nodes } | NodesIn::Bare(nodes) => nodes,
        }
    }
}

/// Write `nodes` as `{"nodes": [...]}` in the given encoding.
pub fn encode(nodes: &[BlockNode], encoding: Encoding, pretty: bool) -> Result<String> {
    let json = match encoding {
        Encoding::Service => write_json(&NodesOut { nodes: to_service(nodes) }, pretty)?,
        Encoding::Compact => write_json(&NodesOut { nodes: nodes.to_vec() }, pretty)?,
    };
    Ok(json)
}

pub fn decode(json: &str, encoding: Encoding) -> Result<Vec<BlockNode>> {
    match encoding {
        Encoding::Service => {
            let blocks: NodesIn<ServiceBlock> = serde_json::from_str(json)?;
            from_service(blocks.into_vec())
        }
        Encoding::Compact => {
            let nodes = serde_json::from_str::<NodesIn<BlockNode>>(json)?.into_vec();
            check_heading_levels(&nodes)?;
            Ok(nodes)
        }
    }
}

/// Compact nodes come straight from serde, so the level range is checked here.
fn check_heading_levels(nodes: &[BlockNode]) -> Result<()> {
    for node in nodes {
        if let BlockNode::Heading { level, .. } = node
            && !(1..=6).contains(level)
        {
            return Err(Error::InvalidHeadingLevel(*level));
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_service_shape() {
        let nodes = Parser::new().tokenize("# Hi **you**\n");
        let value: serde_json::Value =
            serde_json::from_str(&encode(&nodes, Encoding::Service, false).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "nodes": [
                    {
                        "type": "HEADING",
                        "headingNode": {
                            "level": 1,
                            "children": [
                                { "type": "TEXT", "textNode": { "content": "Hi " } },
                                {
                                    "type": "BOLD",
                                    "boldNode": {
                                        "symbol": "*",
                                        "children": [
                                            { "type": "TEXT", "textNode": { "content": "you" } }
                                        ]
                                    }
                                }
                            ]
                        }
                    },
                    { "type": "LINE_BREAK", "lineBreakNode": {} }
                ]
            })
        );
    }

    #[test]
    fn test_both_encodings_decode_back() {
        let source = "```sh\nls\n```\n> [a](b) #c\n- [ ] `x` https://y.z\n3. ![i](j)\n---\n*it*";
        let nodes = Parser::new().tokenize(source);
        for encoding in [Encoding::Service, Encoding::Compact] {
            let json = encode(&nodes, encoding, true).unwrap();
            assert_eq!(decode(&json, encoding).unwrap(), nodes);
        }
    }

    #[test]
    fn test_decode_accepts_bare_array_and_missing_line_break_payload() {
        let json = r#"[{"type":"LINE_BREAK"},{"type":"HORIZONTAL_RULE","horizontalRuleNode":{"symbol":"***"}}]"#;
        assert_eq!(
            decode(json, Encoding::Service).unwrap(),
            vec![
                BlockNode::LineBreak,
                BlockNode::HorizontalRule {
                    symbol: "***".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_decode_fills_payload_defaults() {
        let json = r#"[{"type":"UNORDERED_LIST_ITEM","unorderedListItemNode":{"children":[]}}]"#;
        assert_eq!(
            decode(json, Encoding::Service).unwrap(),
            vec![BlockNode::UnorderedListItem {
                symbol: "-".to_string(),
                indent: 0,
                children: vec![],
            }]
        );
    }

    #[test]
    fn test_decode_rejects_missing_payload() {
        let err = decode(r#"[{"type":"PARAGRAPH"}]"#, Encoding::Service).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingBlockPayload {
                kind: BlockKind::Paragraph
            }
        ));

        let err = decode(
            r#"[{"type":"PARAGRAPH","paragraphNode":{"children":[{"type":"TAG"}]}}]"#,
            Encoding::Service,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingInlinePayload {
                kind: InlineKind::Tag
            }
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_type_and_bad_level() {
        assert!(matches!(
            decode(r#"[{"type":"TABLE"}]"#, Encoding::Service),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            decode(
                r#"[{"type":"HEADING","headingNode":{"level":9}}]"#,
                Encoding::Service
            ),
            Err(Error::InvalidHeadingLevel(9))
        ));
        assert!(matches!(
            decode(r#"[{"type":"TABLE"}]"#, Encoding::Compact),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            decode(
                r#"{"nodes":[{"type":"HEADING","level":0,"children":[{"type":"TEXT","content":"t"}]}]}"#,
                Encoding::Compact
            ),
            Err(Error::InvalidHeadingLevel(0))
        ));
        assert!(matches!(
            decode(r#"[{"type":"HEADING","level":7,"children":[]}]"#, Encoding::Compact),
            Err(Error::InvalidHeadingLevel(7))
        ));
    }
}
