/// Line-oriented tokenizer turning note content into block and inline nodes
use crate::ast::{BlockNode, InlineNode};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// One character of line content. Also excludes the U+2028/U+2029 line separators.
const LINE_CHAR: &str = r"[^\r\n\x{2028}\x{2029}]";
// Leading whitespace, a byte order mark included.
const LEADING_SPACE: &str = r"[\s\x{FEFF}]*";

static TASK_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({LEADING_SPACE})- \[([ xX])\] ({LINE_CHAR}*)")).unwrap()
});
static UNORDERED_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^({LEADING_SPACE})- ({LINE_CHAR}*)")).unwrap());
static ORDERED_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({LEADING_SPACE})([0-9]+)\. ({LINE_CHAR}*)")).unwrap()
});
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(#{{1,6}}) ({LINE_CHAR}*)")).unwrap());

static IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^!\[({LINE_CHAR}*?)\]\(({LINE_CHAR}*?)\)")).unwrap()
});
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\[({LINE_CHAR}*?)\]\(({LINE_CHAR}*?)\)")).unwrap()
});
static AUTO_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s\x{FEFF}]+").unwrap());
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#([^\s\x{FEFF}#.,!?:;'"(){}\[\]]+)"#).unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`([^`]+)`").unwrap());
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\*\*({LINE_CHAR}*?)\*\*")).unwrap());
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\*({LINE_CHAR}*?)\*")).unwrap());

/// Characters that may start an inline span. Plain text runs stop in front of them.
const SPAN_START_CHARS: [char; 6] = ['!', '[', '#', '`', '*', 'h'];

const FENCE: &str = "```";
const DEFAULT_MAX_INLINE_DEPTH: usize = 32;

/// Inline span rules, tried in this order at the start of the remaining text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineRule {
    Image,
    Link,
    AutoLink,
    Tag,
    Code,
    Bold,
    Italic,
}

pub const INLINE_RULES: [InlineRule; 7] = [
    InlineRule::Image,
    InlineRule::Link,
    InlineRule::AutoLink,
    InlineRule::Tag,
    InlineRule::Code,
    InlineRule::Bold,
    InlineRule::Italic,
];

/// A rule that matched at the start of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch<'t> {
    pub rule: InlineRule,
    /// Bytes consumed from the text.
    pub len: usize,
    /// First capture, or the whole match for auto links.
    pub first: &'t str,
    /// Second capture, empty for single-capture rules.
    pub second: &'t str,
}

impl InlineRule {
    fn pattern(&self) -> &'static Regex {
        match self {
            InlineRule::Image => &IMAGE,
            InlineRule::Link => &LINK,
            InlineRule::AutoLink => &AUTO_LINK,
            InlineRule::Tag => &TAG,
            InlineRule::Code => &CODE,
            InlineRule::Bold => &BOLD,
            InlineRule::Italic => &ITALIC,
        }
    }

    /// Try this rule anchored at the start of `text`. Never scans ahead.
    pub fn try_match<'t>(&self, text: &'t str) -> Option<InlineMatch<'t>> {
        let caps = self.pattern().captures(text)?;
        let whole = caps.get(0)?;
        let first = caps.get(1).map_or(whole.as_str(), |m| m.as_str());
        let second = caps.get(2).map_or("", |m| m.as_str());
        Some(InlineMatch {
            rule: *self,
            len: whole.end(),
            first,
            second,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Number of inline levels that get tokenized, the top level included.
    /// Deeper link/bold/italic content is kept as a single text child.
    pub max_inline_depth: usize,
    /// Return no nodes at all for empty or whitespace-only content.
    pub skip_blank_content: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_inline_depth: DEFAULT_MAX_INLINE_DEPTH,
            skip_blank_content: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Parser { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Split `source` into lines and turn each line (or fenced run of lines)
    /// into a block node. Total over all inputs.
    pub fn tokenize(&self, source: &str) -> Vec<BlockNode> {
        if self.options.skip_blank_content && trim_blank(source).is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = source.split('\n').collect();
        let mut nodes = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if self.is_fence(line) {
                let (node, consumed) = self.parse_fenced_code_block(&lines[i..]);
                trace!(line = i, consumed, "code block");
                nodes.push(node);
                i += consumed;
                continue;
            }

            let node = self.parse_line(line);
            trace!(line = i, kind = ?node.kind(), "block");
            nodes.push(node);
            i += 1;
        }

        nodes
    }

    /// Tokenize the inline spans of a single line of text.
    pub fn tokenize_inline(&self, text: &str) -> Vec<InlineNode> {
        self.parse_inline(text, 1)
    }

    fn is_fence(&self, line: &str) -> bool {
        trim_blank(line).starts_with(FENCE)
    }

    /// Parse a fenced code block starting at `lines[0]`.
    /// Returns the node and the number of lines consumed, closing fence included.
    fn parse_fenced_code_block(&self, lines: &[&str]) -> (BlockNode, usize) {
        let language = trim_blank(lines[0])[FENCE.len()..].to_string();

        let mut code_lines = Vec::new();
        let mut i = 1; // Start after the opening fence

        while i < lines.len() && !self.is_fence(lines[i]) {
            code_lines.push(lines[i]);
            i += 1;
        }

        if i < lines.len() {
            i += 1; // Closing fence
        } else {
            debug!(language = %language, "unterminated code fence runs to end of input");
        }

        let node = BlockNode::CodeBlock {
            language,
            content: code_lines.join("\n"),
        };
        (node, i)
    }

    /// Classify a single non-fence line. First matching rule wins.
    fn parse_line(&self, line: &str) -> BlockNode {
        if let Some(quoted) = line.strip_prefix("> ") {
            return BlockNode::Blockquote {
                children: self.tokenize_inline(quoted),
            };
        }

        if let Some(caps) = TASK_LIST_ITEM.captures(line) {
            return BlockNode::TaskListItem {
                symbol: "-".to_string(),
                indent: indent_level(&caps[1]),
                complete: caps[2].eq_ignore_ascii_case("x"),
                children: self.tokenize_inline(&caps[3]),
            };
        }

        if let Some(caps) = UNORDERED_LIST_ITEM.captures(line) {
            return BlockNode::UnorderedListItem {
                symbol: "-".to_string(),
                indent: indent_level(&caps[1]),
                children: self.tokenize_inline(&caps[2]),
            };
        }

        if let Some(caps) = ORDERED_LIST_ITEM.captures(line) {
            return BlockNode::OrderedListItem {
                number: caps[2].to_string(),
                indent: indent_level(&caps[1]),
                children: self.tokenize_inline(&caps[3]),
            };
        }

        if let Some(caps) = HEADING.captures(line) {
            return BlockNode::Heading {
                level: caps[1].len() as u8,
                children: self.tokenize_inline(&caps[2]),
            };
        }

        let trimmed = trim_blank(line);
        if trimmed == "---" || trimmed == "***" {
            return BlockNode::HorizontalRule {
                symbol: trimmed.to_string(),
            };
        }

        if trimmed.is_empty() {
            BlockNode::LineBreak
        } else {
            BlockNode::Paragraph {
                children: self.tokenize_inline(line),
            }
        }
    }

    /// Inline tokenizer loop. `depth` is the level being tokenized, starting at 1.
    fn parse_inline(&self, text: &str, depth: usize) -> Vec<InlineNode> {
        let mut nodes = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(found) = INLINE_RULES.iter().find_map(|rule| rule.try_match(rest)) {
                rest = &rest[found.len..];
                nodes.push(self.build_span(found, depth));
                continue;
            }

            let plain_len = plain_text_len(rest);
            push_text(&mut nodes, &rest[..plain_len]);
            rest = &rest[plain_len..];
        }

        nodes
    }

    fn build_span(&self, found: InlineMatch<'_>, depth: usize) -> InlineNode {
        match found.rule {
            InlineRule::Image => InlineNode::Image {
                alt_text: found.first.to_string(),
                url: found.second.to_string(),
            },
            InlineRule::Link => InlineNode::Link {
                content: self.parse_nested(found.first, depth),
                url: found.second.to_string(),
            },
            InlineRule::AutoLink => InlineNode::AutoLink {
                url: found.first.to_string(),
                is_raw_text: true,
            },
            InlineRule::Tag => InlineNode::Tag {
                content: found.first.to_string(),
            },
            InlineRule::Code => InlineNode::Code {
                content: found.first.to_string(),
            },
            InlineRule::Bold => InlineNode::Bold {
                children: self.parse_nested(found.first, depth),
                symbol: "*".to_string(),
            },
            InlineRule::Italic => InlineNode::Italic {
                children: self.parse_nested(found.first, depth),
                symbol: "*".to_string(),
            },
        }
    }

    /// Tokenize span content one level down, or keep it verbatim past the depth limit.
    fn parse_nested(&self, inner: &str, depth: usize) -> Vec<InlineNode> {
        if depth < self.options.max_inline_depth {
            return self.parse_inline(inner, depth + 1);
        }

        debug!(depth, len = inner.len(), "inline nesting limit reached");
        if inner.is_empty() {
            Vec::new()
        } else {
            vec![InlineNode::text(inner)]
        }
    }
}

/// Strip surrounding whitespace, treating a byte order mark as whitespace too.
pub(crate) fn trim_blank(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Nesting hint for list items: two whitespace characters per level.
fn indent_level(leading: &str) -> usize {
    leading.chars().count() / 2
}

/// Length in bytes of the plain text run at the start of `text`.
/// Always at least one character, so the inline loop makes progress.
fn plain_text_len(text: &str) -> usize {
    match text.find(SPAN_START_CHARS) {
        None => text.len(),
        Some(0) => text.chars().next().map_or(0, char::len_utf8),
        Some(pos) => pos,
    }
}

/// Append plain text, merging into a trailing text node.
fn push_text(nodes: &mut Vec<InlineNode>, text: &str) {
    if let Some(InlineNode::Text { content }) = nodes.last_mut() {
        content.push_str(text);
    } else {
        nodes.push(InlineNode::text(text));
    }
}
