use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;
use crate::parser::{Parser, ParserOptions};
use crate::serializer::{InlineStyle, MarkdownSerializer};
use crate::wire::Encoding;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub parser: ParserOptions,
    pub serializer: SerializerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct SerializerConfig {
    pub inline_style: InlineStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub encoding: Encoding,
    pub pretty: bool,
}

impl Config {
    /// Load config from a TOML file. A missing file means defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn parser(&self) -> Parser {
        Parser::with_options(self.parser.clone())
    }

    pub fn serializer(&self) -> MarkdownSerializer {
        MarkdownSerializer::with_style(self.serializer.inline_style)
    }
}
