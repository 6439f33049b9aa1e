use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, StockbotError};

pub const DEFAULT_FALLBACK: &str = "Sorry, I don't understand.";

const EMBEDDED_RESPONSES: &str = include_str!("../data/responses.json");

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Replies {
    One(String),
    Many(Vec<String>),
}

impl From<Replies> for Vec<String> {
    fn from(replies: Replies) -> Self {
        match replies {
            Replies::One(reply) => vec![reply],
            Replies::Many(replies) => replies,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    fallback: Option<String>,
    entries: Vec<EntryFile>,
}

#[derive(Debug, Deserialize)]
struct EntryFile {
    keys: Vec<String>,
    replies: Replies,
}

#[derive(Debug)]
struct Entry {
    key: String,
    tokens: Vec<String>,
    replies: usize,
    specific: bool,
}

#[derive(Debug, Clone)]
struct PendingEntry {
    keys: Vec<String>,
    replies: Vec<String>,
    specific: bool,
}

#[derive(Debug, Clone)]
pub struct ResponseTableBuilder {
    fallback: String,
    entries: Vec<PendingEntry>,
}

impl Default for ResponseTableBuilder {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK.to_string(),
            entries: Vec::new(),
        }
    }
}

impl ResponseTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON table definition. `origin` names the source in errors.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let file: TableFile = serde_json::from_str(json).map_err(|source| StockbotError::Json {
            origin: origin.to_string(),
            source,
        })?;

        let mut builder = Self::new();
        if let Some(fallback) = file.fallback {
            builder = builder.fallback(fallback);
        }
        for entry in file.entries {
            builder = builder.entry(entry.keys, Vec::<String>::from(entry.replies));
        }
        Ok(builder)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| StockbotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_RESPONSES, "embedded responses")
    }

    pub fn fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Add one group of keys sharing the same candidate replies.
    pub fn entry<K, R>(self, keys: K, replies: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.push(keys, replies, false)
    }

    /// Like [`entry`](Self::entry), but these keys outrank every plain key
    /// found in the same message, whatever their length.
    pub fn specific_entry<K, R>(self, keys: K, replies: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.push(keys, replies, true)
    }

    fn push<K, R>(mut self, keys: K, replies: R, specific: bool) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.entries.push(PendingEntry {
            keys: keys.into_iter().map(Into::into).collect(),
            replies: replies.into_iter().map(Into::into).collect(),
            specific,
        });
        self
    }

    pub fn build(self) -> Result<ResponseTable> {
        let fallback = self.fallback.trim().to_string();
        if fallback.is_empty() {
            return Err(StockbotError::InvalidTable(
                "fallback reply must not be blank".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Err(StockbotError::InvalidTable("table has no entries".to_string()));
        }

        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut reply_sets = Vec::with_capacity(self.entries.len());

        for PendingEntry {
            keys,
            replies,
            specific,
        } in self.entries
        {
            let replies: Vec<String> = replies
                .into_iter()
                .map(|reply| reply.trim().to_string())
                .collect();
            if replies.is_empty() || replies.iter().any(String::is_empty) {
                return Err(StockbotError::InvalidTable(format!(
                    "keys {keys:?} need at least one reply and no blank replies"
                )));
            }
            if keys.is_empty() {
                return Err(StockbotError::InvalidTable(format!(
                    "replies {replies:?} have no keys"
                )));
            }

            let replies_at = reply_sets.len();
            reply_sets.push(replies);

            for raw in keys {
                let tokens = tokenize(&raw);
                if tokens.is_empty() {
                    return Err(StockbotError::InvalidTable(format!(
                        "key {raw:?} has no searchable words"
                    )));
                }
                let key = tokens.join(" ");
                if index.contains_key(&key) {
                    return Err(StockbotError::InvalidTable(format!("duplicate key {key:?}")));
                }
                index.insert(key.clone(), entries.len());
                entries.push(Entry {
                    key,
                    tokens,
                    replies: replies_at,
                    specific,
                });
            }
        }

        Ok(ResponseTable {
            entries,
            index,
            reply_sets,
            fallback,
        })
    }
}

#[derive(Debug)]
pub struct ResponseTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    reply_sets: Vec<Vec<String>>,
    fallback: String,
}

impl ResponseTable {
    pub fn builder() -> ResponseTableBuilder {
        ResponseTableBuilder::new()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        ResponseTableBuilder::from_json_str(json, "response table")?.build()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let table = ResponseTableBuilder::load(path)?.build()?;
        tracing::info!(path = %path.display(), keys = table.len(), "response table loaded");
        Ok(table)
    }

    pub fn embedded() -> Result<Self> {
        ResponseTableBuilder::embedded()?.build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn replies(&self, key: &str) -> Option<&[String]> {
        self.index
            .get(&normalize(key))
            .map(|&at| self.reply_sets[self.entries[at].replies].as_slice())
    }

    fn best_contained(&self, tokens: &[String]) -> Option<usize> {
        let mut best: Option<(usize, (bool, usize, usize))> = None;
        for (at, entry) in self.entries.iter().enumerate() {
            let width = entry.tokens.len();
            if width > tokens.len() || !tokens.windows(width).any(|w| w == entry.tokens.as_slice()) {
                continue;
            }
            let rank = (entry.specific, width, entry.key.chars().count());
            if best.map_or(true, |(_, best_rank)| rank > best_rank) {
                best = Some((at, rank));
            }
        }
        best.map(|(at, _)| at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply<'a> {
    pub text: &'a str,
    /// Normalized key that produced the reply; `None` for the fallback.
    pub matched: Option<&'a str>,
}

#[derive(Debug)]
pub struct ResponseEngine {
    table: ResponseTable,
}

impl ResponseEngine {
    pub fn new(table: ResponseTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    pub fn respond(&self, message: &str) -> &str {
        self.lookup(Some(message)).text
    }

    /// Answer a possibly absent message. Absent and empty messages get the
    /// fallback.
    pub fn lookup(&self, message: Option<&str>) -> Reply<'_> {
        let tokens = message.map(tokenize).unwrap_or_default();
        if tokens.is_empty() {
            return self.fallback_reply();
        }

        let normalized = tokens.join(" ");
        // A plain exact key can still lose to a specific key inside the message.
        let found = self
            .table
            .index
            .get(&normalized)
            .copied()
            .filter(|&at| self.table.entries[at].specific)
            .or_else(|| self.table.best_contained(&tokens));

        match found {
            Some(at) => {
                let entry = &self.table.entries[at];
                let replies = &self.table.reply_sets[entry.replies];
                Reply {
                    text: pick(replies, &normalized),
                    matched: Some(entry.key.as_str()),
                }
            }
            None => self.fallback_reply(),
        }
    }

    fn fallback_reply(&self) -> Reply<'_> {
        Reply {
            text: &self.table.fallback,
            matched: None,
        }
    }
}

// Stable across runs and platforms, unlike `DefaultHasher`.
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

fn pick<'a>(replies: &'a [String], normalized: &str) -> &'a str {
    if replies.len() == 1 {
        return &replies[0];
    }
    let at = (fnv1a(normalized) % replies.len() as u64) as usize;
    &replies[at]
}
