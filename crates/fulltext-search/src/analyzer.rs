//! Analyzers: named text-to-token pipelines.
//!
//! Three analyzers are registered under the identifiers stored in index
//! descriptors:
//! - `standard`: Unicode word split, tokens over 40 bytes dropped, lowercased
//! - `jieba`: jieba segmentation (HMM on) for CJK text, lowercased
//! - `keyword`: the whole value as one token
//!
//! The same pipelines are registered on every opened index so indexing and
//! query planning always tokenize identically.

use std::sync::Arc;

use tantivy::tokenizer::{
    LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, TextAnalyzer, Token,
    TokenStream, Tokenizer, TokenizerManager,
};

use fulltext_types::index::{CJK_ANALYZER, KEYWORD_ANALYZER, STANDARD_ANALYZER};
use fulltext_types::TokenSpan;

use crate::error::TokenizationError;

/// Tokens longer than this many bytes are dropped by the standard analyzer.
const MAX_TOKEN_LEN: usize = 40;

/// Identifiers of every built-in analyzer.
pub const ANALYZER_IDS: &[&str] = &[STANDARD_ANALYZER, CJK_ANALYZER, KEYWORD_ANALYZER];

/// Registry of the built-in analyzers.
///
/// Cloning is cheap; the jieba dictionary is shared.
#[derive(Clone)]
pub struct Analyzers {
    manager: TokenizerManager,
}

impl Analyzers {
    pub fn new() -> Self {
        let manager = TokenizerManager::new();
        manager.register(
            STANDARD_ANALYZER,
            TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
                .filter(LowerCaser)
                .build(),
        );
        manager.register(
            CJK_ANALYZER,
            TextAnalyzer::builder(JiebaTokenizer::new())
                .filter(LowerCaser)
                .build(),
        );
        manager.register(KEYWORD_ANALYZER, TextAnalyzer::from(RawTokenizer::default()));
        Self { manager }
    }

    /// Whether an analyzer is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.manager.get(id).is_some()
    }

    /// Register every analyzer on an index's tokenizer manager.
    pub fn register_on(&self, target: &TokenizerManager) {
        for id in ANALYZER_IDS {
            if let Some(analyzer) = self.manager.get(id) {
                target.register(id, analyzer);
            }
        }
    }

    /// Tokenize `text` with the analyzer registered under `id`.
    ///
    /// Offsets are byte offsets into `text`.
    pub fn tokenize(&self, id: &str, text: &str) -> Result<Vec<TokenSpan>, TokenizationError> {
        let mut analyzer = self
            .manager
            .get(id)
            .ok_or_else(|| TokenizationError::UnknownAnalyzer(id.to_string()))?;

        let mut spans = Vec::new();
        let mut stream = analyzer.token_stream(text);
        while stream.advance() {
            let token = stream.token();
            spans.push(TokenSpan::new(
                token.text.clone(),
                token.offset_from,
                token.offset_to,
            ));
        }
        Ok(spans)
    }
}

impl Default for Analyzers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Analyzers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzers")
            .field("ids", &ANALYZER_IDS)
            .finish()
    }
}

/// Chinese word segmentation using jieba-rs
#[derive(Clone)]
pub struct JiebaTokenizer {
    jieba: Arc<jieba_rs::Jieba>,
}

impl JiebaTokenizer {
    /// Create a tokenizer with the default dictionary
    pub fn new() -> Self {
        Self {
            jieba: Arc::new(jieba_rs::Jieba::new()),
        }
    }

    /// Segment `text` into `(start, end, word)` triples, whitespace dropped.
    fn segment(&self, text: &str) -> Vec<(usize, usize, String)> {
        let mut cursor = 0;
        let mut words = Vec::new();
        for piece in self.jieba.cut(text, true) {
            let start = match text[cursor..].find(piece) {
                Some(pos) => cursor + pos,
                None => continue,
            };
            let end = start + piece.len();
            cursor = end;
            if !piece.trim().is_empty() {
                words.push((start, end, piece.to_string()));
            }
        }
        words
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JiebaTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiebaTokenizer").finish()
    }
}

/// Token stream over pre-segmented jieba words
pub struct JiebaTokenStream {
    words: Vec<(usize, usize, String)>,
    index: usize,
    token: Token,
}

impl TokenStream for JiebaTokenStream {
    fn advance(&mut self) -> bool {
        let Some((start, end, text)) = self.words.get(self.index) else {
            return false;
        };
        self.token = Token {
            offset_from: *start,
            offset_to: *end,
            position: self.index,
            text: text.clone(),
            position_length: 1,
        };
        self.index += 1;
        true
    }

    fn token(&self) -> &Token {
        &self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

impl Tokenizer for JiebaTokenizer {
    type TokenStream<'a> = JiebaTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        JiebaTokenStream {
            words: self.segment(text),
            index: 0,
            token: Token::default(),
        }
    }
}
