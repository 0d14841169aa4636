//! Sentence-bounded text chunking with whole-sentence overlap

use regex::Regex;

use crate::config::ChunkingConfig;

/// One chunk produced by [`TextChunker::chunk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPiece {
    /// Sentences joined by a single space
    pub content: String,
    /// Sum of the per-sentence token estimates
    pub token_count: usize,
}

/// Approximate token count: roughly one token per four characters, matching
/// the sub-word tokenizers of the embedding models in use.
pub fn approximate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Splits text into token-bounded chunks at sentence boundaries, carrying a
/// whole-sentence overlap tail from each chunk into the next.
pub struct TextChunker {
    /// Accepted but inert: chunks close only when `max_tokens` would be
    /// exceeded, so a trailing under-sized chunk is still emitted.
    #[allow(dead_code)]
    min_tokens: usize,
    max_tokens: usize,
    overlap_tokens: usize,
    boundary: Regex,
}

impl TextChunker {
    pub fn new(min_tokens: usize, max_tokens: usize, overlap_tokens: usize) -> Self {
        Self {
            min_tokens,
            max_tokens,
            overlap_tokens,
            // `.`, `!` or `?` followed by whitespace ends a sentence
            boundary: Regex::new(r"[.!?]\s+").expect("valid sentence boundary pattern"),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.min_tokens, config.max_tokens, config.overlap_tokens)
    }

    /// Split `text` into chunks. Deterministic for a fixed input and
    /// configuration; preserves document order; empty input yields an empty
    /// sequence.
    pub fn chunk(&self, text: &str) -> Vec<ChunkPiece> {
        let sentences = self.split_sentences(text);

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_tokens = 0usize;

        for sentence in sentences {
            let sentence_tokens = approximate_tokens(sentence);

            if current_tokens + sentence_tokens > self.max_tokens && !current.is_empty() {
                chunks.push(ChunkPiece {
                    content: current.join(" "),
                    token_count: current_tokens,
                });

                // Seed the next chunk with trailing whole sentences whose
                // cumulative tokens stay within the overlap budget.
                let mut overlap: Vec<&str> = Vec::new();
                let mut overlap_tokens = 0usize;
                for prev in current.iter().rev() {
                    let prev_tokens = approximate_tokens(prev);
                    if overlap_tokens + prev_tokens <= self.overlap_tokens {
                        overlap.insert(0, prev);
                        overlap_tokens += prev_tokens;
                    } else {
                        break;
                    }
                }

                current = overlap;
                current_tokens = overlap_tokens;
            }

            // Sentences are never split, even when one alone exceeds the cap
            current.push(sentence);
            current_tokens += sentence_tokens;
        }

        if !current.is_empty() {
            chunks.push(ChunkPiece {
                content: current.join(" "),
                token_count: current_tokens,
            });
        }

        chunks
    }

    /// Sentence boundaries sit after `.`, `!` or `?` followed by whitespace;
    /// the separating whitespace is discarded, as are blank fragments.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0usize;

        for m in self.boundary.find_iter(text) {
            // Keep the punctuation mark with its sentence
            let end = m.start() + 1;
            let fragment = &text[start..end];
            if !fragment.trim().is_empty() {
                sentences.push(fragment);
            }
            start = m.end();
        }

        let tail = &text[start..];
        if !tail.trim().is_empty() {
            sentences.push(tail);
        }

        sentences
    }
}
