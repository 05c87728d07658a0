//! Recursive character text splitting with overlap
//!
//! Text is split on the first separator that occurs in it (paragraph, line,
//! word, then character). Each separator stays attached to the start of the
//! piece that follows it. Pieces that still exceed the chunk size are split
//! again with the remaining separators; small neighbouring pieces are merged
//! back into chunks of at most `chunk_size` characters, carrying up to
//! `chunk_overlap` characters of trailing context into the next chunk.
//!
//! All sizes are counted in characters, not bytes.

use std::collections::VecDeque;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::types::Fragment;

/// Separators tried in order
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters carried over between consecutive chunks
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
        }
    }

    /// Create from config
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Cut a document's text into fragments under a fresh document id
    pub fn chunk(&self, text: &str, filename: &str) -> Vec<Fragment> {
        let document_id = Uuid::new_v4();
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(ordinal, chunk)| Fragment::new(document_id, ordinal, chunk, filename))
            .collect()
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, DEFAULT_SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&str] = &[];
        for (i, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if piece.chars().count() < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small));
                small.clear();
            }
            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small));
        }
        chunks
    }

    /// Greedily merge adjacent pieces into chunks, keeping an overlapping tail
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = piece.chars().count();

            if total + len > self.chunk_size && !window.is_empty() {
                chunks.extend(join_window(&window));

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        chunks.extend(join_window(&window));
        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Split `text` before every occurrence of `separator`, so each piece after
/// the first begins with the separator. An empty separator splits into
/// characters. Empty pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        pieces.push(&text[start..idx]);
        start = idx;
    }
    pieces.push(&text[start..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn squash(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(1000, 200);
        assert_eq!(chunker.split("  Hola mundo.\n"), vec!["Hola mundo."]);
    }

    #[test]
    fn test_blank_text_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split(" \n\n \t ").is_empty());
    }

    #[test]
    fn test_separator_split_keeps_start() {
        assert_eq!(
            split_keeping_separator("a b  c", " "),
            vec!["a", " b", " ", " c"]
        );
        assert_eq!(split_keeping_separator("\n\nx", "\n\n"), vec!["\n\nx"]);
        assert_eq!(split_keeping_separator("ñé", ""), vec!["ñ", "é"]);
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let chunker = TextChunker::new(30, 0);
        let text = "Primer párrafo corto.\n\nSegundo párrafo corto.";
        assert_eq!(
            chunker.split(text),
            vec!["Primer párrafo corto.", "Segundo párrafo corto."]
        );
    }

    #[test]
    fn test_overlap_carries_tail_words() {
        let text: Vec<String> = (0..30).map(|i| format!("w{:02}", i)).collect();
        let chunker = TextChunker::new(20, 8);
        let chunks = chunker.split(&text.join(" "));

        assert_eq!(chunks[0], "w00 w01 w02 w03 w04");
        assert_eq!(chunks[1], "w03 w04 w05 w06 w07");
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let chunker = TextChunker::new(4, 0);
        assert_eq!(chunker.split("abcdefghij"), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_single_char_chunks_drop_whitespace() {
        let chunker = TextChunker::new(1, 0);
        assert_eq!(chunker.split("a b"), vec!["a", "b"]);
        assert_eq!(chunker.split("x\n\n y"), vec!["x", "y"]);
    }

    #[test]
    fn test_sizes_count_characters() {
        // 10 two-byte characters fit in a 10-character chunk
        let chunker = TextChunker::new(10, 0);
        assert_eq!(chunker.split("ññññññññññ"), vec!["ññññññññññ"]);
    }

    #[test]
    fn test_fragments_share_document_id() {
        let chunker = TextChunker::new(20, 0);
        let fragments = chunker.chunk("Uno dos tres cuatro.\n\nCinco seis siete.", "notas.txt");

        assert_eq!(fragments.len(), 2);
        let doc_id = fragments[0].document_id;
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.document_id, doc_id);
            assert_eq!(fragment.ordinal, i);
            assert_eq!(fragment.fragment_id, format!("{}_{}", doc_id, i));
            assert_eq!(fragment.source_filename, "notas.txt");
        }
    }

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(("[a-zA-Zñáé]{1,12}", prop::sample::select(vec![" ", "\n", "\n\n", "  "])), 1..120)
            .prop_map(|words| {
                words
                    .into_iter()
                    .map(|(word, sep)| format!("{}{}", word, sep))
                    .collect()
            })
    }

    /// Document whose words each carry a unique `#n#` marker, with the words
    fn marked_document() -> impl Strategy<Value = (String, Vec<String>)> {
        prop::collection::vec(("[a-zñé]{1,10}", prop::sample::select(vec![" ", "\n", "\n\n", "  "])), 1..150)
            .prop_map(|words| {
                let mut text = String::new();
                let mut tokens = Vec::with_capacity(words.len());
                for (i, (word, sep)) in words.into_iter().enumerate() {
                    let token = format!("{}#{}#", word, i);
                    text.push_str(&token);
                    text.push_str(sep);
                    tokens.push(token);
                }
                (text, tokens)
            })
    }

    #[test]
    fn test_fresh_document_id_per_call() {
        let chunker = TextChunker::default();
        let first = chunker.chunk("Hola mundo.", "a.txt");
        let second = chunker.chunk("Hola mundo.", "a.txt");
        assert_ne!(first[0].document_id, second[0].document_id);
    }

    proptest! {
        #[test]
        fn prop_overlapping_chunks_cover_text_without_gaps(
            (text, tokens) in marked_document(),
            size in 24usize..120,
            overlap in 1usize..20,
        ) {
            let chunker = TextChunker::new(size, overlap);
            let chunks = chunker.split(&text);

            for token in &tokens {
                prop_assert!(chunks.iter().any(|c| c.contains(token.as_str())), "lost {}", token);
            }

            // every chunk holds whole marked words, so it occurs exactly once
            let mut covered = 0usize;
            let mut last_start = None;
            for chunk in &chunks {
                let start = text.find(chunk.as_str()).unwrap();
                prop_assert!(last_start.map_or(true, |prev| start >= prev));
                if start > covered {
                    prop_assert!(text[covered..start].trim().is_empty(), "gap before {:?}", chunk);
                }
                covered = covered.max(start + chunk.len());
                last_start = Some(start);
            }
            prop_assert!(text[covered..].trim().is_empty());
        }

        #[test]
        fn prop_chunks_bounded_and_from_source(text in document(), size in 16usize..80, overlap in 0usize..12) {
            let chunker = TextChunker::new(size, overlap);
            for chunk in chunker.split(&text) {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.chars().count() <= size);
                prop_assert!(text.contains(&chunk));
            }
        }

        #[test]
        fn prop_without_overlap_chunks_reconstruct_text(text in document(), size in 16usize..80) {
            let chunker = TextChunker::new(size, 0);
            let joined: String = chunker.split(&text).concat();
            prop_assert_eq!(squash(&joined), squash(&text));
        }
    }
}
