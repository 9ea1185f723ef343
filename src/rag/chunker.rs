use serde::{Deserialize, Serialize};

/// Configuration for document chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters.
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// A text chunk with its position in the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    /// Source identifier (filename).
    pub source: String,
    /// Character offset in the original document.
    pub start_offset: usize,
    /// Chunk index within the source.
    pub chunk_index: usize,
}

/// Splits a document into overlapping character windows.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Splits `text` into chunks of at most `chunk_size` characters where
    /// consecutive chunks share exactly `chunk_overlap` characters.
    ///
    /// When a sentence ending falls in the last fifth of a window, the window
    /// is cut there; the next window still starts `chunk_overlap` characters
    /// before the cut, so chunks always tile the document exactly.
    pub fn split(&self, text: &str, source: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        let mut chunks = Vec::new();
        if total == 0 {
            return chunks;
        }

        let size = self.config.chunk_size.max(1);
        let overlap = self.config.chunk_overlap.min(size.saturating_sub(1));

        let mut start = 0;
        let mut chunk_index = 0;
        loop {
            let window_end = (start + size).min(total);
            let end = if window_end < total {
                sentence_cut(&chars[start..window_end], overlap)
                    .map(|cut| start + cut)
                    .unwrap_or(window_end)
            } else {
                window_end
            };

            chunks.push(TextChunk {
                text: chars[start..end].iter().collect(),
                source: source.to_string(),
                start_offset: start,
                chunk_index,
            });

            if end == total {
                break;
            }
            start = end - overlap;
            chunk_index += 1;
        }

        chunks
    }
}

/// Finds a sentence boundary in the last 20% of the window.
///
/// Returns the cut position (one past the boundary) only when it leaves more
/// than `overlap` characters, so the loop always advances.
fn sentence_cut(window: &[char], overlap: usize) -> Option<usize> {
    let search_start = (window.len() * 80) / 100;

    for i in (search_start..window.len().saturating_sub(1)).rev() {
        if matches!(window[i], '.' | '!' | '?') && window[i + 1].is_whitespace() {
            let cut = i + 2;
            if cut > overlap {
                return Some(cut);
            }
        }
    }
    None
}
