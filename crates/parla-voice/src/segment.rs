//! Text segmentation for speech synthesis.
//!
//! Splits free-form reply text into sentence-sized segments. The synthesis
//! service handles short inputs far more reliably than whole paragraphs,
//! and per-segment requests let the first segment start playing before
//! later ones are even submitted.

/// Maximum character length per segment.
///
/// Roughly one to two sentences. Segments are merged up to this cap so very
/// short sentences do not each pay a full round-trip to the service.
const MAX_SEGMENT_CHARS: usize = 240;

/// Split text into ordered speech segments.
///
/// Splits at sentence boundaries (`.`, `!`, `?` followed by whitespace),
/// merges short sentences up to [`MAX_SEGMENT_CHARS`], and falls back to
/// clause and then word boundaries for oversized sentences. Whitespace-only
/// input yields no segments.
#[must_use]
pub fn split_segments(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.len() <= MAX_SEGMENT_CHARS {
        return vec![text.to_owned()];
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if !current.is_empty() && current.len() + 1 + sentence.len() > MAX_SEGMENT_CHARS {
            segments.push(std::mem::take(&mut current));
        }

        if sentence.len() > MAX_SEGMENT_CHARS {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            segments.extend(split_long_sentence(&sentence));
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

// ── Internal helpers ───────────────────────────────────────────────

/// Split text into sentences at `.` `!` `?` boundaries.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        current.push(c);

        if matches!(c, '.' | '!' | '?')
            && chars.get(i + 1).is_some_and(|next| next.is_whitespace())
        {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_owned());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_owned());
    }

    sentences
}

/// Split an overly long sentence at clause boundaries, then at word
/// boundaries as a last resort.
fn split_long_sentence(sentence: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for part in sentence.split_inclusive(&[',', ';', ':'][..]) {
        if !current.is_empty() && current.len() + part.len() > MAX_SEGMENT_CHARS {
            chunks.push(std::mem::take(&mut current).trim().to_owned());
        }
        current.push_str(part);
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_owned());
    }

    chunks
        .into_iter()
        .flat_map(|chunk| {
            if chunk.len() > MAX_SEGMENT_CHARS {
                word_split(&chunk)
            } else {
                vec![chunk]
            }
        })
        .collect()
}

/// Last-resort split at word boundaries.
fn word_split(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > MAX_SEGMENT_CHARS {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_segment() {
        assert_eq!(split_segments("Hello world."), vec!["Hello world."]);
    }

    #[test]
    fn whitespace_yields_no_segments() {
        assert!(split_segments("   \n\t ").is_empty());
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn long_text_splits_at_sentence_boundaries() {
        let sentences: Vec<String> = (1..=12)
            .map(|i| format!("Sentence number {i} pads the text with enough words to matter."))
            .collect();
        let text = sentences.join(" ");
        assert!(text.len() > MAX_SEGMENT_CHARS);

        let segments = split_segments(&text);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.len() <= MAX_SEGMENT_CHARS + 40, "segment too long");
            assert!(!segment.trim().is_empty());
        }
        // Order preserved: first segment contains the first sentence.
        assert!(segments[0].contains("Sentence number 1"));
    }

    #[test]
    fn oversized_sentence_falls_back_to_clause_split() {
        let clauses: Vec<String> = (1..=10)
            .map(|i| format!("clause {i} keeps going with plenty of filler text here"))
            .collect();
        let sentence = clauses.join(", ");
        assert!(sentence.len() > MAX_SEGMENT_CHARS);

        let segments = split_segments(&sentence);
        assert!(segments.len() > 1);
    }

    #[test]
    fn unbroken_text_falls_back_to_word_split() {
        let words = "word ".repeat(120);
        let segments = split_segments(&words);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.len() <= MAX_SEGMENT_CHARS);
        }
    }
}
