//! Splitting long answers into platform-sized messages.
//!
//! Lengths are counted in characters, which is how the platform counts its
//! message limit. Cuts prefer a paragraph break, then a sentence end, and only
//! fall back to a hard cut when neither sits in the back half of the window.
//! No characters are dropped: concatenating the chunks yields the input.

/// Split `text` into chunks of at most `limit` characters.
///
/// Returns no chunks for empty input, and a single chunk equal to the input
/// when it already fits.
pub fn split_chunks(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        // Byte offset just past the first `limit` characters; absent when everything fits.
        let Some((window_end, _)) = remaining.char_indices().nth(limit) else {
            chunks.push(remaining.to_string());
            break;
        };

        let window = &remaining[..window_end];
        let min_chars = limit / 2;

        let cut = find_break(window, "\n\n", min_chars)
            .or_else(|| find_break(window, ". ", min_chars).map(|idx| idx + 1))
            .unwrap_or(window_end);

        chunks.push(remaining[..cut].to_string());
        remaining = &remaining[cut..];
    }

    chunks
}

/// Find the last `pattern` in `window` that starts more than `min_chars` characters in.
fn find_break(window: &str, pattern: &str, min_chars: usize) -> Option<usize> {
    window.rfind(pattern).filter(|&idx| window[..idx].chars().count() > min_chars)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1900;

    fn assert_well_formed(text: &str, chunks: &[String], limit: usize) {
        assert_eq!(chunks.concat(), text, "chunks must reconstruct the input");

        for chunk in chunks {
            assert!(!chunk.is_empty(), "chunks must not be empty");
            assert!(chunk.chars().count() <= limit, "chunk too large: {}", chunk.chars().count());
        }
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_chunks("Hello, world!", LIMIT);

        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_text_at_limit_is_single_chunk() {
        let text = "a".repeat(LIMIT);
        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(split_chunks("", LIMIT).is_empty());
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let text = format!("{}\n\n{}", "a".repeat(1000), "b".repeat(1498));
        assert_eq!(text.chars().count(), 2500);

        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(1000));
        assert!(chunks[1].starts_with("\n\nb"));
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_paragraph_break_prefers_the_latest_one() {
        let text = format!("{}\n\n{}\n\n{}", "a".repeat(1000), "b".repeat(600), "c".repeat(1000));

        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks[0].chars().count(), 1602);
        assert!(chunks[0].ends_with('b'));
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_falls_back_to_sentence_end() {
        let text = "This is a sentence. ".repeat(150);

        let chunks = split_chunks(&text, LIMIT);

        assert!(chunks.len() >= 2);
        assert!(chunks[0].ends_with('.'));
        assert!(chunks[1].starts_with(' '));
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_ignores_breaks_in_the_front_half() {
        let text = format!("{}\n\n{}. {}", "a".repeat(500), "b".repeat(300), "c".repeat(2000));

        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks[0].chars().count(), LIMIT);
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_very_long_word_is_hard_cut() {
        let text = "x".repeat(4000);

        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![1900, 1900, 200]);
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(2500);

        let chunks = split_chunks(&text, LIMIT);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1900);
        assert_well_formed(&text, &chunks, LIMIT);
    }

    #[test]
    fn test_small_limits_still_make_progress() {
        let text = "Hi. There.\n\nBye.";

        for limit in [0, 1, 2, 3, 7] {
            let chunks = split_chunks(text, limit);
            assert_well_formed(text, &chunks, limit.max(1));
        }
    }

    #[test]
    fn test_mixed_prose_round_trips() {
        let paragraph = "Relays are simple. They forward questions and return answers. ".repeat(12);
        let text = format!("{paragraph}\n\n{paragraph}\n\n{}\n\n{paragraph}", "🦀".repeat(700));

        for limit in [100, 500, 1900] {
            let chunks = split_chunks(&text, limit);
            assert_well_formed(&text, &chunks, limit);
        }
    }
}
