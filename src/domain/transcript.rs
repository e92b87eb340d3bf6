/// Maximum characters per delivered chat message, below the hard platform
/// limit of 4096 to leave headroom for part headers.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Transcripts longer than this are delivered as a text document.
pub const DOCUMENT_CHAR_THRESHOLD: usize = 2000;

/// Audio longer than this is delivered as a text document regardless of
/// transcript length.
pub const DOCUMENT_DURATION_SECS: f64 = 300.0;

const PREVIEW_CHARS: usize = 500;

/// Normalizes raw provider output: trimmed, with whitespace-only input
/// collapsing to the empty string. An empty transcript is a valid result,
/// distinct from any failure.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether the transcript should be delivered as a document with a preview
/// instead of inline messages.
pub fn should_send_as_document(text: &str, audio_duration_secs: f64) -> bool {
    audio_duration_secs > DOCUMENT_DURATION_SECS || text.chars().count() > DOCUMENT_CHAR_THRESHOLD
}

/// Splits the transcript into chunks of at most `max_chars` characters.
/// Splitting is by character count, never inside a UTF-8 sequence.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// First `PREVIEW_CHARS` characters of the transcript, trimmed back to a word
/// boundary with a trailing ellipsis when truncated.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }

    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    let mut words: Vec<&str> = head.split_whitespace().collect();
    if words.join(" ").chars().count() >= PREVIEW_CHARS && words.len() > 1 {
        words.pop();
    }

    format!("{}...", words.join(" "))
}

/// One-line transcript statistics for the document caption, e.g.
/// "739 слов, 6:05 мин, 4k символов".
pub fn stats_line(text: &str, audio_duration_secs: f64) -> String {
    let words = word_count(text);
    let chars = text.chars().count();

    let mut stats = format!("{} слов", words);

    if audio_duration_secs > 0.0 {
        let minutes = (audio_duration_secs / 60.0) as u64;
        let seconds = (audio_duration_secs % 60.0) as u64;
        if minutes > 0 {
            stats.push_str(&format!(", {}:{:02} мин", minutes, seconds));
        } else {
            stats.push_str(&format!(", {} сек", seconds));
        }
    }

    if chars > 1000 {
        stats.push_str(&format!(", {}k символов", chars / 1000));
    } else {
        stats.push_str(&format!(", {} символов", chars));
    }

    stats
}
