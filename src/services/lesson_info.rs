//! Lesson info extraction.
//!
//! The tail of a cell (everything after the subject and teacher links) lists
//! one fragment per lesson: usually a map link whose text is
//! `"<room> <type>"`, or plain text for lessons without a room.
//! Fragments are separated by line breaks and by `", "`; the comma inside
//! map coordinates such as `"50.45, 30.52"` is not a separator.

use scraper::Html;

use crate::models::LessonInfo;
use crate::services::markup::{MAP_LINK_MARKER, ONLINE_MARKER};
use crate::utils::normalize_whitespace;

/// Parse the info tail of a cell into ordered lesson infos.
///
/// An empty tail yields an empty list; callers fall back to the last known
/// info in that case.
pub fn extract_lesson_infos(tail: &str) -> Vec<LessonInfo> {
    split_lines(tail)
        .iter()
        .flat_map(|line| split_fragments(line))
        .map(parse_fragment)
        .collect()
}

/// Split markup on `<br>` line breaks, dropping blank lines.
fn split_lines(markup: &str) -> Vec<String> {
    let normalized = markup
        .replace("<br />", "<br>")
        .replace("<br/>", "<br>")
        .replace("<BR>", "<br>");

    normalized
        .split("<br>")
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split one line on `", "` unless the comma sits between two digits.
pub fn split_fragments(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (idx, separator) in line.match_indices(", ") {
        let before = line[..idx].chars().next_back();
        let after = line[idx + separator.len()..].chars().next();
        let between_digits = before.is_some_and(|c| c.is_ascii_digit())
            && after.is_some_and(|c| c.is_ascii_digit());
        if between_digits {
            continue;
        }

        parts.push(&line[start..idx]);
        start = idx + separator.len();
    }
    parts.push(&line[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Parse a single fragment, linked or plain.
pub fn parse_fragment(fragment: &str) -> LessonInfo {
    let text = fragment_text(fragment);
    if fragment.contains(MAP_LINK_MARKER) {
        parse_linked(&text)
    } else {
        parse_plain(&text)
    }
}

/// `"<room> <type...>"` taken from a map link's text.
fn parse_linked(text: &str) -> LessonInfo {
    let (room, lesson_type) = match text.split_once(' ') {
        Some((room, rest)) => (room, rest),
        None => ("", text),
    };

    LessonInfo {
        room_numbers: if room.is_empty() {
            Vec::new()
        } else {
            vec![room.to_string()]
        },
        lesson_type: lesson_type.to_string(),
        is_online: text.contains(ONLINE_MARKER),
    }
}

// Plain fragments carry no room in practice, only the type and online flag
fn parse_plain(text: &str) -> LessonInfo {
    LessonInfo {
        room_numbers: Vec::new(),
        lesson_type: text.split(' ').next().unwrap_or_default().to_string(),
        is_online: text.contains(ONLINE_MARKER),
    }
}

fn fragment_text(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    normalize_whitespace(&html.root_element().text().collect::<String>())
}
