use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inline hole markers look like `[[HOLE:<id>|<text>]]`. The id is a
/// hex-and-hyphen token of at least 6 characters; the text is the shortest
/// span up to the closing `]]` and may contain newlines.
const HOLE_MARKER_PATTERN: &str = r"\[\[HOLE:([0-9a-fA-F-]{6,})\|([\s\S]*?)\]\]";

fn hole_marker_regex() -> Regex {
    Regex::new(HOLE_MARKER_PATTERN).expect("hole marker pattern is a valid regex")
}

/// A hole marker found in course content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleMatch {
    pub id: String,
    pub text: String,
}

/// One piece of segmented course content.
///
/// A segmentation covers the whole input: concatenating the segments (with
/// each hole rendered back as its marker) reproduces the original string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    /// Literal HTML between hole markers
    Html { html: String },
    /// A single hole marker occurrence
    Hole { id: String, text: String },
}

/// Extract every hole marker from `content`, ordered by first occurrence and
/// de-duplicated by id. When an id appears more than once (copy-pasted
/// markers), the first occurrence's text wins.
///
/// Markers are scanned over the raw content string; malformed or unterminated
/// markers are not matched and stay literal HTML.
pub fn extract_holes(content: &str) -> Vec<HoleMatch> {
    let re = hole_marker_regex();
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for caps in re.captures_iter(content) {
        let id = &caps[1];
        if seen.insert(id.to_string()) {
            matches.push(HoleMatch {
                id: id.to_string(),
                text: caps[2].to_string(),
            });
        }
    }

    matches
}

/// Split `content` into alternating HTML and hole segments with no gaps or
/// overlaps. Every marker occurrence becomes its own hole segment, including
/// repeats of the same id. Content without markers (or empty content) yields
/// a single HTML segment, never an empty list.
pub fn segment_content(content: &str) -> Vec<ContentSegment> {
    let re = hole_marker_regex();
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in re.captures_iter(content) {
        let marker = caps.get(0).expect("group 0 is the whole match");
        if marker.start() > last {
            segments.push(ContentSegment::Html {
                html: content[last..marker.start()].to_string(),
            });
        }
        segments.push(ContentSegment::Hole {
            id: caps[1].to_string(),
            text: caps[2].to_string(),
        });
        last = marker.end();
    }

    if last < content.len() {
        segments.push(ContentSegment::Html {
            html: content[last..].to_string(),
        });
    }

    if segments.is_empty() {
        segments.push(ContentSegment::Html {
            html: content.to_string(),
        });
    }

    segments
}
