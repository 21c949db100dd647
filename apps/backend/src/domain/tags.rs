//! Bracketed narration tags emitted by the narrator.
//!
//! Recognized (case-insensitive): `[ITEM_ADD: name]`, `[ITEM_REMOVE: name]`,
//! `[LEVEL_UP]`, `[ALIGNMENT: text]`, `[GAME_OVER]`, `[VICTORY]`.
//! Recognized tags are stripped from the text; any other bracketed text is
//! left alone.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(
        r"(?i)\[\s*(ITEM_ADD|ITEM_REMOVE|ALIGNMENT|LEVEL_UP|GAME_OVER|VICTORY)\s*(?::\s*([^\]]*?)\s*)?\]",
    )
    .unwrap()
});

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[ \t]{2,}").unwrap()
});

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\n{3,}").unwrap()
});

/// Effects requested by one narration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NarrationTags {
    pub items_added: Vec<String>,
    pub items_removed: Vec<String>,
    pub level_up: bool,
    /// Last `[ALIGNMENT: ...]` wins
    pub alignment: Option<String>,
    pub game_over: bool,
    pub victory: bool,
}

impl NarrationTags {
    /// Whether the narration ends the game.
    pub fn is_terminal(&self) -> bool {
        self.game_over || self.victory
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Split narration into display text and the tags it carried.
pub fn parse_narration(raw: &str) -> (String, NarrationTags) {
    let mut tags = NarrationTags::default();

    let stripped = TAG_RE.replace_all(raw, |caps: &Captures| {
        let value = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty());
        match caps[1].to_ascii_uppercase().as_str() {
            "ITEM_ADD" => tags.items_added.extend(value),
            "ITEM_REMOVE" => tags.items_removed.extend(value),
            "ALIGNMENT" => {
                if value.is_some() {
                    tags.alignment = value;
                }
            }
            "LEVEL_UP" => tags.level_up = true,
            "GAME_OVER" => tags.game_over = true,
            "VICTORY" => tags.victory = true,
            _ => {}
        }
        ""
    });

    (tidy(&stripped), tags)
}

/// Collapse the gaps left behind by removed tags.
fn tidy(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| SPACE_RUN_RE.replace_all(line, " ").trim_end().to_string())
        .collect();
    let joined = lines.join("\n");
    BLANK_LINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}
