//! Voice command interpretation
//!
//! Maps recognized text to a navigation [`Intent`] by substring matching
//! against a per-variant vocabulary. Intents are tested in a fixed priority
//! order (page turns, then scrolling, then open/home) and the first intent
//! with a matching trigger wins.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{NavigatorError, Result};

// =============================================================================
// Intent
// =============================================================================

/// Closed set of navigation actions derived from speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    // Declaration order is the matching priority.
    PageForward,
    PageBack,
    ScrollDown,
    ScrollUp,
    OpenUrl,
    GoHome,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::PageForward => "page_forward",
            Intent::PageBack => "page_back",
            Intent::ScrollDown => "scroll_down",
            Intent::ScrollUp => "scroll_up",
            Intent::OpenUrl => "open_url",
            Intent::GoHome => "go_home",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// Interaction model the navigator runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Generic page navigation; page intents walk the history
    #[default]
    Navigator,
    /// Scroll-by-voice; "次"/"戻る" scroll the page
    Scroll,
    /// Kindle cloud reader; page intents turn book pages
    Kindle,
}

/// Kindle cloud reader library page
pub const KINDLE_LIBRARY_URL: &str = "https://read.amazon.com/kindle-library";

/// Blank page used as the generic home
pub const BLANK_PAGE: &str = "about:blank";

impl Variant {
    /// Whether page intents move through the history rather than turning pages
    pub fn pages_walk_history(&self) -> bool {
        !matches!(self, Variant::Kindle)
    }

    /// Destination loaded by the home intent
    pub fn home_destination(&self) -> &'static str {
        match self {
            Variant::Kindle => KINDLE_LIBRARY_URL,
            Variant::Navigator | Variant::Scroll => BLANK_PAGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Navigator => "navigator",
            Variant::Scroll => "scroll",
            Variant::Kindle => "kindle",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = NavigatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "navigator" | "generic" => Ok(Variant::Navigator),
            "scroll" => Ok(Variant::Scroll),
            "kindle" => Ok(Variant::Kindle),
            other => Err(NavigatorError::InvalidArguments(format!(
                "unknown variant '{}', expected navigator, scroll or kindle",
                other
            ))),
        }
    }
}

// =============================================================================
// Vocabulary
// =============================================================================

/// Trigger substrings for one intent
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyEntry {
    pub intent: Intent,
    pub triggers: &'static [&'static str],
}

/// Priority-ordered trigger table
#[derive(Debug, Clone, Serialize)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

const KINDLE_VOCABULARY: &[(Intent, &[&str])] = &[
    (Intent::PageForward, &["次のページ", "次", "つぎ", "進む", "すすむ", "next"]),
    (Intent::PageBack, &["前のページ", "前", "まえ", "戻る", "もどる", "back", "previous"]),
    (Intent::OpenUrl, &["開く", "ひらく", "open"]),
    (Intent::GoHome, &["ホーム", "ほーむ", "ライブラリ", "らいぶらり", "home", "library"]),
];

const NAVIGATOR_VOCABULARY: &[(Intent, &[&str])] = &[
    (Intent::PageForward, &["次へ", "次", "つぎ", "進む", "すすむ", "forward", "next"]),
    (Intent::PageBack, &["前へ", "前", "まえ", "戻る", "もどる", "back"]),
    (Intent::OpenUrl, &["開く", "ひらく", "open"]),
    (Intent::GoHome, &["ホーム", "ほーむ", "home"]),
];

const SCROLL_VOCABULARY: &[(Intent, &[&str])] = &[
    (Intent::PageForward, &["次のページ", "進む", "すすむ", "forward"]),
    (Intent::PageBack, &["前のページ", "back"]),
    (Intent::ScrollDown, &["下", "した", "スクロールダウン", "次", "つぎ", "down"]),
    (Intent::ScrollUp, &["上", "うえ", "スクロールアップ", "戻る", "もどる", "up"]),
    (Intent::OpenUrl, &["開く", "ひらく", "open"]),
    (Intent::GoHome, &["ホーム", "ほーむ", "home"]),
];

impl Vocabulary {
    /// Build a vocabulary; entries are ordered by intent priority
    pub fn new(mut entries: Vec<VocabularyEntry>) -> Self {
        entries.sort_by_key(|entry| entry.intent);
        Self { entries }
    }

    pub fn for_variant(variant: Variant) -> Self {
        let table = match variant {
            Variant::Navigator => NAVIGATOR_VOCABULARY,
            Variant::Scroll => SCROLL_VOCABULARY,
            Variant::Kindle => KINDLE_VOCABULARY,
        };

        Self::new(
            table
                .iter()
                .map(|(intent, triggers)| VocabularyEntry {
                    intent: *intent,
                    triggers,
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// First intent (in priority order) with a trigger contained in `normalized`
    fn find(&self, normalized: &str) -> Option<(Intent, &'static str)> {
        self.entries.iter().find_map(|entry| {
            entry
                .triggers
                .iter()
                .find(|trigger| contains_trigger(normalized, trigger))
                .map(|trigger| (entry.intent, *trigger))
        })
    }
}

/// Japanese triggers match anywhere; ASCII triggers only as whole words
fn contains_trigger(normalized: &str, trigger: &str) -> bool {
    if !trigger.is_ascii() {
        return normalized.contains(trigger);
    }

    normalized.match_indices(trigger).any(|(start, _)| {
        let before = normalized[..start].chars().next_back();
        let after = normalized[start + trigger.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

// =============================================================================
// Interpreter
// =============================================================================

/// Full result of interpreting one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub input: String,
    pub normalized: String,
    pub intent: Option<Intent>,
    pub trigger: Option<String>,
}

/// Maps recognized text to intents for one variant
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    variant: Variant,
    vocabulary: Vocabulary,
}

impl CommandInterpreter {
    pub fn new(variant: Variant) -> Self {
        Self::with_vocabulary(variant, Vocabulary::for_variant(variant))
    }

    pub fn with_vocabulary(variant: Variant, vocabulary: Vocabulary) -> Self {
        Self {
            variant,
            vocabulary,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn interpret(&self, raw_text: &str) -> Option<Intent> {
        let normalized = normalize(raw_text);
        if normalized.is_empty() {
            return None;
        }
        self.vocabulary.find(&normalized).map(|(intent, _)| intent)
    }

    /// Like [`interpret`](Self::interpret), keeping the normalized text and trigger
    pub fn interpretation(&self, raw_text: &str) -> Interpretation {
        let normalized = normalize(raw_text);
        let matched = if normalized.is_empty() {
            None
        } else {
            self.vocabulary.find(&normalized)
        };

        Interpretation {
            input: raw_text.to_string(),
            normalized,
            intent: matched.map(|(intent, _)| intent),
            trigger: matched.map(|(_, trigger)| trigger.to_string()),
        }
    }
}

/// Trim and lowercase. Unicode-aware, so kana and kanji pass through unchanged.
pub fn normalize(raw_text: &str) -> String {
    raw_text.trim().to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
