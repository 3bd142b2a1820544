//! Rule-based feature extraction for summaries.
//!
//! Nothing here tries to understand the conversation. Topics come from a
//! fixed table of lower-case substring triggers and key points are simply
//! the longer messages, clipped. The output only has to be reproducible.

use crate::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum number of topic tags on a summary.
pub const MAX_TOPICS: usize = 5;

/// Maximum number of key points on a summary.
pub const MAX_KEY_POINTS: usize = 10;

/// A message needs strictly more characters than this to become a key point.
pub const KEY_POINT_MIN_CHARS: usize = 20;

/// Key points longer than this are clipped and suffixed with [`ELLIPSIS`].
pub const KEY_POINT_MAX_CHARS: usize = 100;

pub const ELLIPSIS: &str = "...";

/// Topic tags a summary can carry.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    ImageGeneration,
    Coding,
    Question,
    Appreciation,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::ImageGeneration => "image_generation",
            Topic::Coding => "coding",
            Topic::Question => "question",
            Topic::Appreciation => "appreciation",
        }
    }

    /// Substrings (matched against lower-cased content) that trigger the tag.
    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            Topic::ImageGeneration => &["image", "picture", "photo"],
            Topic::Coding => &["code", "program", "python"],
            Topic::Question => &["?"],
            Topic::Appreciation => &["thank"],
        }
    }

    pub const ALL: [Topic; 4] = [
        Topic::ImageGeneration,
        Topic::Coding,
        Topic::Question,
        Topic::Appreciation,
    ];

    fn matches(self, lowered: &str) -> bool {
        self.triggers().iter().any(|t| lowered.contains(t))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct topics triggered anywhere in `messages`, at most [`MAX_TOPICS`].
///
/// The result is a set; callers must not rely on its order.
pub fn extract_topics(messages: &[Message]) -> Vec<Topic> {
    let mut found = BTreeSet::new();
    for msg in messages {
        let lowered = msg.content.to_lowercase();
        found.extend(Topic::ALL.into_iter().filter(|t| t.matches(&lowered)));
    }
    // Only four tags exist today, so the clamp never bites.
    found.into_iter().take(MAX_TOPICS).collect()
}

/// Contents of the longer messages, in window order, clipped to
/// [`KEY_POINT_MAX_CHARS`], at most [`MAX_KEY_POINTS`] of them.
pub fn extract_key_points(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.content.chars().count() > KEY_POINT_MIN_CHARS)
        .map(|m| clip(&m.content, KEY_POINT_MAX_CHARS))
        .take(MAX_KEY_POINTS)
        .collect()
}

/// Clip to `max` characters (not bytes), appending [`ELLIPSIS`] when cut.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max).collect();
    clipped.push_str(ELLIPSIS);
    clipped
}
