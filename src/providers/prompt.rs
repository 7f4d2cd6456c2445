//! Few-shot prompt for city suggestions.
//!
//! The model is shown one example per match type, always answering in the
//! list shape that [`parse_suggestions`](super::parse_suggestions) accepts.

use super::Message;

/// Example answer for the partial-match shot; trimmed to the requested count.
const PARTIAL_MATCH_EXAMPLES: [&str; 5] = [
    "Mumbai in India",
    "Mumbwa in Zambia",
    "Mumbil in Australia",
    "Mumbwa District in Zambia",
    "Muminabad in Tajikistan",
];

/// Build the chat messages asking for `count` cities matching `query`.
pub fn city_prompt(query: &str, count: usize) -> Vec<Message> {
    let count = count.max(1);
    let system = if count > 1 {
        format!("You suggest {count} cities along with their full country names.")
    } else {
        format!("You suggest {count} city along with its country name.")
    };

    let examples = PARTIAL_MATCH_EXAMPLES
        .iter()
        .take(count)
        .copied()
        .collect::<Vec<_>>()
        .join("', '");

    vec![
        Message::system(system),
        Message::user("mum"),
        Message::assistant(format!("['Partial match', '{examples}'].")),
        Message::user("new delhi"),
        Message::assistant("['Exact match','New Delhi in India']."),
        Message::user("fdsmfbjkhfd"),
        Message::assistant("['No match']."),
        Message::user(query),
    ]
}
