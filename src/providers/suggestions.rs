//! Strict parsing of provider suggestion lists.
//!
//! Providers answer with a bracketed list whose first element is a match
//! type label and whose remaining elements are `"Name in Country"` strings:
//!
//! ```text
//! ['Partial match', 'Los Angeles in United States', 'Los Rios in Chile'].
//! ```
//!
//! Both a JSON array of strings and the single-quoted form above are
//! accepted, with one optional trailing period. Anything else is rejected
//! with [`CitySuggestError::MalformedSuggestions`] instead of being coerced.

use crate::types::{CityRecord, MatchType};
use crate::{CitySuggestError, Result};

/// Parsed provider answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub match_type: MatchType,
    /// `"Name in Country"` strings, in provider order, normalized to the
    /// same rendering as [`CityRecord::formatted`].
    pub cities: Vec<String>,
}

impl Suggestions {
    /// Records to persist for these suggestions, one per city.
    pub fn records(&self) -> Vec<CityRecord> {
        self.cities
            .iter()
            .filter_map(|s| CityRecord::from_suggestion(s))
            .collect()
    }
}

fn malformed(reason: impl Into<String>) -> CitySuggestError {
    CitySuggestError::MalformedSuggestions(reason.into())
}

/// Parse a provider answer into a match type and city list.
pub fn parse_suggestions(raw: &str) -> Result<Suggestions> {
    let text = raw.trim();
    let text = text.strip_suffix('.').unwrap_or(text).trim_end();

    if !(text.starts_with('[') && text.ends_with(']')) {
        return Err(malformed(format!("expected a bracketed list, got {raw:?}")));
    }

    let elements = match serde_json::from_str::<Vec<String>>(text) {
        Ok(elements) => elements,
        Err(_) => parse_quoted_list(text)?,
    };

    let Some((label, cities)) = elements.split_first() else {
        return Err(malformed("empty list"));
    };

    let match_type = label
        .parse::<MatchType>()
        .map_err(|e| malformed(e.to_string()))?;

    let cities = cities
        .iter()
        .map(|city| {
            CityRecord::from_suggestion(city)
                .map(|record| record.formatted())
                .ok_or_else(|| malformed(format!("{city:?} is not of the form 'Name in Country'")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Suggestions { match_type, cities })
}

/// Parse `[ 'a', "b", ... ]` where each element is wrapped in single or
/// double quotes.
///
/// A quote only closes an element when it is followed by a comma or the end
/// of the list, so apostrophes inside names (`'Côte d'Ivoire'`) survive.
fn parse_quoted_list(text: &str) -> Result<Vec<String>> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| malformed("expected a bracketed list"))?;

    let mut elements = Vec::new();
    let mut rest = inner.trim_start();
    if rest.is_empty() {
        return Ok(elements);
    }

    loop {
        let quote = match rest.chars().next() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(malformed(format!("expected a quoted element at {rest:?}"))),
        };
        let body = &rest[quote.len_utf8()..];

        let close = body
            .char_indices()
            .filter(|&(_, c)| c == quote)
            .map(|(i, _)| i)
            .find(|&i| {
                let after = body[i + quote.len_utf8()..].trim_start();
                after.is_empty() || after.starts_with(',')
            })
            .ok_or_else(|| malformed("unterminated element"))?;

        elements.push(body[..close].to_string());

        let after = body[close + quote.len_utf8()..].trim_start();
        let Some(next) = after.strip_prefix(',') else {
            break;
        };
        rest = next.trim_start();
        if rest.is_empty() {
            return Err(malformed("trailing comma"));
        }
    }

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_list_keeps_inner_apostrophes() {
        let elements = parse_quoted_list("['Partial match', 'Abidjan in Côte d'Ivoire']").unwrap();
        assert_eq!(elements, vec!["Partial match", "Abidjan in Côte d'Ivoire"]);
    }

    #[test]
    fn quoted_list_accepts_mixed_quotes_and_spacing() {
        let elements = parse_quoted_list("[ 'Exact match' ,\"New Delhi in India\" ]").unwrap();
        assert_eq!(elements, vec!["Exact match", "New Delhi in India"]);
    }

    #[test]
    fn quoted_list_rejects_bare_words() {
        assert!(parse_quoted_list("['Partial match', Paris in France]").is_err());
        assert!(parse_quoted_list("['Partial match',]").is_err());
        assert!(parse_quoted_list("['Partial match").is_err());
    }
}
