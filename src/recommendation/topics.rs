//! Static topic adjacency used to simulate "users like you also follow".

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cap on related topics across all of a profile's interests
pub const MAX_RELATED_TOPICS: usize = 3;

static RELATED_TOPICS: Lazy<HashMap<&'static str, [&'static str; 3]>> = Lazy::new(|| {
    HashMap::from([
        ("technology", ["programming", "gadgets", "AI"]),
        ("gaming", ["esports", "gamedev", "pcgaming"]),
        ("sports", ["fitness", "olympics", "soccer"]),
        ("music", ["concerts", "instruments", "audio"]),
        ("art", ["design", "photography", "crafts"]),
        ("science", ["space", "biology", "physics"]),
        ("food", ["cooking", "recipes", "restaurants"]),
        ("travel", ["backpacking", "digitalnomad", "solotravel"]),
        ("business", ["entrepreneur", "startups", "investing"]),
        ("health", ["nutrition", "meditation", "wellness"]),
    ])
});

/// Topics adjacent to `interests`, in interest order. An interest missing
/// from the table stands in for itself. At most [`MAX_RELATED_TOPICS`] total.
pub fn related_topics(interests: &[String]) -> Vec<String> {
    interests
        .iter()
        .flat_map(|interest| match RELATED_TOPICS.get(interest.to_lowercase().as_str()) {
            Some(related) => related.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            None => vec![interest.clone()],
        })
        .take(MAX_RELATED_TOPICS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_interest_expands() {
        assert_eq!(
            related_topics(&topics(&["Technology"])),
            vec!["programming", "gadgets", "AI"]
        );
    }

    #[test]
    fn test_cap_is_across_interests() {
        let related = related_topics(&topics(&["gaming", "music", "art"]));
        assert_eq!(related, vec!["esports", "gamedev", "pcgaming"]);
    }

    #[test]
    fn test_unknown_interest_maps_to_itself() {
        assert_eq!(
            related_topics(&topics(&["knitting", "Birding", "science"])),
            vec!["knitting", "Birding", "space"]
        );
    }

    #[test]
    fn test_table_covers_required_entries() {
        for key in [
            "technology", "gaming", "sports", "music", "art", "science", "food", "travel",
            "business", "health",
        ] {
            assert!(RELATED_TOPICS.contains_key(key), "missing {}", key);
        }
    }
}
