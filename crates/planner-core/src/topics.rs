//! Topics browser: client-side style sort and filter over fetched topics

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TopicWithKeywords;

/// Sort order offered by the topics browser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// A-Z by title
    #[default]
    Alpha,
    /// Highest search volume first
    Volume,
    /// Lowest competition first
    Competition,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Alpha => write!(f, "alpha"),
            SortMode::Volume => write!(f, "volume"),
            SortMode::Competition => write!(f, "competition"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown sort mode '{0}'. Must be 'alpha', 'volume', or 'competition'")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(SortMode::Alpha),
            "volume" => Ok(SortMode::Volume),
            "competition" => Ok(SortMode::Competition),
            _ => Err(UnknownSortMode(s.to_string())),
        }
    }
}

/// Case-insensitive title order with the raw title as tiebreaker
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort a copy of `topics` by `mode`, then keep titles containing `query`
/// (case-insensitive). The input slice is left untouched.
pub fn sort_and_filter(
    topics: &[TopicWithKeywords],
    mode: SortMode,
    query: &str,
) -> Vec<TopicWithKeywords> {
    let mut sorted = topics.to_vec();
    // sort_by is stable, so ties keep their fetched order
    sorted.sort_by(|a, b| match mode {
        SortMode::Alpha => compare_titles(a.title(), b.title()),
        SortMode::Volume => b.topic.search_volume.cmp(&a.topic.search_volume),
        SortMode::Competition => a
            .topic
            .competition_level
            .total_cmp(&b.topic.competition_level),
    });

    let needle = query.to_lowercase();
    sorted.retain(|topic| topic.title().to_lowercase().contains(&needle));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn topic(title: &str, search_volume: u64, competition_level: f64) -> TopicWithKeywords {
        TopicWithKeywords {
            topic: Topic {
                id: Uuid::new_v4(),
                title: title.to_string(),
                search_volume,
                competition_level,
            },
            keywords: Vec::new(),
        }
    }

    fn titles(topics: &[TopicWithKeywords]) -> Vec<&str> {
        topics.iter().map(|t| t.title()).collect()
    }

    fn sample() -> Vec<TopicWithKeywords> {
        vec![
            topic("SEO Basics", 500, 0.6),
            topic("Link Building", 900, 0.2),
            topic("Advanced SEO", 300, 0.9),
        ]
    }

    #[test]
    fn seo_query_sorted_alpha() {
        let result = sort_and_filter(&sample(), SortMode::Alpha, "seo");
        assert_eq!(titles(&result), vec!["Advanced SEO", "SEO Basics"]);
    }

    #[test]
    fn volume_is_descending() {
        let result = sort_and_filter(&sample(), SortMode::Volume, "");
        assert_eq!(
            titles(&result),
            vec!["Link Building", "SEO Basics", "Advanced SEO"]
        );
    }

    #[test]
    fn competition_is_ascending() {
        let result = sort_and_filter(&sample(), SortMode::Competition, "");
        assert_eq!(
            titles(&result),
            vec!["Link Building", "SEO Basics", "Advanced SEO"]
        );
    }

    #[test]
    fn alpha_ignores_case() {
        let topics = vec![
            topic("banana", 1, 0.0),
            topic("Apple", 1, 0.0),
            topic("cherry", 1, 0.0),
        ];
        let result = sort_and_filter(&topics, SortMode::Alpha, "");
        assert_eq!(titles(&result), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn ties_keep_fetched_order() {
        let topics = vec![topic("First", 10, 0.5), topic("Second", 10, 0.5)];
        assert_eq!(
            titles(&sort_and_filter(&topics, SortMode::Volume, "")),
            vec!["First", "Second"]
        );
        assert_eq!(
            titles(&sort_and_filter(&topics, SortMode::Competition, "")),
            vec!["First", "Second"]
        );
    }

    #[test]
    fn source_is_not_mutated() {
        let topics = sample();
        let before = titles(&topics).join("|");
        let _ = sort_and_filter(&topics, SortMode::Volume, "seo");
        assert_eq!(titles(&topics).join("|"), before);
    }

    #[test]
    fn no_match_gives_empty_result() {
        assert!(sort_and_filter(&sample(), SortMode::Alpha, "podcast").is_empty());
    }

    #[test]
    fn parses_sort_modes() {
        assert_eq!("alpha".parse::<SortMode>(), Ok(SortMode::Alpha));
        assert_eq!("Volume".parse::<SortMode>(), Ok(SortMode::Volume));
        assert_eq!("COMPETITION".parse::<SortMode>(), Ok(SortMode::Competition));
        assert!("newest".parse::<SortMode>().is_err());
        assert_eq!(SortMode::default(), SortMode::Alpha);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::models::Topic;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn arb_topic() -> impl Strategy<Value = TopicWithKeywords> {
        ("[A-Za-z ]{0,16}", 0u64..100_000, 0.0f64..100.0).prop_map(
            |(title, search_volume, competition_level)| TopicWithKeywords {
                topic: Topic {
                    id: Uuid::new_v4(),
                    title,
                    search_volume,
                    competition_level,
                },
                keywords: Vec::new(),
            },
        )
    }

    fn arb_mode() -> impl Strategy<Value = SortMode> {
        prop_oneof![
            Just(SortMode::Alpha),
            Just(SortMode::Volume),
            Just(SortMode::Competition),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: volume mode is non-increasing by search volume
        #[test]
        fn volume_non_increasing(topics in proptest::collection::vec(arb_topic(), 0..30)) {
            let sorted = sort_and_filter(&topics, SortMode::Volume, "");
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].topic.search_volume >= pair[1].topic.search_volume);
            }
        }

        /// Property: competition mode is non-decreasing by competition level
        #[test]
        fn competition_non_decreasing(topics in proptest::collection::vec(arb_topic(), 0..30)) {
            let sorted = sort_and_filter(&topics, SortMode::Competition, "");
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].topic.competition_level <= pair[1].topic.competition_level);
            }
        }

        /// Property: alpha mode is non-decreasing under the title collation
        #[test]
        fn alpha_non_decreasing(topics in proptest::collection::vec(arb_topic(), 0..30)) {
            let sorted = sort_and_filter(&topics, SortMode::Alpha, "");
            for pair in sorted.windows(2) {
                prop_assert_ne!(
                    compare_titles(pair[0].title(), pair[1].title()),
                    Ordering::Greater
                );
            }
        }

        /// Property: the filter keeps exactly the case-insensitive matches
        #[test]
        fn filter_is_sound_and_complete(
            topics in proptest::collection::vec(arb_topic(), 0..30),
            query in "[A-Za-z ]{0,3}",
            mode in arb_mode(),
        ) {
            let result = sort_and_filter(&topics, mode, &query);
            let needle = query.to_lowercase();

            prop_assert!(result
                .iter()
                .all(|t| t.title().to_lowercase().contains(&needle)));

            let expected = topics
                .iter()
                .filter(|t| t.title().to_lowercase().contains(&needle))
                .count();
            prop_assert_eq!(result.len(), expected);
        }
    }
}
