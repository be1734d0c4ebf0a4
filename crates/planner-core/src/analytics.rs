//! Mock competitor analytics
//!
//! Placeholder metrics shown on the results view. Nothing here is computed
//! from real data: every field is drawn from a [`RandomSource`], so two
//! calls with the same websites give different rows. Tests pass a
//! [`SequenceSource`] to pin the output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Keywords the top-keyword column is drawn from
pub const KEYWORD_VOCABULARY: [&str; 5] =
    ["marketing", "business", "strategy", "growth", "analytics"];

/// Number of top keywords reported per competitor
pub const TOP_KEYWORD_COUNT: usize = 3;

const AUTHORITY_SCORE_BOUND: u32 = 100;
const RELEVANT_KEYWORDS_BOUND: u32 = 10_000;
const MONTHLY_TRAFFIC_BOUND: u32 = 1_000;

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform value in `0..upper`. `upper` is always non-zero.
    fn below(&mut self, upper: u32) -> u32;
}

/// [`RandomSource`] backed by any `rand` generator
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn below(&mut self, upper: u32) -> u32 {
        self.0.gen_range(0..upper)
    }
}

/// Replays a fixed list of values, each reduced modulo the requested bound.
/// Wraps around when exhausted; an empty list always yields zero.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<u32>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn below(&mut self, upper: u32) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % upper
    }
}

/// Placeholder metrics for one competitor website
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockCompetitorAnalytics {
    pub website: String,
    /// 0..=99
    pub authority_score: u32,
    /// 0..=9999
    pub relevant_keywords: u32,
    /// `"<0-999>K"`
    pub monthly_traffic: String,
    pub top_keywords: Vec<String>,
}

/// One row of analytics per website, in input order
pub fn synthesize<S, R>(websites: &[S], rng: &mut R) -> Vec<MockCompetitorAnalytics>
where
    S: AsRef<str>,
    R: RandomSource + ?Sized,
{
    websites
        .iter()
        .map(|website| synthesize_one(website.as_ref(), rng))
        .collect()
}

fn synthesize_one<R>(website: &str, rng: &mut R) -> MockCompetitorAnalytics
where
    R: RandomSource + ?Sized,
{
    let authority_score = rng.below(AUTHORITY_SCORE_BOUND);
    let relevant_keywords = rng.below(RELEVANT_KEYWORDS_BOUND);
    let monthly_traffic = format!("{}K", rng.below(MONTHLY_TRAFFIC_BOUND));

    MockCompetitorAnalytics {
        website: website.to_string(),
        authority_score,
        relevant_keywords,
        monthly_traffic,
        top_keywords: pick_keywords(rng),
    }
}

/// Partial Fisher-Yates over the vocabulary; the picks are always distinct
fn pick_keywords<R: RandomSource + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut pool = KEYWORD_VOCABULARY;
    let len = pool.len() as u32;
    for i in 0..TOP_KEYWORD_COUNT {
        let j = i + rng.below(len - i as u32) as usize;
        pool.swap(i, j);
    }
    pool[..TOP_KEYWORD_COUNT]
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_sequence_gives_exact_rows() {
        // authority, keywords, traffic, then three shuffle draws
        let mut rng = SequenceSource::new(vec![42, 1234, 87, 4, 0, 1]);
        let rows = synthesize(&["https://a.com"], &mut rng);

        assert_eq!(
            rows,
            vec![MockCompetitorAnalytics {
                website: "https://a.com".to_string(),
                authority_score: 42,
                relevant_keywords: 1234,
                monthly_traffic: "87K".to_string(),
                top_keywords: vec![
                    "analytics".to_string(),
                    "business".to_string(),
                    "growth".to_string()
                ],
            }]
        );
    }

    #[test]
    fn sequence_values_are_reduced_into_range() {
        let mut rng = SequenceSource::new(vec![150, 10_001, 2_500, 9, 9, 9]);
        let row = &synthesize(&["https://x.com"], &mut rng)[0];
        assert_eq!(row.authority_score, 50);
        assert_eq!(row.relevant_keywords, 1);
        assert_eq!(row.monthly_traffic, "500K");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let mut rng = RngSource::from_entropy();
        let websites: Vec<String> = Vec::new();
        assert!(synthesize(&websites, &mut rng).is_empty());
    }

    #[test]
    fn formats_thousands_like_en_us_locale() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(9_999), "9,999");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: one row per website, same order, every field in range
        #[test]
        fn rows_match_inputs_and_stay_in_range(
            websites in proptest::collection::vec("https://[a-z]{1,10}\\.com", 0..8),
            seed in any::<u64>(),
        ) {
            let mut rng = RngSource::new(StdRng::seed_from_u64(seed));
            let rows = synthesize(&websites, &mut rng);

            prop_assert_eq!(rows.len(), websites.len());
            for (row, website) in rows.iter().zip(&websites) {
                prop_assert_eq!(&row.website, website);
                prop_assert!(row.authority_score <= 99);
                prop_assert!(row.relevant_keywords <= 9_999);

                let traffic = row.monthly_traffic.strip_suffix('K');
                prop_assert!(traffic.is_some());
                let traffic: u32 = traffic.unwrap().parse().unwrap();
                prop_assert!(traffic <= 999);

                prop_assert_eq!(row.top_keywords.len(), TOP_KEYWORD_COUNT);
                let distinct: HashSet<&String> = row.top_keywords.iter().collect();
                prop_assert_eq!(distinct.len(), TOP_KEYWORD_COUNT);
                prop_assert!(row
                    .top_keywords
                    .iter()
                    .all(|k| KEYWORD_VOCABULARY.contains(&k.as_str())));
            }
        }

        /// Property: arbitrary replayed values still produce distinct vocabulary picks
        #[test]
        fn replayed_values_keep_keywords_distinct(
            values in proptest::collection::vec(any::<u32>(), 0..12)
        ) {
            let mut rng = SequenceSource::new(values);
            let row = &synthesize(&["https://x.com"], &mut rng)[0];
            let distinct: HashSet<&String> = row.top_keywords.iter().collect();
            prop_assert_eq!(distinct.len(), TOP_KEYWORD_COUNT);
        }
    }
}
