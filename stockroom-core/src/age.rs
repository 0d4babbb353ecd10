//! Equipment age derivation and age buckets.
//!
//! Age is calendar-naive: elapsed milliseconds divided by a 365.25-day year.
//! Bucket assignment depends on this exact approximation, so leap-year or
//! month-aware arithmetic must not be substituted here.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds in a 365.25-day year.
pub const MILLIS_PER_YEAR: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 365.25;

/// Elapsed years between acquisition and `now`.
///
/// The absolute difference is used, so a future acquisition date yields a
/// positive age rather than a negative one.
pub fn age_in_years(acquired: &Timestamp, now: &Timestamp) -> f64 {
    let millis = (*now - *acquired).num_milliseconds().unsigned_abs();
    millis as f64 / MILLIS_PER_YEAR
}

/// One of the six fixed age ranges.
///
/// Boundaries are `<1, [1,2), [2,3), [3,4), [4,5), >=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AgeBucket {
    #[serde(rename = "< 1 ano")]
    UnderOne,
    #[serde(rename = "1-2 anos")]
    OneToTwo,
    #[serde(rename = "2-3 anos")]
    TwoToThree,
    #[serde(rename = "3-4 anos")]
    ThreeToFour,
    #[serde(rename = "4-5 anos")]
    FourToFive,
    #[serde(rename = "> 5 anos")]
    FiveOrMore,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 6] = [
        AgeBucket::UnderOne,
        AgeBucket::OneToTwo,
        AgeBucket::TwoToThree,
        AgeBucket::ThreeToFour,
        AgeBucket::FourToFive,
        AgeBucket::FiveOrMore,
    ];

    /// The literal label used by filters and charts.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::UnderOne => "< 1 ano",
            AgeBucket::OneToTwo => "1-2 anos",
            AgeBucket::TwoToThree => "2-3 anos",
            AgeBucket::ThreeToFour => "3-4 anos",
            AgeBucket::FourToFive => "4-5 anos",
            AgeBucket::FiveOrMore => "> 5 anos",
        }
    }

    /// Resolve a literal label. Matching is exact; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }

    /// Whether an age (in years) falls in this bucket.
    pub fn contains(&self, age: f64) -> bool {
        match self {
            AgeBucket::UnderOne => age < 1.0,
            AgeBucket::OneToTwo => (1.0..2.0).contains(&age),
            AgeBucket::TwoToThree => (2.0..3.0).contains(&age),
            AgeBucket::ThreeToFour => (3.0..4.0).contains(&age),
            AgeBucket::FourToFive => (4.0..5.0).contains(&age),
            AgeBucket::FiveOrMore => age >= 5.0,
        }
    }

    /// The bucket an age falls into.
    pub fn for_age(age: f64) -> Self {
        if age < 1.0 {
            AgeBucket::UnderOne
        } else if age < 2.0 {
            AgeBucket::OneToTwo
        } else if age < 3.0 {
            AgeBucket::TwoToThree
        } else if age < 4.0 {
            AgeBucket::ThreeToFour
        } else if age < 5.0 {
            AgeBucket::FourToFive
        } else {
            AgeBucket::FiveOrMore
        }
    }

    /// Bucket of an acquisition date as seen from `now`.
    pub fn for_acquisition(acquired: &Timestamp, now: &Timestamp) -> Self {
        Self::for_age(age_in_years(acquired, now))
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AgeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Invalid AgeBucket: {}", s))
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any non-negative age lands in exactly one bucket, and it is the
        /// bucket `for_age` picks.
        #[test]
        fn prop_exactly_one_bucket_contains_age(age in 0.0f64..100.0) {
            let matching: Vec<AgeBucket> = AgeBucket::ALL
                .into_iter()
                .filter(|bucket| bucket.contains(age))
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0], AgeBucket::for_age(age));
        }

        /// Integer boundaries belong to the upper bucket.
        #[test]
        fn prop_integer_boundary_opens_next_bucket(years in 1u32..5) {
            let bucket = AgeBucket::for_age(f64::from(years));
            prop_assert_eq!(bucket, AgeBucket::ALL[years as usize]);
        }
    }
}
