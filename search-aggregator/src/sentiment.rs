//! Sentiment classification.
//!
//! Two policies exist and are deliberately kept apart: the three-bucket policy
//! used for accordion lists and bucket distributions, and the five-grade
//! policy used for whole-item badges. They disagree at boundary values.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are positive under the three-bucket policy.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores strictly below this are negative under the three-bucket policy.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;
/// Magnitude separating "slightly" from full grades under the five-grade policy.
pub const STRONG_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentGrade {
    Positive,
    SlightlyPositive,
    Neutral,
    SlightlyNegative,
    Negative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentimentPolicy {
    #[default]
    ThreeBucket,
    FiveBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub bucket: SentimentBucket,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Badge attached to a rendered result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBadge {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: &'static str,
    /// Visible badge text.
    pub text: String,
}

pub fn classify_score(score: f64) -> SentimentBucket {
    if score > POSITIVE_THRESHOLD {
        SentimentBucket::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentBucket::Negative
    } else {
        SentimentBucket::Neutral
    }
}

/// Three-bucket classification. A missing score counts as `0.0`.
pub fn classify(score: Option<f64>) -> Classification {
    let bucket = classify_score(score.unwrap_or(0.0));
    let (label, icon) = match bucket {
        SentimentBucket::Positive => ("Positive", "fa-smile"),
        SentimentBucket::Negative => ("Negative", "fa-frown"),
        SentimentBucket::Neutral => ("Neutral", "fa-meh"),
    };
    Classification { bucket, label, icon }
}

/// Five-grade classification. Only an exact `0.0` (or NaN) is neutral.
pub fn classify_five(score: f64) -> SentimentGrade {
    if score.is_nan() {
        SentimentGrade::Neutral
    } else if score >= STRONG_THRESHOLD {
        SentimentGrade::Positive
    } else if score > 0.0 {
        SentimentGrade::SlightlyPositive
    } else if score == 0.0 {
        SentimentGrade::Neutral
    } else if score >= -STRONG_THRESHOLD {
        SentimentGrade::SlightlyNegative
    } else {
        SentimentGrade::Negative
    }
}

impl SentimentGrade {
    pub fn label(&self) -> &'static str {
        match self {
            SentimentGrade::Positive => "Positive",
            SentimentGrade::SlightlyPositive => "Slightly Positive",
            SentimentGrade::Neutral => "Neutral",
            SentimentGrade::SlightlyNegative => "Slightly Negative",
            SentimentGrade::Negative => "Negative",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SentimentGrade::Positive => "fa-solid fa-face-smile",
            SentimentGrade::SlightlyPositive => "fa-solid fa-face-smile-slight",
            SentimentGrade::Neutral => "fa-solid fa-face-meh",
            SentimentGrade::SlightlyNegative => "fa-solid fa-face-frown-slight",
            SentimentGrade::Negative => "fa-solid fa-face-frown",
        }
    }

    fn tone(&self) -> &'static str {
        match self {
            SentimentGrade::Positive => "bg-green-500",
            SentimentGrade::SlightlyPositive => "bg-green-300",
            SentimentGrade::Neutral => "bg-gray-400",
            SentimentGrade::SlightlyNegative => "bg-red-300",
            SentimentGrade::Negative => "bg-red-500",
        }
    }
}

impl SentimentBucket {
    fn tone(&self) -> &'static str {
        match self {
            SentimentBucket::Positive => "bg-green-100 text-green-800",
            SentimentBucket::Negative => "bg-red-100 text-red-800",
            SentimentBucket::Neutral => "bg-gray-100 text-gray-800",
        }
    }
}

impl SentimentPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "three-bucket" | "three" | "3" => Some(SentimentPolicy::ThreeBucket),
            "five-bucket" | "five" | "5" => Some(SentimentPolicy::FiveBucket),
            _ => None,
        }
    }

    /// Three-bucket: always a badge, absent scores shown as `0.00`.
    /// Five-bucket: no badge at all when the score is absent.
    pub fn badge(&self, score: Option<f64>) -> Option<SentimentBadge> {
        match self {
            SentimentPolicy::ThreeBucket => {
                let score = score.unwrap_or(0.0);
                let classification = classify(Some(score));
                Some(SentimentBadge {
                    label: classification.label,
                    icon: classification.icon,
                    tone: classification.bucket.tone(),
                    text: format!("{:.2}", score),
                })
            }
            SentimentPolicy::FiveBucket => {
                let grade = classify_five(score?);
                Some(SentimentBadge {
                    label: grade.label(),
                    icon: grade.icon(),
                    tone: grade.tone(),
                    text: grade.label().to_string(),
                })
            }
        }
    }
}

/// Distribution of one source bucket across the three sentiment buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSentiment {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive_percent: u32,
    pub negative_percent: u32,
    pub neutral_percent: u32,
}

impl AggregateSentiment {
    /// Absent scores count as neutral. Percentages are rounded independently
    /// and need not sum to 100.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut distribution = Self::default();

        for score in scores {
            distribution.total += 1;
            match classify(score).bucket {
                SentimentBucket::Positive => distribution.positive += 1,
                SentimentBucket::Negative => distribution.negative += 1,
                SentimentBucket::Neutral => distribution.neutral += 1,
            }
        }

        distribution.positive_percent = percent(distribution.positive, distribution.total);
        distribution.negative_percent = percent(distribution.negative, distribution.total);
        distribution.neutral_percent = percent(distribution.neutral, distribution.total);
        distribution
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
