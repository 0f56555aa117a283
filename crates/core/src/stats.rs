//! Aggregate annotation statistics.
//!
//! A backing store either hands its items to [`compute_stats`] or computes
//! the raw aggregates itself (for example in SQL) and finishes them with
//! [`StatsTotals::summarize`]. Derived figures, ranking and rounding live in
//! one place, so every store reports identical numbers for identical data.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::annotation::Annotated;

/// Mean and sample standard deviation of valence/arousal over completed items.
///
/// Values are rounded to two decimals. Means are `None` with no completed
/// items; deviations are `None` with fewer than two.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VadSummary {
    pub avg_valence: Option<f64>,
    pub avg_arousal: Option<f64>,
    pub std_valence: Option<f64>,
    pub std_arousal: Option<f64>,
}

/// Snapshot of annotation progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaStats {
    pub total_media: i64,
    pub total_annotated: i64,
    pub pending: i64,
    /// Percentage of completed items, `0.0` when there are no items.
    pub completion_rate: f64,
    /// Emotion tag to count among completed items, most frequent first.
    pub emotion_summary: IndexMap<String, i64>,
    /// Media type to count over all items.
    pub type_summary: BTreeMap<String, i64>,
    pub vad_summary: VadSummary,
}

/// Raw aggregates before derivation and rounding.
///
/// `emotion_counts` and the VAD figures cover completed items only;
/// `type_counts` covers every item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTotals {
    pub total_media: i64,
    pub emotion_counts: BTreeMap<String, i64>,
    pub type_counts: BTreeMap<String, i64>,
    pub avg_valence: Option<f64>,
    pub avg_arousal: Option<f64>,
    pub std_valence: Option<f64>,
    pub std_arousal: Option<f64>,
}

impl StatsTotals {
    /// Derive pending and completion rate, rank emotions and round VAD figures.
    pub fn summarize(self) -> MediaStats {
        // Every completed item has exactly one emotion.
        let annotated: i64 = self.emotion_counts.values().sum();

        MediaStats {
            total_media: self.total_media,
            total_annotated: annotated,
            pending: self.total_media - annotated,
            completion_rate: completion_rate(annotated, self.total_media),
            emotion_summary: rank_by_count(self.emotion_counts),
            type_summary: self.type_counts,
            vad_summary: VadSummary {
                avg_valence: self.avg_valence.map(round2),
                avg_arousal: self.avg_arousal.map(round2),
                std_valence: self.std_valence.map(round2),
                std_arousal: self.std_arousal.map(round2),
            },
        }
    }
}

/// Compute [`MediaStats`] over every item.
pub fn compute_stats<'a, T, I>(items: I) -> MediaStats
where
    T: Annotated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut total: i64 = 0;
    let mut emotion_counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut type_counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut valences = Vec::new();
    let mut arousals = Vec::new();

    for item in items {
        total += 1;
        *type_counts.entry(item.media_type().to_string()).or_default() += 1;

        if !item.is_completed() {
            continue;
        }
        if let (Some(emotion), Some(valence), Some(arousal)) =
            (item.emotion(), item.valence(), item.arousal())
        {
            *emotion_counts.entry(emotion.to_string()).or_default() += 1;
            valences.push(valence);
            arousals.push(arousal);
        }
    }

    StatsTotals {
        total_media: total,
        emotion_counts,
        type_counts,
        avg_valence: mean(&valences),
        avg_arousal: mean(&arousals),
        std_valence: sample_std_dev(&valences),
        std_arousal: sample_std_dev(&arousals),
    }
    .summarize()
}

/// `annotated / total * 100`, or `0.0` for an empty collection.
pub fn completion_rate(annotated: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        annotated as f64 / total as f64 * 100.0
    }
}

fn rank_by_count(counts: BTreeMap<String, i64>) -> IndexMap<String, i64> {
    // BTreeMap iteration is name-ordered and the sort is stable, so ties
    // stay alphabetical.
    let mut ranked: Vec<(String, i64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
