use super::model::Record;

/// Lower bound (inclusive) of the excellent tier.
pub const EXCELLENT_MIN: f64 = 95.0;
/// Lower bound (inclusive) of the good tier.
pub const GOOD_MIN: f64 = 85.0;

// ---------------------------------------------------------------------------
// Summary of a filtered collection
// ---------------------------------------------------------------------------

/// Counts per Overall-score tier. Records without an Overall score are in
/// none of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.average
    }
}

/// Statistics snapshot of one filtered collection.
///
/// `mean`, `max` and `min` are `None` when no record has an Overall score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub tiers: TierCounts,
    /// Records left out of every tier because their Overall score is null.
    pub unscored: usize,
}

pub fn summarize(records: &[Record]) -> Summary {
    let mut summary = Summary {
        count: records.len(),
        ..Default::default()
    };
    let mut sum = 0.0;
    let mut scored = 0usize;

    for score in records.iter().map(Record::overall) {
        let Some(s) = score else {
            summary.unscored += 1;
            continue;
        };
        sum += s;
        scored += 1;
        summary.max = Some(summary.max.map_or(s, |m| m.max(s)));
        summary.min = Some(summary.min.map_or(s, |m| m.min(s)));

        if s >= EXCELLENT_MIN {
            summary.tiers.excellent += 1;
        } else if s >= GOOD_MIN {
            summary.tiers.good += 1;
        } else {
            summary.tiers.average += 1;
        }
    }

    if scored > 0 {
        summary.mean = Some(sum / scored as f64);
    }
    summary
}

// ---------------------------------------------------------------------------
// Dataset overview (unfiltered)
// ---------------------------------------------------------------------------

/// Headline figures shown above the filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub total: usize,
    pub mean_overall: Option<f64>,
    /// Name of the institution with the highest Overall score. The first one
    /// wins on ties.
    pub top_institution: Option<String>,
}

pub fn overview(records: &[Record]) -> Overview {
    let mut best: Option<(&Record, f64)> = None;
    for rec in records {
        let Some(s) = rec.overall() else { continue };
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((rec, s)),
        }
    }

    Overview {
        total: records.len(),
        mean_overall: summarize(records).mean,
        top_institution: best.and_then(|(rec, _)| rec.name.clone()),
    }
}
