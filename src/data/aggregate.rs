use std::str::FromStr;

use super::model::{Record, ScoreField};

/// Bin count handed to the histogram renderer.
pub const HISTOGRAM_BINS: usize = 20;
/// Length of the ranked subset shown under the main chart.
pub const TOP_N: usize = 20;

// ---------------------------------------------------------------------------
// Chart kind selector
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChartKindError {
    #[error("unknown chart kind: {0:?}")]
    Unknown(String),
}

/// The four interchangeable main-chart views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Scatter,
    RegionalBar,
    DistributionBox,
    ScoreHistogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::RegionalBar,
        ChartKind::DistributionBox,
        ChartKind::ScoreHistogram,
    ];

    /// Stable identifier used at the UI boundary.
    pub fn code(self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::RegionalBar => "regional-bar",
            ChartKind::DistributionBox => "distribution-box",
            ChartKind::ScoreHistogram => "score-histogram",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot Analysis",
            ChartKind::RegionalBar => "Regional Bar Chart",
            ChartKind::DistributionBox => "Distribution Box Plot",
            ChartKind::ScoreHistogram => "Score Histogram",
        }
    }
}

impl FromStr for ChartKind {
    type Err = ChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.code() == s)
            .ok_or_else(|| ChartKindError::Unknown(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Aggregate shapes
// ---------------------------------------------------------------------------

/// Items sharing one region. `region` is `None` for records without one.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup<T> {
    pub region: Option<String>,
    pub items: Vec<T>,
}

/// Who a plotted point belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLabel {
    pub name: Option<String>,
    pub country: Option<String>,
    pub size: Option<String>,
    pub status: Option<String>,
}

impl PointLabel {
    fn of(rec: &Record) -> Self {
        Self {
            name: rec.name.clone(),
            country: rec.country.clone(),
            size: rec.size.clone(),
            status: rec.status.clone(),
        }
    }

    /// Institution name, then the known parts of country, size and status.
    pub fn hover_text(&self) -> String {
        let name = self.name.as_deref().unwrap_or("Unnamed");
        let details: Vec<&str> = [&self.country, &self.size, &self.status]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if details.is_empty() {
            name.to_string()
        } else {
            format!("{name}\n{}", details.join(" | "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorePair {
    pub label: PointLabel,
    pub overall: f64,
    pub ar: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionMean {
    pub region: Option<String>,
    pub mean: f64,
    /// Non-null scores the mean was taken over.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionScore {
    pub region: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub name: Option<String>,
    pub region: Option<String>,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResearchPoint {
    pub label: PointLabel,
    pub research: Option<f64>,
    pub overall: f64,
    /// Employment outcomes; also the marker size hint.
    pub eo: f64,
}

/// Chart-kind-specific shape computed from one filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Scatter(Vec<RegionGroup<ScorePair>>),
    RegionalBar(Vec<RegionMean>),
    DistributionBox(Vec<RegionGroup<f64>>),
    ScoreHistogram { scores: Vec<RegionScore>, bins: usize },
}

impl Aggregate {
    pub fn kind(&self) -> ChartKind {
        match self {
            Aggregate::Scatter(_) => ChartKind::Scatter,
            Aggregate::RegionalBar(_) => ChartKind::RegionalBar,
            Aggregate::DistributionBox(_) => ChartKind::DistributionBox,
            Aggregate::ScoreHistogram { .. } => ChartKind::ScoreHistogram,
        }
    }

    /// Number of plotted entries (points, bars or scores).
    pub fn len(&self) -> usize {
        match self {
            Aggregate::Scatter(groups) => groups.iter().map(|g| g.items.len()).sum(),
            Aggregate::RegionalBar(means) => means.len(),
            Aggregate::DistributionBox(groups) => groups.iter().map(|g| g.items.len()).sum(),
            Aggregate::ScoreHistogram { scores, .. } => scores.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn aggregate(records: &[Record], kind: ChartKind) -> Aggregate {
    match kind {
        ChartKind::Scatter => Aggregate::Scatter(group_by_region(records.iter().filter_map(|r| {
            let overall = r.overall()?;
            let ar = r.score(ScoreField::Ar)?;
            Some((
                r.region.as_deref(),
                ScorePair {
                    label: PointLabel::of(r),
                    overall,
                    ar,
                },
            ))
        }))),
        ChartKind::RegionalBar => Aggregate::RegionalBar(regional_means(records)),
        ChartKind::DistributionBox => Aggregate::DistributionBox(group_by_region(
            records
                .iter()
                .filter_map(|r| Some((r.region.as_deref(), r.overall()?))),
        )),
        ChartKind::ScoreHistogram => Aggregate::ScoreHistogram {
            scores: records
                .iter()
                .filter_map(|r| {
                    Some(RegionScore {
                        region: r.region.clone(),
                        score: r.overall()?,
                    })
                })
                .collect(),
            bins: HISTOGRAM_BINS,
        },
    }
}

fn regional_means(records: &[Record]) -> Vec<RegionMean> {
    let groups = group_by_region(records.iter().map(|r| (r.region.as_deref(), r.overall())));
    groups
        .into_iter()
        .filter_map(|g| {
            let scores: Vec<f64> = g.items.into_iter().flatten().collect();
            if scores.is_empty() {
                return None;
            }
            Some(RegionMean {
                region: g.region,
                mean: scores.iter().sum::<f64>() / scores.len() as f64,
                count: scores.len(),
            })
        })
        .collect()
}

/// First `n` records with an Overall score, in their filtered order. This is
/// deliberately not a sort by score.
pub fn top_n(records: &[Record], n: usize) -> Vec<RankedEntry> {
    records
        .iter()
        .filter_map(|r| {
            Some(RankedEntry {
                name: r.name.clone(),
                region: r.region.clone(),
                overall: r.overall()?,
            })
        })
        .take(n)
        .collect()
}

/// Research level against Overall, sized by EO. Records missing Overall or EO
/// are dropped; a missing research level is kept as `None`.
pub fn research_scatter(records: &[Record]) -> Vec<RegionGroup<ResearchPoint>> {
    group_by_region(records.iter().filter_map(|r| {
        let overall = r.overall()?;
        let eo = r.score(ScoreField::Eo)?;
        Some((
            r.region.as_deref(),
            ResearchPoint {
                label: PointLabel::of(r),
                research: r.research,
                overall,
                eo,
            },
        ))
    }))
}

/// Group items by region, groups in first-seen order, items in input order.
fn group_by_region<'a, T>(items: impl Iterator<Item = (Option<&'a str>, T)>) -> Vec<RegionGroup<T>> {
    let mut groups: Vec<RegionGroup<T>> = Vec::new();
    for (region, item) in items {
        match groups.iter_mut().find(|g| g.region.as_deref() == region) {
            Some(group) => group.items.push(item),
            None => groups.push(RegionGroup {
                region: region.map(str::to_string),
                items: vec![item],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, region: Option<&str>, overall: Option<f64>) -> Record {
        let mut r = Record {
            name: Some(name.to_string()),
            region: region.map(str::to_string),
            ..Default::default()
        };
        r.set_score(ScoreField::Overall, overall);
        r
    }

    #[test]
    fn chart_kind_parse_rejects_unknown() {
        assert_eq!("regional-bar".parse::<ChartKind>(), Ok(ChartKind::RegionalBar));
        assert_eq!(
            "Bar Chart".parse::<ChartKind>(),
            Err(ChartKindError::Unknown("Bar Chart".into()))
        );
    }

    #[test]
    fn every_kind_handles_empty_input() {
        for kind in ChartKind::ALL {
            let agg = aggregate(&[], kind);
            assert_eq!(agg.kind(), kind);
            assert!(agg.is_empty());
        }
        assert!(top_n(&[], TOP_N).is_empty());
        assert!(research_scatter(&[]).is_empty());
    }

    #[test]
    fn scatter_drops_pairs_with_nulls() {
        let data = vec![
            rec("a", Some("Europe"), Some(90.0)).with_score(ScoreField::Ar, 80.0),
            rec("b", Some("Europe"), Some(90.0)),
            rec("c", Some("Asia"), None).with_score(ScoreField::Ar, 70.0),
            rec("d", Some("Asia"), Some(60.0)).with_score(ScoreField::Ar, 50.0),
        ];
        let Aggregate::Scatter(groups) = aggregate(&data, ChartKind::Scatter) else {
            panic!("wrong shape");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].region.as_deref(), Some("Europe"));
        assert_eq!(groups[0].items[0].ar, 80.0);
        assert_eq!(groups[1].items[0].label.name.as_deref(), Some("d"));
    }

    #[test]
    fn point_label_carries_institution_details() {
        let mut r = rec("Kyoto University", Some("Asia"), Some(74.1))
            .with_score(ScoreField::Ar, 88.0)
            .with_score(ScoreField::Eo, 76.3);
        r.country = Some("Japan".into());
        r.status = Some("Public".into());
        let Aggregate::Scatter(groups) = aggregate(&[r.clone()], ChartKind::Scatter) else {
            panic!("wrong shape");
        };
        assert_eq!(groups[0].items[0].label.hover_text(), "Kyoto University\nJapan | Public");
        assert_eq!(research_scatter(&[r])[0].items[0].label, groups[0].items[0].label);
        assert_eq!(PointLabel::default().hover_text(), "Unnamed");
    }

    #[test]
    fn regional_bar_omits_all_null_groups() {
        let data = vec![
            rec("a", Some("Europe"), Some(90.0)),
            rec("b", Some("Europe"), None),
            rec("c", Some("Europe"), Some(80.0)),
            rec("d", Some("Africa"), None),
        ];
        let Aggregate::RegionalBar(means) = aggregate(&data, ChartKind::RegionalBar) else {
            panic!("wrong shape");
        };
        assert_eq!(
            means,
            vec![RegionMean {
                region: Some("Europe".into()),
                mean: 85.0,
                count: 2
            }]
        );
    }

    #[test]
    fn box_and_histogram_drop_null_scores() {
        let data = vec![
            rec("a", Some("Europe"), Some(90.0)),
            rec("b", None, Some(70.0)),
            rec("c", Some("Europe"), None),
        ];
        let Aggregate::DistributionBox(groups) = aggregate(&data, ChartKind::DistributionBox) else {
            panic!("wrong shape");
        };
        assert_eq!(groups[0].items, vec![90.0]);
        assert_eq!(groups[1].region, None);

        let Aggregate::ScoreHistogram { scores, bins } = aggregate(&data, ChartKind::ScoreHistogram)
        else {
            panic!("wrong shape");
        };
        assert_eq!(bins, 20);
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn top_n_keeps_filtered_order() {
        let mut data: Vec<Record> = (0..30)
            .map(|i| rec(&format!("u{i}"), Some("Europe"), Some(i as f64)))
            .collect();
        data.insert(0, rec("unscored", Some("Europe"), None));

        let top = top_n(&data, TOP_N);
        assert_eq!(top.len(), 20);
        assert_eq!(top[0].name.as_deref(), Some("u0"));
        assert_eq!(top[19].overall, 19.0);
    }

    #[test]
    fn research_scatter_requires_overall_and_eo() {
        let mut with_research = rec("a", Some("Asia"), Some(88.0)).with_score(ScoreField::Eo, 40.0);
        with_research.research = Some(3.0);
        let data = vec![
            with_research,
            rec("b", Some("Asia"), Some(88.0)),
            rec("c", Some("Asia"), Some(75.0)).with_score(ScoreField::Eo, 10.0),
        ];
        let groups = research_scatter(&data);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[0].research, Some(3.0));
        assert_eq!(groups[0].items[1].research, None);
    }
}
