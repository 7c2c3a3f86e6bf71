use std::collections::BTreeSet;

use super::model::{Dataset, Focus, Record, ScoreField, Size, Status};

// ---------------------------------------------------------------------------
// Filter criteria: one immutable snapshot per recomputation pass
// ---------------------------------------------------------------------------

/// All filter parameters at the moment filtering runs.
///
/// `None` on a single-choice field means "no constraint". `min_ar_score` and
/// `focus` only take effect when `advanced` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub region: Option<String>,
    pub country: Option<String>,
    pub size: Option<Size>,
    /// Statuses to keep. Empty means no constraint.
    pub statuses: BTreeSet<Status>,
    pub search: String,
    pub advanced: bool,
    pub min_ar_score: f64,
    pub focus: Option<Focus>,
}

impl Default for FilterCriteria {
    /// The reset state: nothing constrained, so records with a missing or
    /// unrecognized status stay visible.
    fn default() -> Self {
        Self {
            region: None,
            country: None,
            size: None,
            statuses: BTreeSet::new(),
            search: String::new(),
            advanced: false,
            min_ar_score: 0.0,
            focus: None,
        }
    }
}

impl FilterCriteria {
    /// Expand the snapshot into the list of predicates that are active.
    /// The advanced predicates are left out entirely when advanced mode is off.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut preds = vec![
            Predicate::RegionMatches(self.region.as_deref()),
            Predicate::CountryMatches(self.country.as_deref()),
            Predicate::SizeMatches(self.size),
            Predicate::StatusIncluded(&self.statuses),
            Predicate::SearchMatches(&self.search),
        ];
        if self.advanced {
            preds.push(Predicate::MinArScore(self.min_ar_score));
            preds.push(Predicate::FocusMatches(self.focus));
        }
        preds
    }
}

// ---------------------------------------------------------------------------
// Predicate library
// ---------------------------------------------------------------------------

/// A single, side-effect-free test over one record.
#[derive(Debug, Clone, Copy)]
pub enum Predicate<'a> {
    RegionMatches(Option<&'a str>),
    CountryMatches(Option<&'a str>),
    SizeMatches(Option<Size>),
    StatusIncluded(&'a BTreeSet<Status>),
    SearchMatches(&'a str),
    MinArScore(f64),
    FocusMatches(Option<Focus>),
}

impl Predicate<'_> {
    pub fn matches(&self, rec: &Record) -> bool {
        match *self {
            Predicate::RegionMatches(choice) => exact(choice, rec.region.as_deref()),
            Predicate::CountryMatches(choice) => exact(choice, rec.country.as_deref()),
            Predicate::SizeMatches(choice) => exact(choice.map(Size::code), rec.size.as_deref()),
            Predicate::StatusIncluded(statuses) => {
                statuses.is_empty()
                    || rec
                        .status
                        .as_deref()
                        .and_then(Status::from_code)
                        .is_some_and(|st| statuses.contains(&st))
            }
            Predicate::SearchMatches(term) => {
                if term.is_empty() {
                    return true;
                }
                let needle = term.to_lowercase();
                rec.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            }
            Predicate::MinArScore(threshold) => rec
                .score(ScoreField::Ar)
                .is_some_and(|ar| ar >= threshold),
            Predicate::FocusMatches(choice) => {
                exact(choice.map(Focus::code), rec.focus.as_deref())
            }
        }
    }
}

/// `None` choice → passes; otherwise case-sensitive equality with the field.
fn exact(choice: Option<&str>, field: Option<&str>) -> bool {
    match choice {
        None => true,
        Some(want) => field == Some(want),
    }
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Return the records passing every active predicate, in source order.
pub fn apply(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let preds = criteria.predicates();
    let out: Vec<Record> = records
        .iter()
        .filter(|rec| preds.iter().all(|p| p.matches(rec)))
        .cloned()
        .collect();
    log::debug!(
        "filter pass: {} of {} records kept ({} predicates)",
        out.len(),
        records.len(),
        preds.len()
    );
    out
}

impl Dataset {
    /// Run the filter pipeline over the whole dataset.
    pub fn run_filter(&self, criteria: &FilterCriteria) -> Vec<Record> {
        log::debug!("filtering with {criteria:?}");
        apply(&self.records, criteria)
    }
}

/// Records whose Overall score is strictly above `threshold`; null scores
/// never qualify.
pub fn above_threshold(records: &[Record], threshold: f64) -> Vec<Record> {
    records
        .iter()
        .filter(|rec| rec.overall().is_some_and(|s| s > threshold))
        .cloned()
        .collect()
}
