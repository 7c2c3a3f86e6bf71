use std::collections::BTreeSet;
use std::path::Path;

use rankings_explorer::config::Settings;
use rankings_explorer::data::aggregate::{
    Aggregate, ChartKind, RankedEntry, RegionGroup, ResearchPoint, aggregate, research_scatter,
    top_n,
};
use rankings_explorer::data::export::{ExportFormat, export_to_path};
use rankings_explorer::data::filter::{FilterCriteria, above_threshold};
use rankings_explorer::data::model::{Dataset, Focus, Record, Size, Status};
use rankings_explorer::data::stats::{Overview, Summary, overview, summarize};

use crate::color::RegionColors;

// ---------------------------------------------------------------------------
// Filter controls – what the widgets edit
// ---------------------------------------------------------------------------

/// Widget values. Turned into an immutable [`FilterCriteria`] snapshot on
/// every pass; the engine never reads this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub search: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub size: Option<Size>,
    pub include_private: bool,
    pub include_public: bool,
    pub advanced: bool,
    pub min_ar_score: f64,
    pub focus: Option<Focus>,
}

impl Default for FilterControls {
    fn default() -> Self {
        Self {
            search: String::new(),
            region: None,
            country: None,
            size: None,
            include_private: true,
            include_public: true,
            advanced: false,
            min_ar_score: 0.0,
            focus: None,
        }
    }
}

impl FilterControls {
    pub fn criteria(&self) -> FilterCriteria {
        // both switches on means no status constraint at all
        let mut statuses = BTreeSet::new();
        if self.include_private != self.include_public {
            if self.include_private {
                statuses.extend(Status::PRIVATE);
            } else {
                statuses.insert(Status::Public);
            }
        }
        FilterCriteria {
            region: self.region.clone(),
            country: self.country.clone(),
            size: self.size,
            statuses,
            search: self.search.clone(),
            advanced: self.advanced,
            min_ar_score: self.min_ar_score,
            focus: self.focus,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Headline figures over the whole dataset.
    pub overview: Overview,

    pub colors: RegionColors,

    pub controls: FilterControls,

    /// Output of the last filter pass and everything derived from it.
    pub filtered: Vec<Record>,
    pub summary: Summary,
    pub chart_kind: ChartKind,
    pub chart: Aggregate,
    pub top: Vec<RankedEntry>,
    pub research: Vec<RegionGroup<ResearchPoint>>,

    /// Threshold explorer, over the unfiltered dataset.
    pub elite_threshold: f64,
    pub elite: Vec<Record>,

    pub export_format: ExportFormat,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let elite_threshold = settings.dashboard.elite_threshold;
        let chart_kind = ChartKind::default();
        Self {
            settings,
            dataset: None,
            overview: Overview::default(),
            colors: RegionColors::default(),
            controls: FilterControls::default(),
            filtered: Vec::new(),
            summary: Summary::default(),
            chart_kind,
            chart: aggregate(&[], chart_kind),
            top: Vec::new(),
            research: Vec::new(),
            elite_threshold,
            elite: Vec::new(),
            export_format: ExportFormat::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.overview = overview(&dataset.records);
        self.colors = RegionColors::new(&dataset.regions);
        self.controls = FilterControls::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_elite();
        self.refilter();
    }

    pub fn load_path(&mut self, path: &Path) {
        match rankings_explorer::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// One full recomputation pass: snapshot → filter → summary → aggregates.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let criteria = self.controls.criteria();
        self.filtered = ds.run_filter(&criteria);
        self.summary = summarize(&self.filtered);
        self.top = top_n(&self.filtered, self.settings.dashboard.top_n);
        self.research = research_scatter(&self.filtered);
        self.rebuild_chart();
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        if self.chart_kind != kind {
            self.chart_kind = kind;
            self.rebuild_chart();
        }
    }

    fn rebuild_chart(&mut self) {
        self.chart = aggregate(&self.filtered, self.chart_kind);
    }

    pub fn reset_filters(&mut self) {
        self.controls = FilterControls::default();
        self.refilter();
    }

    pub fn set_elite_threshold(&mut self, threshold: f64) {
        self.elite_threshold = threshold;
        self.refresh_elite();
    }

    fn refresh_elite(&mut self) {
        self.elite = match &self.dataset {
            Some(ds) => above_threshold(&ds.records, self.elite_threshold),
            None => Vec::new(),
        };
    }

    pub fn export(&mut self, path: &Path) {
        match export_to_path(&self.filtered, self.export_format, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} universities to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankings_explorer::data::model::ScoreField;

    fn dataset() -> Dataset {
        let rec = |name: &str, status: &str, overall: f64| {
            Record {
                name: Some(name.into()),
                region: Some("Europe".into()),
                status: Some(status.into()),
                ..Default::default()
            }
            .with_score(ScoreField::Overall, overall)
        };
        Dataset::from_records(vec![
            rec("Public One", "Public", 96.0),
            rec("Private One", "Private for Profit", 91.0),
            rec("Charity One", "Private not for Profit", 80.0),
        ])
    }

    #[test]
    fn private_switch_maps_to_both_private_statuses() {
        let controls = FilterControls {
            include_public: false,
            ..Default::default()
        };
        let statuses = controls.criteria().statuses;
        assert_eq!(statuses.len(), 2);
        assert!(!statuses.contains(&Status::Public));
    }

    #[test]
    fn both_switches_on_leave_status_unconstrained() {
        let controls = FilterControls::default();
        assert_eq!(controls.criteria(), FilterCriteria::default());

        let mut state = AppState::new(Settings::default());
        let mut records = dataset().records;
        records.push(Record {
            name: Some("Status Unknown".into()),
            status: Some("Foundation".into()),
            ..Default::default()
        });
        records.push(Record {
            name: Some("Status Missing".into()),
            ..Default::default()
        });
        state.set_dataset(Dataset::from_records(records));
        assert_eq!(state.filtered.len(), 5);

        state.controls.include_private = false;
        state.refilter();
        assert_eq!(state.filtered.len(), 1);
    }

    #[test]
    fn refilter_updates_every_derived_view() {
        let mut state = AppState::new(Settings::default());
        state.set_dataset(dataset());
        assert_eq!(state.summary.count, 3);
        assert_eq!(state.elite.len(), 2);

        state.controls.include_private = false;
        state.refilter();
        assert_eq!(state.summary.count, 1);
        assert_eq!(state.top.len(), 1);
        assert_eq!(state.chart.kind(), ChartKind::Scatter);

        state.set_chart_kind(ChartKind::RegionalBar);
        assert_eq!(state.chart.len(), 1);

        state.reset_filters();
        assert_eq!(state.filtered.len(), 3);

        state.set_elite_threshold(95.0);
        assert_eq!(state.elite.len(), 1);
    }
}
