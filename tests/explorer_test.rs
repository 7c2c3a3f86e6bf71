//! End-to-end behavior of the filter, statistics and aggregation engine
//! through the public library API.

use rankings_explorer::data::aggregate::{Aggregate, ChartKind};
use rankings_explorer::data::filter::{FilterCriteria, apply};
use rankings_explorer::data::loader::read_csv;
use rankings_explorer::data::model::{Dataset, Focus, Record, ScoreField, Size, Status};
use rankings_explorer::data::{ExportFormat, format_for_export, run_aggregate, run_statistics};

const CSV: &str = "\
Institution Name,Country/Territory,Region,Size,Status,Focus,Research,Overall SCORE,AR SCORE,EO SCORE
Massachusetts Institute of Technology,United States,Americas,M,Private not for Profit,CO,4,100,100,100
Imperial College London,United Kingdom,Europe,L,Public,FO,4,98.5,98.5,93.4
University of Oxford,United Kingdom,Europe,L,Public,FC,4,96.9,100,100
Harvard University,United States,Americas,L,Private not for Profit,FC,4,96.8,100,100
University of Toronto,Canada,Americas,XL,Public,FC,4,86.9,99.6,
Universidad Privada del Norte,Peru,Americas,L,Private for Profit,CO,2,,4.1,12.0
Kyoto University,Japan,Asia,L,Public,FC,4,74.1,88.0,76.3
Technical University of Munich,Germany,Europe,XL,Public,CO,4,83.5,n/a,82.0
";

fn dataset() -> Dataset {
    Dataset::from_raw_rows(&read_csv(CSV.as_bytes()).unwrap())
}

fn names(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r.name.as_deref()).collect()
}

#[test]
fn filtering_is_idempotent() {
    let ds = dataset();
    let criteria = FilterCriteria {
        region: Some("Americas".into()),
        advanced: true,
        min_ar_score: 50.0,
        ..Default::default()
    };
    let once = ds.run_filter(&criteria);
    let twice = apply(&once, &criteria);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 3);
}

#[test]
fn disabling_advanced_mode_restores_count() {
    let ds = dataset();
    let mut criteria = FilterCriteria::default();
    let before = ds.run_filter(&criteria).len();

    criteria.advanced = true;
    criteria.min_ar_score = 99.0;
    criteria.focus = Some(Focus::FullComprehensive);
    let advanced = ds.run_filter(&criteria);
    assert_eq!(
        names(&advanced),
        vec!["University of Oxford", "Harvard University", "University of Toronto"]
    );

    criteria.advanced = false;
    assert_eq!(ds.run_filter(&criteria).len(), before);
}

#[test]
fn public_only_excludes_private_for_profit() {
    let ds = dataset();
    let criteria = FilterCriteria {
        statuses: [Status::Public].into_iter().collect(),
        ..Default::default()
    };
    let out = ds.run_filter(&criteria);
    assert_eq!(out.len(), 5);
    assert!(out.iter().all(|r| r.status.as_deref() == Some("Public")));
    assert!(!names(&out).contains(&"Universidad Privada del Norte"));
}

#[test]
fn search_does_not_expand_acronyms() {
    let ds = dataset();
    let criteria = FilterCriteria {
        search: "MIT".into(),
        ..Default::default()
    };
    assert!(ds.run_filter(&criteria).is_empty());

    let criteria = FilterCriteria {
        search: "institute".into(),
        ..Default::default()
    };
    assert_eq!(
        names(&ds.run_filter(&criteria)),
        vec!["Massachusetts Institute of Technology"]
    );
}

#[test]
fn country_filter_matches_hand_selection() {
    let ds = dataset();
    let criteria = FilterCriteria {
        country: Some("United Kingdom".into()),
        ..Default::default()
    };
    let expected: Vec<Record> = ds
        .records
        .iter()
        .filter(|r| r.country.as_deref() == Some("United Kingdom"))
        .cloned()
        .collect();
    assert_eq!(ds.run_filter(&criteria), expected);
    assert_eq!(
        names(&expected),
        vec!["Imperial College London", "University of Oxford"]
    );
}

#[test]
fn reset_keeps_rows_with_missing_or_unknown_status() {
    let csv = "\
Institution Name,Status,Overall SCORE
Alpha University,Public,90
Beta College,,80
Gamma Institute,Foundation,70
";
    let ds = Dataset::from_raw_rows(&read_csv(csv.as_bytes()).unwrap());
    assert_eq!(ds.run_filter(&FilterCriteria::default()).len(), 3);

    let public = FilterCriteria {
        statuses: [Status::Public].into_iter().collect(),
        ..Default::default()
    };
    assert_eq!(names(&ds.run_filter(&public)), vec!["Alpha University"]);
}

#[test]
fn size_filter_uses_codes() {
    let ds = dataset();
    let criteria = FilterCriteria {
        size: Some(Size::ExtraLarge),
        ..Default::default()
    };
    assert_eq!(
        names(&ds.run_filter(&criteria)),
        vec!["University of Toronto", "Technical University of Munich"]
    );
}

#[test]
fn hundred_record_tier_scenario() {
    let mut records = Vec::new();
    let bands = [(40, 97.0), (35, 90.0), (20, 70.0)];
    for (n, score) in bands {
        for _ in 0..n {
            records.push(Record::default().with_score(ScoreField::Overall, score));
        }
    }
    records.extend((0..5).map(|_| Record::default()));

    let s = run_statistics(&records);
    assert_eq!(s.count, 100);
    assert_eq!(
        (s.tiers.excellent, s.tiers.good, s.tiers.average),
        (40, 35, 20)
    );
    assert_eq!(s.unscored, 5);
    assert_eq!(s.tiers.total() + s.unscored, s.count);
}

#[test]
fn summary_orders_max_mean_min() {
    let ds = dataset();
    let s = run_statistics(&ds.records);
    let (max, mean, min) = (s.max.unwrap(), s.mean.unwrap(), s.min.unwrap());
    assert!(max >= mean && mean >= min);
    assert_eq!(max, 100.0);
    assert_eq!(min, 74.1);
    assert_eq!(s.tiers.total(), 7);
}

#[test]
fn each_chart_kind_gets_its_own_shape() {
    let ds = dataset();
    let filtered = ds.run_filter(&FilterCriteria::default());

    let Aggregate::Scatter(groups) = run_aggregate(&filtered, ChartKind::Scatter) else {
        panic!("expected scatter");
    };
    // Peru (no Overall) and Munich (no AR) are dropped
    let points: usize = groups.iter().map(|g| g.items.len()).sum();
    assert_eq!(points, 6);

    let Aggregate::RegionalBar(means) = run_aggregate(&filtered, ChartKind::RegionalBar) else {
        panic!("expected bars");
    };
    let regions: Vec<_> = means.iter().map(|m| m.region.as_deref().unwrap()).collect();
    assert_eq!(regions, vec!["Americas", "Europe", "Asia"]);
    assert_eq!(means[2].mean, 74.1);

    let hist = run_aggregate(&filtered, ChartKind::ScoreHistogram);
    assert_eq!(hist.len(), 7);
}

#[test]
fn unknown_chart_kind_is_distinct_from_empty() {
    assert!("Bar Chart".parse::<ChartKind>().is_err());
    let empty = run_aggregate(&[], "score-histogram".parse().unwrap());
    assert!(empty.is_empty());
}

#[test]
fn export_hands_over_the_filtered_collection() {
    let ds = dataset();
    let criteria = FilterCriteria {
        region: Some("Asia".into()),
        ..Default::default()
    };
    let bytes = format_for_export(&ds.run_filter(&criteria), ExportFormat::Csv).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Kyoto University"));
}
