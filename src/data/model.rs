use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const COL_NAME: &str = "Institution Name";
pub const COL_COUNTRY: &str = "Country/Territory";
pub const COL_REGION: &str = "Region";
pub const COL_SIZE: &str = "Size";
pub const COL_STATUS: &str = "Status";
pub const COL_FOCUS: &str = "Focus";
pub const COL_RESEARCH: &str = "Research";

/// Every column the normalizer reads, in export order.
pub fn known_columns() -> impl Iterator<Item = &'static str> {
    [COL_NAME, COL_COUNTRY, COL_REGION, COL_SIZE, COL_STATUS, COL_FOCUS, COL_RESEARCH]
        .into_iter()
        .chain(ScoreField::ALL.into_iter().map(ScoreField::column))
}

/// One raw row as handed over by the loader: column name → cell text.
/// Null cells and absent columns are simply missing from the map.
pub type RawRow = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// ScoreField – the fixed set of numeric score components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreField {
    Overall,
    Ar,
    Er,
    Fsr,
    Cpf,
    Ifr,
    Isr,
    Isd,
    Irn,
    Eo,
    Sus,
}

impl ScoreField {
    pub const ALL: [ScoreField; 11] = [
        ScoreField::Overall,
        ScoreField::Ar,
        ScoreField::Er,
        ScoreField::Fsr,
        ScoreField::Cpf,
        ScoreField::Ifr,
        ScoreField::Isr,
        ScoreField::Isd,
        ScoreField::Irn,
        ScoreField::Eo,
        ScoreField::Sus,
    ];

    /// Column header used by the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            ScoreField::Overall => "Overall SCORE",
            ScoreField::Ar => "AR SCORE",
            ScoreField::Er => "ER SCORE",
            ScoreField::Fsr => "FSR SCORE",
            ScoreField::Cpf => "CPF SCORE",
            ScoreField::Ifr => "IFR SCORE",
            ScoreField::Isr => "ISR SCORE",
            ScoreField::Isd => "ISD SCORE",
            ScoreField::Irn => "IRN SCORE",
            ScoreField::Eo => "EO SCORE",
            ScoreField::Sus => "SUS SCORE",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Categorical codes – typed at the UI/core boundary
// ---------------------------------------------------------------------------

/// Institution size band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Size {
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Size {
    pub const ALL: [Size; 5] = [
        Size::ExtraSmall,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::ExtraLarge,
    ];

    /// Raw code as stored in the dataset.
    pub fn code(self) -> &'static str {
        match self {
            Size::ExtraSmall => "XS",
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
            Size::ExtraLarge => "XL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Size::ExtraSmall => "Extra Small",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::ExtraLarge => "Extra Large",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// Ownership / funding status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    PrivateNotForProfit,
    PrivateForProfit,
    Public,
}

impl Status {
    pub const ALL: [Status; 3] = [
        Status::PrivateNotForProfit,
        Status::PrivateForProfit,
        Status::Public,
    ];

    /// Both private statuses; the "include private" switch toggles these together.
    pub const PRIVATE: [Status; 2] = [Status::PrivateNotForProfit, Status::PrivateForProfit];

    pub fn code(self) -> &'static str {
        match self {
            Status::PrivateNotForProfit => "Private not for Profit",
            Status::PrivateForProfit => "Private for Profit",
            Status::Public => "Public",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// Academic focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Focus {
    FullComprehensive,
    Focused,
    Comprehensive,
    Specialist,
}

impl Focus {
    pub const ALL: [Focus; 4] = [
        Focus::FullComprehensive,
        Focus::Focused,
        Focus::Comprehensive,
        Focus::Specialist,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Focus::FullComprehensive => "FC",
            Focus::Focused => "FO",
            Focus::Comprehensive => "CO",
            Focus::Specialist => "SP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::FullComprehensive => "Full Comprehensive",
            Focus::Focused => "Focused",
            Focus::Comprehensive => "Comprehensive",
            Focus::Specialist => "Specialized",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized row
// ---------------------------------------------------------------------------

/// One institution's ranking entry.
///
/// Categorical fields keep the raw code string: a code outside the known
/// enumeration is preserved rather than dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub size: Option<String>,
    pub status: Option<String>,
    pub focus: Option<String>,
    pub research: Option<f64>,
    /// Indexed by [`ScoreField`]; prefer [`Record::score`].
    pub scores: [Option<f64>; 11],
}

impl Record {
    /// Normalize one raw row. Never fails: a cell that does not coerce to a
    /// finite number becomes `None`.
    pub fn normalize(raw: &RawRow) -> Self {
        let mut scores = [None; 11];
        for field in ScoreField::ALL {
            scores[field.index()] = raw.get(field.column()).and_then(|s| coerce_numeric(s));
        }

        Record {
            name: text_cell(raw, COL_NAME),
            country: text_cell(raw, COL_COUNTRY),
            region: text_cell(raw, COL_REGION),
            size: text_cell(raw, COL_SIZE),
            status: text_cell(raw, COL_STATUS),
            focus: text_cell(raw, COL_FOCUS),
            research: raw.get(COL_RESEARCH).and_then(|s| coerce_numeric(s)),
            scores,
        }
    }

    pub fn score(&self, field: ScoreField) -> Option<f64> {
        self.scores[field.index()]
    }

    pub fn set_score(&mut self, field: ScoreField, value: Option<f64>) {
        self.scores[field.index()] = value;
    }

    pub fn overall(&self) -> Option<f64> {
        self.score(ScoreField::Overall)
    }

    /// Builder-style setter, mostly for tests and the sample generator.
    pub fn with_score(mut self, field: ScoreField, value: f64) -> Self {
        self.set_score(field, Some(value));
        self
    }
}

fn text_cell(raw: &RawRow, column: &str) -> Option<String> {
    raw.get(column)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numeric coercion: trimmed `f64` parse, non-finite values count as null.
pub fn coerce_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed option lists for the
/// filter dropdowns.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Distinct regions in first-seen order.
    pub regions: Vec<String>,
    /// Distinct countries, sorted.
    pub countries: Vec<String>,
    /// Size codes present in the data, in enumeration order.
    pub sizes: Vec<Size>,
    /// Focus codes present in the data, in enumeration order.
    pub focuses: Vec<Focus>,
}

impl Dataset {
    pub fn from_raw_rows(rows: &[RawRow]) -> Self {
        Self::from_records(rows.iter().map(Record::normalize).collect())
    }

    /// Build option lists from the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut countries: BTreeSet<String> = BTreeSet::new();
        let mut sizes: BTreeSet<Size> = BTreeSet::new();
        let mut focuses: BTreeSet<Focus> = BTreeSet::new();

        for rec in &records {
            if let Some(region) = &rec.region {
                if !regions.contains(region) {
                    regions.push(region.clone());
                }
            }
            if let Some(country) = &rec.country {
                countries.insert(country.clone());
            }
            if let Some(size) = rec.size.as_deref().and_then(Size::from_code) {
                sizes.insert(size);
            }
            if let Some(focus) = rec.focus.as_deref().and_then(Focus::from_code) {
                focuses.insert(focus);
            }
        }

        Dataset {
            records,
            regions,
            countries: countries.into_iter().collect(),
            sizes: sizes.into_iter().collect(),
            focuses: focuses.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn normalize_coerces_scores_and_nulls_garbage() {
        let rec = Record::normalize(&row(&[
            (COL_NAME, "  Imperial College London "),
            ("Overall SCORE", "98.5"),
            ("AR SCORE", "n/a"),
            ("ER SCORE", ""),
            ("FSR SCORE", " 100 "),
            ("SUS SCORE", "NaN"),
        ]));

        assert_eq!(rec.name.as_deref(), Some("Imperial College London"));
        assert_eq!(rec.overall(), Some(98.5));
        assert_eq!(rec.score(ScoreField::Ar), None);
        assert_eq!(rec.score(ScoreField::Er), None);
        assert_eq!(rec.score(ScoreField::Fsr), Some(100.0));
        assert_eq!(rec.score(ScoreField::Sus), None);
        // absent column
        assert_eq!(rec.score(ScoreField::Eo), None);
        assert_eq!(rec.research, None);
    }

    #[test]
    fn normalize_preserves_unknown_codes() {
        let rec = Record::normalize(&row(&[(COL_SIZE, "XXL"), (COL_FOCUS, " FC ")]));
        assert_eq!(rec.size.as_deref(), Some("XXL"));
        assert_eq!(rec.focus.as_deref(), Some("FC"));
    }

    #[test]
    fn dataset_option_lists() {
        let ds = Dataset::from_raw_rows(&[
            row(&[(COL_REGION, "Europe"), (COL_COUNTRY, "United Kingdom"), (COL_SIZE, "L")]),
            row(&[(COL_REGION, "Americas"), (COL_COUNTRY, "Canada"), (COL_SIZE, "XL")]),
            row(&[(COL_REGION, "Europe"), (COL_COUNTRY, "France"), (COL_SIZE, "bogus")]),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.regions, vec!["Europe", "Americas"]);
        assert_eq!(ds.countries, vec!["Canada", "France", "United Kingdom"]);
        assert_eq!(ds.sizes, vec![Size::Large, Size::ExtraLarge]);
        assert!(ds.focuses.is_empty());
    }

    #[test]
    fn codes_round_trip_through_lookup() {
        for size in Size::ALL {
            assert_eq!(Size::from_code(size.code()), Some(size));
        }
        assert_eq!(Status::from_code("Public"), Some(Status::Public));
        assert_eq!(Status::from_code("public"), None);
        assert_eq!(Focus::from_code("SP"), Some(Focus::Specialist));
    }
}
