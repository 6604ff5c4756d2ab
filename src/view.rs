//! Derived view: search, class filter and sort over the cached records, plus
//! the dashboard aggregates.
//!
//! Everything here is a pure function of `(records, query)`. Persistence of
//! the query lives in [`crate::prefs`].

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::StudentRecord;

/// Filter value meaning "no class filter".
pub const ALL_CLASSES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Class,
    Marks,
    Age,
}

impl SortKey {
    /// Unknown keys fall back to name.
    pub fn parse(raw: &str) -> SortKey {
        match raw.trim().to_ascii_lowercase().as_str() {
            "class" => SortKey::Class,
            "marks" => SortKey::Marks,
            "age" => SortKey::Age,
            _ => SortKey::Name,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Class => "class",
            SortKey::Marks => "marks",
            SortKey::Age => "age",
        }
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SortKey::parse(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn toggled(self) -> SortDir {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Current search/filter/sort selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryState {
    pub search: String,
    pub filter_class: String,
    pub sort_by: SortKey,
    pub sort_dir: SortDir,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter_class: ALL_CLASSES.to_string(),
            sort_by: SortKey::Name,
            sort_dir: SortDir::Asc,
        }
    }
}

impl QueryState {
    pub fn set_search(&mut self, q: impl Into<String>) {
        self.search = q.into();
    }

    pub fn set_filter_class(&mut self, class: impl Into<String>) {
        self.filter_class = class.into();
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_by == key {
            self.sort_dir = self.sort_dir.toggled();
        } else {
            self.sort_by = key;
            self.sort_dir = SortDir::Asc;
        }
    }

    /// Reset search and class filter. Sort is kept.
    pub fn clear(&mut self) {
        self.search.clear();
        self.filter_class = ALL_CLASSES.to_string();
    }

    /// True when `record` passes both the class filter and the search text.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        let class_ok = self.filter_class == ALL_CLASSES || record.class == self.filter_class;
        if !class_ok {
            return false;
        }
        let q = self.search.trim().to_lowercase();
        q.is_empty()
            || record.name.to_lowercase().contains(&q)
            || record.class.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub class: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStats {
    /// Size of the full record set.
    pub total: usize,
    pub class_count: usize,
    pub average_marks: f64,
    pub average_marks_rounded: i64,
    pub top_class: Option<String>,
    /// Students per class, ordered numerically by class label.
    pub histogram: Vec<ClassCount>,
    /// Rows left after search and filter.
    pub visible: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedView<'a> {
    pub rows: Vec<&'a StudentRecord>,
    pub stats: ViewStats,
}

pub fn derive<'a>(records: &'a [StudentRecord], query: &QueryState) -> DerivedView<'a> {
    let rows = filter_sorted(records, query);
    let mut stats = summarize(records);
    stats.visible = rows.len();
    DerivedView { rows, stats }
}

pub fn filter_sorted<'a>(records: &'a [StudentRecord], query: &QueryState) -> Vec<&'a StudentRecord> {
    let mut rows: Vec<&StudentRecord> = records.iter().filter(|r| query.matches(r)).collect();
    sort_rows(&mut rows, query.sort_by, query.sort_dir);
    rows
}

enum SortValue {
    Text(String),
    Number(f64),
}

fn sort_value(record: &StudentRecord, key: SortKey) -> SortValue {
    match key {
        SortKey::Name => SortValue::Text(record.name.to_lowercase()),
        SortKey::Class => SortValue::Number(class_rank(&record.class) as f64),
        SortKey::Marks => SortValue::Number(record.marks.value()),
        SortKey::Age => SortValue::Number(record.age.value()),
    }
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
        (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Stable sort. Descending reverses the comparison, so ties keep encounter
/// order in both directions.
pub fn sort_rows(rows: &mut Vec<&StudentRecord>, key: SortKey, dir: SortDir) {
    let mut keyed: Vec<(SortValue, &StudentRecord)> =
        rows.iter().map(|r| (sort_value(r, key), *r)).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_values(a, b);
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    *rows = keyed.into_iter().map(|(_, r)| r).collect();
}

/// Leading-integer value of a class label; labels without digits rank as 0.
pub fn class_rank(label: &str) -> i64 {
    let s = label.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    match (seen, negative) {
        (false, _) => 0,
        (true, true) => -value,
        (true, false) => value,
    }
}

/// Half-up rounding, matching how the dashboard shows averages.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Aggregates over the full record set. `visible` is left at `total`.
pub fn summarize(records: &[StudentRecord]) -> ViewStats {
    let histogram = class_histogram(records);
    let sum: f64 = records.iter().map(|r| r.marks.value()).sum();
    let average_marks = sum / records.len().max(1) as f64;

    ViewStats {
        total: records.len(),
        class_count: histogram.len(),
        average_marks,
        average_marks_rounded: round_half_up(average_marks),
        top_class: histogram.first().map(|c| c.class.clone()),
        histogram,
        visible: records.len(),
    }
}

pub fn class_histogram(records: &[StudentRecord]) -> Vec<ClassCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<ClassCount> = Vec::new();
    for r in records {
        match index.get(r.class.as_str()) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(r.class.as_str(), out.len());
                out.push(ClassCount {
                    class: r.class.clone(),
                    count: 1,
                });
            }
        }
    }
    out.sort_by_key(|c| class_rank(&c.class));
    out
}

/// Choices for the class filter: "All" followed by each class in encounter order.
pub fn class_options(records: &[StudentRecord]) -> Vec<String> {
    let mut out = vec![ALL_CLASSES.to_string()];
    for r in records {
        if !out[1..].iter().any(|c| c == &r.class) {
            out.push(r.class.clone());
        }
    }
    out
}
