//! Plain-text rendering of the dashboard and the student table.

use std::fmt::Write as _;

use crate::model::StudentRecord;
use crate::view::{DerivedView, QueryState, SortDir, ViewStats};

const BAR_WIDTH: usize = 30;

pub fn dashboard(stats: &ViewStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Students: {}", stats.total);
    let _ = writeln!(out, "Classes:        {}", stats.class_count);
    let _ = writeln!(
        out,
        "Top Class:      {}",
        stats.top_class.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "Average Marks:  {}", stats.average_marks_rounded);

    if stats.histogram.is_empty() {
        return out;
    }
    out.push('\n');
    let _ = writeln!(out, "Students per class");
    let widest = stats.histogram.iter().map(|c| c.count).max().unwrap_or(1);
    let label_width = stats
        .histogram
        .iter()
        .map(|c| c.class.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &stats.histogram {
        let bar = (entry.count * BAR_WIDTH).div_ceil(widest.max(1));
        let _ = writeln!(
            out,
            "  {:<label_width$}  {} {}",
            entry.class,
            "#".repeat(bar),
            entry.count
        );
    }
    out
}

/// Table of visible rows with a footer describing the active query.
pub fn table(view: &DerivedView<'_>, query: &QueryState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<20} {:>4}  {:<6} {:>6}  {:<6}",
        "ID", "NAME", "AGE", "CLASS", "MARKS", "GENDER"
    );
    for row in &view.rows {
        let _ = writeln!(out, "{}", table_row(row));
    }
    if view.rows.is_empty() {
        let _ = writeln!(out, "(no students match)");
    }
    out.push('\n');
    let _ = write!(
        out,
        "{} of {} shown | class: {} | sort: {} {}",
        view.stats.visible,
        view.stats.total,
        query.filter_class,
        query.sort_by.as_str(),
        match query.sort_dir {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    );
    if !query.search.trim().is_empty() {
        let _ = write!(out, " | search: {:?}", query.search);
    }
    out.push('\n');
    out
}

fn table_row(r: &StudentRecord) -> String {
    format!(
        "{:<36}  {:<20} {:>4}  {:<6} {:>6}  {:<6}",
        r.st_id,
        truncate(&r.name, 20),
        r.age.to_string(),
        r.class,
        r.marks.to_string(),
        r.gender.as_str()
    )
}

pub fn record(r: &StudentRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:      {}", r.st_id);
    let _ = writeln!(out, "Name:    {}", r.name);
    let _ = writeln!(out, "Age:     {}", r.age);
    let _ = writeln!(out, "Class:   {}", r.class);
    let _ = writeln!(out, "Marks:   {}", r.marks);
    let _ = writeln!(out, "Gender:  {}", r.gender);
    if let Some(ts) = &r.created_at {
        let _ = writeln!(out, "Created: {ts}");
    }
    if let Some(ts) = &r.updated_at {
        let _ = writeln!(out, "Updated: {ts}");
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, Numeric};
    use crate::view;

    fn rec(name: &str, class: &str, marks: i64) -> StudentRecord {
        StudentRecord {
            st_id: format!("id-{name}"),
            name: name.to_string(),
            age: Numeric::Int(10),
            class: class.to_string(),
            marks: Numeric::Int(marks),
            gender: Gender::Female,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn dashboard_shows_cards_and_histogram() {
        let records = vec![rec("Bob", "5", 70), rec("Amy", "5", 90), rec("Cid", "6", 0)];
        let text = dashboard(&view::summarize(&records));
        assert!(text.contains("Total Students: 3"));
        assert!(text.contains("Classes:        2"));
        assert!(text.contains("Top Class:      5"));
        assert!(text.contains("Average Marks:  53"));
        assert!(text.contains(&format!("  5  {} 2", "#".repeat(BAR_WIDTH))));
    }

    #[test]
    fn empty_dashboard_has_no_histogram() {
        let text = dashboard(&view::summarize(&[]));
        assert!(text.contains("Top Class:      -"));
        assert!(text.contains("Average Marks:  0"));
        assert!(!text.contains("Students per class"));
    }

    #[test]
    fn table_lists_visible_rows_in_order() {
        let records = vec![rec("Bob", "5", 70), rec("Amy", "5", 90), rec("Cid", "6", 0)];
        let mut query = QueryState::default();
        query.set_filter_class("5");
        let derived = view::derive(&records, &query);
        let text = table(&derived, &query);
        let amy = text.find("Amy").unwrap();
        let bob = text.find("Bob").unwrap();
        assert!(amy < bob);
        assert!(!text.contains("Cid"));
        assert!(text.contains("2 of 3 shown | class: 5 | sort: name asc"));
    }

    #[test]
    fn table_reports_empty_result() {
        let records = vec![rec("Bob", "5", 70)];
        let mut query = QueryState::default();
        query.set_search("zed");
        let text = table(&view::derive(&records, &query), &query);
        assert!(text.contains("(no students match)"));
        assert!(text.contains("search: \"zed\""));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Short", 20), "Short");
        let long = truncate("Maximiliano Alessandro Rodriguez", 20);
        assert_eq!(long.chars().count(), 20);
        assert!(long.ends_with('…'));
    }
}
