//! Grouped means and value counts over a loaded table.
//!
//! Every view is a pure function of the table:
//! - rows whose group key is missing are skipped
//! - means only use rows with a defined `Avg Salary`
//! - ordering is descending by value; ties keep first-seen group order

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use ordered_float::OrderedFloat;

use crate::domain::{AnalysisViews, CountView, MeanView, RecordTable, ScoreKey, SummaryView, SurveyRecord};

/// Compute all five aggregate views.
pub fn analyze(table: &RecordTable) -> AnalysisViews {
    let records = &table.records;
    AnalysisViews {
        by_job: grouped_mean(records, |r| r.job_title.clone()),
        by_score: grouped_mean(records, score_key),
        by_location: grouped_mean(records, |r| r.location.clone()),
        job_counts: value_counts(records, |r| r.job_title.clone()),
        location_counts: value_counts(records, |r| r.location.clone()),
    }
}

fn score_key(r: &SurveyRecord) -> Option<ScoreKey> {
    // `+ 0.0` folds -0.0 into 0.0 so both land in one group.
    r.company_score.map(|s| OrderedFloat(s + 0.0))
}

/// Mean `Avg Salary` per key, sorted descending (undefined means last).
pub fn grouped_mean<K, F>(records: &[SurveyRecord], key_of: F) -> MeanView<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&SurveyRecord) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<f64>)> = Vec::new();

    for r in records {
        let Some(key) = key_of(r) else { continue };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        if let Some(v) = r.avg_salary {
            groups[slot].1.push(v);
        }
    }

    let mut entries: Vec<(K, Option<f64>)> = groups
        .into_iter()
        .map(|(key, values)| (key, mean(values)))
        .collect();
    entries.sort_by(|a, b| cmp_mean_desc(a.1, b.1));

    SummaryView { entries }
}

/// Row count per key, sorted descending.
pub fn value_counts<F>(records: &[SurveyRecord], key_of: F) -> CountView
where
    F: Fn(&SurveyRecord) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();

    for r in records {
        let Some(key) = key_of(r) else { continue };
        match index.get(&key) {
            Some(&slot) => entries[slot].1 += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, 1));
            }
        }
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));
    SummaryView { entries }
}

/// Order-independent mean: values are summed in sorted order so permuting
/// the input rows cannot change the result.
fn mean(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

fn cmp_mean_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::{LoadOptions, load_table};

    fn table(rows: &[(&str, f64, &str, &str)]) -> RecordTable {
        let mut csv = String::from("Job Title;Company Score;Location;Salary\n");
        for (job, score, loc, salary) in rows {
            csv.push_str(&format!("{job};{score};{loc};{salary}\n"));
        }
        load_table(csv.as_bytes(), "test.csv", LoadOptions::default()).unwrap()
    }

    fn keys<K: Clone, V>(view: &SummaryView<K, V>) -> Vec<K> {
        view.keys().cloned().collect()
    }

    #[test]
    fn end_to_end_scenario() {
        let t = table(&[
            ("A", 4.5, "X", "$100,000 - $120,000"),
            ("B", 4.5, "Y", "$80,000 - $90,000"),
            ("A", 4.5, "X", "$100,000 - $100,000"),
        ]);
        let views = analyze(&t);

        assert_eq!(views.by_job.get("A"), Some(&Some(105_000.0)));
        assert_eq!(views.by_job.get("B"), Some(&Some(85_000.0)));
        assert_eq!(views.job_counts.get("A"), Some(&2));
        assert_eq!(views.job_counts.get("B"), Some(&1));
        assert_eq!(keys(&views.by_job), vec!["A", "B"]);

        let expected_score = (110_000.0 + 85_000.0 + 100_000.0) / 3.0;
        assert_eq!(views.by_score.len(), 1);
        let got = views.by_score.get(&OrderedFloat(4.5)).unwrap().unwrap();
        assert!((got - expected_score).abs() < 1e-9);
    }

    #[test]
    fn missing_salary_is_excluded_from_means_but_counted() {
        let t = table(&[
            ("A", 4.0, "X", "$90,000 - N/A"),
            ("A", 4.0, "X", "$50,000 - $70,000"),
        ]);
        let views = analyze(&t);
        assert_eq!(views.by_job.get("A"), Some(&Some(60_000.0)));
        assert_eq!(views.job_counts.get("A"), Some(&2));
        assert_eq!(views.location_counts.get("X"), Some(&2));
    }

    #[test]
    fn group_without_any_salary_sorts_last() {
        let t = table(&[
            ("Ghost", 3.0, "Z", "N/A - N/A"),
            ("Real", 3.0, "Z", "$1 - $1"),
        ]);
        let views = analyze(&t);
        assert_eq!(keys(&views.by_job), vec!["Real", "Ghost"]);
        assert_eq!(views.by_job.get("Ghost"), Some(&None));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let t = table(&[
            ("Second", 3.0, "P", "$10 - $10"),
            ("First", 3.0, "Q", "$10 - $10"),
            ("Top", 3.0, "Q", "$20 - $20"),
        ]);
        let views = analyze(&t);
        assert_eq!(keys(&views.by_job), vec!["Top", "Second", "First"]);
        assert_eq!(keys(&views.job_counts), vec!["Second", "First", "Top"]);
        assert_eq!(keys(&views.location_counts), vec!["Q", "P"]);
    }

    #[test]
    fn permuting_rows_keeps_view_contents() {
        let rows = [
            ("A", 4.1, "X", "$10,000 - $20,000"),
            ("B", 3.2, "Y", "$30,000 - $35,000"),
            ("A", 3.2, "Y", "$12,500 - $13,100"),
            ("C", 4.1, "X", "$7,000 - N/A"),
            ("B", 2.9, "Z", "$31,000 - $32,000"),
        ];
        let mut reversed = rows;
        reversed.reverse();

        let a = analyze(&table(&rows));
        let b = analyze(&table(&reversed));

        let sorted = |v: &MeanView<String>| {
            let mut e = v.entries.clone();
            e.sort_by(|x, y| x.0.cmp(&y.0));
            e
        };
        assert_eq!(sorted(&a.by_job), sorted(&b.by_job));
        assert_eq!(sorted(&a.by_location), sorted(&b.by_location));

        let mut sa = a.by_score.entries.clone();
        let mut sb = b.by_score.entries.clone();
        sa.sort_by(|x, y| x.0.cmp(&y.0));
        sb.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(sa, sb);

        let mut ca = a.job_counts.entries.clone();
        let mut cb = b.job_counts.entries.clone();
        ca.sort();
        cb.sort();
        assert_eq!(ca, cb);
    }

    #[test]
    fn analyze_is_idempotent() {
        let t = table(&[("A", 4.0, "X", "$1 - $3"), ("B", 5.0, "Y", "$2 - $2")]);
        assert_eq!(analyze(&t), analyze(&t));
    }

    #[test]
    fn empty_table_gives_empty_views() {
        let t = table(&[]);
        let views = analyze(&t);
        assert_eq!(views, AnalysisViews::default());
    }

    #[test]
    fn rows_without_a_key_are_not_grouped() {
        let csv = "Job Title;Company Score;Location;Salary\n;;X;$1 - $1\nA;;X;$3 - $3\n";
        let t = load_table(csv.as_bytes(), "t.csv", LoadOptions::default()).unwrap();
        let views = analyze(&t);
        assert_eq!(keys(&views.job_counts), vec!["A"]);
        assert!(views.by_score.is_empty());
        assert_eq!(views.location_counts.get("X"), Some(&2));
        assert_eq!(views.by_location.get("X"), Some(&Some(2.0)));
    }
}
