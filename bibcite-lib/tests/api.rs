use assert_fs::prelude::*;
use bibcite_lib::error::SplitError;
use bibcite_lib::{entry_to_bib, safe_filename, Bibliography, Entry, SplitConfig};
use std::str::FromStr;

#[test]
fn parse_sanitize_and_serialize_each_entry() {
    let bib = Bibliography::from_str(
        "@Book{Knuth 1984,\n  title = {The {\\TeX}book},\n  edition = {},\n}\n@misc{doe-2021:x, note = {x}}",
    )
    .expect("bibliography parses");

    let names: Vec<_> = bib.iter().map(|e| safe_filename(e.key())).collect();
    assert_eq!(names, ["Knuth_1984", "doe-2021_x"]);

    assert_eq!(
        entry_to_bib(&bib.entries()[0]),
        "@book{Knuth 1984,\n  title = {The {\\TeX}book}\n}\n"
    );
}

#[test]
fn serialized_entry_round_trips_type_and_key() {
    let entry = Entry::new("TechReport", "tr-7").with_tag("institution", "Somewhere");

    let reparsed: Bibliography = entry_to_bib(&entry).parse().expect("output parses");

    assert_eq!(reparsed.len(), 1);
    assert_eq!(reparsed.entries()[0].entry_type, "techreport");
    assert_eq!(reparsed.entries()[0].key(), Some("tr-7"));
}

#[test]
fn run_splits_bibliography_under_root() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = "@article{smith2020, title = {A}}\n@article{doe-2021:x, title = {B}}\n";
    temp.child("src/data/publications.bib")
        .write_str(source)
        .unwrap();

    let report = bibcite_lib::run(&SplitConfig::with_root(temp.path())).expect("split succeeds");

    assert_eq!(report.count(), 2);
    assert_eq!(
        report.to_string(),
        format!(
            "Generated 2 per-entry BibTeX files in {}",
            temp.path().join("public/cite").display()
        )
    );
    temp.child("public/cite/smith2020.bib")
        .assert("@article{smith2020,\n  title = {A}\n}\n");
    temp.child("public/cite/doe-2021_x.bib")
        .assert("@article{doe-2021:x,\n  title = {B}\n}\n");
    temp.child("public/publications.bib")
        .assert("@article{smith2020, title = {A}}\n@article{doe-2021:x, title = {B}}\n");
}

#[test]
fn run_reports_missing_input() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = SplitConfig::with_root(temp.path());

    let err = bibcite_lib::run(&config).unwrap_err();

    assert!(matches!(err, SplitError::MissingInput(_)));
    assert_eq!(
        err.to_string(),
        format!("Missing input file: {}", config.input.display())
    );
}
