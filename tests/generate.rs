//! End-to-end tests for the generate command.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use variant_populate::{GenerateArgs, LocaleArg, TemplateArgs};
use xml_template::{Document, Selector};

const INVOICE: &str = "tests/fixtures/invoice.xml";
const UNTIL: &str = "2024-06-30";

fn generate_args(input: &str, out: &Path) -> GenerateArgs {
    GenerateArgs {
        template: TemplateArgs {
            input: PathBuf::from(input),
            map: None,
            config: None,
        },
        out: out.to_path_buf(),
        n: Some(3),
        csv: None,
        date_formats: None,
        time_formats: None,
        vary_formats: false,
        no_vary_formats: false,
        seed: Some(1),
        locale: None,
        attempt_multiplier: None,
        until: Some(UNTIL.to_string()),
    }
}

fn manifest_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.records().map(Result::unwrap).collect()
}

fn element_text(doc: &Document, selector: &str) -> String {
    let handles = Selector::parse(selector).resolve(doc);
    assert_eq!(handles.len(), 1, "selector {selector}");
    doc.element(&handles[0]).unwrap().text()
}

#[test]
fn test_basic_generation() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("variants");
    let report = xml_variants::generate(&generate_args(INVOICE, &out)).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.accepted, 3);
    assert!(report.attempts >= 3 && report.attempts <= 60);
    assert_eq!(report.manifest_path, out.join("manifest.csv"));

    let rows = manifest_rows(&report.manifest_path);
    assert_eq!(rows.len(), 3);

    for (idx, row) in rows.iter().enumerate() {
        let id = idx + 1;
        let filename = format!("invoice_variant_{id:03}.xml");
        assert_eq!(&row[0], id.to_string());
        assert_eq!(&row[1], filename);

        let content = std::fs::read_to_string(out.join(&filename)).unwrap();
        assert_eq!(&row[6], content);
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

        let doc = Document::parse(&content).unwrap();
        assert_eq!(element_text(&doc, "name"), &row[2]);
        assert_eq!(element_text(&doc, "address"), &row[3]);
        assert_eq!(element_text(&doc, "date"), &row[4]);
        assert_eq!(element_text(&doc, "time"), &row[5]);

        // Unmapped content survives untouched.
        assert_eq!(element_text(&doc, "./Lines/Line[1]/Description"), "Widget & bracket");
        assert_eq!(doc.root().attribute("number"), Some("INV-0001"));
    }
}

#[test]
fn test_same_seed_same_output() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");

    let mut args = generate_args(INVOICE, &first);
    args.n = Some(8);
    args.vary_formats = true;
    args.seed = Some(42);
    xml_variants::generate(&args).unwrap();
    args.out = second.clone();
    xml_variants::generate(&args).unwrap();

    let manifest_a = std::fs::read_to_string(first.join("manifest.csv")).unwrap();
    let manifest_b = std::fs::read_to_string(second.join("manifest.csv")).unwrap();
    assert_eq!(manifest_a, manifest_b);

    for id in 1..=8 {
        let filename = format!("invoice_variant_{id:03}.xml");
        assert_eq!(
            std::fs::read(first.join(&filename)).unwrap(),
            std::fs::read(second.join(&filename)).unwrap()
        );
    }
}

#[test]
fn test_accepted_tuples_are_unique() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = generate_args(INVOICE, temp_dir.path());
    args.n = Some(60);
    args.vary_formats = true;
    args.seed = Some(3);
    args.locale = Some(LocaleArg::Au);

    let report = xml_variants::generate(&args).unwrap();
    assert_eq!(report.accepted, 60);

    let rows = manifest_rows(&report.manifest_path);
    let tuples: HashSet<Vec<String>> = rows
        .iter()
        .map(|row| (2..=5).map(|i| row[i].to_string()).collect())
        .collect();
    assert_eq!(tuples.len(), rows.len());

    let ids: Vec<u64> = rows.iter().map(|row| row[0].parse().unwrap()).collect();
    assert_eq!(ids, (1..=60).collect::<Vec<u64>>());
}

#[test]
fn test_exhaustion_is_partial_success() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("static.yaml");
    std::fs::write(
        &config,
        "mapping:\n  status: Qty\ncustom:\n  status:\n    type: static\n    value: shipped\n",
    )
    .unwrap();

    let out = temp_dir.path().join("out");
    let mut args = generate_args(INVOICE, &out);
    args.template.config = Some(config);
    args.n = Some(100);

    let report = xml_variants::generate(&args).unwrap();

    assert!(report.exhausted);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.attempts, 2000);
    assert_eq!(report.duplicates, 1999);
    assert_eq!(manifest_rows(&report.manifest_path).len(), 1);
    assert!(!out.join("invoice_variant_002.xml").exists());

    let doc = Document::parse(&std::fs::read_to_string(&report.files[0]).unwrap()).unwrap();
    for handle in Selector::parse("Qty").resolve(&doc) {
        assert_eq!(doc.element(&handle).unwrap().text(), "shipped");
    }
}

#[test]
fn test_structural_selector_falls_back_to_local_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = generate_args(INVOICE, temp_dir.path());
    args.template.map = Some("address=.//Address,name=./Customer/Name".to_string());

    let report = xml_variants::generate(&args).unwrap();
    assert!(report.selector_misses.is_empty());

    let rows = manifest_rows(&report.manifest_path);
    let content = std::fs::read_to_string(&report.files[0]).unwrap();
    let doc = Document::parse(&content).unwrap();
    assert_eq!(element_text(&doc, ".//c:Address"), &rows[0][3]);
    assert_eq!(element_text(&doc, "name"), &rows[0][2]);

    // Unmapped canonical fields are neither generated nor written.
    assert_eq!(&rows[0][4], "");
    assert_eq!(element_text(&doc, "date"), "2000-01-01");
}

#[test]
fn test_fixed_formats_hold_for_every_variant() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = generate_args(INVOICE, temp_dir.path());
    args.n = Some(25);
    args.date_formats = Some("%d/%m/%Y".to_string());
    args.time_formats = Some("%H:%M:%S".to_string());

    let report = xml_variants::generate(&args).unwrap();

    for row in manifest_rows(&report.manifest_path) {
        let date = &row[4];
        let time = &row[5];
        assert_eq!(date.len(), 10, "{date}");
        assert_eq!((&date[2..3], &date[5..6]), ("/", "/"));
        assert!(date[6..].parse::<u32>().is_ok_and(|y| (2015..=2024).contains(&y)));
        assert_eq!(time.len(), 8, "{time}");
        assert_eq!((&time[2..3], &time[5..6]), (":", ":"));
    }
}

#[test]
fn test_config_file_drives_run() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = generate_args(INVOICE, temp_dir.path());
    args.template.config = Some(PathBuf::from("tests/fixtures/variants.yaml"));
    args.n = None;
    args.seed = None;
    args.until = None;
    args.csv = Some(temp_dir.path().join("reports").join("run.csv"));

    let report = xml_variants::generate(&args).unwrap();

    assert_eq!(report.accepted, 4);
    assert_eq!(report.manifest_path, temp_dir.path().join("reports").join("run.csv"));

    let content = std::fs::read_to_string(&report.files[0]).unwrap();
    let doc = Document::parse(&content).unwrap();
    let qty: Vec<String> = Selector::parse("Qty")
        .resolve(&doc)
        .iter()
        .map(|h| doc.element(h).unwrap().text())
        .collect();
    assert_eq!(qty[1], "1");
    assert!(qty[0].parse::<u32>().is_ok_and(|q| (1..=99).contains(&q)));
    assert_eq!(element_text(&doc, "date"), "2000-01-01");
}

#[test]
fn test_template_file_is_unchanged() {
    let before = std::fs::read(INVOICE).unwrap();
    let temp_dir = TempDir::new().unwrap();
    let mut args = generate_args(INVOICE, temp_dir.path());
    args.n = Some(5);
    xml_variants::generate(&args).unwrap();

    assert_eq!(std::fs::read(INVOICE).unwrap(), before);
}

#[test]
fn test_malformed_template_creates_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("never");
    let err = xml_variants::generate(&generate_args("tests/fixtures/malformed.xml", &out))
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to load template"));
    assert!(!out.exists());
}

#[test]
fn test_invalid_mapping_creates_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("never");
    let mut args = generate_args(INVOICE, &out);
    args.template.map = Some("name".to_string());

    assert!(xml_variants::generate(&args).is_err());
    assert!(!out.exists());
}
