use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use material_table::convert::{collect_records, convert_directory, ConversionRequest, ConvertOptions};
use material_table::schema::column_schema;
use material_table::types::Cell;
use material_table::ConversionError;

const FIXTURES: &str = "tests/fixtures/materials";

fn tmp_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("material-table-convert-{tag}-{nanos}"))
}

fn tmp_dir(tag: &str) -> PathBuf {
    let dir = tmp_path(tag);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn collects_list_items_then_single_items_in_order() {
    let (records, report) = collect_records(FIXTURES, &ConvertOptions::default()).unwrap();

    let names: Vec<_> = records.iter().map(|r| r.get("name").cloned().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            Cell::from("ingot_iron"),
            Cell::from("ingot_gold"),
            Cell::from("wood, \"oak\""),
        ]
    );

    assert_eq!(report.documents_seen, 4);
    assert_eq!(report.documents_skipped, 2);
    assert_eq!(report.items_seen, 3);
    assert_eq!(report.items_skipped, 0);
    assert_eq!(report.records, 3);
    assert_eq!(report.truncations, 2);
}

#[test]
fn every_record_has_the_full_schema() {
    let (records, _) = collect_records(FIXTURES, &ConvertOptions::default()).unwrap();
    let schema = column_schema();
    for record in &records {
        assert_eq!(record.schema(), schema.as_ref());
    }

    let gold = &records[1];
    assert_eq!(gold.get("main_trait_3"), Some(&Cell::from("silentgear:brilliant")));
    assert_eq!(gold.get("rod_rarity"), Some(&Cell::Null));
    assert_eq!(gold.get("main_category_2"), Some(&Cell::from("precious")));

    let wood = &records[2];
    assert_eq!(wood.get("main_category_2"), Some(&Cell::from("wood")));
    assert_eq!(wood.get("rod_ranged_damage_multiplier"), Some(&Cell::Float64(1.25)));
    assert_eq!(wood.get("rod_durability_multiplier"), Some(&Cell::Null));
}

#[test]
fn writes_header_and_one_row_per_item() {
    let out = tmp_path("out").with_extension("csv");
    let report = convert_directory(FIXTURES, &out, &ConvertOptions::default()).unwrap();
    assert_eq!(report.records, 3);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let schema = column_schema();
    assert_eq!(headers.iter().collect::<Vec<_>>(), schema.column_names().collect::<Vec<_>>());

    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.len() == schema.len()));

    let name = schema.index_of("name").unwrap();
    let durability = schema.index_of("durability").unwrap();
    let speed = schema.index_of("harvest_speed").unwrap();
    assert_eq!(&rows[0][name], "ingot_iron");
    assert_eq!(&rows[0][durability], "250");
    assert_eq!(&rows[0][speed], "6.0");
    assert_eq!(&rows[1][speed], "");
    assert_eq!(&rows[2][name], "wood, \"oak\"");

    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(raw.contains("\"wood, \"\"oak\"\"\""));
    assert!(!raw.contains('\r'));
}

#[test]
fn empty_directory_produces_no_file() {
    let dir = tmp_dir("empty");
    let out = dir.join("output.csv");

    let err = convert_directory(&dir, &out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConversionError::NoRecords { .. }));
    assert!(err.to_string().contains("no valid JSON data"));
    assert!(!out.exists());
}

#[test]
fn only_malformed_documents_produce_no_file() {
    let dir = tmp_dir("malformed");
    std::fs::write(dir.join("a.json"), "{ nope").unwrap();
    std::fs::write(dir.join("b.json"), "\"just a string\"").unwrap();
    std::fs::write(dir.join("c.json"), "[1, 2, 3]").unwrap();
    let out = dir.join("output.csv");

    let err = convert_directory(&dir, &out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConversionError::NoRecords { .. }));
    assert!(!out.exists());
}

#[test]
fn unwritable_output_is_fatal() {
    let out = tmp_path("missing-parent").join("nested").join("output.csv");
    let err = convert_directory(FIXTURES, &out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConversionError::Csv(_)));
}

#[test]
fn request_runs_with_custom_pattern() {
    let mut request = ConversionRequest::new(FIXTURES, tmp_path("request").with_extension("csv"));
    request.options.pattern = "wood.json".to_string();

    let report = request.run().unwrap();
    assert_eq!(report.documents_seen, 1);
    assert_eq!(report.records, 1);
    assert!(request.output.exists());
    assert!(format!("{request:?}").contains("observer_set: false"));
}
