// Loading datasets from real files in every supported format.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use pokedex_viz::data::aggregate::{
    build_total_histogram, count_by_generation_and_type, radar_comparison, HistogramSpec,
};
use pokedex_viz::data::loader::MAX_COUNT;
use pokedex_viz::error::CoercionKind;
use pokedex_viz::{load_file, DatasetError};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/pokemon_sample.csv");

#[test]
fn loads_csv_fixture() {
    let loaded = load_file(Path::new(FIXTURE)).unwrap();
    let records = &loaded.records;

    assert_eq!(records.len(), 22);
    assert!(loaded.warnings.is_empty());
    assert_eq!(records.generations, vec![1, 2]);
    assert!(records.types.contains(&"Dark".to_string()));
    assert!(!records.types.iter().any(|t| t == "None" || t.is_empty()));

    let lugia = records.get("Lugia").unwrap();
    assert!(lugia.legendary);
    assert_eq!(lugia.type2.as_deref(), Some("Flying"));
    assert_eq!(lugia.total, lugia.stats.sum());

    let counts = count_by_generation_and_type(records.iter());
    assert_eq!(counts.generation_total(1), 14);
    assert_eq!(counts.generation_total(2), 8);
}

#[test]
fn csv_with_bad_cells_still_loads() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "Name,Type_1,Type_2,Total,HP,Attack,Defense,Sp. Atk,Sp. Def,Speed,Generation,Legendary"
    )
    .unwrap();
    writeln!(file, "Glitch,Normal,None,,10,n/a,10,10,10,,1,False").unwrap();
    file.flush().unwrap();

    let loaded = load_file(file.path()).unwrap();
    let glitch = loaded.records.get("Glitch").unwrap();

    assert_eq!(glitch.type2, None);
    assert_eq!(glitch.stats.attack, 0);
    assert_eq!(glitch.stats.speed, 0);
    assert_eq!(glitch.total, 40);
    let columns: Vec<&str> = loaded.warnings.iter().map(|w| w.column.as_str()).collect();
    assert_eq!(columns, vec!["Attack", "Speed", "Total"]);
}

#[test]
fn oversized_cells_load_and_aggregate_without_overflow() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "Name,Type_1,Type_2,Total,HP,Attack,Defense,Sp. Atk,Sp. Def,Speed,Generation,Legendary"
    )
    .unwrap();
    writeln!(file, "Big,Fire,,1e12,10,10,10,10,10,10,1,False").unwrap();
    writeln!(file, "Wide,Water,,,4000000000,4000000000,10,10,10,10,1,False").unwrap();
    file.flush().unwrap();

    let loaded = load_file(file.path()).unwrap();
    let big = loaded.records.get("Big").unwrap();
    let wide = loaded.records.get("Wide").unwrap();

    assert_eq!(big.total, MAX_COUNT);
    assert_eq!(wide.stats.hp, MAX_COUNT);
    assert_eq!(wide.total, wide.stats.sum());
    assert_eq!(
        loaded
            .warnings
            .iter()
            .filter(|w| w.kind == CoercionKind::Capped)
            .count(),
        3
    );

    let bins = build_total_histogram(loaded.records.iter(), 1, HistogramSpec::default());
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    let last_end = bins.last().map(|b| b.end).unwrap();
    assert!(last_end > wide.total && last_end <= wide.total + 200);

    assert_eq!(radar_comparison(wide, None, 5).scale_max, MAX_COUNT + 5);
}

#[test]
fn duplicate_names_fail_the_load() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Name,Type_1,Generation").unwrap();
    writeln!(file, "Eevee,Normal,1").unwrap();
    writeln!(file, "Eevee,Normal,1").unwrap();
    file.flush().unwrap();

    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatasetError>(),
        Some(DatasetError::DuplicateName { .. })
    ));
}

#[test]
fn loads_json_records() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"Name": "Pikachu", "Type_1": "Electric", "Type_2": "None", "Total": 320,
              "HP": 35, "Attack": 55, "Defense": 40, "Sp. Atk": 50, "Sp. Def": 50,
              "Speed": 90, "Generation": 1, "Legendary": false}},
            {{"Name": "Zapdos", "Type_1": "Electric", "Type_2": "Flying", "Total": 580,
              "HP": 90, "Attack": 90, "Defense": 85, "Sp. Atk": 125, "Sp. Def": 90,
              "Speed": 100, "Generation": 1, "Legendary": true}}
        ]"#
    )
    .unwrap();
    file.flush().unwrap();

    let loaded = load_file(file.path()).unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.records.types, vec!["Electric", "Flying"]);
    assert!(loaded.records.get("Zapdos").unwrap().legendary);
    assert_eq!(loaded.records.get("Pikachu").unwrap().type2, None);
}

#[test]
fn loads_parquet_columns() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Type_1", DataType::Utf8, false),
        Field::new("Type_2", DataType::Utf8, true),
        Field::new("HP", DataType::Int64, false),
        Field::new("Speed", DataType::Float64, true),
        Field::new("Generation", DataType::Int64, false),
        Field::new("Legendary", DataType::Boolean, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["Articuno", "Dratini"])),
        Arc::new(StringArray::from(vec!["Ice", "Dragon"])),
        Arc::new(StringArray::from(vec![Some("Flying"), None])),
        Arc::new(Int64Array::from(vec![90, 41])),
        Arc::new(Float64Array::from(vec![Some(85.0), None])),
        Arc::new(Int64Array::from(vec![1, 1])),
        Arc::new(BooleanArray::from(vec![true, false])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let loaded = load_file(file.path()).unwrap();
    let articuno = loaded.records.get("Articuno").unwrap();
    assert!(articuno.legendary);
    assert_eq!(articuno.type2.as_deref(), Some("Flying"));
    assert_eq!(articuno.stats.hp, 90);
    assert_eq!(articuno.stats.speed, 85);

    let dratini = loaded.records.get("Dratini").unwrap();
    assert_eq!(dratini.type2, None);
    assert_eq!(dratini.stats.speed, 0);
    assert!(!loaded.warnings.is_empty());
}
