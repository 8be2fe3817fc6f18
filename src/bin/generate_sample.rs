use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Name, Type_1, Type_2, [HP, Attack, Defense, Sp. Atk, Sp. Def, Speed], Generation, Legendary
type Row = (&'static str, &'static str, Option<&'static str>, [i64; 6], i64, bool);

const ROWS: [Row; 22] = [
    ("Bulbasaur", "Grass", Some("Poison"), [45, 49, 49, 65, 65, 45], 1, false),
    ("Ivysaur", "Grass", Some("Poison"), [60, 62, 63, 80, 80, 60], 1, false),
    ("Venusaur", "Grass", Some("Poison"), [80, 82, 83, 100, 100, 80], 1, false),
    ("Charmander", "Fire", None, [39, 52, 43, 60, 50, 65], 1, false),
    ("Charmeleon", "Fire", None, [58, 64, 58, 80, 65, 80], 1, false),
    ("Charizard", "Fire", Some("Flying"), [78, 84, 78, 109, 85, 100], 1, false),
    ("Squirtle", "Water", None, [44, 48, 65, 50, 64, 43], 1, false),
    ("Wartortle", "Water", None, [59, 63, 80, 65, 80, 58], 1, false),
    ("Blastoise", "Water", None, [79, 83, 100, 85, 105, 78], 1, false),
    ("Pikachu", "Electric", None, [35, 55, 40, 50, 50, 90], 1, false),
    ("Gastly", "Ghost", Some("Poison"), [30, 35, 30, 100, 35, 80], 1, false),
    ("Onix", "Rock", Some("Ground"), [35, 45, 160, 30, 45, 70], 1, false),
    ("Mewtwo", "Psychic", None, [106, 110, 90, 154, 90, 130], 1, true),
    ("Mew", "Psychic", None, [100, 100, 100, 100, 100, 100], 1, false),
    ("Chikorita", "Grass", None, [45, 49, 65, 49, 65, 45], 2, false),
    ("Cyndaquil", "Fire", None, [39, 52, 43, 60, 50, 65], 2, false),
    ("Totodile", "Water", None, [50, 65, 64, 44, 48, 43], 2, false),
    ("Togepi", "Fairy", None, [35, 20, 65, 40, 65, 20], 2, false),
    ("Steelix", "Steel", Some("Ground"), [75, 85, 200, 55, 65, 30], 2, false),
    ("Scizor", "Bug", Some("Steel"), [70, 130, 100, 55, 80, 65], 2, false),
    ("Tyranitar", "Rock", Some("Dark"), [100, 134, 110, 95, 100, 61], 2, false),
    ("Lugia", "Psychic", Some("Flying"), [106, 90, 130, 90, 154, 110], 2, true),
];

const STAT_COLUMNS: [&str; 6] = ["HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed"];

fn total(stats: &[i64; 6]) -> i64 {
    stats.iter().sum()
}

fn write_parquet(path: &str) -> Result<()> {
    let mut fields = vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Type_1", DataType::Utf8, false),
        Field::new("Type_2", DataType::Utf8, true),
        Field::new("Total", DataType::Int64, false),
    ];
    fields.extend(STAT_COLUMNS.iter().map(|c| Field::new(*c, DataType::Int64, false)));
    fields.push(Field::new("Generation", DataType::Int64, false));
    fields.push(Field::new("Legendary", DataType::Boolean, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(ROWS.iter().map(|r| r.0))),
        Arc::new(StringArray::from_iter_values(ROWS.iter().map(|r| r.1))),
        Arc::new(StringArray::from(ROWS.iter().map(|r| r.2).collect::<Vec<_>>())),
        Arc::new(Int64Array::from_iter_values(ROWS.iter().map(|r| total(&r.3)))),
    ];
    for i in 0..STAT_COLUMNS.len() {
        columns.push(Arc::new(Int64Array::from_iter_values(ROWS.iter().map(|r| r.3[i]))));
    }
    columns.push(Arc::new(Int64Array::from_iter_values(ROWS.iter().map(|r| r.4))));
    columns.push(Arc::new(BooleanArray::from(
        ROWS.iter().map(|r| r.5).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["Name", "Type_1", "Type_2", "Total"];
    header.extend(STAT_COLUMNS);
    header.extend(["Generation", "Legendary"]);
    writer.write_record(&header)?;

    for (name, type1, type2, stats, generation, legendary) in ROWS {
        let mut record = vec![
            name.to_string(),
            type1.to_string(),
            type2.unwrap_or("").to_string(),
            total(&stats).to_string(),
        ];
        record.extend(stats.iter().map(|s| s.to_string()));
        record.push(generation.to_string());
        record.push(if legendary { "True" } else { "False" }.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let parquet_path = "sample_pokemon.parquet";
    let csv_path = "sample_pokemon.csv";

    write_parquet(parquet_path)?;
    write_csv(csv_path)?;

    println!("Wrote {} Pokémon to {parquet_path} and {csv_path}", ROWS.len());
    Ok(())
}
