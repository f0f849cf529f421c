use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value as JsonValue, json};
use std::fs;
use std::path::{Path, PathBuf};
use tablebind::binder::parse_record;
use tablebind::wire::table;
use tablebind::{Binder, BinderConfig, EntitySchema, PropertyBag};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tablebind")]
#[command(about = "Convert records to and from the table storage property bag")]
struct Cli {
    /// Binder configuration (reserved fields, key remaps) as JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a typed JSON record into a property bag
    Encode {
        #[arg(long)]
        schema: PathBuf,
        #[arg(long)]
        record: PathBuf,
    },
    /// Decode a property bag into a typed JSON record
    Decode {
        #[arg(long)]
        schema: PathBuf,
        #[arg(long)]
        entity: PathBuf,
    },
    /// Print annotation tokens and null sentinels per kind
    Table,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let binder = match &cli.config {
        Some(path) => {
            let config = BinderConfig::from_file(path)
                .with_context(|| format!("Failed to load binder config '{}'", path.display()))?;
            Binder::new(config)?
        }
        None => Binder::default(),
    };

    match cli.command {
        Command::Encode { schema, record } => encode(&binder, &schema, &record),
        Command::Decode { schema, entity } => decode(&binder, &schema, &entity),
        Command::Table => {
            print_table();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablebind=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&input).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

fn load_schema(path: &Path) -> Result<EntitySchema> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema '{}'", path.display()))?;
    EntitySchema::from_json_str(&input)
        .with_context(|| format!("Invalid schema '{}'", path.display()))
}

fn encode(binder: &Binder, schema: &Path, record: &Path) -> Result<()> {
    let schema = load_schema(schema)?;
    let output = encode_output(binder, &schema, &read_json(record)?)
        .with_context(|| format!("Failed to encode '{}'", record.display()))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn decode(binder: &Binder, schema: &Path, entity: &Path) -> Result<()> {
    let schema = load_schema(schema)?;
    let output = decode_output(binder, &schema, &read_json(entity)?)
        .with_context(|| format!("Failed to decode '{}'", entity.display()))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_table() {
    for line in table_lines() {
        println!("{}", line);
    }
}

fn encode_output(binder: &Binder, schema: &EntitySchema, record: &JsonValue) -> Result<JsonValue> {
    let record = parse_record(schema, record)?;
    Ok(binder.encode_record(schema, &record)?.to_json())
}

/// `{"values": {...}, "absent": [...]}`; absent fields are `null` in `values`.
fn decode_output(binder: &Binder, schema: &EntitySchema, entity: &JsonValue) -> Result<JsonValue> {
    let bag = PropertyBag::from_json(entity)?;
    let decoded = binder.decode_record(schema, &bag)?;
    Ok(json!({
        "values": decoded.to_json(),
        "absent": decoded.absent_fields(),
    }))
}

fn table_lines() -> Vec<String> {
    let mut lines = vec![format!("{:<16} {:<14} {}", "KIND", "ANNOTATION", "NULL SENTINEL")];
    for (kind, wire) in table::entries() {
        lines.push(format!(
            "{:<16} {:<14} {}",
            kind.to_string(),
            wire.annotation.unwrap_or("-"),
            wire.sentinel.unwrap_or("(native null)")
        ));
    }
    lines
}
