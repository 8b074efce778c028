use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use gridbin_binary::{encode, EncodedObject, MetadataRegistry};
use gridbin_interop::{HeapMemory, MemoryConfig, OutputStream};
use gridbin_types::{field_id, schema_id};
use serde_json::json;

use crate::cli::*;
use crate::json::{parse_document, JsonObject};

pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Hash(args) => cmd_hash(args, &cli.format),
        Command::Encode(args) => cmd_encode(args, &cli.format),
    }
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> Result<()> {
    let ids: Vec<i32> = args.names.iter().map(|name| field_id(name)).collect();
    let schema = schema_id(ids.iter().copied());

    match format {
        OutputFormat::Json => {
            let fields: Vec<_> = args
                .names
                .iter()
                .zip(&ids)
                .map(|(name, id)| json!({ "name": name, "field_id": id }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "fields": fields, "schema_id": schema }))?
            );
        }
        OutputFormat::Text => {
            for (name, id) in args.names.iter().zip(&ids) {
                println!("{:>12}  {}", id.to_string().cyan(), name.bold());
            }
            println!("{:>12}  {}", schema.to_string().yellow(), "schema id".dimmed());
        }
    }
    Ok(())
}

/// Bytes of every encoded object plus the metadata merged across them.
#[derive(Debug)]
pub struct EncodeReport {
    pub bytes: Vec<u8>,
    pub objects: Vec<EncodedObject>,
    pub registry: MetadataRegistry,
}

fn cmd_encode(args: EncodeArgs, format: &OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(&args.input)?;
    let objects = parse_document(&text, &args.type_name)?;
    let report = encode_all(&objects, &config)?;

    if let Some(path) = &args.output {
        std::fs::write(path, &report.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

/// Encode every object into one region, back to back.
pub fn encode_all(objects: &[JsonObject], config: &MemoryConfig) -> Result<EncodeReport> {
    let mut memory = HeapMemory::from_config(config)?;
    let mut out = OutputStream::new(&mut memory);
    let mut registry = MetadataRegistry::new();
    let mut encoded = Vec::with_capacity(objects.len());

    for object in objects {
        let result = encode(&mut out, object)
            .with_context(|| format!("encoding `{}`", object.type_name))?;
        for metadata in &result.types {
            registry.merge(metadata)?;
        }
        encoded.push(result);
    }

    Ok(EncodeReport {
        bytes: memory.into_bytes(),
        objects: encoded,
        registry,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<MemoryConfig> {
    let Some(path) = path else {
        return Ok(MemoryConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: MemoryConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Hex rows of 16 bytes, grouped in fours, prefixed with the offset.
pub fn hex_rows(bytes: &[u8], base: usize) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let groups: Vec<String> = chunk.chunks(4).map(hex::encode).collect();
            format!("{:06x}  {}", base + row * 16, groups.join(" "))
        })
        .collect()
}

fn print_text(report: &EncodeReport) {
    for object in &report.objects {
        let name = object
            .types
            .first()
            .map(|t| t.type_name.as_str())
            .unwrap_or_default();
        println!(
            "{} {} type_id {} length {} schema_id {} hash {} flags {:?}",
            "✓".green().bold(),
            name.bold(),
            object.type_id,
            object.length,
            object.schema_id,
            object.hash_code,
            object.flags,
        );
        for row in hex_rows(&report.bytes[object.start..object.end()], object.start) {
            println!("  {}", row.dimmed());
        }
    }

    for metadata in report.registry.types() {
        println!("{} {}", "type".cyan(), metadata.type_name.bold());
        for field in &metadata.fields {
            println!(
                "  {:<20} {:>12}  {}",
                field.name,
                field.field_id,
                field.type_code.to_string().yellow()
            );
        }
    }
}

fn print_json(report: &EncodeReport) -> Result<()> {
    let objects: Vec<_> = report
        .objects
        .iter()
        .map(|object| {
            json!({
                "start": object.start,
                "length": object.length,
                "type_id": object.type_id,
                "hash_code": object.hash_code,
                "schema_id": object.schema_id,
                "has_schema": object.has_schema(),
                "has_raw": object.has_raw(),
            })
        })
        .collect();
    let types: Vec<_> = report.registry.types().collect();
    let output = json!({
        "length": report.bytes.len(),
        "hex": hex::encode(&report.bytes),
        "objects": objects,
        "types": types,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn encode_all_writes_back_to_back() {
        let objects = parse_document(
            r#"[{"@type": "Person", "name": "Ada"}, {"@type": "Person", "age": 36}]"#,
            "Object",
        )
        .unwrap();
        let report = encode_all(&objects, &MemoryConfig::default()).unwrap();

        assert_eq!(report.objects.len(), 2);
        assert_eq!(report.objects[1].start, report.objects[0].end());
        assert_eq!(report.bytes.len(), report.objects[1].end());

        let person = report.registry.types().next().unwrap();
        assert_eq!(person.type_name, "Person");
        let names: Vec<_> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "age"]);
    }

    #[test]
    fn encode_all_reports_type_conflicts() {
        let objects = parse_document(
            r#"[{"@type": "P", "v": 1}, {"@type": "P", "v": "one"}]"#,
            "Object",
        )
        .unwrap();
        assert!(encode_all(&objects, &MemoryConfig::default()).is_err());
    }

    #[test]
    fn encode_all_honors_max_capacity() {
        let objects = parse_document(r#"{"s": "a long enough string value"}"#, "T").unwrap();
        let config = MemoryConfig {
            initial_capacity: 16,
            max_capacity: Some(32),
        };
        let err = encode_all(&objects, &config).unwrap_err();
        assert!(format!("{err:#}").contains("encoding `T`"));
    }

    #[test]
    fn config_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_capacity = 64\nmax_capacity = 4096").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.max_capacity, Some(4096));
    }

    #[test]
    fn config_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, MemoryConfig::default());
    }

    #[test]
    fn config_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_capacity = \"big\"").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn hex_rows_group_bytes() {
        let bytes: Vec<u8> = (0..20).collect();
        let rows = hex_rows(&bytes, 0x10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "000010  00010203 04050607 08090a0b 0c0d0e0f");
        assert_eq!(rows[1], "000020  10111213");
    }

    #[test]
    fn input_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"a": 1}"#).unwrap();
        assert_eq!(read_input(&path).unwrap(), r#"{"a": 1}"#);
        assert!(read_input(&dir.path().join("missing.json")).is_err());
    }
}
