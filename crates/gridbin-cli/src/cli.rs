use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gridbin",
    about = "Hash field names and encode JSON documents as gridbin binary objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the field id of each name and the schema id of the list
    Hash(HashArgs),
    /// Encode JSON objects and dump the bytes
    Encode(EncodeArgs),
}

#[derive(Args)]
pub struct HashArgs {
    /// Field or type names, in schema order
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// JSON file holding one object or an array of objects; `-` reads stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Type name for top-level objects without an `@type` key
    #[arg(short = 't', long, default_value = "Object")]
    pub type_name: String,

    /// TOML file with memory settings (`initial_capacity`, `max_capacity`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the encoded bytes to this file as well
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["gridbin", "hash", "a", "name"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.names, vec!["a", "name"]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn hash_requires_names() {
        assert!(Cli::try_parse_from(["gridbin", "hash"]).is_err());
    }

    #[test]
    fn parse_encode_defaults() {
        let cli = Cli::try_parse_from(["gridbin", "encode"]).unwrap();
        if let Command::Encode(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("-"));
            assert_eq!(args.type_name, "Object");
            assert!(args.config.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_encode_options() {
        let cli = Cli::try_parse_from([
            "gridbin", "encode", "people.json", "-t", "Person", "--config", "mem.toml", "-o",
            "out.bin",
        ])
        .unwrap();
        if let Command::Encode(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("people.json"));
            assert_eq!(args.type_name, "Person");
            assert_eq!(args.config, Some(PathBuf::from("mem.toml")));
            assert_eq!(args.output, Some(PathBuf::from("out.bin")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose_and_format() {
        let cli = Cli::try_parse_from(["gridbin", "-v", "--format", "json", "hash", "x"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
