//! PlayerPrefs Dump - print isi file PlayerPrefs
//!
//! Usage:
//!   cargo run --release --bin prefs_dump -- <FILE> [OPTIONS]

use std::process;

use unity_prefs::{load_with_config, DecodeConfig, PrefValue, Prefs, UnknownTagPolicy};

/// Dump configuration
#[derive(Default)]
struct DumpConfig {
    path: Option<String>,
    lenient: bool,
    verbose: bool,
}

impl DumpConfig {
    fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            unknown_tags: if self.lenient {
                UnknownTagPolicy::Lenient
            } else {
                UnknownTagPolicy::Reject
            },
        }
    }
}

fn print_help() {
    println!("PlayerPrefs Dump - inspect Unity WebPlayer PlayerPrefs files\n");
    println!("Usage: prefs_dump <FILE> [OPTIONS]\n");
    println!("Options:");
    println!("  -l, --lenient   Keep entries with unknown type tags instead of failing");
    println!("  -v, --verbose   Print summary with entry counts per type");
    println!("  -h, --help      Show this help");
}

fn parse_args() -> DumpConfig {
    let mut config = DumpConfig::default();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--lenient" | "-l" => config.lenient = true,
            "--verbose" | "-v" => config.verbose = true,
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            _ if config.path.is_none() => config.path = Some(arg),
            other => eprintln!("Ignoring extra argument: {}", other),
        }
    }

    config
}

fn type_name(value: &PrefValue) -> &'static str {
    value.tag().name()
}

fn print_summary(prefs: &Prefs) {
    let count = |name: &str| prefs.values().filter(|v| type_name(v) == name).count();

    println!("\nEntries: {}", prefs.len());
    println!("  string:  {}", count("string"));
    println!("  int:     {}", count("int"));
    println!("  float:   {}", count("float"));
    let unknown = count("unknown");
    if unknown > 0 {
        println!("  unknown: {}", unknown);
    }
}

fn main() {
    let config = parse_args();

    let Some(path) = config.path.as_deref() else {
        print_help();
        process::exit(2);
    };

    let prefs = match load_with_config(path, config.decode_config()) {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for (key, value) in &prefs {
        println!("{}\t{}\t{}", key, type_name(value), value);
    }

    if config.verbose {
        print_summary(&prefs);
    }
}
