use std::path::Path;
use std::{fs, process};

use clap::Parser;
use histcheck_cli::{App, Command, ObjectKind};
use histcheck_core::history::display::format_schema;
use histcheck_core::history::types::Schema;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::parse();
    match &app.command {
        Command::Check(args) => check(args),
        Command::Fmt(args) => fmt(args),
        Command::Schema => schema(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn check(args: &histcheck_cli::CheckArgs) {
    let spec = args.spec.as_deref().map(|path| {
        histcheck_cli::load_spec(path).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {e}", path.display());
            process::exit(1);
        })
    });
    let config = args.config();
    let mut any_failed = false;

    for path in &args.paths {
        let filename = file_name(path);

        let schema = histcheck_cli::load_history(path, spec.as_ref()).unwrap_or_else(|e| {
            eprintln!("Failed to load {filename}: {e}");
            process::exit(1);
        });

        let object = args
            .object
            .or_else(|| ObjectKind::infer(&schema.class))
            .unwrap_or_else(|| {
                eprintln!(
                    "Cannot infer an object for class {:?} in {filename}; pass --object",
                    schema.class
                );
                process::exit(1);
            });

        match histcheck_cli::check_history(&schema, object, config) {
            Ok(Some(witness)) => {
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": true,
                        "witness": witness,
                    });
                    println!("{result}");
                } else if args.verbose {
                    println!("{filename}: PASS");
                    println!("  witness: {witness}");
                } else {
                    println!("{filename}: PASS");
                }
            }
            Ok(None) => {
                any_failed = true;
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": false,
                    });
                    println!("{result}");
                } else {
                    println!("{filename}: FAIL");
                }
            }
            Err(e) => {
                any_failed = true;
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": false,
                        "error": e,
                    });
                    println!("{result}");
                } else {
                    println!("{filename}: ERROR ({e:?})");
                }
            }
        }
    }

    if any_failed {
        process::exit(1);
    }
}

fn fmt(args: &histcheck_cli::FmtArgs) {
    let mut any_unformatted = false;

    for path in &args.paths {
        let filename = file_name(path);
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Failed to read {filename}: {e}");
            process::exit(1);
        });

        let schema: Schema<serde_json::Value> = if histcheck_cli::is_structured(path) {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("Failed to parse {filename}: {e}");
                process::exit(1);
            })
        } else {
            let sequences = histcheck_parser::parse_sequences(&text).unwrap_or_else(|e| {
                eprintln!("Failed to parse {filename}: {e}");
                process::exit(1);
            });
            Schema::new("", sequences)
        };

        let formatted = format_schema(&schema).unwrap_or_else(|e| {
            eprintln!("Failed to format {filename}: {e:?}");
            process::exit(1);
        });

        if args.check {
            if !histcheck_cli::is_structured(path) && text.trim() != formatted {
                any_unformatted = true;
                println!("{filename}: not formatted");
            }
        } else {
            println!("{formatted}");
        }
    }

    if any_unformatted {
        process::exit(1);
    }
}

fn schema() {
    let schema = schemars::schema_for!(Schema<serde_json::Value>);
    let json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        eprintln!("Failed to render schema: {e}");
        process::exit(1);
    });
    println!("{json}");
}
