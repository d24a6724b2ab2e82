//! histcheck CLI -- check concurrent object histories for consistency.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use derive_more::From;
use histcheck_core::checker::Error as CheckError;
use histcheck_core::executor::objects::{KeyValueMap, Queue, Register, Stack};
use histcheck_core::executor::Executor;
use histcheck_core::history::error::Error as HistoryError;
use histcheck_core::history::types::{MethodSpec, Schema};
use histcheck_core::search::Witness;
use histcheck_core::{CheckerConfig, ConsistencyChecker};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "histcheck",
    about = "Linearizability and weak consistency checking for concurrent histories"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check histories against a consistency model
    Check(CheckArgs),
    /// Print histories in the canonical compact notation
    Fmt(FmtArgs),
    /// Print the JSON Schema for the structured history format to stdout
    Schema,
}

#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// History files: `.json` for structured histories, anything else for the
    /// compact notation
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Method specification (JSON); required for compact histories
    #[arg(long)]
    pub spec: Option<PathBuf>,
    /// Reference object; inferred from the history's class name if omitted
    #[arg(long)]
    pub object: Option<ObjectKind>,
    /// Check weak consistency instead of linearizability
    #[arg(long)]
    pub weak: bool,
    /// Commit forced runs of invocations in one step
    #[arg(long)]
    pub jit: bool,
    /// Propose only minimal visibility
    #[arg(long)]
    pub min: bool,
    /// Print the witness on PASS
    #[arg(long)]
    pub verbose: bool,
    /// Output results as JSON (one object per file)
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    #[must_use]
    pub const fn config(&self) -> CheckerConfig {
        CheckerConfig {
            weak: self.weak,
            jit: self.jit,
            min: self.min,
        }
    }
}

#[derive(Debug, Parser)]
pub struct FmtArgs {
    /// History files to format
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Check formatting without printing (exit 1 if a compact file is not
    /// canonical)
    #[arg(long)]
    pub check: bool,
}

/// Reference objects the checker can replay histories against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectKind {
    Register,
    Queue,
    Stack,
    Map,
}

impl ObjectKind {
    /// Guesses the object from a class name such as `AtomicInteger` or
    /// `java.util.concurrent.ConcurrentLinkedQueue`.
    #[must_use]
    pub fn infer(class: &str) -> Option<Self> {
        let class = class.to_ascii_lowercase();
        let simple = class.rsplit('.').next().unwrap_or(&class);
        if simple.contains("queue") || simple.contains("deque") {
            Some(Self::Queue)
        } else if simple.contains("stack") {
            Some(Self::Stack)
        } else if simple.contains("map") {
            Some(Self::Map)
        } else if simple.contains("register")
            || simple.contains("atomic")
            || simple.contains("reference")
        {
            Some(Self::Register)
        } else {
            None
        }
    }
}

/// Error loading a history or method specification from disk.
#[derive(Debug, From)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Compact(histcheck_parser::Error),
    History(HistoryError),
    /// Compact histories name methods only; a specification resolves them.
    #[from(skip)]
    MissingSpec,
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
            Self::Compact(e) => write!(f, "{e}"),
            Self::History(e) => write!(f, "invalid history: {e:?}"),
            Self::MissingSpec => write!(f, "compact histories require --spec"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Reads a method specification.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or is not a valid
/// specification.
pub fn load_spec(path: &Path) -> Result<MethodSpec, LoadError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Returns `true` for paths holding structured (JSON) histories.
#[must_use]
pub fn is_structured(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Parses a history from text.
///
/// Structured histories keep their own method descriptors unless `spec` is
/// given; compact histories are always resolved against `spec`.
///
/// # Errors
///
/// Returns a [`LoadError`] if the text is malformed, names an unknown
/// method, or is compact and `spec` is `None`.
pub fn parse_history(
    text: &str,
    structured: bool,
    spec: Option<&MethodSpec>,
) -> Result<Schema<Value>, LoadError> {
    if structured {
        let mut schema: Schema<Value> = serde_json::from_str(text)?;
        if let Some(spec) = spec {
            schema.resolve_methods(spec)?;
        }
        Ok(schema)
    } else {
        let spec = spec.ok_or(LoadError::MissingSpec)?;
        Ok(histcheck_parser::parse_schema(text, spec)?)
    }
}

/// Reads and parses a history file, see [`parse_history`].
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or parsed.
pub fn load_history(path: &Path, spec: Option<&MethodSpec>) -> Result<Schema<Value>, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_history(&text, is_structured(path), spec)
}

/// Checks `schema` against the reference object `object`.
///
/// # Errors
///
/// Returns a [`CheckError`] if the history cannot be checked.
pub fn check_history(
    schema: &Schema<Value>,
    object: ObjectKind,
    config: CheckerConfig,
) -> Result<Option<Witness>, CheckError> {
    match object {
        ObjectKind::Register => witness(schema, config, Register),
        ObjectKind::Queue => witness(schema, config, Queue),
        ObjectKind::Stack => witness(schema, config, Stack),
        ObjectKind::Map => witness(schema, config, KeyValueMap),
    }
}

fn witness<E>(
    schema: &Schema<Value>,
    config: CheckerConfig,
    executor: E,
) -> Result<Option<Witness>, CheckError>
where
    E: Executor<Value>,
{
    ConsistencyChecker::new(config, executor).witness(schema)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use histcheck_core::history::types::Method;

    use super::*;

    fn register_spec() -> MethodSpec {
        MethodSpec {
            class: "AtomicInteger".into(),
            methods: vec![
                Method::new("write").with_parameters(["int"]).void(),
                Method::new("read").with_parameters::<&str>([]).readonly(),
            ],
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        App::command().debug_assert();
    }

    #[test]
    fn test_check_flags() {
        let app = App::parse_from(["histcheck", "check", "--weak", "--min", "a.hist"]);
        let Command::Check(args) = app.command else {
            panic!("expected check");
        };
        assert_eq!(
            args.config(),
            CheckerConfig {
                weak: true,
                jit: false,
                min: true
            }
        );
        assert_eq!(args.paths, vec![PathBuf::from("a.hist")]);
    }

    #[test]
    fn test_infer_object() {
        assert_eq!(ObjectKind::infer("AtomicInteger"), Some(ObjectKind::Register));
        assert_eq!(
            ObjectKind::infer("java.util.concurrent.ConcurrentLinkedQueue"),
            Some(ObjectKind::Queue)
        );
        assert_eq!(ObjectKind::infer("ConcurrentHashMap"), Some(ObjectKind::Map));
        assert_eq!(ObjectKind::infer("Stack"), Some(ObjectKind::Stack));
        assert_eq!(ObjectKind::infer("Widget"), None);
    }

    #[test]
    fn test_compact_requires_spec() {
        assert!(matches!(
            parse_history("{ read() }", false, None),
            Err(LoadError::MissingSpec)
        ));
    }

    #[test]
    fn test_check_compact_history() {
        let spec = register_spec();
        let schema = parse_history("{ write(1) } || { read() => 1; read() }", false, Some(&spec))
            .expect("history parses");
        let object = ObjectKind::infer(&schema.class).expect("known class");

        let strict = check_history(&schema, object, CheckerConfig::default()).unwrap();
        assert!(strict.is_none());

        let weak = CheckerConfig {
            weak: true,
            ..CheckerConfig::default()
        };
        assert!(check_history(&schema, object, weak).unwrap().is_some());
    }

    #[test]
    fn test_structured_history_resolves_with_spec() {
        let text = r#"{
            "class": "AtomicInteger",
            "sequences": [
                { "index": 1, "invocations": [ { "method": { "name": "write" }, "arguments": [1] } ] }
            ]
        }"#;
        let bare = parse_history(text, true, None).expect("history parses");
        assert!(!bare.sequences[0].invocations[0].method.void);

        let resolved = parse_history(text, true, Some(&register_spec())).expect("history parses");
        assert!(resolved.sequences[0].invocations[0].method.void);
    }
}
