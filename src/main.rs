use flatini::{Dialect, Document, ParseError, UnknownDialect};

use log::{debug, warn};
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

const FLATINI_VERSION: &str = env!("CARGO_PKG_VERSION");
const DIALECT_ENV: &str = "FLATINI_DIALECT";

#[derive(Debug, Default, PartialEq)]
struct Config {
    command: Option<Command>,
    dialect: Option<Dialect>,
    help: bool,
    verbose: bool,
    version: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Check {
        path: PathBuf,
    },
    Fmt {
        path: PathBuf,
    },
    Get {
        path: PathBuf,
        section: String,
        key: String,
    },
    Set {
        path: PathBuf,
        section: String,
        key: String,
        value: String,
    },
}

impl Command {
    fn path(&self) -> &Path {
        match self {
            Command::Check { path }
            | Command::Fmt { path }
            | Command::Get { path, .. }
            | Command::Set { path, .. } => path,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RuntimeError {
    #[error("{0}")]
    Document(#[from] flatini::Error),
    #[error("invalid $FLATINI_DIALECT: {0}")]
    Dialect(#[from] UnknownDialect),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
    #[error("invalid value: {0}")]
    Value(#[from] ParseError),
}

impl RuntimeError {
    fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::Dialect(_) | RuntimeError::Value(_) => 1,
            RuntimeError::Document(_) | RuntimeError::Io(_) => 2,
        }
    }
}

fn help() {
    println!(
        "Usage:
flatini --version
flatini [-v|--verbose] [--ini|--toml] check FILE
flatini [-v|--verbose] [--ini|--toml] fmt FILE
flatini [-v|--verbose] [--ini|--toml] get FILE SECTION KEY
flatini [-v|--verbose] [--ini|--toml] set FILE SECTION KEY VALUE

Without --ini or --toml the dialect is taken from ${DIALECT_ENV},
then from the file extension (.toml means toml, anything else ini)."
    );
}

fn parse_args(args: Vec<String>) -> Result<Config, String> {
    let mut cfg = Config::default();
    let mut args = args.into_iter().skip(1).peekable();

    while let Some(arg) = args.next_if(|a| a.starts_with('-')) {
        match &arg[..] {
            "-h" | "--help" => cfg.help = true,
            "-v" | "--verbose" => cfg.verbose = true,
            "--version" => cfg.version = true,
            "--ini" => cfg.dialect = Some(Dialect::Ini),
            "--toml" => cfg.dialect = Some(Dialect::Toml),
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    if cfg.help || cfg.version {
        return Ok(cfg);
    }

    // everything after the command is positional, values may start with '-'
    let command = args.next().ok_or("Missing command")?;
    let rest: Vec<String> = args.collect();

    cfg.command = Some(match (command.as_str(), rest.as_slice()) {
        ("check", [path]) => Command::Check { path: path.into() },
        ("fmt", [path]) => Command::Fmt { path: path.into() },
        ("get", [path, section, key]) => Command::Get {
            path: path.into(),
            section: section.clone(),
            key: key.clone(),
        },
        ("set", [path, section, key, value]) => Command::Set {
            path: path.into(),
            section: section.clone(),
            key: key.clone(),
            value: value.clone(),
        },
        ("check" | "fmt" | "get" | "set", _) => {
            return Err(format!("Wrong number of arguments for {command}"))
        }
        _ => return Err(format!("Unknown command: {command}")),
    });

    Ok(cfg)
}

/// `--ini`/`--toml` beat `$FLATINI_DIALECT`, which beats the file extension
fn resolve_dialect(cfg: &Config, path: &Path) -> Result<Dialect, UnknownDialect> {
    if let Some(dialect) = cfg.dialect {
        return Ok(dialect);
    }

    match env::var(DIALECT_ENV) {
        Ok(name) if !name.is_empty() => name.parse(),
        _ => Ok(Dialect::from_path(path)),
    }
}

/// Returns `false` when the command ran but didn't find what it was asked for
fn run<W: Write>(cfg: &Config, command: &Command, out: &mut W) -> Result<bool, RuntimeError> {
    let path = command.path();
    let dialect = resolve_dialect(cfg, path)?;
    let mut doc = Document::load_with(path, dialect)?;

    match command {
        Command::Check { .. } => {
            writeln!(out, "{}: ok ({} lines)", path.display(), doc.len())?;
        }
        Command::Fmt { .. } => {
            doc.write_to(out)?;
        }
        Command::Get { section, key, .. } => match doc.get(section, key) {
            Some(value) => writeln!(out, "{value}")?,
            None => {
                warn!("No key {key:?} in section {section:?} of {path:?}");
                return Ok(false);
            }
        },
        Command::Set {
            section,
            key,
            value,
            ..
        } => {
            if !doc.set(section, key, value)? {
                warn!("No key {key:?} in section {section:?} of {path:?}, not adding it");
                return Ok(false);
            }
            doc.save(path)?;
            debug!("Updated {section}.{key} in {path:?}");
        }
    }

    Ok(true)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let cfg = match parse_args(args) {
        Ok(cfg) => cfg,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            help();
            process::exit(1)
        }
    };

    let _ = simplelog::WriteLogger::init(
        if cfg.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        },
        simplelog::Config::default(),
        io::stderr(),
    );

    if cfg.help {
        help();
        process::exit(0);
    }

    if cfg.version {
        println!("flatini {}", FLATINI_VERSION);
        process::exit(0);
    }

    let Some(command) = &cfg.command else {
        help();
        process::exit(1);
    };

    debug!("Running {command:?}");

    let mut stdout = io::stdout().lock();
    let res = run(&cfg, command, &mut stdout).and_then(|found| {
        stdout.flush()?;
        Ok(found)
    });

    match res {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        std::iter::once("flatini")
            .chain(s.iter().copied())
            .map(String::from)
            .collect()
    }

    mod parse_args {
        use super::*;

        #[test]
        fn version() {
            let cfg = parse_args(args(&["--version"])).unwrap();
            assert!(cfg.version);
            assert_eq!(cfg.command, None);
        }

        #[test]
        fn flags_and_command() {
            let cfg =
                parse_args(args(&["-v", "--toml", "get", "a.ini", "server", "port"])).unwrap();

            assert!(cfg.verbose);
            assert_eq!(cfg.dialect, Some(Dialect::Toml));
            assert_eq!(
                cfg.command,
                Some(Command::Get {
                    path: "a.ini".into(),
                    section: "server".into(),
                    key: "port".into(),
                })
            );
        }

        #[test]
        fn value_may_look_like_a_flag() {
            let cfg = parse_args(args(&["set", "a.ini", "s", "k", "-1"])).unwrap();

            assert_eq!(
                cfg.command,
                Some(Command::Set {
                    path: "a.ini".into(),
                    section: "s".into(),
                    key: "k".into(),
                    value: "-1".into(),
                })
            );
        }

        #[test]
        fn missing_command_fails() {
            assert_eq!(parse_args(args(&["-v"])), Err("Missing command".into()));
        }

        #[test]
        fn unknown_flag_fails() {
            assert_eq!(
                parse_args(args(&["--quiet", "check", "a.ini"])),
                Err("Unknown argument: --quiet".into())
            );
        }

        #[test]
        fn wrong_arity_fails() {
            assert_eq!(
                parse_args(args(&["get", "a.ini", "server"])),
                Err("Wrong number of arguments for get".into())
            );
        }

        #[test]
        fn unknown_command_fails() {
            assert_eq!(
                parse_args(args(&["del", "a.ini"])),
                Err("Unknown command: del".into())
            );
        }
    }

    mod resolve_dialect {
        use super::*;

        #[test]
        #[serial_test::serial]
        fn flag_wins() {
            env::set_var(DIALECT_ENV, "ini");
            let cfg = Config {
                dialect: Some(Dialect::Toml),
                ..Default::default()
            };

            let res = resolve_dialect(&cfg, Path::new("a.ini"));
            env::remove_var(DIALECT_ENV);

            assert_eq!(res, Ok(Dialect::Toml));
        }

        #[test]
        #[serial_test::serial]
        fn env_beats_extension() {
            env::set_var(DIALECT_ENV, "toml");

            let res = resolve_dialect(&Config::default(), Path::new("a.ini"));
            env::remove_var(DIALECT_ENV);

            assert_eq!(res, Ok(Dialect::Toml));
        }

        #[test]
        #[serial_test::serial]
        fn bad_env_fails() {
            env::set_var(DIALECT_ENV, "yaml");

            let res = resolve_dialect(&Config::default(), Path::new("a.ini"));
            env::remove_var(DIALECT_ENV);

            assert_eq!(res, Err(UnknownDialect("yaml".into())));
        }

        #[test]
        #[serial_test::serial]
        fn falls_back_to_extension() {
            env::remove_var(DIALECT_ENV);

            assert_eq!(
                resolve_dialect(&Config::default(), Path::new("a.toml")),
                Ok(Dialect::Toml)
            );
            assert_eq!(
                resolve_dialect(&Config::default(), Path::new("a.conf")),
                Ok(Dialect::Ini)
            );
        }
    }

    mod run {
        use super::*;
        use std::fs;

        #[test]
        #[serial_test::serial]
        fn set_updates_file() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let path = temp_dir.path().join("server.ini");
            fs::write(&path, "[server]\n; port\nport = 8080\n").expect("cannot write fixture");

            let command = Command::Set {
                path: path.clone(),
                section: "server".into(),
                key: "port".into(),
                value: "9090".into(),
            };

            assert!(run(&Config::default(), &command, &mut io::sink()).unwrap());
            assert_eq!(
                fs::read_to_string(&path).unwrap(),
                "[server]\n; port\nport = 9090\n"
            );
        }

        #[test]
        #[serial_test::serial]
        fn set_on_missing_key_leaves_file_alone() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let path = temp_dir.path().join("server.ini");
            fs::write(&path, "[server]\nport=8080\n").expect("cannot write fixture");

            let command = Command::Set {
                path: path.clone(),
                section: "server".into(),
                key: "backlog".into(),
                value: "1".into(),
            };

            assert!(!run(&Config::default(), &command, &mut io::sink()).unwrap());
            assert_eq!(fs::read_to_string(&path).unwrap(), "[server]\nport=8080\n");
        }

        #[test]
        #[serial_test::serial]
        fn get_prints_value() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let path = temp_dir.path().join("server.ini");
            fs::write(&path, "[server]\nport = 8080\n").expect("cannot write fixture");

            let command = Command::Get {
                path,
                section: "server".into(),
                key: "port".into(),
            };
            let mut out = Vec::new();

            assert!(run(&Config::default(), &command, &mut out).unwrap());
            assert_eq!(String::from_utf8(out).unwrap(), "8080\n");
        }

        #[test]
        #[serial_test::serial]
        fn get_on_missing_key_prints_nothing() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let path = temp_dir.path().join("server.ini");
            fs::write(&path, "[server]\nport = 8080\n").expect("cannot write fixture");

            let command = Command::Get {
                path,
                section: "server".into(),
                key: "backlog".into(),
            };
            let mut out = Vec::new();

            assert!(!run(&Config::default(), &command, &mut out).unwrap());
            assert!(out.is_empty());
        }

        #[test]
        #[serial_test::serial]
        fn fmt_prints_normalized_document() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let path = temp_dir.path().join("messy.ini");
            fs::write(&path, "  top=1\n\n[server]\nport   =8080\n;   note\n")
                .expect("cannot write fixture");

            let command = Command::Fmt { path };
            let mut out = Vec::new();

            assert!(run(&Config::default(), &command, &mut out).unwrap());
            assert_eq!(
                String::from_utf8(out).unwrap(),
                "top = 1\n\n[server]\nport = 8080\n; note\n"
            );
        }

        #[test]
        #[serial_test::serial]
        fn load_errors_exit_with_2() {
            let temp_dir = tempfile::tempdir().expect("cannot create temp dir");
            let command = Command::Check {
                path: temp_dir.path().join("missing.ini"),
            };

            let err = run(&Config::default(), &command, &mut io::sink()).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
    }
}
