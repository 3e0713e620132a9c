use std::{env, fmt, path::PathBuf, thread};

use log::LevelFilter;

use crate::error::{Error, Result};

const THREAD_FALLBACK_PARALLELISM: usize = 2;
const THREAD_MIN_PARALLELISM: usize = 2;
const THREAD_RESERVED_CORES: usize = 1;

/// Runtime options for a solver run.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Worker threads for the local-search scans.
    pub threads: usize,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for the problem text. Empty means stdin.
    pub input: String,
    /// Optional output file path for the solution. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    fn parse(name: &str, value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --{name}: {value} (expected error|warn|info|debug|trace|off)"
            ))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(name: &str, value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --{name}: {value} (expected compact|pretty)"
            ))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            threads: default_thread_count(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        options.apply_args(args)?;
        Ok(options)
    }

    fn apply_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter().map(|arg| arg.as_ref().to_owned());

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };
            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, inline_value) = match raw_name.split_once('=') {
                Some((name, value)) => (name.to_owned(), Some(value.to_owned())),
                None => (raw_name.to_owned(), None),
            };

            match name.as_str() {
                "threads" => {
                    let value = required_value(&name, inline_value, &mut args)?;
                    let threads: usize = value.parse().map_err(|_| {
                        Error::invalid_input(format!("Invalid value for --threads: {value}"))
                    })?;
                    if threads == 0 {
                        return Err(Error::invalid_input("--threads must be at least 1"));
                    }
                    self.threads = threads;
                }
                "log-level" => {
                    let value = required_value(&name, inline_value, &mut args)?;
                    self.log_level = LogLevel::parse(&name, &value)?;
                }
                "log-format" => {
                    let value = required_value(&name, inline_value, &mut args)?;
                    self.log_format = LogFormat::parse(&name, &value)?;
                }
                "log-timestamp" => {
                    self.log_timestamp = match inline_value {
                        Some(value) => parse_bool(&name, &value)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if inline_value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    self.log_timestamp = false;
                }
                "log-output" => {
                    self.log_output = required_value(&name, inline_value, &mut args)?;
                }
                "input" => {
                    self.input = required_value(&name, inline_value, &mut args)?;
                }
                "output" => {
                    self.output = required_value(&name, inline_value, &mut args)?;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-descent [options] [--input problem.txt]\n",
            "  tsp-descent [options] < problem.txt\n\n",
            "Options:\n",
            "  --threads <usize>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-descent --output solution.json < problem.txt\n",
            "  tsp-descent --input problem.txt --threads 4\n",
            "  tsp-descent --log-level=info --log-output run.log < problem.txt\n",
            "  tsp-descent --log-level=debug --log-format=pretty < problem.txt\n",
        )
    }

    pub fn input_path(&self) -> Option<PathBuf> {
        check_path(&self.input)
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        check_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<PathBuf> {
        check_path(&self.log_output)
    }
}

impl fmt::Display for SolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "threads={} log_level={} log_format={} log_timestamp={} log_output={} input={} output={}",
            self.threads,
            self.log_level.as_str(),
            self.log_format.as_str(),
            self.log_timestamp,
            display_path(&self.log_output),
            display_path(&self.input),
            display_path(&self.output),
        )
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "-" } else { path }
}

fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(THREAD_FALLBACK_PARALLELISM)
        .max(THREAD_MIN_PARALLELISM)
        - THREAD_RESERVED_CORES
}

fn required_value(
    name: &str,
    inline_value: Option<String>,
    args: &mut impl Iterator<Item = String>,
) -> Result<String> {
    inline_value
        .or_else(|| args.next())
        .ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn check_path(path_str: &str) -> Option<PathBuf> {
    let path_str = path_str.trim();
    if path_str.is_empty() || path_str == "-" {
        None
    } else {
        normalize_path(path_str).ok()
    }
}

fn normalize_path(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if path == PathBuf::new() {
        return Ok(path);
    }
    std::path::absolute(&path).map_err(Error::Io)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
