//! Startup configuration parsed from the command line.
//!
//! Values are parsed one field at a time. A malformed value falls back to
//! that field's default and is reported as a [`ConfigWarning`]; the other
//! fields keep whatever was given.

use clap::Parser;
use shared::{DEFAULT_MAX_SESSIONS, DEFAULT_PORT};
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "One in a Million guessing game server")]
struct Args {
    /// IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,
    /// Port to listen on (0 picks a free port) [default: 0]
    #[arg(short, long)]
    port: Option<String>,
    /// Maximum number of concurrent game sessions [default: 10]
    #[arg(short, long)]
    max_sessions: Option<String>,
    /// Also write log output to server_output.log
    #[arg(long)]
    log_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_sessions: usize,
    pub log_file: bool,
}

/// A value that could not be used and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub value: String,
    pub default: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid --{} value '{}', using default {}",
            self.field, self.value, self.default
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_sessions: DEFAULT_MAX_SESSIONS as usize,
            log_file: false,
        }
    }
}

impl ServerConfig {
    /// Parses a full argument list, program name first.
    ///
    /// Malformed values fall back per field and come back as warnings. An
    /// error is only returned when the arguments cannot be attributed to a
    /// field at all (unknown flags, missing values, `--help`).
    pub fn from_args<I, T>(args: I) -> Result<(Self, Vec<ConfigWarning>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args)?;
        let mut warnings = Vec::new();

        let port = lenient(
            "port",
            args.port,
            DEFAULT_PORT,
            |_: &u16| true,
            &mut warnings,
        );
        let max_sessions = lenient(
            "max-sessions",
            args.max_sessions,
            DEFAULT_MAX_SESSIONS,
            |n: &u32| *n >= 1,
            &mut warnings,
        );

        let config = Self {
            host: args.host,
            port,
            max_sessions: max_sessions as usize,
            log_file: args.log_file,
        };
        Ok((config, warnings))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses `raw` if present, falling back to `default` when it is malformed
/// or rejected by `valid`.
fn lenient<T, V>(
    field: &'static str,
    raw: Option<String>,
    default: T,
    valid: V,
    warnings: &mut Vec<ConfigWarning>,
) -> T
where
    T: FromStr + fmt::Display,
    V: Fn(&T) -> bool,
{
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warnings.push(ConfigWarning {
                field,
                value: raw,
                default: default.to_string(),
            });
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let (config, warnings) = ServerConfig::from_args(["server"]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert!(warnings.is_empty());
        assert_eq!(config.max_sessions, 10);
        assert_eq!(config.address(), "0.0.0.0:0");
    }

    #[test]
    fn test_explicit_arguments() {
        let (config, warnings) = ServerConfig::from_args([
            "server",
            "--host",
            "127.0.0.1",
            "-p",
            "4000",
            "-m",
            "3",
            "--log-file",
        ])
        .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(config.address(), "127.0.0.1:4000");
        assert_eq!(config.max_sessions, 3);
        assert!(config.log_file);
    }

    #[test]
    fn test_bad_value_keeps_other_fields() {
        let (config, warnings) =
            ServerConfig::from_args(["server", "--port", "4000", "--max-sessions", "abc"])
                .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.max_sessions, 10);
        assert_eq!(
            warnings,
            vec![ConfigWarning {
                field: "max-sessions",
                value: "abc".to_string(),
                default: "10".to_string(),
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "invalid --max-sessions value 'abc', using default 10"
        );
    }

    #[test]
    fn test_each_bad_value_falls_back() {
        let (config, warnings) =
            ServerConfig::from_args(["server", "--port", "70000", "-m", "0", "--log-file"])
                .unwrap();

        assert_eq!(config.port, 0);
        assert_eq!(config.max_sessions, 10);
        assert!(config.log_file);
        let fields: Vec<&str> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(fields, vec!["port", "max-sessions"]);
    }

    #[test]
    fn test_unattributable_arguments_are_errors() {
        assert!(ServerConfig::from_args(["server", "--bogus"]).is_err());
        assert!(ServerConfig::from_args(["server", "--port"]).is_err());
    }
}
