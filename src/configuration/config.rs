use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error_handling::types::ConfigError;

/// Application configuration structure that defines all runtime parameters.
///
/// The same structure backs both configuration paths: `clap` parses it from
/// command-line flags, `toml` deserializes it from a configuration file.
/// Whichever path produced it, the result goes through [`Config::validate`]
/// before anything else sees it.
///
/// # Fields Overview
///
/// - `config_file`: optional TOML file that replaces the flag values
/// - `bind_address`: IP address the HTTP server listens on
/// - `port`: TCP port of the HTTP server
/// - `database_path`: location of the SQLite session directory file
/// - `host_interface`: optional pinned interface for host identity
#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "ruche")]
#[command(version)]
#[command(about = "A login session directory service")]
pub struct Config {
    /// Optional TOML configuration file.
    ///
    /// When given, the file's values replace the command-line flags
    /// entirely; there is no per-field merging between the two sources.
    #[arg(value_name = "CONFIG_FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Network address to bind the HTTP server to.
    ///
    /// # Command Line
    /// Use `--bind-address <ADDRESS>` to set this value from the CLI
    #[arg(long, default_value = "0.0.0.0")]
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port number for the HTTP server.
    ///
    /// Should not be reserved by IANA so mostly in the range of
    /// 1024 - 65535 both included
    ///
    /// # Command Line
    /// Use `--port <PORT>` to set this value from the CLI
    #[arg(long, default_value_t = 8080)]
    #[serde(default = "default_port")]
    pub port: u16,

    /// File system path of the SQLite session directory.
    ///
    /// # Command Line
    /// Use `--database-path <PATH>` to set this value from the CLI
    #[arg(long, default_value = "ruche.sqlite3")]
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Network interface whose address identifies this host.
    ///
    /// When unset, interfaces are sorted by name and the first non-loopback
    /// IPv4 one wins; pinning a name here keeps the reported host identity
    /// stable on multi-homed machines.
    ///
    /// # Command Line
    /// Use `--host-interface <NAME>` to set this value from the CLI
    #[arg(long)]
    #[serde(default)]
    pub host_interface: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("ruche.sqlite3")
}

impl Config {
    /// Creates a `Config` from the command-line arguments and validates it.
    ///
    /// Argument-level errors (unknown flags, unparseable values) are
    /// reported by `clap` itself; this method only adds the semantic
    /// validation shared with the file path.
    pub fn from_args() -> Result<Self, ConfigError> {
        let config = Config::parse();
        config.validate()?;
        Ok(config)
    }

    /// Creates a `Config` from a TOML file and validates it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic validation applied to both configuration sources.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address.parse::<IpAddr>().map_err(|_| {
            ConfigError::BadIPFormatting(format!("not an IP address: {}", self.bind_address))
        })?;
        if self.port < 1024 {
            return Err(ConfigError::BadPortsRange(format!(
                "port {} is reserved, use 1024-65535",
                self.port
            )));
        }
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::DirectoryDoesNotExist(format!(
                    "{}",
                    parent.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse_from(args: &[&str]) -> Result<Config, clap::Error> {
        let mut full = vec!["ruche"];
        full.extend_from_slice(args);
        Config::try_parse_from(full)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = parse_from(&[]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("ruche.sqlite3"));
        assert!(config.host_interface.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse_from(&[
            "--bind-address",
            "127.0.0.1",
            "--port",
            "9090",
            "--host-interface",
            "eth0",
        ])
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.host_interface.as_deref(), Some("eth0"));
    }

    #[test]
    fn test_validate_rejects_bad_bind_address() {
        let config = parse_from(&["--bind-address", "not-an-ip"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadIPFormatting(_))
        ));
    }

    #[test]
    fn test_validate_rejects_reserved_port() {
        let config = parse_from(&["--port", "80"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadPortsRange(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_database_directory() {
        let config = parse_from(&["--database-path", "/no/such/dir/ruche.sqlite3"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DirectoryDoesNotExist(_))
        ));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ruche.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "bind_address = \"127.0.0.1\"").unwrap();
        writeln!(file, "port = 9191").unwrap();
        writeln!(file, "database_path = \"{}\"", dir.path().join("db.sqlite3").display()).unwrap();
        writeln!(file, "host_interface = \"lo\"").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9191);
        assert_eq!(config.host_interface.as_deref(), Some("lo"));
    }

    #[test]
    fn test_from_file_applies_defaults_for_absent_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ruche.toml");
        std::fs::write(&path, "port = 9191\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 9191);
    }

    #[test]
    fn test_from_file_reports_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ruche.toml");
        std::fs::write(&path, "port = \"not a number\"\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        assert!(matches!(
            Config::from_file(Path::new("/no/such/ruche.toml")),
            Err(ConfigError::IoError(_))
        ));
    }
}
