pub mod alfred;
pub mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::LookupMode;
use crate::config::{Config, OutputMode};

#[derive(Parser)]
#[command(name = "waktu")]
#[command(about = "Retrieve prayer times", long_about = None)]
pub struct Cli {
    /// Enable debug logs
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output mode
    #[arg(long, value_enum, global = true)]
    pub output: Option<OutputMode>,

    /// Path to the cache database
    #[arg(long, value_name = "DB_FILE", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Retrieve prayer times (default)
    Get {
        /// Zone id (listed by the `zone` command)
        #[arg(long)]
        zone: Option<String>,

        /// Result mode
        #[arg(long, value_enum, default_value_t = LookupMode::Daily)]
        mode: LookupMode,
    },
    /// List all accepted zones
    Zone,
    /// Set the default zone id
    SetZone {
        /// Zone id to use when `--zone` is not given
        zone_id: Option<String>,
    },
    /// Refetch this year's schedule for a zone
    Update {
        /// Zone id (defaults to the preferred zone)
        #[arg(long)]
        zone: Option<String>,
    },
}

impl Cli {
    /// The subcommand to run; `get` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Get {
            zone: None,
            mode: LookupMode::Daily,
        })
    }

    /// Flags override the file and environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.debug {
            config.debug = true;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(db) = &self.db {
            config.db_path = Some(db.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_get() {
        let cli = Cli::try_parse_from(["waktu"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Get {
                zone: None,
                mode: LookupMode::Daily
            }
        );
    }

    #[test]
    fn test_get_with_zone_and_mode() {
        let cli = Cli::try_parse_from(["waktu", "get", "--zone", "jhr01", "--mode", "weekly"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Get {
                zone: Some("jhr01".into()),
                mode: LookupMode::Weekly
            }
        );
    }

    #[test]
    fn test_global_flags_apply() {
        let cli =
            Cli::try_parse_from(["waktu", "zone", "--output", "alfred", "-d", "--db", "/tmp/w.db"])
                .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);

        assert!(config.debug);
        assert!(config.is_alfred());
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/w.db")));
    }

    #[test]
    fn test_set_zone_argument() {
        let cli = Cli::try_parse_from(["waktu", "set-zone", "SGR01"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::SetZone {
                zone_id: Some("SGR01".into())
            }
        );
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["waktu", "get", "--mode", "hourly"]).is_err());
    }
}
