//! CLI args

use std::fmt::Display;

use clap::{Parser, Subcommand};

/// Packs sample values and decodes tagged buffers
#[derive(Parser)]
#[clap(version, about)]
pub(crate) struct InspectArgs {
    /// Log verbosity, passed on to `RUST_LOG`
    #[clap(short, long)]
    #[clap(default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Pack the sample values and dump them.
    Demo {
        /// Prefix every value with its type info.
        #[clap(short, long)]
        tagged: bool,
    },

    /// Decode a buffer of tagged values, one after another.
    Decode {
        /// The buffer as hex digits. Whitespace is ignored.
        hex: String,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_ascii_lowercase())
    }
}

/// Parse hex digits into bytes. Whitespace between digits is ignored.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();

    hex::decode(digits).map_err(|e| format!("bad hex input: {}", e))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("12 05000000"), Ok(vec![0x12, 5, 0, 0, 0]));
        assert_eq!(parse_hex("fF\n0a"), Ok(vec![0xff, 0x0a]));
        assert_eq!(parse_hex(""), Ok(vec![]));

        assert!(parse_hex("123").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_args() {
        InspectArgs::command().debug_assert();

        let args = InspectArgs::parse_from(["pack_inspect", "-l", "trace", "decode", "1205000000"]);
        assert_eq!(args.log_level.to_string(), "trace");
        assert!(matches!(args.command, Command::Decode { ref hex } if hex == "1205000000"));

        let args = InspectArgs::parse_from(["pack_inspect", "demo", "--tagged"]);
        assert_eq!(args.log_level.to_string(), "info");
        assert!(matches!(args.command, Command::Demo { tagged: true }));
    }
}
