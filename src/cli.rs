// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! Command-line interface (component K).
//!
//! Preserves the original's distinct process exit codes for bad
//! invocations (2 for an unknown flag, 4 for an unexpected positional) by
//! parsing with `Command::try_get_matches` and inspecting the error kind,
//! rather than letting clap's default `exit(2)`-for-everything behavior
//! collapse the distinction.

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::defaults;

/// TCP-to-SPI protocol adapter and GSW audio synthesizer for PLATO IV terminals.
#[derive(Parser, Debug)]
#[command(name = "plato-bridge", version, about)]
pub struct Args {
    /// Raise the log filter to Debug.
    #[arg(short, long)]
    pub debug: bool,

    /// TCP port to connect to on the CYBER host.
    #[arg(short, long, default_value_t = defaults::PORT)]
    pub port: u16,

    /// SPI clock rate, in Hz.
    #[arg(short = 'r', long = "rate", default_value_t = defaults::SPI_SPEED_HZ)]
    pub spi_speed_hz: u32,

    /// Path to the SPI device.
    #[arg(short = 's', long = "spi-dev", default_value = defaults::SPI_DEVICE)]
    pub spi_dev: String,

    /// CYBER host to connect to.
    #[arg(default_value = defaults::HOST)]
    pub host: String,
}

/// Exit code for a CLI parse failure, matching the original adapter's
/// distinction between an unrecognized flag and surplus positionals.
pub const EXIT_UNKNOWN_FLAG: i32 = 2;
pub const EXIT_EXTRA_POSITIONAL: i32 = 4;

/// Parse `argv`, exiting the process directly on `--help`/`--version` or a
/// parse error (with the original's distinct exit codes), matching clap's
/// own exit semantics for those two cases but not for user-code errors.
pub fn parse() -> Args {
    match Args::command().try_get_matches() {
        Ok(matches) => match Args::from_arg_matches(&matches) {
            Ok(args) => args,
            Err(e) => e.exit(),
        },
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::UnknownArgument => EXIT_UNKNOWN_FLAG,
                ErrorKind::TooManyValues | ErrorKind::UnexpectedValuesAfterPositional => {
                    EXIT_EXTRA_POSITIONAL
                }
                _ => {
                    // --help/--version and all other clap-owned outcomes
                    // print their own message and use clap's exit code.
                    e.exit();
                }
            };
            e.print().ok();
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config() {
        let args = Args::parse_from(["plato-bridge"]);
        assert_eq!(args.port, defaults::PORT);
        assert_eq!(args.spi_speed_hz, defaults::SPI_SPEED_HZ);
        assert_eq!(args.spi_dev, defaults::SPI_DEVICE);
        assert_eq!(args.host, defaults::HOST);
        assert!(!args.debug);
    }

    #[test]
    fn positional_host_overrides_default() {
        let args = Args::parse_from(["plato-bridge", "other.example.org"]);
        assert_eq!(args.host, "other.example.org");
    }

    #[test]
    fn unknown_flag_is_reported_as_unknown_argument() {
        let err = Args::command()
            .try_get_matches_from(["plato-bridge", "--bogus"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
