// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! `plato-bridge`: TCP-to-SPI protocol adapter and GSW audio synthesizer
//! for PLATO IV terminals. See SPEC_FULL.md for the full component
//! breakdown; this file is the bootstrap only (component K).

use std::process::ExitCode;

use plato_bridge::{audio, cli, error, net, session, spi};

fn main() -> ExitCode {
    let args = cli::parse();

    let filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code().clamp(1, 255) as u8)
        }
    }
}

fn run(args: &cli::Args) -> error::Result<()> {
    log::info!(
        "starting plato-bridge: host={} port={} spi_dev={} spi_speed_hz={}",
        args.host,
        args.port,
        args.spi_dev,
        args.spi_speed_hz
    );

    let spi_link =
        spi::SpiLink::open(&args.spi_dev, args.spi_speed_hz).map_err(error::AdapterError::Spi)?;
    let host = net::HostConnection::connect(&args.host, args.port)?;
    let audio = audio::device::AudioDevice::open("hw:0,0")?;

    let mut session = session::Session::new(spi_link, host, audio)?;
    session.run()
}
