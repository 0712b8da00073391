// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! Poll multiplexer (component J): a two-source readiness registry built on
//! `mio::Poll`, replacing the original's growable `(fd, callback)` table with
//! a pair of fixed tokens, since exactly two sources are ever registered.

use std::os::unix::io::RawFd;
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};

use crate::error::{AdapterError, Result};

const TOKEN_HOST: Token = Token(0);
const TOKEN_AUDIO: Token = Token(1);

/// Which registered sources were readable after a `wait()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Readiness {
    pub host: bool,
    pub audio: bool,
}

pub struct Multiplexer {
    poll: Poll,
    events: Events,
}

impl Multiplexer {
    pub fn new() -> Result<Self> {
        let poll = Poll::new().map_err(AdapterError::Poll)?;
        Ok(Self {
            poll,
            events: Events::with_capacity(4),
        })
    }

    /// Register the TCP host connection for read readiness.
    pub fn register_host(&mut self, fd: RawFd) -> Result<()> {
        log::debug!("registering host socket fd {fd} with poll multiplexer");
        self.poll
            .registry()
            .register(&mut SourceFd(&fd), TOKEN_HOST, Interest::READABLE)
            .map_err(AdapterError::Poll)
    }

    /// Register the audio device's poll descriptor for write readiness.
    pub fn register_audio(&mut self, fd: RawFd) -> Result<()> {
        log::debug!("registering audio device fd {fd} with poll multiplexer");
        self.poll
            .registry()
            .register(&mut SourceFd(&fd), TOKEN_AUDIO, Interest::WRITABLE)
            .map_err(AdapterError::Poll)
    }

    /// Block for up to `timeout`, returning which sources became ready.
    /// A timeout with no readiness returns `Readiness::default()`.
    pub fn wait(&mut self, timeout: Duration) -> Result<Readiness> {
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                return Ok(Readiness::default())
            }
            Err(e) => return Err(AdapterError::Poll(e)),
        }
        let mut ready = Readiness::default();
        for event in self.events.iter() {
            match event.token() {
                TOKEN_HOST => ready.host = true,
                TOKEN_AUDIO => ready.audio = true,
                _ => {}
            }
        }
        Ok(ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_times_out_with_no_sources_registered() {
        let mut mux = Multiplexer::new().unwrap();
        let ready = mux.wait(Duration::from_millis(5)).unwrap();
        assert!(!ready.host);
        assert!(!ready.audio);
    }
}
