// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! Error types for the adapter's fallible setup paths.

use std::fmt;
use std::io;

/// Result type for fallible adapter setup.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while bringing the adapter up.
///
/// Steady-state per-event failures (a bad frame, a short SPI transfer) are
/// logged in place and do not flow through this type; only initialization
/// failures are fatal, per the error-handling policy in SPEC_FULL.md §7.
#[derive(Debug)]
pub enum AdapterError {
    /// Failed to open or configure the SPI device.
    Spi(io::Error),

    /// Failed to open or configure the ALSA playback device.
    Audio(alsa::Error),

    /// Failed to resolve or connect the host TCP session.
    Host(io::Error),

    /// Failed to register a source with the poll multiplexer.
    Poll(io::Error),

    /// Command-line argument was syntactically valid but semantically bad.
    Config(String),
}

impl AdapterError {
    /// Best-effort OS error code for this failure, used as the process exit
    /// status. Falls back to 1 when no errno is available (e.g. the ALSA
    /// and config variants).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Spi(e) | Self::Host(e) | Self::Poll(e) => e.raw_os_error().unwrap_or(1),
            Self::Audio(_) | Self::Config(_) => 1,
        }
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI device error: {e}"),
            Self::Audio(e) => write!(f, "audio device error: {e}"),
            Self::Host(e) => write!(f, "host connection error: {e}"),
            Self::Poll(e) => write!(f, "poll registration error: {e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spi(e) | Self::Host(e) | Self::Poll(e) => Some(e),
            Self::Audio(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<alsa::Error> for AdapterError {
    fn from(e: alsa::Error) -> Self {
        Self::Audio(e)
    }
}
