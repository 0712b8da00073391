// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 plato-bridge contributors

//! TCP connection to the CYBER host, plus best-effort keyset delivery.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, TcpKeepalive, Type};

use crate::error::{AdapterError, Result};

/// Interval between TCP keepalive probes.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub struct HostConnection {
    stream: TcpStream,
}

impl HostConnection {
    /// Resolve `host:port` and connect, enabling TCP keepalive so a dead
    /// host is detected without waiting on application-level traffic.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        log::debug!("resolving host {host}:{port}");
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(AdapterError::Host)?
            .next()
            .ok_or_else(|| {
                AdapterError::Host(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no addresses for {host}:{port}"),
                ))
            })?;

        let socket2 = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(AdapterError::Host)?;
        socket2.connect(&addr.into()).map_err(AdapterError::Host)?;
        let keepalive = TcpKeepalive::new().with_time(KEEPALIVE_INTERVAL);
        socket2
            .set_tcp_keepalive(&keepalive)
            .map_err(AdapterError::Host)?;
        log::debug!("connected to host {addr}, keepalive={KEEPALIVE_INTERVAL:?}");

        let stream: TcpStream = socket2.into();
        stream.set_nonblocking(true).map_err(AdapterError::Host)?;
        Ok(Self { stream })
    }

    /// Raw fd for poll registration.
    #[cfg(unix)]
    pub fn as_raw_fd(&self) -> std::os::unix::io::RawFd {
        use std::os::unix::io::AsRawFd;
        self.stream.as_raw_fd()
    }

    /// Read up to 3 bytes of a framed host word into `buf`, returning the
    /// number of bytes read (0 on a would-block condition).
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Send a decoded key to the host as two bytes, best-effort: a short
    /// or failed write is logged and dropped, not retried, matching the
    /// original's fire-and-forget `send()`.
    pub fn send_key(&mut self, bytes: [u8; 2]) {
        match self.stream.write(&bytes) {
            Ok(n) if n == bytes.len() => {}
            Ok(n) => log::warn!("short key write: {n}/{}", bytes.len()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                log::warn!("key write would block, dropping key");
            }
            Err(e) => log::warn!("key write failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn connect_and_round_trip_a_key() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.set_nonblocking(false).unwrap();
            let mut buf = [0u8; 2];
            sock.read_exact(&mut buf).unwrap();
            buf
        });

        let mut conn = HostConnection::connect("127.0.0.1", addr.port()).unwrap();
        conn.send_key([0x02, 0xC5]);
        let received = server.join().unwrap();
        assert_eq!(received, [0x02, 0xC5]);
    }
}
