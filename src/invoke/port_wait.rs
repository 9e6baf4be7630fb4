use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortWaitError {
    #[error("timed out after {timeout_ms}ms waiting for port {port} to open")]
    Timeout { port: u16, timeout_ms: u64 },
}

/// Probes `127.0.0.1:port` every `interval` until a connection succeeds or `timeout` elapses.
pub fn wait_until_open(port: u16, interval: Duration, timeout: Duration) -> Result<(), PortWaitError> {
    let address = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let probe_timeout = interval.max(Duration::from_millis(1));
    let start = Instant::now();

    loop {
        if TcpStream::connect_timeout(&address, probe_timeout).is_ok() {
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(PortWaitError::Timeout {
                port,
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        thread::sleep(interval.min(timeout - elapsed));
    }
}
