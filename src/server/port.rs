//! Port probing and listener binding
//!
//! Socket-level, framework-independent: the listener is bound here and then
//! handed to the HTTP server, so there is no window between "port checked"
//! and "port taken".

use crate::config::Settings;
use crate::error::{DemoError, Result};
use std::net::TcpListener;
use tracing::{info, warn};

/// How many ascending ports auto-port will try before giving up
pub const MAX_PORT_ATTEMPTS: u16 = 100;

/// Check whether `host:port` can currently be bound
pub fn is_port_available(host: &str, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}

/// Find the first bindable port at or after `start`
pub fn find_available_port(host: &str, start: u16, max_attempts: u16) -> Result<u16> {
    for offset in 0..max_attempts {
        let Some(port) = start.checked_add(offset) else {
            break;
        };
        if is_port_available(host, port) {
            return Ok(port);
        }
    }
    Err(DemoError::NoAvailablePort {
        start,
        end: start.saturating_add(max_attempts),
    })
}

/// Bind the server listener according to the configured port policy.
///
/// Without auto-port, an occupied port is a fatal startup error. With it,
/// ascending ports are probed and the first free one is bound and reported.
pub fn bind(settings: &Settings) -> Result<(TcpListener, u16)> {
    match TcpListener::bind((settings.host.as_str(), settings.port)) {
        Ok(listener) => Ok((listener, settings.port)),
        Err(_) if settings.auto_port => {
            warn!(
                "Port {} is occupied, searching for an available port...",
                settings.port
            );
            for offset in 1..MAX_PORT_ATTEMPTS {
                let Some(port) = settings.port.checked_add(offset) else {
                    break;
                };
                if let Ok(listener) = TcpListener::bind((settings.host.as_str(), port)) {
                    info!("Found available port: {}", port);
                    return Ok((listener, port));
                }
            }
            Err(DemoError::NoAvailablePort {
                start: settings.port,
                end: settings.port.saturating_add(MAX_PORT_ATTEMPTS),
            })
        }
        Err(_) => Err(DemoError::PortInUse {
            port: settings.port,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "127.0.0.1";

    /// Grab an ephemeral port that is guaranteed occupied while `_guard` lives
    fn occupied_port() -> (TcpListener, u16) {
        let guard = TcpListener::bind((HOST, 0)).unwrap();
        let port = guard.local_addr().unwrap().port();
        (guard, port)
    }

    #[test]
    fn test_occupied_port_is_unavailable() {
        let (_guard, port) = occupied_port();
        assert!(!is_port_available(HOST, port));
    }

    #[test]
    fn test_find_available_port_skips_occupied() {
        let (_guard, port) = occupied_port();
        let found = find_available_port(HOST, port, 50).unwrap();
        assert!(found > port);
        assert!(is_port_available(HOST, found));
    }

    #[test]
    fn test_find_available_port_exhausts() {
        let (_guard, port) = occupied_port();
        let err = find_available_port(HOST, port, 1).unwrap_err();
        assert!(matches!(err, DemoError::NoAvailablePort { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_bind_without_auto_port_fails_on_occupied() {
        let (_guard, port) = occupied_port();
        let settings = Settings {
            host: HOST.to_string(),
            port,
            auto_port: false,
            ..Settings::default()
        };
        let err = bind(&settings).unwrap_err();
        assert!(matches!(err, DemoError::PortInUse { .. }));
    }

    #[test]
    fn test_bind_with_auto_port_moves_to_next_free_port() {
        let (_guard, port) = occupied_port();
        let settings = Settings {
            host: HOST.to_string(),
            port,
            auto_port: true,
            ..Settings::default()
        };
        let (listener, bound_port) = bind(&settings).unwrap();
        assert!(bound_port > port);
        assert_eq!(listener.local_addr().unwrap().port(), bound_port);
    }
}
