//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT, SIGTERM and SIGQUIT up front, so a
//!   registration failure is a fatal startup error
//! - Translate signals to internal events
//! - Relay terminal events to the shutdown coordinator
//!
//! # Design Decisions
//! - SIGQUIT dumps service status and keeps the server running
//! - SIGINT/SIGTERM trigger graceful shutdown; one trigger is enough
//! - A closed signal stream also triggers shutdown: better to stop cleanly
//!   than to keep running without lifecycle control
//! - Non-unix builds fall back to Ctrl+C only

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

use crate::lifecycle::shutdown::Shutdown;

/// Internal event a received signal maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalEvent {
    /// SIGINT or SIGTERM, carrying the signal name for the log.
    Terminate(&'static str),
    /// SIGQUIT: report status, keep serving.
    DumpStatus,
    /// A signal stream closed; nothing unexpected should reach us, so exit.
    Closed,
}

/// React to one signal event. Returns whether the relay should keep running.
fn handle_event(event: SignalEvent, shutdown: &Shutdown, version: &str) -> bool {
    match event {
        SignalEvent::DumpStatus => {
            tracing::info!(version, "service status");
            true
        }
        SignalEvent::Terminate(signal) => {
            tracing::info!(signal, "shutdown signal received");
            shutdown.trigger();
            false
        }
        SignalEvent::Closed => {
            tracing::warn!("signal stream closed unexpectedly, shutting down");
            shutdown.trigger();
            false
        }
    }
}

fn event_for(received: Option<()>, name: &'static str) -> SignalEvent {
    match received {
        Some(()) => SignalEvent::Terminate(name),
        None => SignalEvent::Closed,
    }
}

/// Registered signal streams.
///
/// Registration happens in `new` so the process can fail fast before the
/// listener starts; the relay loop then owns the streams for the rest of
/// the process lifetime.
#[cfg(unix)]
pub struct Signals {
    interrupt: Signal,
    terminate: Signal,
    quit: Signal,
}

#[cfg(unix)]
impl Signals {
    /// Register the SIGINT, SIGTERM and SIGQUIT handlers.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Relay loop: block on the signal streams, dump status on SIGQUIT,
    /// trigger shutdown on SIGINT/SIGTERM and exit.
    pub async fn relay(mut self, shutdown: Shutdown, version: String) {
        loop {
            let event = tokio::select! {
                received = self.interrupt.recv() => event_for(received, "SIGINT"),
                received = self.terminate.recv() => event_for(received, "SIGTERM"),
                received = self.quit.recv() => match received {
                    Some(()) => SignalEvent::DumpStatus,
                    None => SignalEvent::Closed,
                },
            };

            if !handle_event(event, &shutdown, &version) {
                return;
            }
        }
    }
}

#[cfg(not(unix))]
pub struct Signals;

#[cfg(not(unix))]
impl Signals {
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }

    /// Ctrl+C-only relay for platforms without unix signals.
    pub async fn relay(self, shutdown: Shutdown, version: String) {
        let event = match tokio::signal::ctrl_c().await {
            Ok(()) => SignalEvent::Terminate("interrupt"),
            Err(_) => SignalEvent::Closed,
        };
        handle_event(event, &shutdown, &version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_dump_keeps_the_relay_running() {
        let shutdown = Shutdown::new();
        assert!(handle_event(SignalEvent::DumpStatus, &shutdown, "0.1"));
        assert!(!shutdown.is_triggered());
    }

    #[test]
    fn terminate_triggers_shutdown_and_stops_the_relay() {
        let shutdown = Shutdown::new();
        assert!(!handle_event(
            SignalEvent::Terminate("SIGTERM"),
            &shutdown,
            "0.1"
        ));
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn closed_stream_counts_as_a_shutdown_request() {
        let shutdown = Shutdown::new();
        assert!(!handle_event(SignalEvent::Closed, &shutdown, "0.1"));
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn stream_end_maps_to_closed() {
        assert_eq!(event_for(None, "SIGINT"), SignalEvent::Closed);
        assert_eq!(
            event_for(Some(()), "SIGTERM"),
            SignalEvent::Terminate("SIGTERM")
        );
    }
}
