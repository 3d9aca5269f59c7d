//! Command delivery to the robot.
//!
//! The robot reads one ASCII line per command, `"<turn> <distance>\n"`, and
//! executes it before reading the next. There is no acknowledgement, so the
//! sender paces itself with a fixed pause.

use crate::error::{NavError, Result};
use marga_plan::{CycleError, DriveCommand, Transport};
use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info};

/// Wire form of one command
pub fn format_command(command: &DriveCommand) -> String {
    format!("{:.1} {:.1}\n", command.turn_degrees, command.distance)
}

/// TCP link to the robot
pub struct TcpTransport {
    stream: TcpStream,
    pause: Duration,
}

impl TcpTransport {
    /// Connect with timeout
    pub fn connect(addr: &str, timeout: Duration, pause: Duration) -> Result<Self> {
        let sock_addr: SocketAddr = addr
            .to_socket_addrs()
            .map_err(|e| NavError::Config(format!("Invalid address {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| NavError::Config(format!("Address {} did not resolve", addr)))?;
        let stream = TcpStream::connect_timeout(&sock_addr, timeout)?;
        stream.set_nodelay(true)?;
        info!("Connected to robot at {}", sock_addr);

        Ok(Self { stream, pause })
    }

    fn write_command(&mut self, command: &DriveCommand) -> std::io::Result<()> {
        let line = format_command(command);
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        debug!("Sent {}", line.trim_end());
        Ok(())
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, commands: &[DriveCommand]) -> std::result::Result<(), CycleError> {
        for (i, command) in commands.iter().enumerate() {
            self.write_command(command)
                .map_err(|e| CycleError::Transport(format!("command {}: {}", i, e)))?;
            if !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
        }
        Ok(())
    }
}

/// Dry-run transport that only logs
#[derive(Debug, Default)]
pub struct LogTransport {
    sent: Vec<DriveCommand>,
}

impl LogTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "sent" so far
    pub fn sent(&self) -> &[DriveCommand] {
        &self.sent
    }
}

impl Transport for LogTransport {
    fn send(&mut self, commands: &[DriveCommand]) -> std::result::Result<(), CycleError> {
        for command in commands {
            info!(
                "[dry-run] turn {:.1}°, advance {:.1}",
                command.turn_degrees, command.distance
            );
        }
        self.sent.extend_from_slice(commands);
        Ok(())
    }
}
