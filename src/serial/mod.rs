//! # Serial Module
//!
//! Owns the (at most one) open serial port and the plugin that registers it.
//!
//! - [`port`]: port settings, candidate port names and the transport seam
//! - [`message`]: the JSON payload and the send operation
//! - [`status`]: the status line model

pub mod message;
pub mod port;
pub mod status;

use crate::error::{Result, SerialDateError};
use bevy::app::AppExit;
use bevy::prelude::*;
use log::{error, info};
use port::{PortOpener, PortSettings, SerialPortOpener, Transport};
use status::ConnectionStatus;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Plugin-level configuration; there is no config file.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SerialConfig {
    pub baud_rates: Vec<u32>,
    pub candidate_ports: Vec<String>,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rates: port::COMMON_BAUD_RATES.to_vec(),
            candidate_ports: port::default_candidate_ports(),
            timeout: port::DEFAULT_TIMEOUT,
        }
    }
}

impl SerialConfig {
    /// Rejects configurations the selectors cannot render.
    pub fn validate(&self) -> Result<()> {
        if self.baud_rates.is_empty() {
            return Err(SerialDateError::invalid_config("baud rate list is empty"));
        }
        if self.candidate_ports.is_empty() {
            return Err(SerialDateError::invalid_config("candidate port list is empty"));
        }
        Ok(())
    }

    /// settings for opening `port_name`
    pub fn port_settings(&self, port_name: impl Into<String>, baud_rate: u32) -> PortSettings {
        PortSettings::new(port_name, baud_rate).with_timeout(self.timeout)
    }
}

struct ActivePort {
    settings: PortSettings,
    transport: Mutex<Box<dyn Transport>>,
}

/// The connection manager: zero or one open transport plus the last status.
#[derive(Resource)]
pub struct SerialConnection {
    opener: Box<dyn PortOpener>,
    active: Option<ActivePort>,
    status: ConnectionStatus,
}

impl SerialConnection {
    pub fn new(opener: impl PortOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            active: None,
            status: ConnectionStatus::NotConnected,
        }
    }

    /// Opens a port, releasing any previously open one first.
    ///
    /// On failure the manager is left disconnected and the status carries
    /// the underlying error text.
    pub fn open(&mut self, settings: PortSettings) -> Result<()> {
        self.close();
        match self.opener.open(&settings) {
            Ok(transport) => {
                info!(
                    "Connected to {} at {} baud",
                    transport.name(),
                    settings.baud_rate
                );
                self.status = ConnectionStatus::Connected {
                    port: settings.port_name.clone(),
                    baud_rate: settings.baud_rate,
                };
                self.active = Some(ActivePort {
                    settings,
                    transport: Mutex::new(transport),
                });
                Ok(())
            }
            Err(e) => {
                error!("Connect failed: {e}");
                self.status = ConnectionStatus::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Releases the open port, if any.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            info!("Closing serial port {}", active.settings.port_name);
            self.status = ConnectionStatus::Disconnected(active.settings.port_name);
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// settings of the open port
    pub fn settings(&self) -> Option<&PortSettings> {
        self.active.as_ref().map(|active| &active.settings)
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    /// Writes raw bytes to the open port.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let active = self.active.as_mut().ok_or(SerialDateError::NotConnected)?;
        let transport = active
            .transport
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        transport
            .write_all(bytes)
            .map_err(|e| SerialDateError::port_write(e.to_string()))
    }
}

impl Default for SerialConnection {
    fn default() -> Self {
        Self::new(SerialPortOpener)
    }
}

/// Registers [`SerialConfig`] and [`SerialConnection`].
///
/// ```no_run
/// use bevy::prelude::*;
/// use serial_datetime::serial::SerialPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(SerialPlugin::default().with_baud_rates([9600, 115200]));
/// ```
#[derive(Default)]
pub struct SerialPlugin {
    config: SerialConfig,
}

impl SerialPlugin {
    /// Replace the selectable baud rates
    pub fn with_baud_rates(mut self, baud_rates: impl IntoIterator<Item = u32>) -> Self {
        self.config.baud_rates = baud_rates.into_iter().collect();
        self
    }

    /// Replace the fixed port candidates
    pub fn with_candidate_ports<S: Into<String>>(
        mut self,
        ports: impl IntoIterator<Item = S>,
    ) -> Self {
        self.config.candidate_ports = ports.into_iter().map(Into::into).collect();
        self
    }

    /// Set the port timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// The configuration this plugin will install
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

impl Plugin for SerialPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                error!("{e}, using defaults");
                SerialConfig::default()
            }
        };
        app.insert_resource(config)
            .insert_resource(SerialConnection::default())
            .add_systems(Last, close_on_exit);
    }
}

/// System: release the port when the app exits.
fn close_on_exit(mut exit_events: MessageReader<AppExit>, mut connection: ResMut<SerialConnection>) {
    if !exit_events.is_empty() {
        exit_events.clear();
        connection.close();
    }
}
