use crate::error::{Result, SerialDateError};
use log::{error, info, warn};
use std::io::Write;
use std::time::Duration;
pub use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, StopBits};

/// serial port baud rate
pub const COMMON_BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115200];

/// default write/read timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// fixed port candidates, named the way the platform names them
pub fn default_candidate_ports() -> Vec<String> {
    if cfg!(windows) {
        (1..=9).map(|i| format!("COM{i}")).collect()
    } else {
        let usb = (0..4).map(|i| format!("/dev/ttyUSB{i}"));
        let acm = (0..4).map(|i| format!("/dev/ttyACM{i}"));
        usb.chain(acm).collect()
    }
}

/// Ports reported by the serial layer, followed by any fixed candidate that
/// was not reported. Order is stable and names are unique.
pub fn merge_port_names(enumerated: Vec<String>, candidates: &[String]) -> Vec<String> {
    let mut names = Vec::with_capacity(enumerated.len() + candidates.len());
    for name in enumerated.into_iter().chain(candidates.iter().cloned()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// list serial ports, falling back to the fixed candidates on failure
pub fn list_ports(candidates: &[String]) -> Vec<String> {
    let enumerated = match tokio_serial::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!("Error listing ports: {e}");
            Vec::new()
        }
    };
    merge_port_names(enumerated, candidates)
}

/// serial port settings
#[derive(Clone, Debug, PartialEq)]
pub struct PortSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    pub timeout: Duration,
}

impl PortSettings {
    /// 8N1 settings without flow control for the given port
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        PortSettings {
            port_name: port_name.into(),
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// override the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A byte sink the connection writes payloads to.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send {
    /// name of the underlying port
    fn name(&self) -> String;

    /// write every byte, blocking at most for the configured timeout
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

/// Opens transports from port settings.
#[cfg_attr(test, mockall::automock)]
pub trait PortOpener: Send + Sync {
    fn open(&self, settings: &PortSettings) -> Result<Box<dyn Transport>>;
}

/// [`Transport`] backed by a native serial port.
pub struct SerialTransport {
    port_name: String,
    port: Box<dyn SerialPort>,
}

impl Transport for SerialTransport {
    fn name(&self) -> String {
        self.port.name().unwrap_or_else(|| self.port_name.clone())
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        info!("Released serial port {}", self.port_name);
    }
}

/// [`PortOpener`] that opens real devices through `tokio_serial`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortOpener;

impl PortOpener for SerialPortOpener {
    fn open(&self, settings: &PortSettings) -> Result<Box<dyn Transport>> {
        match tokio_serial::new(settings.port_name.as_str(), settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .flow_control(settings.flow_control)
            .timeout(settings.timeout)
            .open()
        {
            Ok(port) => {
                info!("Opened serial port: {}", settings.port_name);
                Ok(Box::new(SerialTransport {
                    port_name: settings.port_name.clone(),
                    port,
                }))
            }
            Err(e) => {
                error!("Unable to open serial port {}: {}", settings.port_name, e);
                Err(SerialDateError::port_open(&settings.port_name, e.to_string()))
            }
        }
    }
}
