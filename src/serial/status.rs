use std::fmt;

/// Outcome of the last user action, shown in the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// nothing opened yet
    #[default]
    NotConnected,
    /// port opened
    Connected { port: String, baud_rate: u32 },
    /// send attempted without an open port
    ConnectFirst,
    /// open or write failed
    Error(String),
    /// payload written
    Sent(String),
    /// port explicitly released
    Disconnected(String),
}

impl ConnectionStatus {
    /// whether the status should be rendered as a failure
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::NotConnected
                | ConnectionStatus::ConnectFirst
                | ConnectionStatus::Error(_)
                | ConnectionStatus::Disconnected(_)
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::NotConnected => write!(f, "Not connected"),
            ConnectionStatus::Connected { port, baud_rate } => {
                write!(f, "Connected to {port} at {baud_rate} baud")
            }
            ConnectionStatus::ConnectFirst => {
                write!(f, "Please connect to the serial port first.")
            }
            ConnectionStatus::Error(text) => write!(f, "Error: {text}"),
            ConnectionStatus::Sent(json) => write!(f, "Data Sent: {json}"),
            ConnectionStatus::Disconnected(port) => write!(f, "Disconnected from {port}"),
        }
    }
}
