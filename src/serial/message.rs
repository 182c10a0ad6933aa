//! # Message Module
//!
//! The outgoing payload and the send operation.
//!
//! The wire format is one compact JSON object with four string keys, in this
//! order: `time` (`"HH:MM"`), `day`, `month`, `year`. Nothing is read back.

use super::SerialConnection;
use super::status::ConnectionStatus;
use crate::error::{Result, SerialDateError};
use crate::form::DateTimeForm;
use log::{error, info, warn};
use serde::Serialize;

/// Payload built fresh for every send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub time: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

impl OutgoingMessage {
    /// Copies the form fields verbatim.
    pub fn from_form(form: &DateTimeForm) -> Self {
        Self {
            time: format!("{}:{}", form.hour, form.minute),
            day: form.day.clone(),
            month: form.month.clone(),
            year: form.year.clone(),
        }
    }

    /// compact JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serializes the form and writes it to the open port.
///
/// Returns the exact JSON text written. The connection status is updated
/// with the outcome.
pub fn send_parameters(connection: &mut SerialConnection, form: &DateTimeForm) -> Result<String> {
    if !connection.is_open() {
        warn!("Send rejected: no serial port is open");
        connection.set_status(ConnectionStatus::ConnectFirst);
        return Err(SerialDateError::NotConnected);
    }

    let json = OutgoingMessage::from_form(form).to_json()?;
    match connection.write(json.as_bytes()) {
        Ok(()) => {
            info!("Data sent: {json}");
            connection.set_status(ConnectionStatus::Sent(json.clone()));
            Ok(json)
        }
        Err(e) => {
            error!("{e}");
            connection.set_status(ConnectionStatus::Error(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::port::{MockPortOpener, MockTransport, PortSettings, Transport};
    use crate::serial::tests::{RecordingTransport, recording_opener};
    use std::io;

    fn form() -> DateTimeForm {
        DateTimeForm {
            hour: "07".into(),
            minute: "30".into(),
            day: "04".into(),
            month: "07".into(),
            year: "2025".into(),
        }
    }

    #[test]
    fn test_message_json_matches_wire_format() {
        let json = OutgoingMessage::from_form(&form()).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"time":"07:30","day":"04","month":"07","year":"2025"}"#
        );
    }

    #[test]
    fn test_message_keeps_fields_verbatim() {
        let form = DateTimeForm {
            hour: String::new(),
            minute: "99".into(),
            day: "".into(),
            month: "13".into(),
            year: "25".into(),
        };
        let json = OutgoingMessage::from_form(&form).to_json().unwrap();
        assert_eq!(json, r#"{"time":":99","day":"","month":"13","year":"25"}"#);
    }

    #[test]
    fn test_message_escapes_quotes() {
        let mut form = form();
        form.day = "4\"".into();
        let json = OutgoingMessage::from_form(&form).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["day"], "4\"");
    }

    #[test]
    fn test_send_without_connection_writes_nothing() {
        let mut opener = MockPortOpener::new();
        opener.expect_open().never();
        let mut connection = SerialConnection::new(opener);

        let result = send_parameters(&mut connection, &form());

        assert!(matches!(result, Err(SerialDateError::NotConnected)));
        assert_eq!(connection.status(), &ConnectionStatus::ConnectFirst);
        assert!(connection.status().to_string().contains("connect"));
    }

    #[test]
    fn test_send_after_open_writes_utf8_json() {
        let transport = RecordingTransport::new("COM3");
        let written = transport.written.clone();
        let mut slot = Some(transport);
        let mut opener = MockPortOpener::new();
        opener.expect_open().returning(move |_| {
            let transport = slot.take().expect("opened once");
            Ok(Box::new(transport) as Box<dyn Transport>)
        });
        let mut connection = SerialConnection::new(opener);
        connection.open(PortSettings::new("COM3", 9600)).unwrap();

        let json = send_parameters(&mut connection, &form()).unwrap();

        assert_eq!(written.lock().unwrap().as_slice(), json.as_bytes());
        let value: serde_json::Value = serde_json::from_slice(&written.lock().unwrap()).unwrap();
        assert_eq!(value["time"], "07:30");
        assert_eq!(connection.status(), &ConnectionStatus::Sent(json));
    }

    #[test]
    fn test_send_after_close_is_rejected() {
        let mut connection = SerialConnection::new(recording_opener());
        connection.open(PortSettings::new("COM3", 9600)).unwrap();
        connection.close();

        assert!(send_parameters(&mut connection, &form()).is_err());
        assert_eq!(connection.status(), &ConnectionStatus::ConnectFirst);
    }

    #[test]
    fn test_write_failure_sets_error_status() {
        let mut transport = MockTransport::new();
        transport.expect_name().return_const("COM3".to_string());
        transport
            .expect_write_all()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged")));
        let mut slot = Some(transport);
        let mut opener = MockPortOpener::new();
        opener.expect_open().returning(move |_| {
            let transport = slot.take().expect("opened once");
            Ok(Box::new(transport) as Box<dyn Transport>)
        });
        let mut connection = SerialConnection::new(opener);
        connection.open(PortSettings::new("COM3", 9600)).unwrap();

        let result = send_parameters(&mut connection, &form());

        assert!(matches!(result, Err(SerialDateError::PortWrite(_))));
        match connection.status() {
            ConnectionStatus::Error(text) => assert!(text.contains("device unplugged")),
            other => panic!("unexpected status: {other}"),
        }
    }
}
