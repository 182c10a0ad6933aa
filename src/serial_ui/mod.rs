//! # Serial UI Module
//!
//! The single-window form, drawn with egui inside a `CentralPanel`:
//! - port and baud selectors with a connect button
//! - hour/minute and day/month/year entries plus a calendar picker
//! - a send button and the status line
//!
//! Clicks are recorded into [`UiRequests`] while drawing and applied by the
//! systems chained after [`serial_ui`].

pub mod ui;

use crate::form::DateTimeForm;
use crate::serial::message::send_parameters;
use crate::serial::port::list_ports;
use crate::serial::{SerialConfig, SerialConnection};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use chrono::NaiveDateTime;
use log::info;
pub use ui::{CalendarDate, PortSelection, UiRequests};
use ui::{
    draw_actions, draw_baud_rate_selector, draw_calendar, draw_date_fields, draw_port_selector,
    draw_status, draw_time_fields,
};

/// Plugin for the serial UI.
pub struct SerialUiPlugin;

impl Plugin for SerialUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .insert_resource(ClearColor(Color::srgb(0.96875, 0.96875, 0.96875)))
            .init_resource::<PortSelection>()
            .init_resource::<CalendarDate>()
            .init_resource::<UiRequests>()
            .add_systems(Startup, (setup_camera_system, init_port_selection))
            .add_systems(
                EguiPrimaryContextPass,
                (
                    serial_ui,          // draw the form
                    apply_ui_requests,  // connect / disconnect / now / send
                )
                    .chain(),
            );
    }
}

fn setup_camera_system(mut commands: Commands) {
    // Basic 2D camera required for egui overlay.
    commands.spawn(Camera2d);
}

/// System: fill the port list and pick the first port and baud rate.
fn init_port_selection(config: Res<SerialConfig>, mut selection: ResMut<PortSelection>) {
    selection.set_ports(list_ports(&config.candidate_ports));
    if let Some(baud_rate) = config.baud_rates.first() {
        selection.baud_rate = *baud_rate;
    }
}

/// System: draw the whole form.
fn serial_ui(
    mut contexts: EguiContexts,
    config: Res<SerialConfig>,
    connection: Res<SerialConnection>,
    mut selection: ResMut<PortSelection>,
    mut form: ResMut<DateTimeForm>,
    mut calendar: ResMut<CalendarDate>,
    mut requests: ResMut<UiRequests>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if let Some(date) = form.calendar_date() {
        calendar.0 = date;
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Serial Date Sender");
        ui.separator();

        draw_port_selector(ui, selection.as_mut(), requests.as_mut());
        draw_baud_rate_selector(ui, selection.as_mut(), &config.baud_rates);
        ui.separator();

        draw_time_fields(ui, form.as_mut());
        draw_date_fields(ui, form.as_mut());
        draw_calendar(ui, calendar.as_mut(), form.as_mut());
        ui.separator();

        draw_actions(ui, connection.is_open(), requests.as_mut());
        ui.add_space(8.0);
        draw_status(ui, connection.status(), &form.warnings());
    });
}

/// System: apply the clicks recorded this frame.
fn apply_ui_requests(
    config: Res<SerialConfig>,
    mut requests: ResMut<UiRequests>,
    mut selection: ResMut<PortSelection>,
    mut connection: ResMut<SerialConnection>,
    mut form: ResMut<DateTimeForm>,
) {
    let pending = std::mem::take(requests.as_mut());
    if pending.refresh_ports {
        selection.set_ports(list_ports(&config.candidate_ports));
        info!("Found {} serial port candidates", selection.ports.len());
    }
    handle_requests(
        pending,
        &config,
        &selection,
        &mut connection,
        &mut form,
        chrono::Local::now().naive_local(),
    );
}

/// Applies connect, disconnect, fill and send requests in that order.
///
/// Failures end up in the connection status; nothing here aborts the app.
pub fn handle_requests(
    requests: UiRequests,
    config: &SerialConfig,
    selection: &PortSelection,
    connection: &mut SerialConnection,
    form: &mut DateTimeForm,
    now: NaiveDateTime,
) {
    if requests.connect {
        let settings = config.port_settings(selection.port_name.clone(), selection.baud_rate);
        // the status already carries the error text
        let _ = connection.open(settings);
    }
    if requests.disconnect {
        connection.close();
    }
    if requests.fill_now {
        form.fill_from(now);
    }
    if requests.send {
        let _ = send_parameters(connection, form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerialDateError;
    use crate::serial::port::MockPortOpener;
    use crate::serial::status::ConnectionStatus;
    use crate::serial::tests::recording_opener;
    use chrono::NaiveDate;

    fn selection() -> PortSelection {
        PortSelection {
            ports: vec!["COM3".into()],
            port_name: "COM3".into(),
            baud_rate: 19200,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 4)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_connect_request_opens_selected_port() {
        let mut connection = SerialConnection::new(recording_opener());
        let mut form = DateTimeForm::default();
        let requests = UiRequests {
            connect: true,
            ..Default::default()
        };

        handle_requests(
            requests,
            &SerialConfig::default(),
            &selection(),
            &mut connection,
            &mut form,
            now(),
        );

        assert_eq!(
            connection.status(),
            &ConnectionStatus::Connected {
                port: "COM3".into(),
                baud_rate: 19200
            }
        );
        assert_eq!(
            connection.settings().map(|s| s.timeout),
            Some(SerialConfig::default().timeout)
        );
    }

    #[test]
    fn test_connect_then_fill_then_send_in_one_frame() {
        let mut connection = SerialConnection::new(recording_opener());
        let mut form = DateTimeForm::default();
        let requests = UiRequests {
            connect: true,
            fill_now: true,
            send: true,
            ..Default::default()
        };

        handle_requests(
            requests,
            &SerialConfig::default(),
            &selection(),
            &mut connection,
            &mut form,
            now(),
        );

        assert_eq!(
            connection.status(),
            &ConnectionStatus::Sent(
                r#"{"time":"07:30","day":"04","month":"07","year":"2025"}"#.into()
            )
        );
    }

    #[test]
    fn test_send_request_without_connection_shows_guidance() {
        let mut connection = SerialConnection::new(MockPortOpener::new());
        let mut form = DateTimeForm::default();
        let requests = UiRequests {
            send: true,
            ..Default::default()
        };

        handle_requests(
            requests,
            &SerialConfig::default(),
            &selection(),
            &mut connection,
            &mut form,
            now(),
        );

        assert_eq!(connection.status(), &ConnectionStatus::ConnectFirst);
    }

    #[test]
    fn test_failed_connect_keeps_app_usable() {
        let mut opener = MockPortOpener::new();
        opener
            .expect_open()
            .returning(|s| Err(SerialDateError::port_open(&s.port_name, "Permission denied")));
        let mut connection = SerialConnection::new(opener);
        let mut form = DateTimeForm::default();
        let requests = UiRequests {
            connect: true,
            send: true,
            ..Default::default()
        };

        handle_requests(
            requests,
            &SerialConfig::default(),
            &selection(),
            &mut connection,
            &mut form,
            now(),
        );

        assert!(!connection.is_open());
        assert_eq!(connection.status(), &ConnectionStatus::ConnectFirst);
    }

    #[test]
    fn test_disconnect_request_closes() {
        let mut connection = SerialConnection::new(recording_opener());
        let mut form = DateTimeForm::default();
        let config = SerialConfig::default();
        let connect = UiRequests {
            connect: true,
            ..Default::default()
        };
        handle_requests(connect, &config, &selection(), &mut connection, &mut form, now());
        let disconnect = UiRequests {
            disconnect: true,
            ..Default::default()
        };
        handle_requests(disconnect, &config, &selection(), &mut connection, &mut form, now());

        assert!(!connection.is_open());
        assert_eq!(
            connection.status(),
            &ConnectionStatus::Disconnected("COM3".into())
        );
    }
}
