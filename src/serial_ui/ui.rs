use crate::form::DateTimeForm;
use crate::serial::status::ConnectionStatus;
use bevy::prelude::*;
use bevy_egui::egui;
use chrono::NaiveDate;

/// Port and baud rate currently picked in the selectors.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct PortSelection {
    pub ports: Vec<String>,
    pub port_name: String,
    pub baud_rate: u32,
}

impl PortSelection {
    /// Replace the port list, keeping the current pick when still listed.
    pub fn set_ports(&mut self, ports: Vec<String>) {
        if !ports.contains(&self.port_name) {
            self.port_name = ports.first().cloned().unwrap_or_default();
        }
        self.ports = ports;
    }
}

/// Date shown by the calendar widget.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDate(pub NaiveDate);

impl Default for CalendarDate {
    fn default() -> Self {
        Self(chrono::Local::now().date_naive())
    }
}

/// Button clicks collected during a frame, applied by later systems.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiRequests {
    pub refresh_ports: bool,
    pub connect: bool,
    pub disconnect: bool,
    pub fill_now: bool,
    pub send: bool,
}

const STATUS_RED: egui::Color32 = egui::Color32::from_rgb(200, 40, 40);
const STATUS_GREEN: egui::Color32 = egui::Color32::from_rgb(30, 140, 60);
const STATUS_BLUE: egui::Color32 = egui::Color32::from_rgb(40, 70, 200);

/// color of the status line
pub fn status_color(status: &ConnectionStatus) -> egui::Color32 {
    match status {
        ConnectionStatus::Connected { .. } => STATUS_GREEN,
        ConnectionStatus::Sent(_) => STATUS_BLUE,
        _ if status.is_alert() => STATUS_RED,
        _ => egui::Color32::GRAY,
    }
}

/// draw serial port selector
pub fn draw_port_selector(ui: &mut egui::Ui, selection: &mut PortSelection, requests: &mut UiRequests) {
    ui.horizontal(|ui| {
        ui.label("Select Port:");
        egui::ComboBox::from_id_salt("port_selector")
            .width(140f32)
            .selected_text(selection.port_name.clone())
            .show_ui(ui, |ui| {
                for name in selection.ports.clone() {
                    ui.selectable_value(&mut selection.port_name, name.clone(), name);
                }
            });
        if ui.button("Refresh").on_hover_text("Rescan serial ports").clicked() {
            requests.refresh_ports = true;
        }
    });
}

/// draw baud rate selector
pub fn draw_baud_rate_selector(ui: &mut egui::Ui, selection: &mut PortSelection, baud_rates: &[u32]) {
    ui.horizontal(|ui| {
        ui.label("Select Baud Rate:");
        egui::ComboBox::from_id_salt("baud_rate_selector")
            .width(80f32)
            .selected_text(selection.baud_rate.to_string())
            .show_ui(ui, |ui| {
                for baud_rate in baud_rates {
                    ui.selectable_value(&mut selection.baud_rate, *baud_rate, baud_rate.to_string())
                        .on_hover_text("Must match the device");
                }
            });
    });
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String, width: f32) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(width));
}

/// draw hour and minute entries
pub fn draw_time_fields(ui: &mut egui::Ui, form: &mut DateTimeForm) {
    ui.horizontal(|ui| {
        ui.label("Enter Time (HH:MM):");
        field(ui, "HH:", &mut form.hour, 32.0);
        field(ui, "MM:", &mut form.minute, 32.0);
    });
}

/// draw day, month and year entries
pub fn draw_date_fields(ui: &mut egui::Ui, form: &mut DateTimeForm) {
    ui.horizontal(|ui| {
        ui.label("Enter Date (DD/MM/YYYY):");
        field(ui, "Day:", &mut form.day, 32.0);
        field(ui, "Month:", &mut form.month, 32.0);
        field(ui, "Year:", &mut form.year, 48.0);
    });
}

/// Calendar picker. A pick overwrites day, month and year.
pub fn draw_calendar(ui: &mut egui::Ui, calendar: &mut CalendarDate, form: &mut DateTimeForm) {
    ui.horizontal(|ui| {
        ui.label("Select Date:");
        let response = ui.add(
            egui_extras::DatePickerButton::new(&mut calendar.0)
                .id_salt("calendar")
                .calendar_week(false),
        );
        if response.changed() {
            form.select_calendar_date(calendar.0);
        }
    });
}

/// draw connect / disconnect / now / send buttons
pub fn draw_actions(ui: &mut egui::Ui, is_open: bool, requests: &mut UiRequests) {
    ui.horizontal(|ui| {
        let connect_fill = if is_open { STATUS_GREEN } else { STATUS_RED };
        let connect = egui::Button::new(egui::RichText::new("Connect").color(egui::Color32::WHITE))
            .fill(connect_fill);
        if ui.add(connect).clicked() {
            requests.connect = true;
        }
        if ui.add_enabled(is_open, egui::Button::new("Disconnect")).clicked() {
            requests.disconnect = true;
        }
        if ui.button("Now").on_hover_text("Fill with the local time").clicked() {
            requests.fill_now = true;
        }
        if ui.button("Send Parameters").clicked() {
            requests.send = true;
        }
    });
}

/// draw status line and field hints
pub fn draw_status(ui: &mut egui::Ui, status: &ConnectionStatus, hints: &[String]) {
    ui.label(egui::RichText::new(status.to_string()).color(status_color(status)).strong());
    for hint in hints {
        ui.label(egui::RichText::new(hint).small().color(egui::Color32::GRAY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ports_keeps_listed_pick() {
        let mut selection = PortSelection {
            ports: vec!["COM1".into()],
            port_name: "COM3".into(),
            baud_rate: 9600,
        };
        selection.set_ports(vec!["COM1".into(), "COM3".into()]);
        assert_eq!(selection.port_name, "COM3");
    }

    #[test]
    fn test_set_ports_falls_back_to_first() {
        let mut selection = PortSelection {
            port_name: "COM9".into(),
            ..Default::default()
        };
        selection.set_ports(vec!["COM2".into(), "COM4".into()]);
        assert_eq!(selection.port_name, "COM2");
        selection.set_ports(Vec::new());
        assert_eq!(selection.port_name, "");
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(&ConnectionStatus::NotConnected), STATUS_RED);
        assert_eq!(
            status_color(&ConnectionStatus::Connected {
                port: "COM1".into(),
                baud_rate: 9600
            }),
            STATUS_GREEN
        );
        assert_eq!(status_color(&ConnectionStatus::Sent("{}".into())), STATUS_BLUE);
        assert_eq!(status_color(&ConnectionStatus::Error("x".into())), STATUS_RED);
    }
}
