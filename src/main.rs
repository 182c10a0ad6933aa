use bevy::prelude::*;
use serial_datetime::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Serial Communication App".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SerialPlugin::default())
        .add_plugins(FormPlugin)
        .add_plugins(SerialUiPlugin)
        .run();
}
