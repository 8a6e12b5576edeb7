// src/main.rs

#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::WindowPlugin,
    winit::{UpdateMode, WinitSettings},
};
use bevy_egui::EguiPlugin;
use bevy_tokio_tasks::TokioTasksPlugin;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;

use sow_builder::cli::{self, Cli};
use sow_builder::sow::SowPlugin;
use sow_builder::templates::TemplatesPlugin;
use sow_builder::ui::EditorUiPlugin;

fn main() -> ExitCode {
    // A missing .env file is fine; the key may come from the keyring.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    if let Some(command) = args.command {
        return match cli::run(command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f32(1.0 / 5.0)),
        })
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "SOW Builder".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,naga=warn,bevy_tokio_tasks=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_plugins(TokioTasksPlugin::default())
        .add_plugins(SowPlugin)
        .add_plugins(TemplatesPlugin)
        .add_plugins(EditorUiPlugin)
        .run();

    ExitCode::SUCCESS
}
