//! Kimlik OCR: read Turkish ID cards through a remote OCR service.
//!
//! The core (camera state machine, submission, result view, PDF export)
//! builds without a window. The Tauri shell lives behind the `desktop`
//! feature.

#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod messages;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::commands::camera::{
        camera_grant, capture_frame, get_camera_state, init_camera_state, release_camera,
        retake_camera, start_camera, stop_camera, CameraState,
    };
    use crate::commands::config::{get_config_path, init_config_manager, load_config, save_config};
    use crate::commands::export::export_pdf;
    use crate::commands::ocr::{
        check_ocr_health, clear_inputs, get_result_view, get_upload_state, pick_card_file,
        set_card_file, submit_ocr, toggle_result_view, OcrState,
    };
    use crate::services::submission::SubmissionController;
    use crate::utils::logging::init_logging;
    use tauri::{Manager, WindowEvent};

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        init_logging();

        // Initialize config manager
        let config_manager = init_config_manager().expect("Failed to initialize config manager");
        let config = config_manager
            .lock()
            .map_err(|e| e.to_string())
            .and_then(|manager| manager.load_effective())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default configuration");
                Default::default()
            });
        let controller =
            SubmissionController::from_config(&config).expect("Failed to create OCR client");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_dialog::init())
            .manage(config_manager)
            .manage(OcrState::new(controller))
            .setup(|app| {
                let camera = init_camera_state(app.handle());
                app.manage(camera);
                tracing::info!("Kimlik OCR ready");
                Ok(())
            })
            .on_window_event(|window, event| {
                if let WindowEvent::Destroyed = event {
                    let handle = window.app_handle().clone();
                    tauri::async_runtime::spawn(async move {
                        if let Some(camera) = handle.try_state::<CameraState>() {
                            release_camera(&camera).await;
                        }
                    });
                }
            })
            .invoke_handler(tauri::generate_handler![
                start_camera,
                camera_grant,
                capture_frame,
                stop_camera,
                retake_camera,
                get_camera_state,
                pick_card_file,
                set_card_file,
                clear_inputs,
                submit_ocr,
                get_upload_state,
                check_ocr_health,
                toggle_result_view,
                get_result_view,
                export_pdf,
                save_config,
                load_config,
                get_config_path
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
