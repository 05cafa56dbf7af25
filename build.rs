fn main() {
    // Tauri codegen only runs for the desktop shell; the core library builds without it.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
