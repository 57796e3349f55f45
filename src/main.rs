#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the preview application
    positioning_mode::run_app()
}

// The browser build is driven through the library's wasm exports.
#[cfg(target_arch = "wasm32")]
fn main() {}
