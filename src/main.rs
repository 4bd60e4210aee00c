use course_landing::{config, web};
use log::{error, info};

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page");
    if let Err(err) = web::start() {
        error!("Landing page failed to start: {}", err);
    }
}
