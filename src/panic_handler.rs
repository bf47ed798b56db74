use log::error;
use std::panic;

/// Installs readable panic reports and records the panic in the log before the
/// report hook runs, so a replay log shows where the session died.
pub fn initialize_panic_handler() {
    if cfg!(debug_assertions) {
        better_panic::install();
    } else {
        human_panic::setup_panic!();
    }

    let report_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        error!("Navigator panicked: {panic_info}");
        log::logger().flush();

        report_hook(panic_info);
    }));
}
