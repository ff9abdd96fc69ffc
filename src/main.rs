use anyhow::Result;
use console::Term;
use locked_folder_manager::config::types::Config;
use locked_folder_manager::init;
use locked_folder_manager::menu::{print_error, print_goodbye, show_main_menu};
use locked_folder_manager::signal::setup_shutdown_signal;
use log::{info, warn};

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();

    // Load config and set locale
    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                print_goodbye(&term)?;
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                print_error(&e);
                break;
            }
        }
    }

    Ok(())
}
