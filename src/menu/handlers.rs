use crate::component::FolderUnlocker;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use log::warn;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_folder_unlocker(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let result = FolderUnlocker::new(config, Arc::clone(shutdown_signal))
        .and_then(|unlocker| unlocker.run());

    if let Err(e) = result {
        warn!("鎖定資料夾元件錯誤: {e:#}");
        eprintln!("{} {:#}", style(t!("main_menu.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
