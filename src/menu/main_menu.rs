use crate::config::save::set_user_email;
use crate::config::types::{Config, Language};
use crate::menu::handlers::run_folder_unlocker;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_locked"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_folder_unlocker(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

pub fn print_goodbye(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
    Ok(())
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!(
        "{} {:#}",
        style(t!("main_menu.error_prefix")).red().bold(),
        error
    );
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());
        print_current_settings(config);

        let options = vec![
            t!("settings.opt_user"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_user_menu(config)?,
            Some(1) => show_language_menu(term, config)?,
            Some(2) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_current_settings(config: &Config) {
    let settings = &config.settings;
    let unset = t!("settings.unset");

    println!();
    println!(
        "  {} {}",
        style(t!("settings.current_user")).dim(),
        settings.user_email.as_deref().unwrap_or(unset.as_ref())
    );
    println!(
        "  {} {}",
        style(t!("settings.current_workbook")).dim(),
        settings.workbook_path.display()
    );
    println!(
        "  {} {}",
        style(t!("settings.current_root")).dim(),
        settings.storage_root.display()
    );
    println!(
        "  {} {}",
        style(t!("settings.current_outbox")).dim(),
        settings.outbox_path.display()
    );
    println!();
}

/// 操作者 email 設定
fn show_user_menu(config: &mut Config) -> Result<()> {
    let current = config.settings.user_email.clone().unwrap_or_default();

    let email: String = Input::new()
        .with_prompt(t!("settings.user.prompt"))
        .with_initial_text(current.clone())
        .allow_empty(true)
        .interact_text()?;

    if email.trim() != current {
        config.update(|settings| set_user_email(settings, &email))?;
        println!("\n{}", style(t!("settings.saved")).green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];

    let items: Vec<String> = languages.iter().map(|l: &Language| l.to_string()).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.update(|settings| settings.language = selected_lang)?;
        rust_i18n::set_locale(selected_lang.as_str());
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
