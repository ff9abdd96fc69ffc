use super::locked_projects::{LockedProject, LockedProjectList};
use super::unlock_service::LocalUnlockService;
use crate::config::Config;
use crate::tools::DirectoryService;
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 鎖定資料夾清單與解鎖元件
pub struct FolderUnlocker {
    service: LocalUnlockService,
    shutdown_signal: Arc<AtomicBool>,
}

impl FolderUnlocker {
    pub fn new(config: &Config, shutdown_signal: Arc<AtomicBool>) -> Result<Self> {
        let service = LocalUnlockService::from_settings(&config.settings)?
            .with_shutdown_signal(Arc::clone(&shutdown_signal));

        Ok(Self {
            service,
            shutdown_signal,
        })
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("unlocker.title")).cyan().bold());
        if let Some(email) = self.service.session_email() {
            println!("{}", style(t!("unlocker.operator", email = email)).dim());
        }

        let spinner = spinner(t!("unlocker.loading").to_string());
        let listing = self.service.list_locked_projects();
        spinner.finish_and_clear();
        let mut list = listing?;

        if !list.has_permission {
            self.print_projects(&list);
            println!("\n{}", style(t!("unlocker.read_only")).dim());
            return Ok(());
        }

        loop {
            self.print_projects(&list);
            if list.is_empty() {
                return Ok(());
            }

            let Some(project) = self.prompt_project(&list)? else {
                return Ok(()); // ESC pressed
            };

            if !self.confirm_unlock(&project)? {
                println!("{}", style(t!("common.cancelled")).yellow());
                continue;
            }

            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，取消解鎖");
                return Ok(());
            }

            if self.unlock(&project) {
                list.remove(&project.id);
            }
        }
    }

    /// 執行解鎖並顯示結果，成功時回傳 true
    fn unlock(&self, project: &LockedProject) -> bool {
        let spinner = spinner(t!("unlocker.unlocking", name = &project.proj_no).to_string());
        let result = self.service.unlock(&project.id);
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => {
                println!(
                    "\n{}",
                    style(t!("unlocker.success_title")).green().bold()
                );
                println!("  {} {}", style(t!("unlocker.link")).dim(), outcome.url);
                info!("解鎖完成: {} -> {}", outcome.original_name, outcome.url);
                true
            }
            Err(e) => {
                println!("\n{}", style(t!("unlocker.error_title")).red().bold());
                println!("  {e}");
                warn!("解鎖失敗 {}: {e}", project.id);
                false
            }
        }
    }

    fn print_projects(&self, list: &LockedProjectList) {
        println!();
        if list.is_empty() {
            println!("{}", style(t!("unlocker.empty")).yellow());
            return;
        }

        println!(
            "{}",
            style(t!("unlocker.found", count = list.projects.len())).green()
        );
        println!();

        let no_width = list
            .projects
            .iter()
            .map(|p| p.proj_no.chars().count())
            .max()
            .unwrap_or(0)
            .max(t!("unlocker.column_no").chars().count());

        println!(
            "  {:<no_width$}  {}",
            style(t!("unlocker.column_no")).bold(),
            style(t!("unlocker.column_name")).bold()
        );
        for project in &list.projects {
            let url = self.project_url(project);
            println!(
                "  {:<no_width$}  {} {}",
                style(&project.proj_no).cyan(),
                project.proj_name,
                style(url).dim()
            );
        }
    }

    fn project_url(&self, project: &LockedProject) -> String {
        let directory = self.service.directory();
        match directory
            .folder(&project.id)
            .and_then(|folder| directory.url(&folder))
        {
            Ok(url) => url,
            Err(e) => {
                warn!("無法取得 {} 的連結: {e}", project.id);
                String::new()
            }
        }
    }

    fn prompt_project(&self, list: &LockedProjectList) -> Result<Option<LockedProject>> {
        let options: Vec<String> = list
            .projects
            .iter()
            .map(|p| format!("{} {}", p.proj_no, p.proj_name))
            .collect();

        println!("\n{}", style(t!("common.esc_hint")).dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("unlocker.prompt"))
            .items(&options)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|idx| list.projects[idx].clone()))
    }

    fn confirm_unlock(&self, project: &LockedProject) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt(t!("unlocker.confirm", name = &project.proj_no))
            .default(false)
            .interact()?;
        Ok(confirm)
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress bar template"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
