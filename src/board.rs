use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use noticeboard::admin::{AdminPanel, Confirm, DeleteOutcome, NoticeForm};
use noticeboard::structures::{NoticeId, DEFAULT_CATEGORY};
use noticeboard::theme::{FilePreferences, Theme, ThemeState};
use noticeboard::{NoticeClient, Query, Settings, View, ViewKind};

#[derive(Parser, Debug)]
#[command(name = "noticeboard", version, about = "Read and manage a notice board backend")]
struct Cli {
    /// Settings file (defaults to ./noticeboard.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `backend_url` from the settings
    #[arg(long)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Latest notice and the total count
    Home,
    /// Every notice, optionally filtered
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Notices with their delete controls
    Admin,
    /// Post a new notice
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
    /// Delete a notice by id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the display theme
    Theme { name: Option<String> },
}

struct Prompt;

impl Confirm for Prompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log::error!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn print_view(view: &View) {
    if let (ViewKind::Home, Some(total)) = (view.kind(), view.total()) {
        println!("<span id=\"home-count\">{}</span>", total);
    }
    println!("{}", view.html());
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut cfg = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        cfg.backend_url = url;
    }
    simple_logger::init_with_level(cfg.log_level())?;
    log::debug!("Config: {:?}", cfg);

    let mut theme = ThemeState::load(FilePreferences::open_or_default(&cfg.preferences_path));
    log::info!("Theme: {}", theme.current());

    if let Command::Theme { name } = &cli.command {
        if let Some(name) = name {
            theme.set(Theme::from_name(name))?;
        }
        println!("{} ({})", theme.current(), theme.current().css_class());
        return Ok(ExitCode::SUCCESS);
    }

    let client = NoticeClient::new(&cfg)?;
    log::info!("Using backend {}", client.base_url());

    let code = match cli.command {
        Command::Home => {
            let mut view = View::new(ViewKind::Home);
            view.refresh(&client).await;
            print_view(&view);
            ExitCode::SUCCESS
        }
        Command::List { category, search } => {
            let mut view = View::new(ViewKind::Notices);
            view.set_query(Query { category, search });
            view.refresh(&client).await;
            print_view(&view);
            ExitCode::SUCCESS
        }
        Command::Admin => {
            let mut panel = AdminPanel::new();
            panel.load(&client).await;
            print_view(panel.list());
            ExitCode::SUCCESS
        }
        Command::Add {
            title,
            content,
            category,
        } => {
            let mut panel = AdminPanel::new();
            panel.form = NoticeForm::new(&title, &content, &category);
            let outcome = panel.submit_notice(&client).await;
            if let Some(status) = panel.status() {
                println!("{}", status);
            }
            if outcome.is_ok() {
                print_view(panel.list());
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Delete { id, yes } => {
            let mut panel = AdminPanel::new();
            let id = NoticeId::from(id.as_str());
            let outcome = if yes {
                panel.delete_notice(&client, &id, &mut |_: &str| true).await
            } else {
                panel.delete_notice(&client, &id, &mut Prompt).await
            };
            match outcome {
                Ok(DeleteOutcome::Deleted(message)) => {
                    println!("{}", message);
                    print_view(panel.list());
                    ExitCode::SUCCESS
                }
                Ok(DeleteOutcome::Cancelled) => ExitCode::SUCCESS,
                Err(_) => {
                    if let Some(status) = panel.status() {
                        println!("{}", status);
                    }
                    ExitCode::FAILURE
                }
            }
        }
        Command::Theme { .. } => ExitCode::SUCCESS,
    };
    Ok(code)
}
