use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ting_shell_core::{keys, AppConfig};
use ting_shell_gateways::{
    ChannelCategoryGateway, ChannelPlaybackGateway, FileKeyStore, LogNavigator, LogNotifier,
    NullSessionGateway, PersistentKeyStore,
};
use ting_shell_runtime::{Shell, ShellGateways};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ting-shell", about = "Session, category and playback orchestration shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run,
    Doctor,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.command.unwrap_or(Commands::Run);
    let cfg_path = cli.config.unwrap_or_else(default_config_path);

    match cmd {
        Commands::Config {
            action: ConfigAction::Init,
        } => {
            init_config(&cfg_path)?;
            println!("Initialized config at {}", cfg_path.display());
            Ok(())
        }
        Commands::Doctor => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            doctor(&cfg)
        }
        Commands::Run => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            run(cfg).await
        }
    }
}

async fn run(cfg: AppConfig) -> Result<()> {
    let keystore = Arc::new(FileKeyStore::open(state_file_path(&cfg))?);
    let category = Arc::new(ChannelCategoryGateway::new(cfg.channels.gateway_buffer));
    let playback = Arc::new(ChannelPlaybackGateway::new(cfg.channels.gateway_buffer));

    let shell = Shell::new(
        ShellGateways {
            keystore,
            session: Arc::new(NullSessionGateway),
            category,
            playback,
            navigator: Arc::new(LogNavigator),
            notifier: Arc::new(LogNotifier),
        },
        cfg.album_path_prefix.clone(),
    );

    shell.bootstrap().await;
    info!(
        logged_in = shell.session().is_logged_in(),
        "ting-shell started"
    );

    let mut categories = shell.watch_categories();
    let mut player = shell.watch_player();

    loop {
        tokio::select! {
            changed = categories.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = categories.borrow_and_update().clone();
                info!(
                    current = state.current_category.as_ref().map(|c| c.pinyin.as_str()),
                    sub_categories = ?state.sub_categories,
                    "category state"
                );
            }
            changed = player.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = player.borrow_and_update().clone();
                info!(
                    visible = view.visible,
                    tracks = view.snapshot.as_ref().map(|s| s.track_list.len()),
                    "player state"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received ctrl-c; shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn doctor(cfg: &AppConfig) -> Result<()> {
    println!("== ting-shell doctor ==");

    let path = state_file_path(cfg);
    println!("state file: {}", path.display());

    let keystore = FileKeyStore::open(path)?;
    let remembered = keystore.get(keys::REMEMBER).is_some();
    let has_token = keystore.get(keys::AUTH_TOKEN).is_some();
    println!(
        "remember marker: {}",
        if remembered { "present" } else { "absent" }
    );
    println!(
        "auth token: {}",
        if has_token { "present" } else { "absent" }
    );
    if remembered != has_token {
        println!("markers are out of sync; the next bootstrap will clear both");
    }

    println!("album path prefix: {}", cfg.album_path_prefix);
    Ok(())
}

fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("ting-shell").join("config.toml")
}

fn state_file_path(cfg: &AppConfig) -> PathBuf {
    match &cfg.state_file {
        Some(path) => PathBuf::from(path),
        None => {
            let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            base.join("ting-shell").join("state.json")
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let cfg = AppConfig::default();
    let toml = toml::to_string_pretty(&cfg)?;
    std::fs::write(path, toml)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(())
}

fn load_or_default(path: &Path) -> Result<AppConfig> {
    let mut cfg = if !path.exists() {
        AppConfig::default()
    } else {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))?
    };
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("TING_SHELL_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.log_level = v;
        }
    }
    if let Ok(v) = std::env::var("TING_SHELL_ALBUM_PREFIX") {
        if !v.trim().is_empty() {
            cfg.album_path_prefix = v;
        }
    }
    if let Ok(v) = std::env::var("TING_SHELL_STATE_FILE") {
        if !v.trim().is_empty() {
            cfg.state_file = Some(v);
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
