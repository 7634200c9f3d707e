use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use snmp_poller::commands;
use snmp_poller::config::{AppConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "snmp-poller", version, about = "Опрос устройств по SNMPv2c по инвентарю")]
struct Cli {
    /// Путь к YAML конфигурации
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Сколько устройств опрашивать одновременно
    #[arg(long)]
    concurrency: Option<usize>,

    /// Таймаут SNMP запроса к устройству, секунды
    #[arg(long)]
    timeout: Option<u64>,

    /// Повторы SNMP запроса при ошибке
    #[arg(long)]
    retries: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Получить инвентарь, опросить устройства и отправить отчёт (по умолчанию)
    Run,
    /// Опросить устройства из локального файла инвентаря
    Poll {
        /// Файл инвентаря, `-` для stdin
        #[arg(short, long)]
        inventory: PathBuf,
        /// Куда записать отчёт, по умолчанию stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// HTTP сервер с /health и /poll
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;

    let connection = &mut config.settings.connection;
    if let Some(concurrency) = cli.concurrency {
        connection.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        connection.timeout = timeout;
    }
    if let Some(retries) = cli.retries {
        connection.retries = retries;
    }
    config.debug_config();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::run::run(&config).await,
        Command::Poll { inventory, output } => {
            commands::poll::poll(&config, &inventory, output.as_deref()).await
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.settings.server.bind = bind;
            }
            commands::serve::serve(&config).await
        }
    }
}

/// Логи в stderr, чтобы stdout оставался чистым JSON
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
