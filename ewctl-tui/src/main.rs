//! ewctl 程序入口
//!
//! 其执行：
//! fn `main()` {
//!
//!     Cli::parse()            // 解析命令行
//!     不需要界面的子命令      // config path / set-token / show、db init、version
//!     解析生效配置            // 文件 → 环境变量 → profile → 钥匙串，校验失败退出码 1
//!     logging::init()         // 日志写入配置目录
//!     构建 Services 与执行器  // D1Client、WebhookClient、FileConfigService
//!     init_terminal()         // 进入备用屏幕
//!     app::run()              // 主循环
//!     restore_terminal()      // 无论成功与否，都恢复终端
//!
//! }

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ewctl_store::{schema, D1Client, SqlExecutor, WebhookClient};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use ewctl_tui::app;
use ewctl_tui::backend::{
    CommandExecutor, ConfigService, FileConfigService, KeyringTokenStore, Services, TokenStore,
};
use ewctl_tui::cli::{Cli, Commands, ConfigAction, DbAction};
use ewctl_tui::logging;
use ewctl_tui::message::{Message, NavigationMessage};
use ewctl_tui::model::{App, AppOptions, ViewId};
use ewctl_tui::update;
use ewctl_tui::util::{init_terminal, restore_terminal};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let service = FileConfigService::new(
        cli.config
            .clone()
            .unwrap_or_else(FileConfigService::default_path),
    );
    let tokens = KeyringTokenStore;

    // 1. 不需要配置的子命令
    match &cli.command {
        Some(Commands::Version) => {
            println!("ewctl {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Config {
            action: ConfigAction::Path,
        }) => {
            println!("{}", service.path().display());
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Config {
            action: ConfigAction::SetToken { token },
        }) => {
            tokens.set(token)?;
            println!("API token stored in the system keyring");
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    // 2. 日志
    let log_dir = service
        .path()
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map_or_else(FileConfigService::default_dir, std::path::Path::to_path_buf);
    if let Err(e) = logging::init(&log_dir, cli.debug) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    // 3. 生效配置
    let stored = service.load()?;
    let config = match stored.resolve(
        cli.profile.as_deref(),
        |key| std::env::var(key).ok(),
        &tokens,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(Commands::Config {
        action: ConfigAction::Show,
    }) = &cli.command
    {
        print!("{}", serde_yaml::to_string(&config.masked())?);
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        eprintln!("Config file: {}", service.path().display());
        return Ok(ExitCode::FAILURE);
    }

    // 4. 后端
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let db: Arc<dyn SqlExecutor> = Arc::new(D1Client::new(
        &config.cloudflare.account_id,
        &config.cloudflare.database_id,
        &config.cloudflare.api_token,
    )?);

    if let Some(Commands::Db {
        action: DbAction::Init,
    }) = &cli.command
    {
        let count = runtime.block_on(schema::init(db.as_ref()))?;
        println!("Database schema ready ({count} statements applied)");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(start) = cli.start_view() else {
        return Ok(ExitCode::SUCCESS);
    };

    let services = Services::from_executor(db)
        .with_webhook(WebhookClient::new(&config.cloudflare.worker_url)?)
        .with_config(Arc::new(service));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = CommandExecutor::new(runtime.handle().clone(), Arc::new(services), tx);

    // 5. 控制器
    let mouse = config.ui.mouse;
    let mut app = App::new(AppOptions {
        config,
        stored,
        profile: cli.profile.clone().unwrap_or_default(),
    });
    for command in update::init(&mut app) {
        executor.spawn(command);
    }
    if start.view != ViewId::Dashboard {
        app::dispatch(
            &mut app,
            &executor,
            Message::Navigation(NavigationMessage::Navigate {
                view: start.view,
                title: None,
                payload: start.payload,
            }),
        );
    }

    // 6. 终端
    let mut terminal = init_terminal(mouse)?;
    let size = terminal.size()?;
    app::dispatch(
        &mut app,
        &executor,
        Message::Resize {
            width: size.width,
            height: size.height,
        },
    );

    let result = app::run(&mut terminal, &mut app, &executor, &mut rx);
    restore_terminal(&mut terminal)?;
    log::info!("ewctl exiting");
    result.map(|()| ExitCode::SUCCESS)
}
