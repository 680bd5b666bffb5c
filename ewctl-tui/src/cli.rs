//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::message::NavPayload;
use crate::model::ViewId;

#[derive(Parser, Debug)]
#[command(
    name = "ewctl",
    about = "Terminal manager for Elementor WhatsApp forms, contacts and webhooks",
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (defaults to ~/.config/ewctl/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Named profile from the config file
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage forms
    Forms {
        #[command(subcommand)]
        action: FormsAction,
    },
    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        action: ContactsAction,
    },
    /// Webhook tools
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Inspect or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FormsAction {
    /// Open the forms list
    List,
    /// Open the form creation screen
    Create,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ContactsAction {
    /// Open the contacts list
    List,
    /// Open the add-contact screen
    Add,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WebhookAction {
    /// Open the webhook tester
    Test {
        /// Form ID to pre-fill
        form_id: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the configuration with secrets masked
    Show,
    /// Print the config file path
    Path,
    /// Store the Cloudflare API token in the system keyring
    SetToken {
        /// API token
        token: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DbAction {
    /// Create the database tables if they do not exist
    Init,
}

/// 启动界面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartView {
    pub view: ViewId,
    pub payload: Option<NavPayload>,
}

impl Cli {
    /// 打开界面的子命令对应的起始视图；不需要界面的子命令返回 None
    pub fn start_view(&self) -> Option<StartView> {
        let (view, payload) = match &self.command {
            None => (ViewId::Dashboard, None),
            Some(Commands::Forms { action }) => match action {
                FormsAction::List => (ViewId::FormsList, None),
                FormsAction::Create => (ViewId::FormCreate, None),
            },
            Some(Commands::Contacts { action }) => match action {
                ContactsAction::List => (ViewId::ContactsList, None),
                ContactsAction::Add => (ViewId::ContactCreate, None),
            },
            Some(Commands::Webhook {
                action: WebhookAction::Test { form_id },
            }) => (
                ViewId::WebhookTest,
                form_id.clone().map(NavPayload::FormId),
            ),
            Some(Commands::Config { .. } | Commands::Db { .. } | Commands::Version) => {
                return None;
            }
        };
        Some(StartView { view, payload })
    }
}
