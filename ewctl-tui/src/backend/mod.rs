//! Backend 层：业务服务
//!
//! 把数据仓库、webhook 客户端和配置服务包装成一个 `Services`，
//! 执行器对每条命令调用一次 `execute`，得到恰好一条结果消息。

mod config_service;
mod credential_service;
mod executor;

use std::path::PathBuf;
use std::sync::Arc;

use ewctl_store::{
    ContactRepository, FormRepository, SqlExecutor, StatsRepository, StoreError, WebhookClient,
    WebhookRequest, WebhookResponse,
};

pub use config_service::{
    AppConfig, CloudflareConfig, ConfigService, FileConfigService, Profile, UiConfig, ZapiConfig,
    DEFAULT_WORKER_URL,
};
pub use credential_service::{KeyringTokenStore, TokenStore};
pub use executor::CommandExecutor;

use crate::error::AppError;
use crate::message::{Command, EntityId, LoadedData, Message};

/// 命令执行所需的协作者
///
/// 任何一个缺失时，依赖它的命令以 `NotInitialized` 结束。
#[derive(Default)]
pub struct Services {
    forms: Option<FormRepository>,
    contacts: Option<ContactRepository>,
    stats: Option<StatsRepository>,
    webhook: Option<WebhookClient>,
    config: Option<Arc<dyn ConfigService>>,
}

impl Services {
    /// 没有任何协作者
    pub fn empty() -> Self {
        Self::default()
    }

    /// 基于一个 SQL 执行器构建全部仓库
    pub fn from_executor(db: Arc<dyn SqlExecutor>) -> Self {
        Self {
            forms: Some(FormRepository::new(Arc::clone(&db))),
            contacts: Some(ContactRepository::new(Arc::clone(&db))),
            stats: Some(StatsRepository::new(db)),
            webhook: None,
            config: None,
        }
    }

    #[must_use]
    pub fn with_webhook(mut self, client: WebhookClient) -> Self {
        self.webhook = Some(client);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Arc<dyn ConfigService>) -> Self {
        self.config = Some(config);
        self
    }

    fn forms(&self) -> Result<&FormRepository, AppError> {
        self.forms
            .as_ref()
            .ok_or(AppError::NotInitialized("form repository"))
    }

    fn contacts(&self) -> Result<&ContactRepository, AppError> {
        self.contacts
            .as_ref()
            .ok_or(AppError::NotInitialized("contact repository"))
    }

    /// 执行一条命令
    pub async fn execute(&self, command: Command) -> Message {
        match command {
            Command::LoadStats { ticket } => Message::Loaded {
                ticket,
                result: self.load_stats().await,
            },
            Command::LoadForms { ticket } => Message::Loaded {
                ticket,
                result: self.load_forms().await,
            },
            Command::LoadFormForEdit { ticket, id } => Message::Loaded {
                ticket,
                result: self.load_form_for_edit(&id).await,
            },
            Command::LoadContacts { ticket } => Message::Loaded {
                ticket,
                result: self.load_contacts().await,
            },
            Command::LoadRecipients { ticket } => Message::Loaded {
                ticket,
                result: self.load_recipients().await,
            },
            Command::LoadContact { ticket, id } => Message::Loaded {
                ticket,
                result: self.load_contact(id).await,
            },
            Command::CreateForm { ticket, form } => {
                let result = match self.forms() {
                    Ok(repo) => repo
                        .create(&form)
                        .await
                        .map(|()| EntityId::Form(form.id.clone()))
                        .map_err(|e| submit_error("create form", &e)),
                    Err(e) => Err(e),
                };
                Message::Created { ticket, result }
            }
            Command::UpdateForm { ticket, form } => {
                let result = match self.forms() {
                    Ok(repo) => repo
                        .update(&form)
                        .await
                        .map(|()| EntityId::Form(form.id.clone()))
                        .map_err(|e| submit_error("update form", &e)),
                    Err(e) => Err(e),
                };
                Message::Updated { ticket, result }
            }
            Command::DeleteForm { ticket, id } => {
                let result = match self.forms() {
                    Ok(repo) => repo
                        .delete(&id)
                        .await
                        .map(|()| EntityId::Form(id.clone()))
                        .map_err(|e| submit_error("delete form", &e)),
                    Err(e) => Err(e),
                };
                Message::Deleted { ticket, result }
            }
            Command::CreateContact { ticket, contact } => {
                let result = match self.contacts() {
                    Ok(repo) => repo
                        .create(&contact)
                        .await
                        .map(EntityId::Contact)
                        .map_err(|e| submit_error("create contact", &e)),
                    Err(e) => Err(e),
                };
                Message::Created { ticket, result }
            }
            Command::UpdateContact { ticket, contact } => {
                let result = match self.contacts() {
                    Ok(repo) => repo
                        .update(&contact)
                        .await
                        .map(|()| EntityId::Contact(contact.id))
                        .map_err(|e| submit_error("update contact", &e)),
                    Err(e) => Err(e),
                };
                Message::Updated { ticket, result }
            }
            Command::DeleteContact { ticket, id } => {
                let result = match self.contacts() {
                    Ok(repo) => repo
                        .delete(id)
                        .await
                        .map(|()| EntityId::Contact(id))
                        .map_err(|e| submit_error("delete contact", &e)),
                    Err(e) => Err(e),
                };
                Message::Deleted { ticket, result }
            }
            Command::SendWebhook { ticket, request } => Message::WebhookSent {
                ticket,
                result: self.send_webhook(&request).await,
            },
            Command::SaveConfig { ticket, config } => Message::ConfigSaved {
                ticket,
                result: self.save_config(&config),
            },
            Command::Emit(message) => message,
        }
    }

    async fn load_stats(&self) -> Result<LoadedData, AppError> {
        let stats = self
            .stats
            .as_ref()
            .ok_or(AppError::NotInitialized("stats repository"))?;
        Ok(LoadedData::Stats(stats.collect().await))
    }

    async fn load_forms(&self) -> Result<LoadedData, AppError> {
        self.forms()?
            .list()
            .await
            .map(LoadedData::Forms)
            .map_err(|e| load_error("load forms", &e))
    }

    async fn load_form_for_edit(&self, id: &str) -> Result<LoadedData, AppError> {
        let form = self
            .forms()?
            .get(id)
            .await
            .map_err(|e| load_error("load form", &e))?;
        // 联系人只用于接收人选择，失败不影响编辑
        let contacts = match self.contacts()?.list().await {
            Ok(contacts) => contacts,
            Err(e) => {
                log::warn!("failed to load contacts for form {id}: {e}");
                Vec::new()
            }
        };
        Ok(LoadedData::FormForEdit { form, contacts })
    }

    async fn load_contacts(&self) -> Result<LoadedData, AppError> {
        self.contacts()?
            .list_with_stats()
            .await
            .map(LoadedData::Contacts)
            .map_err(|e| load_error("load contacts", &e))
    }

    async fn load_recipients(&self) -> Result<LoadedData, AppError> {
        self.contacts()?
            .list()
            .await
            .map(LoadedData::Recipients)
            .map_err(|e| load_error("load contacts", &e))
    }

    async fn load_contact(&self, id: i64) -> Result<LoadedData, AppError> {
        self.contacts()?
            .get(id)
            .await
            .map(LoadedData::Contact)
            .map_err(|e| load_error("load contact", &e))
    }

    async fn send_webhook(&self, request: &WebhookRequest) -> Result<WebhookResponse, AppError> {
        let client = self
            .webhook
            .as_ref()
            .ok_or(AppError::NotInitialized("webhook client"))?;
        client
            .send(request)
            .await
            .map_err(|e| submit_error("send webhook", &e))
    }

    fn save_config(&self, config: &AppConfig) -> Result<PathBuf, AppError> {
        let service = self
            .config
            .as_ref()
            .ok_or(AppError::NotInitialized("config service"))?;
        service.save(config).map_err(|e| {
            log::error!("failed to save config: {e:#}");
            AppError::SubmitFailed(format!("failed to save config: {e:#}"))
        })
    }
}

fn log_store_error(context: &str, error: &StoreError) {
    if error.is_expected() {
        log::warn!("failed to {context}: {error}");
    } else {
        log::error!("failed to {context}: {error}");
    }
}

fn load_error(context: &str, error: &StoreError) -> AppError {
    log_store_error(context, error);
    AppError::load(context, error)
}

fn submit_error(context: &str, error: &StoreError) -> AppError {
    log_store_error(context, error);
    AppError::submit(context, error)
}
