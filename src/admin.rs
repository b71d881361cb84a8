use crate::client::NoticeClient;
use crate::error::NoticeError;
use crate::structures::{NewNotice, NoticeId};
use crate::view::{View, ViewKind, ViewState};

pub const NOTICE_ADDED: &str = "Notice added";
pub const FAILED_TO_ADD: &str = "Failed to add notice";
pub const NOTICE_DELETED: &str = "Notice deleted";
pub const DELETE_FAILED: &str = "Delete failed";
pub const DELETE_PROMPT: &str = "Delete this notice?";

/// Inputs of the "new notice" form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoticeForm {
    pub fn new(title: &str, content: &str, category: &str) -> Self {
        NoticeForm {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    pub fn draft(&self) -> Result<NewNotice, NoticeError> {
        NewNotice::new(&self.title, &self.content, &self.category)
    }

    /// Category is a select box; it keeps its value.
    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

/// Asks the user before anything destructive happens.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct AdminPanel {
    pub form: NoticeForm,
    list: View,
    status: Option<String>,
}

impl Default for AdminPanel {
    fn default() -> Self {
        AdminPanel::new()
    }
}

impl AdminPanel {
    pub fn new() -> Self {
        AdminPanel {
            form: NoticeForm::default(),
            list: View::new(ViewKind::Admin),
            status: None,
        }
    }

    pub fn list(&self) -> &View {
        &self.list
    }

    /// Last message shown next to the form.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn load(&mut self, client: &NoticeClient) -> &ViewState {
        self.list.refresh(client).await
    }

    pub async fn submit_notice(&mut self, client: &NoticeClient) -> Result<String, NoticeError> {
        let draft = match self.form.draft() {
            Ok(draft) => draft,
            Err(e) => {
                log::warn!("Notice not submitted: {}", e);
                self.status = Some(e.user_message(FAILED_TO_ADD));
                return Err(e);
            }
        };
        match client.create_notice(&draft).await {
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| NOTICE_ADDED.to_owned());
                log::info!("Created notice {:?}: {}", draft.title(), message);
                self.status = Some(message.clone());
                self.form.clear();
                self.list.refresh(client).await;
                Ok(message)
            }
            Err(e) => {
                self.status = Some(e.user_message(FAILED_TO_ADD));
                Err(e)
            }
        }
    }

    /// Nothing is sent unless `confirm` agrees. A failed delete leaves the list as it was.
    pub async fn delete_notice<C: Confirm>(
        &mut self,
        client: &NoticeClient,
        id: &NoticeId,
        confirm: &mut C,
    ) -> Result<DeleteOutcome, NoticeError> {
        if !confirm.confirm(DELETE_PROMPT) {
            log::debug!("Delete of notice {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }
        match client.remove_notice(id).await {
            Ok(message) => {
                let message = message.unwrap_or_else(|| NOTICE_DELETED.to_owned());
                log::info!("Deleted notice {}: {}", id, message);
                self.status = Some(message.clone());
                self.list.refresh(client).await;
                Ok(DeleteOutcome::Deleted(message))
            }
            Err(e) => {
                self.status = Some(e.user_message(DELETE_FAILED));
                Err(e)
            }
        }
    }
}
