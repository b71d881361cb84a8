use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::NoticeError;
use crate::filter;
use crate::settings::Settings;
use crate::structures::{error_of, message_of, CreateReply, NewNotice, Notice, NoticeId, NoticeListing};

pub const LIST_PATH: &str = "/get_notices";
pub const LEGACY_LIST_PATH: &str = "/notices";
pub const ADD_PATH: &str = "/add_notice";
pub const DELETE_PATH: &str = "/delete_notice";

#[derive(Debug, Clone)]
pub struct NoticeClient {
    http: reqwest::Client,
    base: Url,
    legacy_fallback: bool,
}

impl NoticeClient {
    pub fn new(cfg: &Settings) -> Result<Self, NoticeError> {
        let base = Url::parse(&cfg.backend_url).map_err(|e| {
            NoticeError::Config(format!("invalid backend_url {:?}: {}", cfg.backend_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(|e| NoticeError::Config(format!("could not build HTTP client: {}", e)))?;
        Ok(NoticeClient {
            http,
            base,
            legacy_fallback: cfg.legacy_list_fallback,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, NoticeError> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| NoticeError::Config(format!("bad endpoint {}: {}", joined, e)))
    }

    /// List notices, optionally scoped to a category on the backend and then
    /// narrowed locally by `search`.
    pub async fn fetch_notices(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Notice>, NoticeError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let mut notices = match self.list(LIST_PATH, category).await {
            Err(e) if self.legacy_fallback && e.status() == Some(404) => {
                log::warn!(
                    "{} answered 404, retrying on legacy route {}",
                    LIST_PATH,
                    LEGACY_LIST_PATH
                );
                self.list(LEGACY_LIST_PATH, category).await?
            }
            other => other?,
        };
        if let Some(category) = category {
            notices = filter::in_category(notices, category);
        }
        if let Some(term) = search {
            notices = filter::search(notices, term);
        }
        log::debug!("Fetched {} notices", notices.len());
        Ok(notices)
    }

    async fn list(&self, path: &str, category: Option<&str>) -> Result<Vec<Notice>, NoticeError> {
        let mut request = self.http.get(self.endpoint(path)?);
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        let (_, value) = exchange(request, "GET").await?;
        let listing: NoticeListing = serde_json::from_value(value).map_err(|e| {
            log::error!("API GET returned an unexpected listing: {}", e);
            NoticeError::Application {
                status: None,
                message: None,
            }
        })?;
        Ok(listing.into_notices())
    }

    /// Success needs a `message` or the created notice in the reply; a bare
    /// 2xx is not confirmation.
    pub async fn create_notice(&self, draft: &NewNotice) -> Result<CreateReply, NoticeError> {
        let request = self.http.post(self.endpoint(ADD_PATH)?).json(draft);
        let (status, value) = exchange(request, "POST").await?;
        let reply = CreateReply::from_value(&value);
        if reply.message.is_none() && reply.notice.is_none() {
            log::error!("API POST answered {} without confirming the notice", status);
            return Err(NoticeError::Application {
                status: Some(status),
                message: None,
            });
        }
        Ok(reply)
    }

    /// Returns the backend's confirmation message, if it sent one.
    pub async fn remove_notice(&self, id: &NoticeId) -> Result<Option<String>, NoticeError> {
        let mut url = self.endpoint(DELETE_PATH)?;
        url.path_segments_mut()
            .map_err(|_| NoticeError::Config(format!("{} cannot take a path", self.base)))?
            .push(&id.to_string());
        let (_, value) = exchange(self.http.delete(url), "DELETE").await?;
        Ok(message_of(&value))
    }
}

/// Send `request` and fold every way it can go wrong into a [`NoticeError`].
/// An empty body decodes as `null`.
async fn exchange(
    request: reqwest::RequestBuilder,
    verb: &str,
) -> Result<(u16, Value), NoticeError> {
    let response = request.send().await.map_err(|e| {
        log::error!("API {} failed: {}", verb, e);
        NoticeError::transport(e)
    })?;
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        log::error!("API {} body could not be read: {}", verb, e);
        NoticeError::transport(e)
    })?;
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&body) {
            Ok(v) => v,
            Err(e) => {
                log::error!("API {} returned non-JSON (status {}): {}", verb, status, e);
                return Err(NoticeError::Application {
                    status: Some(status.as_u16()),
                    message: None,
                });
            }
        }
    };
    if let Some(message) = error_of(&value) {
        log::error!("API {} rejected (status {}): {}", verb, status, message);
        return Err(NoticeError::Application {
            status: Some(status.as_u16()),
            message: Some(message),
        });
    }
    if !status.is_success() {
        log::error!("API {} failed with status {}", verb, status);
        return Err(NoticeError::Application {
            status: Some(status.as_u16()),
            message: None,
        });
    }
    Ok((status.as_u16(), value))
}
