use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{Backend, RowBackend, RowSource};
use crate::config::ApiConfig;
use crate::data::record::Record;
use crate::error::TableError;

/// Placeholder replaced with the row's natural key in URL templates
pub const ID_PLACEHOLDER: &str = ":id";

/// JSON-over-HTTP row collaborator
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    load_url: String,
    create_url: Option<String>,
    update_url: Option<String>,
    delete_url: Option<String>,
}

impl HttpBackend {
    pub fn new(load_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            load_url: load_url.to_string(),
            create_url: None,
            update_url: None,
            delete_url: None,
        }
    }

    pub fn with_mutations(mut self, create_url: &str, update_url: &str, delete_url: &str) -> Self {
        self.create_url = Some(create_url.to_string());
        self.update_url = Some(update_url.to_string());
        self.delete_url = Some(delete_url.to_string());
        self
    }

    fn url_for(template: &Option<String>, operation: &str, key: Option<&str>) -> Result<String> {
        let template = template
            .as_deref()
            .ok_or_else(|| anyhow!("No URL configured for {}", operation))?;
        Ok(match key {
            Some(key) => expand_url(template, key),
            None => template.to_string(),
        })
    }

    async fn send_json(&self, request: reqwest::RequestBuilder, operation: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("{} request failed", operation))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {}: {}", status, body.trim()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {} response", operation))
    }
}

#[async_trait]
impl RowSource for HttpBackend {
    async fn load(&self) -> Result<Vec<Record>> {
        debug!(target: "api", "GET {}", self.load_url);
        let body = self
            .send_json(self.client.get(&self.load_url), "load")
            .await?;
        let records = Record::collection_from_json(unwrap_data(&body))?;
        info!(target: "api", "Loaded {} rows from {}", records.len(), self.load_url);
        Ok(records)
    }
}

#[async_trait]
impl RowBackend for HttpBackend {
    async fn create(&self, record: &Record) -> Result<Record> {
        let url = Self::url_for(&self.create_url, "create", None)?;
        debug!(target: "api", "POST {}", url);
        let body = self
            .send_json(self.client.post(&url).json(&record.to_json()), "create")
            .await?;
        created_record(&body, record)
    }

    async fn update(&self, key: &str, record: &Record) -> Result<Record> {
        let url = Self::url_for(&self.update_url, "update", Some(key))?;
        debug!(target: "api", "PUT {}", url);
        let body = self
            .send_json(self.client.put(&url).json(&record.to_json()), "update")
            .await?;
        created_record(&body, record)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let url = Self::url_for(&self.delete_url, "delete", Some(key))?;
        debug!(target: "api", "DELETE {}", url);
        self.send_json(self.client.delete(&url), "delete").await?;
        Ok(())
    }
}

/// Replace every `:id` in a URL template
pub fn expand_url(template: &str, key: &str) -> String {
    template.replace(ID_PLACEHOLDER, key)
}

/// Many APIs wrap payloads as `{ "data": ... }`
fn unwrap_data(body: &Value) -> &Value {
    match body {
        Value::Object(map) => map.get("data").unwrap_or(body),
        _ => body,
    }
}

/// The stored row from a create/update response: the `data` field when
/// present, otherwise the record that was sent
fn created_record(body: &Value, sent: &Record) -> Result<Record> {
    match body {
        Value::Object(map) => match map.get("data") {
            Some(data @ (Value::Object(_) | Value::Array(_))) => Ok(Record::from_json(data)?),
            _ => Ok(sent.clone()),
        },
        _ => Ok(sent.clone()),
    }
}

impl Backend {
    /// Capability implied by the configured URLs
    pub fn from_api_config(api: &ApiConfig) -> Result<Backend, TableError> {
        if api.has_mutations() && !api.has_all_mutations() {
            return Err(TableError::Config(
                "create_url, update_url and delete_url must be set together".into(),
            ));
        }

        match (&api.load_url, &api.create_url, &api.update_url, &api.delete_url) {
            (None, None, None, None) => Ok(Backend::Local),
            (Some(load), None, None, None) => Ok(Backend::load_only(HttpBackend::new(load))),
            (Some(load), Some(create), Some(update), Some(delete)) => Ok(Backend::crud(
                HttpBackend::new(load).with_mutations(create, update, delete),
            )),
            _ => Err(TableError::Config("mutation URLs require load_url".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expand_url() {
        assert_eq!(expand_url("/api/rows/:id", "42"), "/api/rows/42");
        assert_eq!(expand_url("/api/rows", "42"), "/api/rows");
    }

    #[test]
    fn test_created_record_prefers_data_field() {
        let sent = Record::keyed([("name", "Ana")]);
        let body = json!({"data": {"id": 7, "name": "Ana"}});
        let stored = created_record(&body, &sent).unwrap();
        assert_eq!(stored.natural_key().as_deref(), Some("7"));

        let echoed = created_record(&json!({"ok": true}), &sent).unwrap();
        assert_eq!(echoed, sent);
        assert_eq!(created_record(&Value::Null, &sent).unwrap(), sent);
    }

    #[test]
    fn test_unwrap_data() {
        let wrapped = json!({"data": [[1, 2]]});
        assert_eq!(unwrap_data(&wrapped), &json!([[1, 2]]));
        let bare = json!([[1, 2]]);
        assert_eq!(unwrap_data(&bare), &bare);
    }

    #[test]
    fn test_capability_from_config() {
        let mut api = ApiConfig::default();
        assert!(matches!(Backend::from_api_config(&api), Ok(Backend::Local)));

        api.load_url = Some("http://localhost/rows".into());
        assert!(matches!(
            Backend::from_api_config(&api),
            Ok(Backend::LoadOnly(_))
        ));

        api.create_url = Some("http://localhost/rows".into());
        assert!(matches!(
            Backend::from_api_config(&api),
            Err(TableError::Config(_))
        ));

        api.update_url = Some("http://localhost/rows/:id".into());
        api.delete_url = Some("http://localhost/rows/:id".into());
        let backend = Backend::from_api_config(&api).unwrap();
        assert!(backend.can_mutate());
    }
}
