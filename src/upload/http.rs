use async_trait::async_trait;
use serde_json::Value;

use crate::error::{RefineFlowError, Result};

use super::{FileStore, StagedFile};

/// 对象存储 API 的 HTTP 客户端
pub struct HttpFileStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFileStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn create(&self, filename: &str, bytes: Vec<u8>) -> Result<StagedFile> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RefineFlowError::Other(anyhow::anyhow!("file upload failed: {}", e)))?
            .error_for_status()
            .map_err(|e| RefineFlowError::Other(anyhow::anyhow!("file upload rejected: {}", e)))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| RefineFlowError::Serialization(e.to_string()))?;

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                RefineFlowError::Other(anyhow::anyhow!("upload response is missing `id`"))
            })?
            .to_string();

        Ok(StagedFile {
            id,
            filename: filename.to_string(),
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/files/{}", self.base_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| RefineFlowError::Other(anyhow::anyhow!("file delete failed: {}", e)))?
            .error_for_status()
            .map_err(|e| RefineFlowError::Other(anyhow::anyhow!("file delete rejected: {}", e)))?;
        Ok(())
    }
}
