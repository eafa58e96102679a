//! Adapter from the knowledge-client REST client to `BaseKnowledgeProvider`.

use anyhow::Result;
use async_trait::async_trait;
use knowledge_client::{ChatRequest, KnowledgeClient, Message};

use super::BaseKnowledgeProvider;

/// Sonar Pro - search-grounded model used for supplier discovery.
pub const SONAR_PRO: &str = "sonar-pro";

/// Wraps a `KnowledgeClient` with the model every call should use.
pub struct KnowledgeAdapter {
    client: KnowledgeClient,
    model: String,
}

impl KnowledgeAdapter {
    pub fn new(client: KnowledgeClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseKnowledgeProvider for KnowledgeAdapter {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt));

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(response.content)
    }
}
