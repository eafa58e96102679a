// TestDependencies - mock implementations for testing
//
// Provides in-memory knowledge provider and registry doubles that can be
// injected into ServerDeps or passed straight to activities.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::{BaseKnowledgeProvider, BaseRegistryLookup, DomainRegistration};

// =============================================================================
// Mock Knowledge Provider
// =============================================================================

#[derive(Clone)]
enum Scripted {
    Answer(String),
    Fail(String),
    Hang,
}

/// Answers prompts by substring match, in the order rules were added.
/// Prompts matching no rule get an empty answer.
pub struct MockKnowledgeProvider {
    rules: Arc<Mutex<Vec<(String, Scripted)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockKnowledgeProvider {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Answer any prompt containing `needle` with `answer`
    pub fn answer_when(self, needle: &str, answer: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Scripted::Answer(answer.to_string())));
        self
    }

    /// Fail any prompt containing `needle`
    pub fn fail_when(self, needle: &str, error: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Scripted::Fail(error.to_string())));
        self
    }

    /// Never answer prompts containing `needle` (exercises timeouts/cancellation)
    pub fn hang_when(self, needle: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Scripted::Hang));
        self
    }

    /// Sleep before answering every prompt
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All user prompts received, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockKnowledgeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseKnowledgeProvider for MockKnowledgeProvider {
    async fn ask(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user_prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| user_prompt.contains(needle.as_str()))
            .map(|(_, s)| s.clone());

        match scripted {
            Some(Scripted::Answer(answer)) => Ok(answer),
            Some(Scripted::Fail(error)) => Err(anyhow::anyhow!("{}", error)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(String::new()),
        }
    }
}

// =============================================================================
// Mock Registry Lookup
// =============================================================================

/// Knows a fixed set of registered domains; everything else is unregistered.
pub struct MockRegistryLookup {
    registered: HashMap<String, DomainRegistration>,
    failing: Vec<String>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockRegistryLookup {
    pub fn new() -> Self {
        Self {
            registered: HashMap::new(),
            failing: Vec::new(),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_registered(mut self, domain: &str) -> Self {
        self.registered.insert(
            domain.to_string(),
            DomainRegistration {
                domain: domain.to_string(),
                registered_at: None,
                expires_at: None,
            },
        );
        self
    }

    /// Make lookups of `domain` error out
    pub fn with_failure(mut self, domain: &str) -> Self {
        self.failing.push(domain.to_string());
        self
    }

    /// Domains looked up, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MockRegistryLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRegistryLookup for MockRegistryLookup {
    async fn lookup(&self, domain: &str) -> Result<Option<DomainRegistration>> {
        self.lookups.lock().unwrap().push(domain.to_string());

        if self.failing.iter().any(|d| d == domain) {
            return Err(anyhow::anyhow!("registry unavailable for {}", domain));
        }

        Ok(self.registered.get(domain).cloned())
    }
}
