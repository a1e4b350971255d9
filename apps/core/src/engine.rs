//! Response engine: free model providers with silent fallback.
//!
//! Tries the requested external provider (Ollama local, HuggingFace free,
//! community models) and demotes unconditionally to the canned-response
//! brain on any transport fault, non-success status, or missing credential.
//! The demotion is silent: callers always get a response, never an error.

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::brain::{self, ChatMessage, InteractionLog};
use crate::config::Config;
use crate::error::AppError;

const HUGGINGFACE_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";
const COMMUNITY_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/blenderbot-400M-distill";

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);
const OLLAMA_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// How many trailing history entries feed the external-provider context.
const CONTEXT_HISTORY_LEN: usize = 5;

/// Provider identifiers as exposed over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    OllamaLocal,
    HuggingFaceFree,
    CommunityFree,
    /// The canned-response brain. Always available; the default.
    FallbackEnhanced,
}

impl ModelId {
    pub fn id(&self) -> &'static str {
        match self {
            ModelId::OllamaLocal => "ollama-local",
            ModelId::HuggingFaceFree => "huggingface-free",
            ModelId::CommunityFree => "community-free",
            ModelId::FallbackEnhanced => "fallback-enhanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ollama-local" => Some(ModelId::OllamaLocal),
            "huggingface-free" => Some(ModelId::HuggingFaceFree),
            "community-free" => Some(ModelId::CommunityFree),
            "fallback-enhanced" => Some(ModelId::FallbackEnhanced),
            _ => None,
        }
    }
}

/// Optional per-user attributes that shape the external-provider prompt.
/// The canned brain receives them as inputs only; they never change its
/// selection logic.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub communication_style: Option<String>,
    pub study_level: Option<String>,
}

/// A generated response plus its provenance metadata.
#[derive(Debug, Clone, Serialize)]
pub struct EngineResponse {
    pub content: String,
    pub model: String,
    pub tokens_used: usize,
    pub provider: String,
}

/// Orchestrates providers and owns the bounded interaction memory.
pub struct ResponseEngine {
    client: Client,
    huggingface_token: Option<String>,
    ollama_url: String,
    huggingface_url: String,
    community_url: String,
    memory: Mutex<InteractionLog>,
}

impl ResponseEngine {
    pub fn new(config: &Config) -> Self {
        Self::with_endpoints(
            config.ollama_url.clone(),
            HUGGINGFACE_URL.to_string(),
            COMMUNITY_URL.to_string(),
            config.huggingface_token.clone(),
        )
    }

    /// Full constructor; endpoints are injectable so tests can point the
    /// engine at a mock server.
    pub fn with_endpoints(
        ollama_url: String,
        huggingface_url: String,
        community_url: String,
        huggingface_token: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            huggingface_token,
            ollama_url,
            huggingface_url,
            community_url,
            memory: Mutex::new(InteractionLog::default()),
        }
    }

    /// Lists the providers usable right now. The canned brain is always
    /// first; hosted providers require a token, Ollama a live local server.
    pub async fn available_models(&self) -> Vec<String> {
        let mut available = vec![ModelId::FallbackEnhanced.id().to_string()];

        if self.huggingface_token.is_some() {
            available.push(ModelId::HuggingFaceFree.id().to_string());
            available.push(ModelId::CommunityFree.id().to_string());
        }

        if self.ollama_reachable().await {
            available.push(ModelId::OllamaLocal.id().to_string());
        }

        available
    }

    async fn ollama_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.ollama_url);
        match self
            .client
            .get(&url)
            .timeout(OLLAMA_PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Generates a response, never failing: any provider fault falls back to
    /// the canned brain.
    pub async fn generate(
        &self,
        message: &str,
        history: &[ChatMessage],
        user_context: Option<&UserContext>,
        requested_model: Option<&str>,
    ) -> EngineResponse {
        let model = requested_model
            .and_then(ModelId::parse)
            .unwrap_or(ModelId::FallbackEnhanced);

        let response = match model {
            ModelId::FallbackEnhanced => self.fallback_response(message, history),
            ModelId::OllamaLocal => {
                let context = self.build_context(message, history, user_context);
                match self.generate_ollama(&context).await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("Ollama unavailable, demoting to canned responses: {}", e);
                        self.fallback_response(message, history)
                    }
                }
            }
            ModelId::HuggingFaceFree => {
                let context = self.build_context(message, history, user_context);
                match self.generate_hosted(&self.huggingface_url, &context).await {
                    Ok(content) => {
                        hosted_response(content, "huggingface-dialogpt", model.id(), &context)
                    }
                    Err(e) => {
                        warn!("HuggingFace unavailable, demoting to canned responses: {}", e);
                        self.fallback_response(message, history)
                    }
                }
            }
            ModelId::CommunityFree => {
                let context = self.build_context(message, history, user_context);
                match self.generate_hosted(&self.community_url, &context).await {
                    Ok(content) => {
                        hosted_response(content, "community-blenderbot", model.id(), &context)
                    }
                    Err(e) => {
                        warn!("Community model unavailable, demoting to canned responses: {}", e);
                        self.fallback_response(message, history)
                    }
                }
            }
        };

        let mut memory = self.memory.lock().await;
        memory.record(message, &response.content);

        response
    }

    fn fallback_response(&self, message: &str, history: &[ChatMessage]) -> EngineResponse {
        let composed = brain::compose(message, history, None);
        info!(
            module = composed.module.label(),
            characters = composed.characters_considered,
            "composed canned response"
        );

        EngineResponse {
            tokens_used: composed.content.split_whitespace().count(),
            content: composed.content,
            model: ModelId::FallbackEnhanced.id().to_string(),
            provider: "local-free".to_string(),
        }
    }

    fn build_context(
        &self,
        message: &str,
        history: &[ChatMessage],
        user_context: Option<&UserContext>,
    ) -> String {
        let mut parts = vec![format!("System: {}", system_prompt(user_context))];

        if !history.is_empty() {
            let skip = history.len().saturating_sub(CONTEXT_HISTORY_LEN);
            let lines: Vec<String> = history[skip..]
                .iter()
                .map(|m| {
                    let role = match m.sender {
                        crate::brain::Sender::User => "user",
                        crate::brain::Sender::Assistant => "assistant",
                    };
                    format!("{role}: {}", m.text)
                })
                .collect();
            parts.push(format!("Conversation History: {}", lines.join("\n")));
        }

        parts.push(format!("Current Message: {message}"));
        parts.join("\n\n")
    }

    async fn generate_ollama(&self, context: &str) -> Result<EngineResponse, AppError> {
        let url = format!("{}/api/generate", self.ollama_url);
        let payload = json!({
            "model": "mistral",
            "prompt": context,
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(COMPLETION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "Ollama request failed with status {status}"
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let content = body["response"].as_str().unwrap_or("").to_string();
        if content.is_empty() {
            return Err(AppError::Internal("Ollama returned an empty response".to_string()));
        }

        Ok(EngineResponse {
            content,
            model: "ollama-mistral".to_string(),
            tokens_used: context.split_whitespace().count(),
            provider: ModelId::OllamaLocal.id().to_string(),
        })
    }

    async fn generate_hosted(&self, url: &str, context: &str) -> Result<String, AppError> {
        let token = self
            .huggingface_token
            .as_ref()
            .ok_or_else(|| AppError::Config("No HuggingFace token configured".to_string()))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "inputs": context }))
            .timeout(COMPLETION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "Hosted model request failed with status {status}"
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let content = match body
            .get(0)
            .and_then(|v| v.get("generated_text"))
            .and_then(|v| v.as_str())
        {
            // The hosted endpoints echo the prompt; strip it off.
            Some(text) => text.replace(context, "").trim().to_string(),
            None => body.to_string(),
        };

        if content.is_empty() {
            return Err(AppError::Internal("Hosted model returned an empty response".to_string()));
        }

        Ok(content)
    }

    /// Number of interactions currently held in memory (bounded).
    pub async fn memory_len(&self) -> usize {
        self.memory.lock().await.len()
    }
}

fn hosted_response(content: String, model: &str, provider: &str, context: &str) -> EngineResponse {
    EngineResponse {
        content,
        model: model.to_string(),
        tokens_used: context.split_whitespace().count(),
        provider: provider.to_string(),
    }
}

fn system_prompt(user_context: Option<&UserContext>) -> String {
    let mut prompt = String::from(
        "You are an empathetic study assistant helping students balance academics and \
         well-being. Be encouraging, practical, and clear.",
    );

    if let Some(ctx) = user_context {
        match ctx.communication_style.as_deref() {
            Some("formal") => prompt.push_str(" Use formal, academic language."),
            Some("casual") => prompt.push_str(" Use friendly, conversational language."),
            _ => {}
        }
        match ctx.study_level.as_deref() {
            Some("university") => prompt.push_str(" Pitch advice at university level."),
            Some("high_school") => prompt.push_str(" Pitch advice at high-school level."),
            _ => {}
        }
    }

    prompt
}
