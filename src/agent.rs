// File: ./src/agent.rs
//! Chat analysis agent.
//!
//! One instance owns a model backend and a rolling conversation history.
//! Extraction calls share nothing mutable: each builds and returns its own
//! date map. Only `ask` touches the history, under an async mutex.
use crate::client::{GeminiClient, ModelBackend};
use crate::config::Config;
use crate::contract::prompt::{build_chat_prompt, build_extraction_prompt};
use crate::contract::response::{ResponseOptions, parse_response};
use crate::history::ConversationHistory;
use crate::model::item::{ConversationTurn, Extraction};
use crate::model::merge::{CalendarOptions, finalize, reconcile};
use crate::model::recognizer::{ScanLimits, scan_dates};
use crate::model::transcript::count_messages;
use crate::store::StoredDocument;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionOptions {
    pub scan: ScanLimits,
    pub calendar: CalendarOptions,
    pub response: ResponseOptions,
}

impl From<&Config> for ExtractionOptions {
    fn from(config: &Config) -> Self {
        Self {
            scan: config.scan_limits(),
            calendar: config.calendar_options(),
            response: ResponseOptions {
                dedupe_todos: config.dedupe_todos,
            },
        }
    }
}

#[derive(Clone)]
pub struct ChatAnalysisAgent {
    backend: Arc<dyn ModelBackend>,
    history: Arc<Mutex<ConversationHistory>>,
    options: ExtractionOptions,
}

impl ChatAnalysisAgent {
    /// Builds an agent backed by the configured model API.
    /// Fails immediately when no credential can be resolved.
    pub fn new(config: &Config) -> Result<Self> {
        let client = GeminiClient::from_config(config)?;
        log::info!("Agent ready (model: {})", client.model());
        Ok(Self::with_backend(Arc::new(client), config))
    }

    pub fn with_backend(backend: Arc<dyn ModelBackend>, config: &Config) -> Self {
        Self {
            backend,
            history: Arc::new(Mutex::new(ConversationHistory::new(config.history_pairs))),
            options: ExtractionOptions::from(config),
        }
    }

    /// Todos and calendar entries for one transcript.
    ///
    /// The regex scan and the model round trip are independent; their date maps
    /// are reconciled with the model side taking the description on conflicts.
    pub async fn extract(&self, transcript: &str, today: NaiveDate) -> Result<Extraction> {
        let prompt = build_extraction_prompt(transcript, today);
        let reply = self
            .backend
            .invoke(&prompt)
            .await
            .context("Extraction request failed")?;

        let regex_dates = scan_dates(transcript, today, self.options.scan);
        let parsed = parse_response(&reply, today, self.options.response);

        let dates = reconcile(regex_dates, parsed.dates);
        let calendar = finalize(&dates, self.options.calendar);
        log::info!(
            "Extracted {} todos and {} calendar entries",
            parsed.todos.len(),
            calendar.len()
        );

        Ok(Extraction {
            todos: parsed.todos,
            calendar,
            dates,
        })
    }

    /// Answers a question about `chat_content`, forwarding each fragment to
    /// `sink` as it arrives. The exchange is recorded once the answer is complete;
    /// a failed stream leaves the history untouched.
    pub async fn ask<F>(&self, chat_content: &str, question: &str, mut sink: F) -> Result<String>
    where
        F: FnMut(&str) + Send,
    {
        let rendered = self.history.lock().await.render();
        let prompt = build_chat_prompt(chat_content, question, &rendered);

        let mut fragments = self
            .backend
            .stream(&prompt)
            .await
            .context("Chat request failed")?;
        let mut answer = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            sink(&fragment);
            answer.push_str(&fragment);
        }

        self.history
            .lock()
            .await
            .push_exchange(question, answer.clone());
        Ok(answer)
    }

    pub async fn history_snapshot(&self) -> Vec<ConversationTurn> {
        self.history.lock().await.turns()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Full extraction for one named document. Calling it again for the same
    /// input recomputes the same record; nothing is appended anywhere.
    pub async fn process_document(
        &self,
        name: &str,
        content: &str,
        today: NaiveDate,
    ) -> Result<StoredDocument> {
        log::info!("Processing document '{}'", name);
        let extraction = self
            .extract(content, today)
            .await
            .with_context(|| format!("Failed to process '{}'", name))?;
        Ok(StoredDocument {
            name: name.to_string(),
            content: content.to_string(),
            uploaded_at: Utc::now(),
            message_count: count_messages(content),
            extraction,
        })
    }
}
