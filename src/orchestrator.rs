//! End-to-end audit generation.
//!
//! [`AuditOrchestrator::generate`] runs one request through the pipeline:
//!
//! 1. Expired cache entries are swept once per orchestrator, then the
//!    global cache short-circuit.
//! 2. Demo result when no credential is available.
//! 3. Provider call, JSON extraction, assembly.
//! 4. Cache and per-user history writes on success.
//!
//! Storage problems never fail a generation; provider and parse failures
//! surface as [`AuditError`] and leave the caches untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::audit::demo::{demo_result, DEMO_STEPS};
use crate::audit::prompt::{design_prompt, system_prompt, user_prompt, wrap_mockup, DESIGN_SYSTEM_PROMPT};
use crate::audit::{assemble, extract_json, AuditMode, AuditRequest, AuditResult};
use crate::cache::{AuditCache, AuditHistory};
use crate::config::Config;
use crate::error::{AuditError, Result};
use crate::providers::{ChatMessage, ChatOptions, ProviderFactory};
use crate::session::Session;

/// Progress sink; receives short human-readable step labels.
pub type Progress<'a> = &'a (dyn Fn(&str) + Send + Sync);

pub struct AuditOrchestrator {
    config: Config,
    session: Arc<Session>,
    factory: Arc<dyn ProviderFactory>,
    cache: AuditCache,
    history: AuditHistory,
    demo_pacing: bool,
    swept: AtomicBool,
}

impl AuditOrchestrator {
    pub fn new(config: Config, session: Arc<Session>, factory: Arc<dyn ProviderFactory>) -> Self {
        let store = session.store();
        let cache = AuditCache::from_config(Arc::clone(&store), &config.cache);
        let history = AuditHistory::from_config(store, &config.cache);
        let demo_pacing = config.demo.pacing;
        Self {
            config,
            session,
            factory,
            cache,
            history,
            demo_pacing,
            swept: AtomicBool::new(false),
        }
    }

    /// Enable or disable the sleeps between demo progress steps.
    pub fn with_demo_pacing(mut self, pacing: bool) -> Self {
        self.demo_pacing = pacing;
        self
    }

    pub fn cache(&self) -> &AuditCache {
        &self.cache
    }

    pub fn history(&self) -> &AuditHistory {
        &self.history
    }

    /// Produce an audit for `request`.
    ///
    /// `credential` is the API key to use; `None` (or blank) yields the
    /// demo result, which is never cached.
    pub async fn generate(
        &self,
        request: &AuditRequest,
        progress: Progress<'_>,
        credential: Option<&str>,
    ) -> Result<AuditResult> {
        self.sweep_expired();

        if let Some(cached) = self.cached_for(request) {
            info!(url = request.website_url(), "Serving audit from cache");
            return Ok(cached);
        }

        let credential = credential.map(str::trim).filter(|c| !c.is_empty());
        let Some(api_key) = credential else {
            info!(url = request.website_url(), "No API key, running demo audit");
            return Ok(self.run_demo(request, progress).await);
        };

        progress("Analyzing website structure...");
        let provider = self.factory.create(api_key, &self.config.provider)?;
        let messages = vec![
            ChatMessage::system(system_prompt(request.website_type())),
            ChatMessage::user(user_prompt(request)),
        ];
        debug!(
            provider = provider.name(),
            model = provider.default_model(),
            url = request.website_url(),
            "Dispatching audit request"
        );
        let raw = provider
            .chat(messages, ChatOptions::from_config(&self.config.provider))
            .await?;

        progress("Processing recommendations...");
        let parsed = extract_json(&raw)?;
        let result = assemble(request, &parsed)?;

        self.cache.save(&result);
        if let Some(user_id) = self.session.user_id() {
            self.history.save(user_id, &result);
        }
        info!(
            url = %result.website_url,
            recommendations = result.recommendations.len(),
            "Audit generated"
        );
        Ok(result)
    }

    /// Render a homepage mockup for `result` as a standalone HTML document.
    pub async fn generate_mockup(
        &self,
        result: &AuditResult,
        progress: Progress<'_>,
        credential: &str,
    ) -> Result<String> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuditError::Validation(
                "An API key is required to generate a mockup.".to_string(),
            ));
        }

        progress("Designing homepage mockup...");
        let provider = self.factory.create(credential, &self.config.provider)?;
        let messages = vec![
            ChatMessage::system(DESIGN_SYSTEM_PROMPT),
            ChatMessage::user(design_prompt(result)),
        ];
        let raw = provider
            .chat(messages, ChatOptions::from_config(&self.config.provider).with_json_mode(true))
            .await?;

        let parsed = extract_json(&raw)?;
        let body = parsed
            .get("html")
            .and_then(Value::as_str)
            .filter(|html| !html.trim().is_empty())
            .ok_or_else(|| AuditError::Parse("Mockup response had no html".to_string()))?;

        info!(url = %result.website_url, "Mockup generated");
        Ok(wrap_mockup(body))
    }

    /// Drop expired global cache entries; runs on the first generation only.
    fn sweep_expired(&self) {
        if self.swept.swap(true, Ordering::SeqCst) {
            return;
        }
        let removed = self.cache.clear_expired();
        if removed > 0 {
            debug!(removed, "Swept expired audits from cache");
        }
    }

    /// A cached result usable for `request`, if any.
    ///
    /// Advanced requests only reuse entries that carry heuristic analysis.
    fn cached_for(&self, request: &AuditRequest) -> Option<AuditResult> {
        let cached = self.cache.load(request.website_url())?;
        if !cached.matches_request(request) {
            debug!(url = request.website_url(), "Cached audit is for different parameters");
            return None;
        }
        if request.mode() == Some(AuditMode::Advanced) && cached.heuristic_analysis.is_empty() {
            debug!(url = request.website_url(), "Cached audit lacks heuristics for advanced mode");
            return None;
        }
        Some(cached)
    }

    async fn run_demo(&self, request: &AuditRequest, progress: Progress<'_>) -> AuditResult {
        for (label, delay) in DEMO_STEPS {
            progress(label);
            if self.demo_pacing {
                tokio::time::sleep(delay).await;
            }
        }
        demo_result(request)
    }
}
