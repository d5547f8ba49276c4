//! cro-auditor: conversion-rate-optimization audits backed by an LLM.
//!
//! The library turns an [`AuditRequest`] into a validated [`AuditResult`]:
//! it builds the prompt, calls an OpenAI-compatible provider, extracts and
//! normalizes the JSON reply, and keeps results in a local cache and a
//! per-user history. Without a credential it falls back to a canned demo
//! audit.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cro_auditor::{
//!     AuditOrchestrator, AuditRequest, Config, JsonFileStore, OpenAIProviderFactory, Session,
//!     WebsiteType,
//! };
//!
//! # async fn run() -> cro_auditor::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(JsonFileStore::open(
//!     config.storage.resolved_path(),
//!     config.storage.quota_bytes,
//! ));
//! let session = Arc::new(Session::new(store, None));
//! let key = session.api_key();
//! let orchestrator = AuditOrchestrator::new(config, session, Arc::new(OpenAIProviderFactory));
//!
//! let request = AuditRequest::new("https://shop.example", WebsiteType::Ecommerce, "US", None)?;
//! let result = orchestrator
//!     .generate(&request, &|step: &str| println!("{step}"), key.as_deref())
//!     .await?;
//! println!("{} recommendations", result.recommendations.len());
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod session;
pub mod storage;

pub use audit::{
    AbTest, AuditMode, AuditRecommendation, AuditRequest, AuditResult, Ease, HeuristicCategory,
    HeuristicItem, Level, PxlItem, QuickWin, RecommendationFilter, WebsiteType,
};
pub use cache::{AuditCache, AuditHistory};
pub use config::Config;
pub use error::{AuditError, Result, StorageError};
pub use orchestrator::AuditOrchestrator;
pub use providers::{LLMProvider, OpenAIProviderFactory, ProviderFactory};
pub use session::Session;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
