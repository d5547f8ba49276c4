//! `audit` command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use cro_auditor::audit::{AuditMode, AuditRequest, Level, RecommendationFilter, WebsiteType};
use cro_auditor::config::Config;
use cro_auditor::{AuditError, AuditOrchestrator, OpenAIProviderFactory};

use super::{render, session_for, AuditArgs};

const DEMO_NOTICE_FLAG: &str = "cro_demo_notice";

/// Run an audit and print the dashboard.
pub(crate) async fn cmd_audit(config: Config, args: AuditArgs) -> Result<()> {
    let website_type: WebsiteType = args.website_type.parse().map_err(user_facing)?;
    let mode = args
        .mode
        .as_deref()
        .map(str::parse::<AuditMode>)
        .transpose()
        .map_err(user_facing)?;
    let request =
        AuditRequest::new(&args.url, website_type, &args.market, mode).map_err(user_facing)?;
    let filter = RecommendationFilter {
        impact: args.impact.as_deref().map(parse_level).transpose()?,
        effort: args.effort.as_deref().map(parse_level).transpose()?,
        section: args.section.clone(),
    };

    let session = session_for(&config, args.user.clone());
    let credential = session.api_key();
    let orchestrator = AuditOrchestrator::new(config, Arc::clone(&session), Arc::new(OpenAIProviderFactory));

    if credential.is_none() && !session.is_dismissed(DEMO_NOTICE_FLAG) {
        eprintln!("No API key configured; showing a demo audit.");
        eprintln!("Store one with: cro-auditor key set <sk-...>");
        eprintln!();
        session.dismiss(DEMO_NOTICE_FLAG);
    }

    let progress = |step: &str| eprintln!("  {}", step);
    let mut result = orchestrator
        .generate(&request, &progress, credential.as_deref())
        .await
        .map_err(user_facing)?;

    if let Some(path) = &args.mockup {
        match credential.as_deref() {
            Some(key) => {
                let html = orchestrator
                    .generate_mockup(&result, &progress, key)
                    .await
                    .map_err(user_facing)?;
                std::fs::write(path, &html)
                    .with_context(|| format!("Failed to write mockup to {}", path.display()))?;
                result.mock_design = Some(html);
                eprintln!("Mockup written to {}", path.display());
            }
            None => warn!("Skipping mockup: an API key is required"),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_dashboard(&result, &filter);
    }
    Ok(())
}

/// Turn an audit error into the message shown to the user.
fn user_facing(err: AuditError) -> anyhow::Error {
    if err.is_retryable() {
        anyhow::anyhow!("{}\nRun the same command again to retry.", err.user_message())
    } else {
        anyhow::anyhow!(err.user_message())
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "high" => Ok(Level::High),
        "medium" => Ok(Level::Medium),
        "low" => Ok(Level::Low),
        _ => anyhow::bail!("Filter level must be high, medium or low, got '{}'", raw),
    }
}
