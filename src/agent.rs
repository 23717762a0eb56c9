//! The top-level `Agent` (§2 "Flow", §9 "Ownership"): validates a run's
//! inputs, attempts the one-shot static resolution, and falls back to the
//! full interactive loop over a pooled browser when the static attempt
//! can't finish the task alone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use auspex_browser_pool::BrowserPool;
use auspex_cdp_adapter::LaunchConfig;
use auspex_core_types::{
    AgentConfig, AgentResult, LlmUsage, MemoryUsage, ResultData, RunOptions, RunStatus, Tier,
};
use auspex_url_safety::AllowBlockPolicy;
use tracing::{info, warn};

use crate::config::{validate_config, validate_run_options};
use crate::errors::AgentError;
use crate::interactive_loop::{run_interactive_loop, InteractiveLoopParams};
use crate::observer::{NullObserver, Observer, ObserverEvent};
use crate::report::{render_report, RunLogWriter};
use crate::static_loop::{run_static_loop, StaticOutcome};

const STATIC_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Owns the browser pool a run checks a page out of. `AgentConfig` is
/// validated once here, at construction, so every subsequent `run` call can
/// assume it's sound (§3).
pub struct Agent {
    config: AgentConfig,
    pool: Arc<BrowserPool>,
    policy: AllowBlockPolicy,
    log_dir: Option<std::path::PathBuf>,
}

impl Agent {
    /// Validates `config` and stands up the (not-yet-launched) browser pool
    /// behind it. Browsers are lazily launched on first `acquire` (§4.8).
    pub fn new(config: AgentConfig) -> Result<Self, AgentError> {
        validate_config(&config)?;

        let launch_config = LaunchConfig {
            headless: true,
            executable: None,
            proxy: config.proxy.as_ref().map(|p| p.server.clone()),
            user_agent: None,
        };
        let pool = BrowserPool::new(config.pool_size, launch_config);
        let policy = AllowBlockPolicy::new(config.allow_domains.clone(), config.block_domains.clone());

        Ok(Self { config, pool, policy, log_dir: None })
    }

    /// Enables the incremental plain-text run log under `dir` (§6 "Persisted
    /// state"). Off by default.
    pub fn with_run_log_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Run a single task to completion, following the spec's Flow: validate
    /// the URL, attempt the static loop, then fall back to the interactive
    /// loop over a pooled browser page (§2).
    pub async fn run(&self, options: RunOptions) -> Result<AgentResult, AgentError> {
        self.run_observed(options, &mut NullObserver).await
    }

    /// As [`Agent::run`], but streams [`ObserverEvent`]s to `observer` as the
    /// run progresses (§5 "Ordering guarantees").
    pub async fn run_observed(
        &self,
        options: RunOptions,
        observer: &mut dyn Observer,
    ) -> Result<AgentResult, AgentError> {
        validate_run_options(&options)?;

        let started_at = Instant::now();
        let started_at_iso = chrono::Utc::now().to_rfc3339();
        let canonical_url = auspex_url_safety::validate(&options.url, &self.policy)
            .await
            .map_err(auspex_core_types::UrlValidationError::from)?;

        let mut run_log = match &self.log_dir {
            Some(dir) => match RunLogWriter::create(dir, &started_at_iso, &canonical_url, &options.prompt).await {
                Ok(writer) => Some(writer),
                Err(e) => {
                    warn!(error = %e, "failed to open run log, continuing without it");
                    None
                }
            },
            None => None,
        };

        let max_iterations = options.max_iterations.unwrap_or(self.config.max_iterations);
        let total_deadline = Duration::from_millis(
            options.total_deadline_ms.unwrap_or(self.config.total_deadline_ms),
        );
        let action_delay = Duration::from_millis(
            options.action_delay_ms.unwrap_or(self.config.action_delay_ms),
        );
        let wants_vision = options.vision.unwrap_or(self.config.vision);
        let vision_available =
            auspex_llm_client::check_vision_availability(&self.config.llm.model, wants_vision)
                && wants_vision;

        let mut usage = LlmUsage::default();

        observer.on_event(ObserverEvent::Tier(Tier::Http));
        if let Some(log) = run_log.as_mut() {
            log.log_tier(Tier::Http).await;
        }

        let static_attempt = self
            .try_static_loop(&canonical_url, &options, &mut usage)
            .await;

        if let Some((status, data, error)) = static_attempt {
            let result = AgentResult {
                status,
                tier: Tier::Http,
                data,
                report: String::new(),
                duration_ms: started_at.elapsed().as_millis() as u64,
                actions: Vec::new(),
                usage,
                memory: MemoryUsage::default(),
                error,
            };
            return Ok(self.finish(result, &canonical_url, &options.prompt, observer, run_log).await);
        }

        observer.on_event(ObserverEvent::Tier(Tier::Playwright));
        if let Some(log) = run_log.as_mut() {
            log.log_tier(Tier::Playwright).await;
        }

        let browser = self.pool.acquire(Duration::from_millis(self.config.pool_wait_ms)).await?;
        let page = browser.new_page().await?;
        if let Err(e) = page.goto(&canonical_url, Duration::from_millis(self.config.navigation_timeout_ms)).await {
            let result = AgentResult {
                status: RunStatus::Error,
                tier: Tier::Playwright,
                data: None,
                report: String::new(),
                duration_ms: started_at.elapsed().as_millis() as u64,
                actions: Vec::new(),
                usage,
                memory: MemoryUsage::default(),
                error: Some(e.to_string()),
            };
            return Ok(self.finish(result, &canonical_url, &options.prompt, observer, run_log).await);
        }

        let params = InteractiveLoopParams {
            page: &page,
            config: &self.config,
            policy: &self.policy,
            prompt: &options.prompt,
            max_iterations,
            total_deadline,
            action_delay,
            vision_available,
            cancellation: options.cancellation.as_ref(),
        };
        let memory_sample: Option<&(dyn Fn() -> Option<u64> + Sync)> = None;
        let output = run_interactive_loop(params, memory_sample, observer, run_log.as_mut()).await;

        usage.prompt_tokens += output.usage.prompt_tokens;
        usage.completion_tokens += output.usage.completion_tokens;
        usage.total_tokens += output.usage.total_tokens;
        usage.calls += output.usage.calls;

        let result = AgentResult {
            status: output.status,
            tier: Tier::Playwright,
            data: output.data,
            report: String::new(),
            duration_ms: started_at.elapsed().as_millis() as u64,
            actions: output.actions,
            usage,
            memory: output.memory,
            error: output.error,
        };
        Ok(self.finish(result, &canonical_url, &options.prompt, observer, run_log).await)
    }

    /// Attempts the static loop once; returns `Some` with a terminal
    /// status/data/error if it resolved or failed outright, or `None` to
    /// fall through to the interactive loop (§4.7).
    async fn try_static_loop(
        &self,
        canonical_url: &str,
        options: &RunOptions,
        usage: &mut LlmUsage,
    ) -> Option<(RunStatus, Option<ResultData>, Option<String>)> {
        let (final_url, html) =
            match auspex_scrape_cascade::fetch_raw_html(canonical_url, &self.policy, STATIC_FETCH_TIMEOUT).await {
                Ok(pair) => pair,
                Err(e) => {
                    info!(error = %e, "static fetch failed, falling back to the browser path");
                    return None;
                }
            };

        let output = run_static_loop(
            &self.config,
            options.cancellation.as_ref(),
            &options.prompt,
            &html,
            &final_url,
        )
        .await;
        usage.prompt_tokens += output.usage.prompt_tokens;
        usage.completion_tokens += output.usage.completion_tokens;
        usage.total_tokens += output.usage.total_tokens;
        usage.calls += output.usage.calls;

        match output.outcome {
            StaticOutcome::Done { data, description } => {
                info!(%description, "static loop resolved the task in one shot");
                Some((RunStatus::Done, Some(data), None))
            }
            StaticOutcome::Failed(message) => Some((RunStatus::Error, None, Some(message))),
            StaticOutcome::Escalate => None,
        }
    }

    async fn finish(
        &self,
        mut result: AgentResult,
        url: &str,
        prompt: &str,
        observer: &mut dyn Observer,
        run_log: Option<RunLogWriter>,
    ) -> AgentResult {
        result.report = render_report(&result, url, prompt);
        observer.on_event(ObserverEvent::Done { tier: result.tier, data: result.data.as_ref() });
        if let Some(error) = &result.error {
            observer.on_event(ObserverEvent::Error(error));
        }
        if let Some(log) = run_log {
            log.finish(&result).await;
        }
        result
    }
}
