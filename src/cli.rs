//! Minimal CLI surface (§6): `LLM_API_KEY` / `LLM_BASE_URL` / `LLM_MODEL`
//! configure the LLM endpoint, the first two positional arguments are the
//! URL and the prompt, and the rendered report is printed to stdout.

use std::env;

use anyhow::{bail, Context, Result};
use auspex::{Agent, AgentConfig, LlmEndpoint, RunOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn config_from_env() -> Result<AgentConfig> {
    let base_url = env::var("LLM_BASE_URL").context("LLM_BASE_URL must be set")?;
    let api_key = env::var("LLM_API_KEY").unwrap_or_default();
    let model = env::var("LLM_MODEL").context("LLM_MODEL must be set")?;

    let mut config = AgentConfig {
        llm: LlmEndpoint { base_url, api_key, model },
        ..Default::default()
    };

    if let Ok(vision) = env::var("AUSPEX_VISION") {
        config.vision = vision == "1" || vision.eq_ignore_ascii_case("true");
    }
    if let Ok(max_iterations) = env::var("AUSPEX_MAX_ITERATIONS") {
        config.max_iterations = max_iterations
            .parse()
            .context("AUSPEX_MAX_ITERATIONS must be a positive integer")?;
    }

    Ok(config)
}

pub async fn run() -> Result<()> {
    init_logging();

    let mut args = env::args().skip(1);
    let url = args.next();
    let prompt = args.next();
    let (Some(url), Some(prompt)) = (url, prompt) else {
        bail!("usage: auspex <url> <prompt>");
    };

    let config = config_from_env()?;
    let agent = Agent::new(config).context("invalid agent configuration")?;

    let options = RunOptions { url, prompt, ..Default::default() };
    let result = agent.run(options).await.context("run failed")?;

    println!("{}", result.report);
    Ok(())
}
