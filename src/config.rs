//! Construction-time validation of `AgentConfig`/`RunOptions` (SPEC_FULL.md
//! §A "Configuration"). Neither type enforces its own invariants — both are
//! plain data carried by `auspex-core-types` — so the agent validates once,
//! at construction, before anything is launched.

use auspex_core_types::{AgentConfig, ConfigValidationError, RunOptions};

pub fn validate_config(config: &AgentConfig) -> Result<(), ConfigValidationError> {
    if config.llm.base_url.trim().is_empty() {
        return Err(ConfigValidationError("llm.base_url must not be empty".into()));
    }
    if config.llm.model.trim().is_empty() {
        return Err(ConfigValidationError("llm.model must not be empty".into()));
    }
    if config.max_iterations == 0 {
        return Err(ConfigValidationError("max_iterations must be positive".into()));
    }
    if config.total_deadline_ms == 0 {
        return Err(ConfigValidationError("total_deadline_ms must be positive".into()));
    }
    if !(1..=100).contains(&config.jpeg_quality) {
        return Err(ConfigValidationError("jpeg_quality must be between 1 and 100".into()));
    }
    if config.pool_size == 0 {
        return Err(ConfigValidationError("pool_size must be at least 1".into()));
    }
    Ok(())
}

pub fn validate_run_options(options: &RunOptions) -> Result<(), ConfigValidationError> {
    if options.url.trim().is_empty() {
        return Err(ConfigValidationError("url must not be empty".into()));
    }
    if options.prompt.trim().is_empty() {
        return Err(ConfigValidationError("prompt must not be empty".into()));
    }
    if let Some(max_iterations) = options.max_iterations {
        if max_iterations == 0 {
            return Err(ConfigValidationError("max_iterations override must be positive".into()));
        }
    }
    if let Some(deadline) = options.total_deadline_ms {
        if deadline == 0 {
            return Err(ConfigValidationError("total_deadline_ms override must be positive".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auspex_core_types::LlmEndpoint;

    fn valid_config() -> AgentConfig {
        AgentConfig {
            llm: LlmEndpoint {
                base_url: "https://api.example.com".into(),
                api_key: "key".into(),
                model: "gpt-4o".into(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn accepts_the_default_shape_with_endpoint_filled_in() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_base_url() {
        let mut config = valid_config();
        config.llm.base_url = "".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_max_iterations() {
        let mut config = valid_config();
        config.max_iterations = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_out_of_range_jpeg_quality() {
        let mut config = valid_config();
        config.jpeg_quality = 0;
        assert!(validate_config(&config).is_err());
        config.jpeg_quality = 101;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_pool_size() {
        let mut config = valid_config();
        config.pool_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn run_options_require_url_and_prompt() {
        let options = RunOptions::default();
        assert!(validate_run_options(&options).is_err());
    }
}
