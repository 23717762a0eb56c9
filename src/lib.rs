//! Auspex: an LLM-guided web interaction engine. Given a URL and a natural
//! language prompt, resolves the task either from a single static fetch
//! (C9) or by driving a headless browser through a perception-decision-
//! action loop (C8), and returns a structured, reported result (C13).

pub mod agent;
pub mod config;
pub mod errors;
pub mod executor;
pub mod interactive_loop;
pub mod observer;
pub mod report;
pub mod static_loop;

pub use agent::Agent;
pub use errors::AgentError;
pub use observer::{NullObserver, Observer, ObserverEvent};

pub use auspex_core_types::{
    AgentAction, AgentConfig, AgentResult, LlmEndpoint, OutputSchema, ProxyConfig, ResultData,
    RunOptions, RunStatus, SamplingParams, Tier,
};
