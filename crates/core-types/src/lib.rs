//! Shared data model for the Auspex web interaction engine (§3).
//!
//! This crate carries shapes only: parsing/validation live in the sibling
//! `auspex-url-safety` and `auspex-action-schema` crates, and the full
//! control-flow error enum lives in the root crate's `errors` module.
#![allow(dead_code)]

pub mod action;
pub mod config;
pub mod error;
pub mod result;
pub mod snapshot;

pub use action::{AgentAction, AllowedKey, ScrollDirection, Selector};
pub use config::{
    AgentConfig, CookieSeed, LlmEndpoint, OutputSchema, ProxyConfig, RunOptions, SamplingParams,
};
pub use error::{
    ActionValidationError, BlockedError, ConfigValidationError, LlmFatalError,
    LlmTransientError, PoolError, UrlValidationError,
};
pub use result::{
    truncate_for_report, ActionRecord, AgentResult, LlmUsage, MemoryUsage, ResultData, RunStatus,
    Tier, MAX_RESULT_DATA_CHARS,
};
pub use snapshot::{
    FormInfo, InputInfo, LinkInfo, PageSnapshot, MAX_AX_TREE_CHARS, MAX_BODY_TEXT_CHARS,
    MAX_FORMS, MAX_INPUTS_PER_FORM, MAX_LINKS, MAX_LINK_TEXT_CHARS, MAX_TITLE_CHARS,
};
