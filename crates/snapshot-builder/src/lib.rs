//! Snapshot Builder (C3): from a live page or raw HTML, produce a bounded,
//! token-economical page view (§4.3).

pub mod format;
pub mod live_mode;
pub mod noise;
pub mod static_mode;

pub use format::format_snapshot;
pub use live_mode::build_live_snapshot;
pub use noise::{is_noise_link, resolve_href, truncate_url_for_display};
pub use static_mode::build_static_snapshot;
