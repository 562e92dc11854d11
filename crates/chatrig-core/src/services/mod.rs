//! Core services - configuration synthesis and stack orchestration.
//!
//! Synthesis functions are pure over their inputs plus the files they write.
//! The controller is a pure orchestrator over [`crate::ports`]; it knows
//! nothing about docker or process management.

mod controller;
mod endpoint_builder;
mod frontend_env;
mod label_reconciler;
mod proxy_config;
mod synthesis;

pub use controller::{
    ControllerError, FRONTEND_CONTAINER, LEGACY_FRONTEND_CONTAINER, PROXY_CONTAINER,
    PROXY_PROFILE, StackController, StartReport, StopReport,
};
pub use endpoint_builder::{build_endpoints, endpoint_urls};
pub use frontend_env::write_frontend_env;
pub use label_reconciler::{CONNECTIONS_SECTION, LABELS_KEY, LabelReconciler, merge_labels};
pub use proxy_config::{
    PLACEHOLDER_PROXY_KEY, ProxyConfigSynthesizer, proxy_access_key, proxy_enabled,
};
pub use synthesis::{Synthesis, synthesize};
