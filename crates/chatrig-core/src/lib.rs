#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod credentials;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod state;

// Re-export commonly used types for convenience
pub use credentials::{CredentialKey, CredentialLoader, CredentialMap};
pub use domain::{
    BackendLabelAssignment, EndpointEntry, EndpointList, Mode, ReconcileOutcome, StatusReport,
    StepOutcome,
};
pub use paths::{PathError, StackPaths};
pub use ports::{
    ConfigStoreError, ExecOutput, FrontendConfigStore, GatewayLauncher, GatewaySpec, PortProbe,
    Ports, RuntimeError, ServiceRuntime, StackSpec, StoreSnapshot,
};
pub use services::{ControllerError, StackController, StartReport, StopReport};
pub use settings::{SettingsError, StackSettings, StackTimings};

// Dev-only crates used by integration tests
#[cfg(test)]
use tokio_test as _;
