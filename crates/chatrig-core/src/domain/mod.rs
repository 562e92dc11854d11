//! Pure domain types: endpoint lists, backend labels, service records and
//! the status report.
//!
//! Nothing in this module touches the filesystem or spawns processes.

mod endpoint;
mod labels;
mod outcome;
mod service;
mod status;

pub use endpoint::{
    AGGREGATOR_BASE_URL, DEFAULT_PROVIDER_BASE_URL, EndpointEntry, EndpointList, EndpointUrls,
    LIST_DELIMITER, PROXY_BASE_URL, PositionalLists,
};
pub use labels::{BackendLabelAssignment, ConnectionType, LabelSpec, ReconcileOutcome};
pub use outcome::StepOutcome;
pub use service::{Mode, ParseModeError, ServiceKind, ServiceState};
pub use status::{FrontendStatus, GatewayStatus, ModelSource, ProxyStatus, StatusReport};
