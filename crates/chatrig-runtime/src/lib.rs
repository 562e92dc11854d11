#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

mod command;
pub mod compose;
pub mod config_store;
pub mod gateway;
pub mod probe;

pub use compose::DockerComposeRuntime;
pub use config_store::ContainerConfigStore;
pub use gateway::{ProcessGatewayLauncher, kill_pid, pid_exists};
pub use probe::{NetworkProbe, check_http_health};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
