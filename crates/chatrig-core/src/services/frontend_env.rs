//! The front-end's secrets file.

use std::path::Path;

use tracing::debug;

use crate::domain::EndpointList;
use crate::paths::{PathError, write_private_file};

/// Write the endpoint list as the front-end's env file (mode `0600`).
pub fn write_frontend_env(path: &Path, endpoints: &EndpointList) -> Result<(), PathError> {
    let lists = endpoints.to_positional();
    let contents = format!(
        "# Generated by chatrig on every start. Do not edit.\n\
         ENABLE_OPENAI_API={}\n\
         OPENAI_API_BASE_URLS={}\n\
         OPENAI_API_KEYS={}\n",
        !endpoints.is_empty(),
        lists.base_urls,
        lists.api_keys,
    );
    write_private_file(path, &contents)?;
    debug!(path = %path.display(), endpoints = endpoints.len(), "Wrote front-end secrets file");
    Ok(())
}
