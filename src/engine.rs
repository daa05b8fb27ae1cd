use crate::{Client, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The version of the REST API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version string, e.g. `7.9.0`.
    pub version: String,
}

/// A process engine served by the REST API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine name, `default` unless configured otherwise.
    pub name: String,
}

/// Information about the server and its engines.
#[derive(Clone, Debug)]
pub struct EngineService {
    client: Client,
}

impl EngineService {
    pub(crate) fn new(client: Client) -> Self {
        EngineService { client }
    }

    /// The version of the REST API.
    #[tracing::instrument(skip(self), name = "version", err)]
    pub async fn version(&self) -> Result<VersionInfo> {
        let version: VersionInfo = self.client.get("/version").send().await?;
        debug!(version = %version.version, "server version");
        Ok(version)
    }

    /// The names of all engines.
    #[tracing::instrument(skip(self), name = "engines", err)]
    pub async fn list(&self) -> Result<Vec<EngineInfo>> {
        self.client.get("/engine").send().await
    }
}
