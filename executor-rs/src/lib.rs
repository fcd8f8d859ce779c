// executor-rs/src/lib.rs
// Sandbox tester adapters: run a proposed patch in an isolated Daytona
// workspace, or simulate the run deterministically.

pub mod daytona;
pub mod paths;
pub mod simulated;

use std::sync::Arc;

use tracing::warn;

use config_rs::SandboxConfig;
use shared_types_rs::SandboxTester;
use tool_sdk::daytona::DaytonaClient;

pub use daytona::DaytonaSandboxTester;
pub use paths::repo_relative_path;
pub use simulated::SimulatedSandboxTester;

pub fn from_config(config: &SandboxConfig) -> Arc<dyn SandboxTester> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Arc::new(SimulatedSandboxTester);
    };
    match DaytonaClient::builder()
        .api_key(api_key)
        .base_url(config.api_url.clone())
        .build()
    {
        Ok(client) => Arc::new(DaytonaSandboxTester::new(client, config.repository.clone())),
        Err(e) => {
            warn!(error = %e, "could not build Daytona client, sandbox tester simulated");
            Arc::new(SimulatedSandboxTester)
        }
    }
}
