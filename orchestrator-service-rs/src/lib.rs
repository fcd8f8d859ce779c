// orchestrator-service-rs/src/lib.rs
// Incident remediation workflow: received -> logged -> planned ->
// patch_proposed -> (background) sandbox_started -> testing_patch ->
// tested_ok -> tests_passed -> awaiting_approval -> (manual) pr_created ->
// completed, with test_failed and failed as exits.

pub mod collaborators;
pub mod workflow;

pub use collaborators::{CollaboratorModes, Collaborators};
pub use workflow::Orchestrator;

#[cfg(test)]
mod tests;
