// shared-types-rs/src/simulated.rs
// Markers carried by every fabricated collaborator result

/// Prefix of a plan produced without a model.
pub const MOCK_PLAN_PREFIX: &str = "Mock plan for ";
/// Prefix of a plan produced after the model call failed.
pub const FALLBACK_PLAN_PREFIX: &str = "Fallback plan for ";
/// First line of a locally generated patch.
pub const SIMULATED_PATCH_PREAMBLE: &str = "# auto-ops: simulated patch";
/// Prefix of test output that did not come from a real sandbox run.
pub const SIMULATED_TEST_OUTPUT_PREFIX: &str = "[simulated]";
pub const MOCK_SANDBOX_MARKER: &str = "mock-sandbox-";
pub const MOCK_PULL_REQUEST_MARKER: &str = "/pull/mock-";
pub const MOCK_AUDIO_MARKER: &str = "mock-audio-";

/// True when `value` carries one of the simulated-result markers.
pub fn is_simulated(value: &str) -> bool {
    value.starts_with(MOCK_PLAN_PREFIX)
        || value.starts_with(FALLBACK_PLAN_PREFIX)
        || value.starts_with(SIMULATED_PATCH_PREAMBLE)
        || value.starts_with(SIMULATED_TEST_OUTPUT_PREFIX)
        || value.contains(MOCK_SANDBOX_MARKER)
        || value.contains(MOCK_PULL_REQUEST_MARKER)
        || value.contains(MOCK_AUDIO_MARKER)
}
