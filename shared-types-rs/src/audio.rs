// shared-types-rs/src/audio.rs
// Voice summary text and classification of stored audio references

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::incident::Incident;
use crate::simulated::MOCK_AUDIO_MARKER;

/// Spoken summary of how the incident was handled.
pub fn summary_text(incident: &Incident) -> String {
    let test_result = if incident.tests_passed == Some(true) {
        "passed"
    } else {
        "failed"
    };
    let pr_status = if incident.pr_url.is_some() {
        "a GitHub pull request has been opened for review"
    } else {
        "incident processing completed"
    };
    format!(
        "AUTO-OPS successfully fixed a Python {} error in {}. The automated fix {} tests in a Daytona isolated environment and {}. The incident workflow is now complete.",
        incident.error_type, incident.filename, test_result, pr_status
    )
}

/// What a stored `audio_url` actually points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioReference {
    /// Decoded `audio/mpeg` bytes from an inline data URI.
    Inline(Vec<u8>),
    /// Plain URL the client should be redirected to.
    Remote(String),
    /// Mock marker or anything that cannot be played.
    Simulated,
}

impl AudioReference {
    pub fn classify(reference: &str) -> Self {
        if let Some(rest) = reference.strip_prefix("data:audio/") {
            if reference.contains(MOCK_AUDIO_MARKER) {
                return AudioReference::Simulated;
            }
            return match rest.split_once(";base64,") {
                Some((_, payload)) => match STANDARD.decode(payload.trim()) {
                    Ok(bytes) if !bytes.is_empty() => AudioReference::Inline(bytes),
                    _ => AudioReference::Simulated,
                },
                None => AudioReference::Simulated,
            };
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return AudioReference::Remote(reference.to_string());
        }
        AudioReference::Simulated
    }

    /// Builds the inline reference stored for synthesized audio.
    pub fn inline_data_uri(bytes: &[u8]) -> String {
        format!("data:audio/mpeg;base64,{}", STANDARD.encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::ErrorReport;

    fn incident() -> Incident {
        Incident::from_report(ErrorReport {
            filename: "app.py".into(),
            error_type: "KeyError".into(),
            message: "'x'".into(),
            traceback: String::new(),
            code: String::new(),
        })
    }

    #[test]
    fn summary_mentions_outcome_and_pr() {
        let mut incident = incident();
        incident.tests_passed = Some(true);
        incident.pr_url = Some("https://github.com/o/r/pull/1".into());
        assert_eq!(
            summary_text(&incident),
            "AUTO-OPS successfully fixed a Python KeyError error in app.py. The automated fix passed tests in a Daytona isolated environment and a GitHub pull request has been opened for review. The incident workflow is now complete."
        );

        incident.pr_url = None;
        incident.tests_passed = None;
        let text = summary_text(&incident);
        assert!(text.contains("fix failed tests"));
        assert!(text.contains("incident processing completed"));
    }

    #[test]
    fn inline_audio_is_decoded() {
        let uri = AudioReference::inline_data_uri(b"ID3fake");
        assert_eq!(
            AudioReference::classify(&uri),
            AudioReference::Inline(b"ID3fake".to_vec())
        );
    }

    #[test]
    fn mock_and_unknown_references_are_simulated() {
        assert_eq!(
            AudioReference::classify("data:audio/mpeg;base64,mock-audio-1234abcd"),
            AudioReference::Simulated
        );
        assert_eq!(
            AudioReference::classify("data:audio/mpeg;base64,%%%"),
            AudioReference::Simulated
        );
        assert_eq!(AudioReference::classify("voice-42"), AudioReference::Simulated);
    }

    #[test]
    fn urls_are_remote() {
        assert_eq!(
            AudioReference::classify("https://cdn.example.com/a.mp3"),
            AudioReference::Remote("https://cdn.example.com/a.mp3".into())
        );
    }
}
