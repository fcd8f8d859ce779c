// logging-service-rs/src/lib.rs
// Log sink adapters: ship each new incident to the Galileo log stream, or
// skip with a warning when no credential is configured.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use config_rs::LogSinkConfig;
use shared_types_rs::{CollaboratorError, CollaboratorMode, Incident, LogSink};
use tool_sdk::galileo::{GalileoClient, LogLevel, LogRecord};
use tool_sdk::util::truncate_chars;

const CODE_SNIPPET_CHARS: usize = 500;

/// Payload describing an incident on the log stream.
pub fn build_log_record(incident: &Incident) -> LogRecord {
    LogRecord {
        timestamp: incident.created_at,
        level: LogLevel::Error,
        message: format!(
            "Auto-ops incident: {} in {}",
            incident.error_type, incident.filename
        ),
        metadata: json!({
            "incident_id": incident.id,
            "filename": incident.filename,
            "line": incident.line,
            "error_type": incident.error_type,
            "error_message": incident.message,
            "status": incident.status,
            "traceback": incident.traceback,
            "code_snippet": truncate_chars(&incident.code, CODE_SNIPPET_CHARS),
        }),
        tags: vec![
            "python".to_string(),
            "runtime_error".to_string(),
            "auto-ops".to_string(),
            incident.error_type.to_lowercase(),
        ],
    }
}

pub struct GalileoLogSink {
    client: GalileoClient,
}

impl GalileoLogSink {
    pub fn new(client: GalileoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogSink for GalileoLogSink {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Live
    }

    /// Delivery problems never hold up the workflow; they are only logged.
    async fn log(&self, incident: &Incident) -> Result<(), CollaboratorError> {
        match self.client.send_log(&build_log_record(incident)).await {
            Ok(status) => info!(incident_id = %incident.id, status, "incident logged to Galileo"),
            Err(e) => warn!(incident_id = %incident.id, error = %e, "Galileo logging failed"),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SimulatedLogSink;

#[async_trait]
impl LogSink for SimulatedLogSink {
    fn mode(&self) -> CollaboratorMode {
        CollaboratorMode::Simulated
    }

    async fn log(&self, incident: &Incident) -> Result<(), CollaboratorError> {
        warn!(incident_id = %incident.id, "Galileo API key not found, skipping Galileo logging");
        Ok(())
    }
}

/// Live sink when a key is configured, otherwise the simulated one.
pub fn from_config(config: &LogSinkConfig) -> Arc<dyn LogSink> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Arc::new(SimulatedLogSink);
    };
    match GalileoClient::builder()
        .api_key(api_key)
        .logs_url(config.api_url.clone())
        .timeout(config.timeout)
        .build()
    {
        Ok(client) => Arc::new(GalileoLogSink::new(client)),
        Err(e) => {
            warn!(error = %e, "could not build Galileo client, log sink simulated");
            Arc::new(SimulatedLogSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types_rs::ErrorReport;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn incident() -> Incident {
        Incident::from_report(ErrorReport {
            filename: "app.py".into(),
            error_type: "KeyError".into(),
            message: "'customer'".into(),
            traceback: "File \"app.py\", line 2".into(),
            code: "x".repeat(800),
        })
    }

    fn config(url: Option<String>) -> LogSinkConfig {
        LogSinkConfig {
            api_key: url.as_ref().map(|_| "key".to_string()),
            api_url: url.unwrap_or_default(),
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn record_carries_tags_and_truncated_code() {
        let incident = incident();
        let record = build_log_record(&incident);
        assert_eq!(record.message, "Auto-ops incident: KeyError in app.py");
        assert_eq!(record.tags, vec!["python", "runtime_error", "auto-ops", "keyerror"]);
        assert_eq!(record.metadata["line"], 2);
        assert_eq!(record.metadata["status"], "received");
        assert_eq!(record.metadata["code_snippet"].as_str().unwrap().len(), 500);
        assert_eq!(record.timestamp, incident.created_at);
    }

    #[tokio::test]
    async fn missing_key_selects_simulated_sink() {
        let sink = from_config(&config(None));
        assert_eq!(sink.mode(), CollaboratorMode::Simulated);
        sink.log(&incident()).await.unwrap();
    }

    #[tokio::test]
    async fn live_sink_posts_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/logs"))
            .and(body_partial_json(json!({"level": "error", "tags": ["python", "runtime_error", "auto-ops", "keyerror"]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = from_config(&config(Some(format!("{}/v1/logs", server.uri()))));
        assert_eq!(sink.mode(), CollaboratorMode::Live);
        sink.log(&incident()).await.unwrap();
    }

    #[tokio::test]
    async fn live_sink_swallows_provider_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = from_config(&config(Some(format!("{}/v1/logs", server.uri()))));
        assert!(sink.log(&incident()).await.is_ok());
    }
}
