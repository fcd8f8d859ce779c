// llm-service-rs/src/prompts.rs
// Prompt construction for plan and patch requests

use shared_types_rs::Incident;

pub const PATCH_SYSTEM_PROMPT: &str = "You are AUTO-OPS, a safe DevOps engineer. Given a Python error (traceback + code), propose a minimal safe patch as a unified diff. Don't do anything destructive.";

pub fn plan_prompt(incident: &Incident) -> String {
    let line = incident
        .line
        .map(|l| l.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "You are an expert Python developer. Analyze this error and provide a concise fix plan.

Error Details:
- File: {filename}
- Line: {line}
- Error Type: {error_type}
- Message: {message}

Code:
```python
{code}
```

Traceback:
```
{traceback}
```

Provide a brief 2-3 sentence plan to fix this error. Focus on the specific issue and solution.",
        filename = incident.filename,
        line = line,
        error_type = incident.error_type,
        message = incident.message,
        code = incident.code,
        traceback = incident.traceback,
    )
}

pub fn patch_prompt(incident: &Incident, plan: &str) -> String {
    format!(
        "Error Type: {error_type}
Message: {message}

Traceback:
{traceback}

Code ({filename}):
{code}

Fix plan:
{plan}

Please provide a minimal safe patch as a unified diff format to fix this error. Focus only on the specific issue and add proper error handling.",
        error_type = incident.error_type,
        message = incident.message,
        traceback = incident.traceback,
        filename = incident.filename,
        code = incident.code,
        plan = plan,
    )
}

/// Pulls the diff out of a fenced reply, if the model wrapped it.
pub fn strip_code_fences(reply: &str) -> String {
    let trimmed = reply.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed.to_string();
    };
    let after_fence = &trimmed[start + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim_end().to_string() + "\n",
        None => body.trim_end().to_string() + "\n",
    }
}
