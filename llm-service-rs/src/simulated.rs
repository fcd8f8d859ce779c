// llm-service-rs/src/simulated.rs
// Canned plans and diff-shaped patches used without a model, or after the
// model call failed.

use shared_types_rs::simulated::{FALLBACK_PLAN_PREFIX, MOCK_PLAN_PREFIX, SIMULATED_PATCH_PREAMBLE};
use shared_types_rs::Incident;

pub fn mock_plan(incident: &Incident) -> String {
    format!(
        "{}{}: Add error handling and validation",
        MOCK_PLAN_PREFIX, incident.error_type
    )
}

pub fn fallback_plan(incident: &Incident) -> String {
    format!(
        "{}{}: Review the error traceback and add appropriate error handling",
        FALLBACK_PLAN_PREFIX, incident.error_type
    )
}

pub fn mock_patch(incident: &Incident) -> String {
    format!(
        r#"{preamble}
--- a/{file}
+++ b/{file}
@@ -1,5 +1,9 @@
 def checkout(order):
-    return order["customer"]["id"]  # will error if keys missing
+    if "customer" not in order:
+        raise ValueError("Missing customer information")
+    if "id" not in order["customer"]:
+        raise ValueError("Missing customer ID")
+    return order["customer"]["id"]

 if __name__ == "__main__":
     data = {{}}  # guaranteed KeyError
"#,
        preamble = SIMULATED_PATCH_PREAMBLE,
        file = incident.filename
    )
}

pub fn fallback_patch(incident: &Incident) -> String {
    format!(
        r#"{preamble}
--- a/{file}
+++ b/{file}
@@ -1,2 +1,4 @@
 def checkout(order):
-    return order["customer"]["id"]
+    if not order or "customer" not in order:
+        raise ValueError("Invalid order: missing customer")
+    return order["customer"]["id"]
"#,
        preamble = SIMULATED_PATCH_PREAMBLE,
        file = incident.filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types_rs::diff::{hunks_match_headers, looks_like_unified_diff};
    use shared_types_rs::simulated::is_simulated;
    use shared_types_rs::ErrorReport;

    fn incident() -> Incident {
        Incident::from_report(ErrorReport {
            filename: "app.py".into(),
            error_type: "KeyError".into(),
            message: "'customer'".into(),
            traceback: String::new(),
            code: String::new(),
        })
    }

    #[test]
    fn plans_are_marked() {
        let incident = incident();
        assert_eq!(
            mock_plan(&incident),
            "Mock plan for KeyError: Add error handling and validation"
        );
        assert!(is_simulated(&fallback_plan(&incident)));
    }

    #[test]
    fn patches_are_diff_shaped_and_marked() {
        let incident = incident();
        for patch in [mock_patch(&incident), fallback_patch(&incident)] {
            assert!(looks_like_unified_diff(&patch));
            assert!(is_simulated(&patch));
            assert!(patch.len() > 50);
            assert!(patch.contains("--- a/app.py\n+++ b/app.py\n"));
        }
    }

    #[test]
    fn canned_patches_have_consistent_hunks() {
        let incident = incident();
        assert!(hunks_match_headers(&mock_patch(&incident)));
        assert!(hunks_match_headers(&fallback_patch(&incident)));
    }
}
