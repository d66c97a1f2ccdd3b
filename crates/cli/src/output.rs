// Result rendering and process exit codes

use onionscan_core::domain::{ErrorKind, ScanError};
use serde_json::json;

/// Invalid arguments or params bag
pub const EXIT_USAGE: u8 = 2;

/// Exit code for each failure kind
pub fn exit_code_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NotInstalled => 3,
        ErrorKind::SpawnFailed => 4,
        ErrorKind::TimedOut => 5,
        ErrorKind::ToolReportedError => 6,
        ErrorKind::MalformedOutput => 7,
    }
}

/// JSON document printed on stdout when a scan fails
pub fn error_document(err: &ScanError) -> serde_json::Value {
    json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    })
}

/// Merge flag overrides into the analyzer params bag
///
/// # Errors
/// Returns an error if `params` is not valid JSON
pub fn build_params_bag(
    params: Option<&str>,
    no_verbose: bool,
    tor_proxy_address: Option<&str>,
) -> anyhow::Result<serde_json::Value> {
    let mut bag: serde_json::Value = match params {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| anyhow::anyhow!("Invalid JSON params: {}", e))?,
        None => json!({}),
    };

    // Non-object bags are rejected later by ScanParams::from_bag
    if let Some(map) = bag.as_object_mut() {
        if no_verbose {
            map.insert("verbose".to_string(), json!(false));
        }
        if let Some(addr) = tor_proxy_address {
            map.insert("torProxyAddress".to_string(), json!(addr));
        }
    }

    Ok(bag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::NotInstalled,
            ErrorKind::SpawnFailed,
            ErrorKind::TimedOut,
            ErrorKind::ToolReportedError,
            ErrorKind::MalformedOutput,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| exit_code_for(*k)).collect();
        codes.push(EXIT_USAGE);
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), 6);
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_error_document_shape() {
        let doc = error_document(&ScanError::ToolReportedError {
            stderr: "boom".to_string(),
        });

        assert_eq!(doc["error"]["kind"], "ToolReportedError");
        assert_eq!(doc["error"]["message"], "onionscan error: boom");
    }

    #[test]
    fn test_params_bag_defaults_to_empty_object() {
        let bag = build_params_bag(None, false, None).unwrap();
        assert_eq!(bag, json!({}));
    }

    #[test]
    fn test_params_bag_flags_override_json() {
        let bag = build_params_bag(
            Some(r#"{"verbose": true, "torProxyAddress": "a:1"}"#),
            true,
            Some("b:2"),
        )
        .unwrap();

        assert_eq!(bag, json!({"verbose": false, "torProxyAddress": "b:2"}));
    }

    #[test]
    fn test_params_bag_rejects_invalid_json() {
        let err = build_params_bag(Some("{verbose"), false, None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON params"));
    }
}
