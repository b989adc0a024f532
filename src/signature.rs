//! Closing-signature lookup for outgoing report mail.

use std::fs;

use crate::config::ReportConfig;
use crate::error::Result;

/// Resolves the configured signature block: inline HTML wins over a
/// signature file. Returns `None` when neither is configured or the
/// resolved content is blank; the pipeline treats that as a hard stop
/// rather than sending a report without a closing block.
pub fn resolve(config: &ReportConfig) -> Result<Option<String>> {
    if let Some(inline) = &config.signature_html {
        return Ok(non_blank(inline.clone()));
    }
    if let Some(path) = &config.signature_file {
        let content = fs::read_to_string(path)?;
        return Ok(non_blank(content));
    }
    Ok(None)
}

fn non_blank(content: String) -> Option<String> {
    if content.trim().is_empty() {
        None
    } else {
        Some(content)
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::config::ReportConfig;
    use crate::error::ReportError;
    use std::env;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn base_config() -> ReportConfig {
        ReportConfig::default()
    }

    #[test]
    fn inline_signature_wins() {
        let mut config = base_config();
        config.signature_html = Some("<p>Regards,<br>Automated Report</p>".to_string());
        config.signature_file = Some("/nonexistent/sig.html".into());

        let signature = resolve(&config).expect("resolve should succeed");
        assert_eq!(
            signature.as_deref(),
            Some("<p>Regards,<br>Automated Report</p>")
        );
    }

    #[test]
    fn blank_inline_signature_is_absent() {
        let mut config = base_config();
        config.signature_html = Some("   \n".to_string());
        assert!(resolve(&config).expect("resolve should succeed").is_none());
    }

    #[test]
    fn unconfigured_signature_is_absent() {
        assert!(resolve(&base_config())
            .expect("resolve should succeed")
            .is_none());
    }

    #[test]
    fn file_signature_is_read() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let path = env::temp_dir().join(format!("redmine-reporter-sig-{nanos}.html"));
        fs::write(&path, "<p>From file</p>").expect("write signature");

        let mut config = base_config();
        config.signature_file = Some(path.clone());
        let signature = resolve(&config).expect("resolve should succeed");
        assert_eq!(signature.as_deref(), Some("<p>From file</p>"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unreadable_signature_file_is_an_error() {
        let mut config = base_config();
        config.signature_file = Some("/nonexistent/sig.html".into());
        let err = resolve(&config).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
