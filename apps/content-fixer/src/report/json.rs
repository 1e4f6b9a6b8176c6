//! JSON reporter

use anyhow::Result;

use crate::driver::RunSummary;

pub struct JsonReporter;

impl JsonReporter {
    /// Serialize the whole summary, including per-document change logs
    pub fn format(summary: &RunSummary, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn test_json_shape() {
        let output = JsonReporter::format(&fixtures::summary(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["mode"], "analyze");
        assert_eq!(value["documentsScanned"], 2);
        assert_eq!(value["changesByCategory"]["CLIENT_NUMBERS"], 1);
        assert_eq!(value["changesBySeverity"]["HIGH"], 1);
        assert_eq!(value["documents"][0]["changes"][0]["issueType"], "CLIENT_NUMBERS");
        assert_eq!(value["documents"][0]["formatFixes"][0]["action"], "restyled_heading");
        assert_eq!(value["failures"][0]["id"], "post-2");
    }

    #[test]
    fn test_pretty_is_multiline() {
        let output = JsonReporter::format(&fixtures::summary(), true).unwrap();
        assert!(output.lines().count() > 10);
    }
}
