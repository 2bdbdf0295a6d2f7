//! JSON renderer for machine consumption of the documentation model.

use crate::model::Suite;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, suite: &Suite) -> String {
        match serde_json::to_string_pretty(suite) {
            Ok(mut out) => {
                out.push('\n');
                out
            }
            Err(err) => {
                tracing::error!(error = %err, suite = %suite.name, "suite serialization failed");
                String::new()
            }
        }
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
