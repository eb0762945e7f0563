pub mod config;
pub mod digest;
pub mod redact;

use qdigest_config::Config;
use qdigest_core::{RedactionPolicy, RenderStyle};

/// Redaction policy from config, with the --typeinfo flag applied
pub fn redaction_policy(config: &Config, typeinfo: bool) -> RedactionPolicy {
    let type_info = typeinfo || config.redaction.type_info;
    config.redaction.clone().with_type_info(type_info)
}

pub fn render_style(config: &Config, pretty: bool) -> RenderStyle {
    if pretty || config.output.pretty {
        RenderStyle::Pretty
    } else {
        RenderStyle::Compact
    }
}
