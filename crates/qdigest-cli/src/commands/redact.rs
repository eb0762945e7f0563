use anyhow::{Context, Result};
use qdigest_config::Config;
use qdigest_core::{Document, Redactor};
use tokio::io::AsyncReadExt;

use super::{redaction_policy, render_style};

pub async fn handle(config: &Config, document: String, typeinfo: bool, pretty: bool) -> Result<()> {
    let text = if document == "-" {
        let mut input = String::new();
        tokio::io::stdin().read_to_string(&mut input).await?;
        input
    } else {
        document
    };

    let doc = Document::from_json_str(&text).context("Cannot parse command document")?;
    let redactor = Redactor::new(redaction_policy(config, typeinfo));

    match redactor.redact_root(&doc) {
        Some(redacted) => println!("{}", render_style(config, pretty).render(&redacted)?),
        None => tracing::info!("nothing left after redaction"),
    }

    Ok(())
}
