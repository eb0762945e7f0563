use anyhow::Result;
use qdigest_config::Config;
use qdigest_engine::Digester;
use qdigest_sources::{NamespaceFilter, SourceHandlerRegistry};
use std::io::{BufWriter, Write};

use super::{redaction_policy, render_style};

pub async fn handle(
    config: &Config,
    source: String,
    database: Option<String>,
    skip_collections: Option<Vec<String>>,
    typeinfo: bool,
    pretty: bool,
) -> Result<()> {
    let skip = skip_collections.unwrap_or_else(|| config.profile.skip_collections.clone());
    let database = database.or_else(|| config.profile.database.clone());
    let filter = NamespaceFilter::new(skip).with_database(database);

    let digester = Digester::new(
        redaction_policy(config, typeinfo),
        filter,
        render_style(config, pretty),
    );

    let registry = SourceHandlerRegistry::new();
    let mut records = registry.open(&source).await?;
    tracing::debug!(source = %records.describe(), "reading profile records");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = digester.run(records.as_mut(), &mut out).await?;
    out.flush()?;

    if stats.read > 0 && stats.emitted == 0 {
        tracing::warn!(
            read = stats.read,
            "no commands left to print; check --database and --skip-collections"
        );
    }

    Ok(())
}
