use std::io::Write;

use anyhow::{Context, Result};
use qdigest_core::{ProfileRecord, RedactionPolicy, Redactor, RenderStyle, RenderedPair};
use qdigest_sources::{NamespaceFilter, RecordSource};

/// Counters for one digest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestStats {
    pub read: usize,
    pub skipped_namespace: usize,
    pub empty: usize,
    pub emitted: usize,
}

/// What happened to a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emitted(RenderedPair),
    SkippedNamespace,
    Empty,
}

/// Drives profiling records through the namespace filter and the redactor
pub struct Digester {
    redactor: Redactor,
    filter: NamespaceFilter,
    style: RenderStyle,
}

impl Digester {
    pub fn new(policy: RedactionPolicy, filter: NamespaceFilter, style: RenderStyle) -> Self {
        Self {
            redactor: Redactor::new(policy),
            filter,
            style,
        }
    }

    /// Redact and render a single record
    pub fn process(&self, record: &ProfileRecord) -> Result<Outcome> {
        if !self.filter.accepts(&record.ns) {
            tracing::debug!(
                ns = %record.ns,
                suffix = ?self.filter.matching_suffix(&record.ns),
                "skipping namespace"
            );
            return Ok(Outcome::SkippedNamespace);
        }

        let Some(redacted) = self.redactor.redact_root(&record.command) else {
            tracing::debug!(ns = %record.ns, op = %record.op, "nothing left after redaction");
            return Ok(Outcome::Empty);
        };

        let pair = RenderedPair::new(record, &redacted, self.style)
            .with_context(|| format!("Failed to render redacted command for {}", record.ns))?;

        tracing::debug!(
            ns = %record.ns,
            op = %record.op,
            millis = ?record.millis,
            "redacted command"
        );

        Ok(Outcome::Emitted(pair))
    }

    /// Process every record of `source`, writing each pair to `out`
    pub async fn run<W: Write>(
        &self,
        source: &mut dyn RecordSource,
        out: &mut W,
    ) -> Result<DigestStats> {
        let mut stats = DigestStats::default();
        let label = source.describe();

        while let Some(record) = source
            .next_record()
            .await
            .with_context(|| format!("Cannot read profile data from {}", label))?
        {
            stats.read += 1;

            match self.process(&record)? {
                Outcome::Emitted(pair) => {
                    writeln!(out, "{}", pair)?;
                    stats.emitted += 1;
                }
                Outcome::SkippedNamespace => stats.skipped_namespace += 1,
                Outcome::Empty => stats.empty += 1,
            }
        }

        out.flush()?;

        tracing::info!(
            source = %label,
            read = stats.read,
            emitted = stats.emitted,
            skipped = stats.skipped_namespace,
            empty = stats.empty,
            "digest complete"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdigest_sources::JsonLinesSource;

    const PROFILE: &str = concat!(
        r#"{"op":"query","ns":"shop.users","command":{"find":"users","filter":{"age":{"$gt":21},"name":"Alice"},"multi":true}}"#,
        "\n",
        r#"{"op":"insert","ns":"shop.system.profile","command":{"insert":"system.profile"}}"#,
        "\n",
        r#"{"op":"update","ns":"shop.users","command":{"filter":{}}}"#,
        "\n",
        r#"{"op":"command","ns":"admin.$cmd","command":{"count":5}}"#,
        "\n",
    );

    fn digester(policy: RedactionPolicy, database: Option<&str>) -> Digester {
        let filter = NamespaceFilter::new(vec!["system.profile".to_string()])
            .with_database(database.map(String::from));
        Digester::new(policy, filter, RenderStyle::Compact)
    }

    #[tokio::test]
    async fn test_run_emits_pairs() {
        let mut source = JsonLinesSource::new(PROFILE.as_bytes(), "test");
        let mut out = Vec::new();

        let stats = digester(RedactionPolicy::default(), None)
            .run(&mut source, &mut out)
            .await
            .unwrap();

        assert_eq!(
            stats,
            DigestStats {
                read: 4,
                skipped_namespace: 1,
                empty: 1,
                emitted: 2,
            }
        );

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            r#"original: {"find":"users","filter":{"age":{"$gt":21},"name":"Alice"},"multi":true}"#
        );
        assert_eq!(
            lines[1],
            r#"redacted query: {"***":"***","***":{"***":{"$gt":"***"},"***":"***"},"multi":true}"#
        );
        assert_eq!(lines[3], r#"redacted command: {"***":"***"}"#);
    }

    #[tokio::test]
    async fn test_type_info_and_database() {
        let mut source = JsonLinesSource::new(PROFILE.as_bytes(), "test");
        let mut out = Vec::new();

        let stats = digester(RedactionPolicy::default().with_type_info(true), Some("admin"))
            .run(&mut source, &mut out)
            .await
            .unwrap();

        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.skipped_namespace, 3);

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("redacted command: {\"***\":\"int32\"}\n"));
    }

    #[tokio::test]
    async fn test_read_error_is_fatal() {
        let mut source = JsonLinesSource::new("{\"op\":\"query\"}\nnot json\n".as_bytes(), "broken");
        let mut out = Vec::new();

        let err = digester(RedactionPolicy::default(), None)
            .run(&mut source, &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Cannot read profile data from broken"));
    }

    #[test]
    fn test_process_outcomes() {
        let digester = digester(RedactionPolicy::default(), None);

        let record = ProfileRecord::from_json_str(r#"{"op":"query","ns":"a.system.profile"}"#).unwrap();
        assert_eq!(digester.process(&record).unwrap(), Outcome::SkippedNamespace);

        let record = ProfileRecord::from_json_str(r#"{"op":"query","ns":"a.b"}"#).unwrap();
        assert_eq!(digester.process(&record).unwrap(), Outcome::Empty);
    }
}
