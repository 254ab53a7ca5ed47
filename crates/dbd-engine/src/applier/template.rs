//! Template Applier: renders a pending set into one fail-fast SQL artifact.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use dbd_core::{ChangeScript, TableName};
use dbd_sql::{DbmsSyntax, StatementSplitter};
use dbd_template::{ApplyContext, RenderedScript, TemplateEnvironment};

use super::Applier;
use crate::error::DeployResult;

/// Renders pending scripts for an external SQL tool.
///
/// The artifact wraps every script and changelog insert in one outer
/// transaction using the dialect's template, so a failure anywhere leaves no
/// effect of any script. Where the dialect allows it, each script is also
/// guarded by a changelog lookup so an artifact rendered without reading the
/// changelog still applies every script at most once. No database I/O happens
/// here.
pub struct TemplateApplier<W: Write> {
    syntax: Arc<dyn DbmsSyntax>,
    table: TableName,
    splitter: StatementSplitter,
    environment: TemplateEnvironment,
    applied_by: Option<String>,
    writer: W,
}

impl<W: Write> TemplateApplier<W> {
    /// Create a template applier writing to `writer`
    pub fn new(
        syntax: Arc<dyn DbmsSyntax>,
        table: TableName,
        splitter: StatementSplitter,
        environment: TemplateEnvironment,
        writer: W,
    ) -> Self {
        Self {
            syntax,
            table,
            splitter,
            environment,
            applied_by: None,
            writer,
        }
    }

    /// Record a fixed principal instead of the dialect's current user
    pub fn with_applied_by(mut self, applied_by: Option<String>) -> Self {
        self.applied_by = applied_by;
        self
    }

    /// Render the artifact without writing it
    pub fn render(
        &self,
        pending: &[ChangeScript],
        create_changelog_table: bool,
    ) -> DeployResult<String> {
        let separator = self
            .splitter
            .delimiter_type()
            .separator(self.splitter.delimiter())
            .trim_end()
            .to_string();

        let create_changelog = if create_changelog_table {
            self.syntax.create_changelog_table_sql(&self.table)
        } else {
            Vec::new()
        };

        let scripts = pending
            .iter()
            .map(|script| self.rendered_script(script))
            .collect();

        let ctx = ApplyContext {
            dbms: self.syntax.name().to_string(),
            changelog_table: self.syntax.qualify(&self.table),
            separator,
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            create_changelog,
            scripts,
        };

        Ok(self.environment.render_apply(&ctx)?)
    }

    fn rendered_script(&self, script: &ChangeScript) -> RenderedScript {
        let key = script.unique_key();
        let statements = self.splitter.split(&script.content);
        let changelog_insert = self.syntax.insert_rendered_entry_sql(
            &self.table,
            script,
            self.applied_by.as_deref(),
        );
        RenderedScript {
            failure_message: self
                .syntax
                .quote_literal(&format!("Change script {key} failed")),
            statement_literals: statements
                .iter()
                .map(|stmt| self.syntax.quote_literal(stmt))
                .collect(),
            changelog_insert_literal: self.syntax.quote_literal(&changelog_insert),
            applied_check: self.syntax.applied_check_sql(&self.table, script),
            changelog_insert,
            statements,
            key,
            folder: script.folder.clone(),
            number: script.number,
            name: script.name.clone(),
        }
    }

    /// Consume the applier, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Applier for TemplateApplier<W> {
    fn apply(
        &mut self,
        pending: &[ChangeScript],
        create_changelog_table: bool,
    ) -> DeployResult<()> {
        let rendered = self.render(pending, create_changelog_table)?;
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.flush()?;
        log::info!(
            "Rendered {} change script(s) for {}",
            pending.len(),
            self.syntax.name()
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "template"
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
