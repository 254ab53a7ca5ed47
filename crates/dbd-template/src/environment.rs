//! Template environment setup for dbdeploy

use crate::context::ApplyContext;
use crate::error::{TemplateError, TemplateResult};
use minijinja::{Environment, ErrorKind};
use std::path::PathBuf;

/// Built-in apply templates, keyed by template name
const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    (
        "mssql_apply.sql.j2",
        include_str!("../templates/mssql_apply.sql.j2"),
    ),
    (
        "postgres_apply.sql.j2",
        include_str!("../templates/postgres_apply.sql.j2"),
    ),
    (
        "mysql_apply.sql.j2",
        include_str!("../templates/mysql_apply.sql.j2"),
    ),
    (
        "duckdb_apply.sql.j2",
        include_str!("../templates/duckdb_apply.sql.j2"),
    ),
];

/// Template name for a dbms, e.g. `mssql_apply.sql.j2`
pub fn apply_template_name(dbms: &str) -> String {
    format!("{dbms}_apply.sql.j2")
}

fn builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, source)| *source)
}

/// Template environment for rendering apply scripts
pub struct TemplateEnvironment {
    env: Environment<'static>,
}

impl TemplateEnvironment {
    /// Create an environment; files in `template_dir` shadow built-in templates.
    pub fn new(template_dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();

        env.set_loader(move |name| {
            if let Some(dir) = &template_dir {
                let path = dir.join(name);
                if path.is_file() {
                    log::debug!("Using template override {}", path.display());
                    return std::fs::read_to_string(&path).map(Some).map_err(|e| {
                        minijinja::Error::new(
                            ErrorKind::InvalidOperation,
                            format!("failed to read template {}", path.display()),
                        )
                        .with_source(e)
                    });
                }
            }
            Ok(builtin_template(name).map(str::to_string))
        });

        Self { env }
    }

    /// Render the apply script for `ctx.dbms`
    pub fn render_apply(&self, ctx: &ApplyContext) -> TemplateResult<String> {
        let name = apply_template_name(&ctx.dbms);
        let template = self.env.get_template(&name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::TemplateNotFound { name: name.clone() }
            } else {
                TemplateError::from(e)
            }
        })?;
        let rendered = template.render(ctx)?;
        Ok(rendered)
    }
}

impl Default for TemplateEnvironment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;
