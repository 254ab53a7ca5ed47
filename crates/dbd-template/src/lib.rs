//! dbd-template - Template layer for dbdeploy
//!
//! Renders pending change scripts into one self-contained SQL artifact for
//! an external SQL tool. Each dialect's transaction and fail-fast idiom is
//! data: a `<dbms>_apply.sql.j2` template embedded in this crate, which a
//! project can override by placing a file of the same name in its template
//! directory.

pub mod context;
pub mod environment;
pub mod error;

pub use context::{ApplyContext, RenderedScript};
pub use environment::{apply_template_name, TemplateEnvironment};
pub use error::{TemplateError, TemplateResult};
