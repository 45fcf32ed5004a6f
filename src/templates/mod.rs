//! Named HTML templates for `qweb` slides and the player page.
//!
//! Templates are plain HTML files with `{name}` placeholders. Values added
//! through [`TemplateContext::with_var`] are HTML escaped on insertion;
//! placeholders without a value are left untouched.

mod player;

pub use player::{render_player_page, PlayerPage};

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering a named template.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("invalid template key '{0}'")]
    InvalidKey(String),

    #[error("failed to read template '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a named template against a context.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, key: &str, ctx: &TemplateContext) -> Result<String, RenderError>;
}

/// Variable substitution context for slide templates.
///
/// # Example
///
/// ```
/// use signage::templates::TemplateContext;
///
/// let ctx = TemplateContext::new()
///     .with_var("playlist.name", "Lobby <main>")
///     .with_raw("badge", "<b>new</b>");
///
/// assert_eq!(
///     ctx.substitute("<h1>{playlist.name}</h1>{badge}{missing}"),
///     "<h1>Lobby &lt;main&gt;</h1><b>new</b>{missing}"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text variable; it is escaped when substituted.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Add a variable holding trusted markup, inserted as is.
    pub fn with_raw(mut self, key: &str, html: &str) -> Self {
        self.vars.insert(key.to_string(), html.to_string());
        self
    }

    /// Set a text variable.
    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), escape_html(value));
    }

    /// Get the substituted (already escaped) form of a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    /// Substitute `{name}` placeholders in one left-to-right pass.
    ///
    /// Substituted values are never rescanned, so a value containing braces
    /// cannot pull in other variables.
    pub fn substitute(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find(['{', '}']) {
                Some(close) if after.as_bytes()[close] == b'}' => {
                    let name = &after[..close];
                    match self.vars.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether a template key is safe to map onto a file name.
///
/// Keys look like `module.template_name`: ASCII letters, digits, `_`, `-`
/// and `.`, not starting with a dot and without `..`.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains("..")
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Renders templates stored as `<dir>/<key>.html`.
///
/// Without a directory every key is reported as not found.
#[derive(Debug, Clone, Default)]
pub struct DirTemplateRenderer {
    dir: Option<PathBuf>,
}

impl DirTemplateRenderer {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn template_path(&self, key: &str) -> Result<PathBuf, RenderError> {
        if !is_valid_key(key) {
            return Err(RenderError::InvalidKey(key.to_string()));
        }
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| RenderError::NotFound(key.to_string()))?;
        Ok(dir.join(format!("{key}.html")))
    }
}

impl TemplateRenderer for DirTemplateRenderer {
    fn render(&self, key: &str, ctx: &TemplateContext) -> Result<String, RenderError> {
        let path = self.template_path(key)?;
        let source = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RenderError::NotFound(key.to_string()),
            _ => RenderError::Io {
                key: key.to_string(),
                source: e,
            },
        })?;
        tracing::trace!(key, path = %path.display(), "Rendering template");
        Ok(ctx.substitute(&source))
    }
}

/// Renders templates held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateRenderer {
    templates: HashMap<String, String>,
}

impl MemoryTemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: &str, source: &str) -> Self {
        self.templates.insert(key.to_string(), source.to_string());
        self
    }
}

impl TemplateRenderer for MemoryTemplateRenderer {
    fn render(&self, key: &str, ctx: &TemplateContext) -> Result<String, RenderError> {
        if !is_valid_key(key) {
            return Err(RenderError::InvalidKey(key.to_string()));
        }
        self.templates
            .get(key)
            .map(|source| ctx.substitute(source))
            .ok_or_else(|| RenderError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_substitute_escapes_text_vars() {
        let ctx = TemplateContext::new().with_var("name", "Tom & \"Jerry\"");
        assert_eq!(
            ctx.substitute("<p title=\"{name}\">{name}</p>"),
            "<p title=\"Tom &amp; &quot;Jerry&quot;\">Tom &amp; &quot;Jerry&quot;</p>"
        );
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let ctx = TemplateContext::new()
            .with_raw("a", "{b}")
            .with_var("b", "bee");
        assert_eq!(ctx.substitute("{a}-{b}"), "{b}-bee");
    }

    #[test]
    fn test_substitute_leaves_stray_braces() {
        let ctx = TemplateContext::new().with_var("x", "1");
        assert_eq!(ctx.substitute("a { b"), "a { b");
        assert_eq!(ctx.substitute("}{x}{"), "}1{");
        assert_eq!(ctx.substitute("{{x}}"), "{1}");
        assert_eq!(ctx.substitute("css { color: red }"), "css { color: red }");
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("signage.welcome"));
        assert!(is_valid_key("menu_board-2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key(".hidden"));
        assert!(!is_valid_key("a..b"));
    }

    #[test]
    fn test_dir_renderer_reads_template_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("signage.welcome.html"),
            "<h1>Welcome to {playlist.name}</h1>",
        )
        .unwrap();

        let renderer = DirTemplateRenderer::new(Some(dir.path().to_path_buf()));
        let ctx = TemplateContext::new().with_var("playlist.name", "Lobby");
        let html = renderer.render("signage.welcome", &ctx).unwrap();
        assert_eq!(html, "<h1>Welcome to Lobby</h1>");
    }

    #[test]
    fn test_dir_renderer_errors() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DirTemplateRenderer::new(Some(dir.path().to_path_buf()));
        let ctx = TemplateContext::new();

        assert_matches!(renderer.render("missing", &ctx), Err(RenderError::NotFound(key)) if key == "missing");
        assert_matches!(renderer.render("../secret", &ctx), Err(RenderError::InvalidKey(_)));

        let no_dir = DirTemplateRenderer::new(None);
        assert_matches!(no_dir.render("anything", &ctx), Err(RenderError::NotFound(_)));
    }

    #[test]
    fn test_memory_renderer() {
        let renderer = MemoryTemplateRenderer::new().with_template("hello", "Hi {who}");
        let ctx = TemplateContext::new().with_var("who", "<you>");
        assert_eq!(renderer.render("hello", &ctx).unwrap(), "Hi &lt;you&gt;");
        assert_matches!(renderer.render("bye", &ctx), Err(RenderError::NotFound(_)));
    }
}
