//! Recursive `#import` resolution for text resources.
//!
//! A line of the form `#import "other.graphql"` is replaced by the fully
//! resolved content of the referenced resource, itself expanded the same way.
//! References resolve relative to the importing file's directory (the current
//! working directory for stdin). After expansion a transform selected by the
//! root locator's extension is applied to the flattened text.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::ImportError;
use crate::locator::Locator;

/// Transform applied to fully expanded text, keyed by file extension.
pub type ImportTransform = Arc<dyn Fn(String) -> String + Send + Sync>;

/// Import directive grammar, per line: optional leading whitespace, optional
/// `#`, the literal `import`, then a quoted reference drawn from a restricted
/// safe character set.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*#?import[ \t]*(?:"([A-Za-z0-9./\\$_+-]+)"|'([A-Za-z0-9./\\$_+-]+)')[ \t]*$"#,
    )
    .expect("import directive pattern is valid")
});

/// Recursive import resolver with per-extension post-transforms.
pub struct ImportResolver {
    transforms: HashMap<String, ImportTransform>,
    default_transform: ImportTransform,
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportResolver {
    /// Extensions registered by default for GraphQL module loading.
    pub const GRAPHQL_EXTENSIONS: [&'static str; 2] = [".graphql", ".gql"];

    /// Create a resolver whose default transform is the identity.
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
            default_transform: Arc::new(|text| text),
        }
    }

    /// Replace the fallback transform applied when no extension matches.
    pub fn with_default_transform(mut self, transform: ImportTransform) -> Self {
        self.default_transform = transform;
        self
    }

    /// Register a transform for resources with the given extension
    /// (including the leading dot, e.g. `.graphql`).
    pub fn register_extension(&mut self, ext: impl Into<String>, transform: ImportTransform) {
        self.transforms.insert(ext.into(), transform);
    }

    /// Register one transform for the whole GraphQL extension set.
    pub fn register_graphql(&mut self, transform: ImportTransform) {
        for ext in Self::GRAPHQL_EXTENSIONS {
            self.register_extension(ext, transform.clone());
        }
    }

    /// Read `locator` and recursively expand every import directive.
    ///
    /// Line endings are normalized to `\n` before matching. Read failures
    /// propagate unchanged. A cyclic import chain fails with
    /// [`ImportError::Cycle`] instead of recursing until file handles run
    /// out.
    pub fn resolve(&self, locator: &Locator) -> Result<String, ImportError> {
        let mut chain = Vec::new();
        self.resolve_inner(locator, &mut chain)
    }

    /// Fully resolve imports, then apply the transform registered for the
    /// locator's extension (the default transform when none matches).
    pub fn load(&self, locator: &Locator) -> Result<String, ImportError> {
        let text = self.resolve(locator)?;
        let transform = self.transform_for(locator);
        Ok(transform(text))
    }

    fn resolve_inner(
        &self,
        locator: &Locator,
        chain: &mut Vec<PathBuf>,
    ) -> Result<String, ImportError> {
        let tracked = match locator {
            Locator::Path(path) => {
                let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                if chain.contains(&canonical) {
                    return Err(ImportError::Cycle { path: path.clone() });
                }
                chain.push(canonical);
                true
            }
            _ => false,
        };

        let result = self.expand(&read_text(locator)?, &locator.base_dir(), chain);
        if tracked {
            chain.pop();
        }
        result
    }

    fn expand(
        &self,
        text: &str,
        base: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<String, ImportError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in IMPORT_RE.captures_iter(text) {
            let matched = caps.get(0).expect("group 0 is the whole match");
            let reference = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|group| group.as_str())
                .unwrap_or_default();
            out.push_str(&text[last..matched.start()]);
            let target = Locator::Path(base.join(reference));
            out.push_str(&self.resolve_inner(&target, chain)?);
            last = matched.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    fn transform_for(&self, locator: &Locator) -> &(dyn Fn(String) -> String + Send + Sync) {
        locator
            .extension()
            .and_then(|ext| self.transforms.get(&ext))
            .unwrap_or(&self.default_transform)
            .as_ref()
    }
}

fn read_text(locator: &Locator) -> Result<String, ImportError> {
    let mut reader = locator.open_read()?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text.replace("\r\n", "\n"))
}
