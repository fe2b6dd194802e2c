//! Turning file paths into the dotted identifiers test runners expect.

use crate::domain::model::DottedPath;
use crate::infra::config::Normalize;

/// Rules applied when normalizing a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Extensions without the leading dot, e.g. `py`.
    pub extensions: Vec<String>,
    /// Leading directory segments dropped from the path, e.g. `src`.
    pub strip_prefixes: Vec<String>,
}

impl NormalizeRules {
    pub fn from_config(config: &Normalize) -> Self {
        Self {
            extensions: config.extensions(),
            strip_prefixes: config.strip_prefixes(),
        }
    }
}

/// Build `<module path>[.<class>][.<method>]` from a file or directory path.
///
/// A file loses its recognized extension; a directory loses one trailing separator. The first
/// matching source-root prefix is dropped, then separators become dots. An empty path yields an
/// empty identifier.
pub fn build_dotted_path(
    path: &str,
    class_name: Option<&str>,
    method: Option<&str>,
    rules: &NormalizeRules,
) -> DottedPath {
    let mut module = path.replace('\\', "/");
    while let Some(rest) = module.strip_prefix("./") {
        module = rest.to_owned();
    }
    if module.is_empty() {
        return DottedPath::default();
    }

    match strip_extension(&module, &rules.extensions) {
        Some(stem) => module = stem.to_owned(),
        None => {
            if module.ends_with('/') {
                module.pop();
            }
        }
    }

    if let Some(rest) = strip_source_root(&module, &rules.strip_prefixes) {
        module = rest.to_owned();
    }

    let mut dotted = module.replace('/', ".");
    for segment in [class_name, method].into_iter().flatten() {
        dotted.push('.');
        dotted.push_str(segment);
    }
    DottedPath::new(dotted)
}

fn strip_extension<'a>(path: &'a str, extensions: &[String]) -> Option<&'a str> {
    extensions.iter().find_map(|ext| {
        let ext = ext.trim_start_matches('.');
        let stem = path.strip_suffix(ext)?.strip_suffix('.')?;
        (!stem.is_empty() && !stem.ends_with('/')).then_some(stem)
    })
}

fn strip_source_root<'a>(path: &'a str, prefixes: &[String]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            return None;
        }
        path.strip_prefix(prefix)?
            .strip_prefix('/')
            .filter(|rest| !rest.is_empty())
    })
}
