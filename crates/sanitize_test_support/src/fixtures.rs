use serde::Deserialize;
use std::path::Path;

/// One markup-in / markup-out case loaded from a TOML fixture file.
///
/// ```toml
/// [[case]]
/// name = "insecure src removes the element"
/// input = '<audio src="http://x.com/a.mp3"></audio>'
/// expected = ''
/// modified = true
///
/// [case.args]
/// require_https_src = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureCase {
    pub name: String,
    pub input: String,
    pub expected: String,
    #[serde(default)]
    pub modified: Option<bool>,
    /// Sanitizer arguments, kept as raw TOML so this crate stays independent of the sanitizer.
    #[serde(default)]
    pub args: toml::Table,
}

impl FixtureCase {
    pub fn args_toml(&self) -> String {
        toml::to_string(&self.args).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    case: Vec<FixtureCase>,
}

pub fn parse_fixtures(source: &str) -> Result<Vec<FixtureCase>, toml::de::Error> {
    Ok(toml::from_str::<FixtureFile>(source)?.case)
}

/// Load fixtures from `path`, panicking with the file name on failure.
pub fn load_fixtures(path: &Path) -> Vec<FixtureCase> {
    let source = std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()));
    let cases = parse_fixtures(&source)
        .unwrap_or_else(|err| panic!("failed to parse fixture {}: {err}", path.display()));
    assert!(!cases.is_empty(), "fixture {} has no cases", path.display());
    cases
}
