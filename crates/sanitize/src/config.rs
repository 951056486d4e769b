use serde::Deserialize;

use crate::ConfigError;

/// Arguments shared by every tag sanitizer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizerArgs {
    /// Reject any resource URL that is not fetched over HTTPS. When off, insecure
    /// `<source>` URLs are upgraded to `https` instead of rejected.
    pub require_https_src: bool,
    /// Width in pixels of the content column; lets percentage widths resolve to pixels.
    pub content_max_width: Option<u32>,
}

impl Default for SanitizerArgs {
    fn default() -> Self {
        Self {
            require_https_src: true,
            content_max_width: None,
        }
    }
}

impl SanitizerArgs {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let args = SanitizerArgs::from_toml_str("").unwrap();
        assert_eq!(args, SanitizerArgs::default());
        assert!(args.require_https_src);
    }

    #[test]
    fn reads_all_fields() {
        let args =
            SanitizerArgs::from_toml_str("require_https_src = false\ncontent_max_width = 600\n")
                .unwrap();
        assert!(!args.require_https_src);
        assert_eq!(args.content_max_width, Some(600));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SanitizerArgs::from_toml_str("require_https = true").unwrap_err();
        assert!(err.to_string().contains("require_https"));
    }
}
