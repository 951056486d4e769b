//! Secure-transport enforcement for resource URLs.
//!
//! The guard is string-level: it parses with the `url` crate but never fetches.

use std::fmt;

use url::Url;

use crate::SanitizerArgs;

/// Where a URL was found. Element-level attributes are required; alternate
/// `<source>` children are optional, so the caller drops only that child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlSite {
    Attribute,
    AlternateSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlRejection {
    Empty,
    Insecure,
    NotHttps,
    Malformed,
}

impl fmt::Display for UrlRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UrlRejection::Empty => "empty url",
            UrlRejection::Insecure => "insecure http url",
            UrlRejection::NotHttps => "url is not served over https",
            UrlRejection::Malformed => "malformed url",
        };
        f.write_str(msg)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ResourceGuard {
    require_https: bool,
}

impl ResourceGuard {
    pub fn new(args: &SanitizerArgs) -> Self {
        Self {
            require_https: args.require_https_src,
        }
    }

    /// Return the URL to use for `raw`, or why it must be dropped.
    ///
    /// Accepted values come back with surrounding ASCII whitespace removed.
    pub fn validate(&self, raw: &str, site: UrlSite) -> Result<String, UrlRejection> {
        let result = self.check(raw, site);
        if let Err(reason) = &result {
            log::trace!(target: "sanitize.url", "rejected {raw:?} ({site:?}): {reason}");
        }
        result
    }

    fn check(&self, raw: &str, site: UrlSite) -> Result<String, UrlRejection> {
        let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
        if trimmed.is_empty() {
            return Err(UrlRejection::Empty);
        }

        if trimmed.starts_with("//") {
            // Protocol-relative URLs inherit the page scheme, which is HTTPS in the dialect.
            return match Url::parse(&format!("https:{trimmed}")) {
                Ok(_) => Ok(trimmed.to_string()),
                Err(_) => Err(UrlRejection::Malformed),
            };
        }

        match Url::parse(trimmed) {
            Ok(url) if url.scheme() == "https" => Ok(trimmed.to_string()),
            Ok(url) if url.scheme() == "http" => self.insecure(trimmed, url, site),
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                if self.require_https {
                    Err(UrlRejection::NotHttps)
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Err(_) => Err(UrlRejection::Malformed),
        }
    }

    fn insecure(&self, trimmed: &str, mut url: Url, site: UrlSite) -> Result<String, UrlRejection> {
        if self.require_https {
            return Err(UrlRejection::Insecure);
        }
        match site {
            UrlSite::Attribute => Ok(trimmed.to_string()),
            UrlSite::AlternateSource => {
                let upgraded = match trimmed.get(..5) {
                    Some(prefix) if prefix.eq_ignore_ascii_case("http:") => {
                        format!("https:{}", &trimmed[5..])
                    }
                    _ => {
                        url.set_scheme("https")
                            .map_err(|()| UrlRejection::Malformed)?;
                        url.to_string()
                    }
                };
                log::trace!(target: "sanitize.url", "upgraded {trimmed:?} to {upgraded:?}");
                Ok(upgraded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> ResourceGuard {
        ResourceGuard::new(&SanitizerArgs::default())
    }

    fn lenient() -> ResourceGuard {
        ResourceGuard::new(&SanitizerArgs {
            require_https_src: false,
            ..SanitizerArgs::default()
        })
    }

    #[test]
    fn https_and_protocol_relative_pass() {
        let guard = strict();
        for site in [UrlSite::Attribute, UrlSite::AlternateSource] {
            assert_eq!(
                guard.validate("https://x.com/a.mp3", site).as_deref(),
                Ok("https://x.com/a.mp3")
            );
            assert_eq!(
                guard.validate("//cdn.x.com/a.mp3", site).as_deref(),
                Ok("//cdn.x.com/a.mp3")
            );
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            strict().validate("  https://x.com/a.mp3\n", UrlSite::Attribute).as_deref(),
            Ok("https://x.com/a.mp3")
        );
    }

    #[test]
    fn http_is_rejected_when_https_is_required() {
        let guard = strict();
        assert_eq!(
            guard.validate("http://x.com/a.mp3", UrlSite::Attribute),
            Err(UrlRejection::Insecure)
        );
        assert_eq!(
            guard.validate("http://x.com/a.mp3", UrlSite::AlternateSource),
            Err(UrlRejection::Insecure)
        );
    }

    #[test]
    fn empty_relative_and_other_schemes_are_rejected() {
        let guard = strict();
        assert_eq!(guard.validate("   ", UrlSite::Attribute), Err(UrlRejection::Empty));
        assert_eq!(
            guard.validate("/media/a.mp3", UrlSite::Attribute),
            Err(UrlRejection::NotHttps)
        );
        assert_eq!(
            guard.validate("javascript:alert(1)", UrlSite::Attribute),
            Err(UrlRejection::NotHttps)
        );
    }

    #[test]
    fn malformed_urls_are_rejected_under_any_policy() {
        for guard in [strict(), lenient()] {
            assert_eq!(
                guard.validate("https://", UrlSite::Attribute),
                Err(UrlRejection::Malformed)
            );
            assert_eq!(
                guard.validate("http://[::1", UrlSite::AlternateSource),
                Err(UrlRejection::Malformed)
            );
            assert_eq!(
                guard.validate("//", UrlSite::Attribute),
                Err(UrlRejection::Malformed)
            );
        }
    }

    #[test]
    fn lenient_policy_upgrades_only_alternate_sources() {
        let guard = lenient();
        assert_eq!(
            guard.validate("http://x.com/a.mp3", UrlSite::Attribute).as_deref(),
            Ok("http://x.com/a.mp3")
        );
        assert_eq!(
            guard.validate("HTTP://x.com/a.mp3", UrlSite::AlternateSource).as_deref(),
            Ok("https://x.com/a.mp3")
        );
        assert_eq!(
            guard.validate("/media/a.mp3", UrlSite::Attribute).as_deref(),
            Ok("/media/a.mp3")
        );
    }
}
