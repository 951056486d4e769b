use crate::SanitizerArgs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// Coerces authored `width`/`height` values into the numeric-or-`auto`
/// vocabulary the dialect accepts. Anything it cannot interpret maps to `None`
/// so the caller drops the attribute.
#[derive(Clone, Copy, Debug, Default)]
pub struct DimensionNormalizer {
    content_max_width: Option<u32>,
}

impl DimensionNormalizer {
    pub fn new(args: &SanitizerArgs) -> Self {
        Self {
            content_max_width: args.content_max_width,
        }
    }

    pub fn normalize(&self, value: &str, axis: Axis) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.eq_ignore_ascii_case("auto") {
            return Some("auto".to_string());
        }
        if let Some(number) = parse_non_negative(value) {
            return within_bounds(number).map(format_number);
        }
        if let Some(px) = strip_suffix_ignore_case(value, "px") {
            let px = within_bounds(parse_non_negative(px.trim_end())?)?;
            return Some(format!("{}", px.trunc() as u32));
        }
        if let Some(pct) = value.strip_suffix('%') {
            let pct = parse_non_negative(pct.trim_end())?;
            return match (axis, self.content_max_width) {
                (Axis::Width, Some(max)) => {
                    let px = within_bounds((pct / 100.0 * f64::from(max)).round())?;
                    Some(format!("{}", px as u32))
                }
                _ => None,
            };
        }
        None
    }
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    let tail = value.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &value[..split])
}

/// Plain decimal only: digits with at most one `.`; no sign, exponent, or `inf`/`nan`.
fn parse_non_negative(text: &str) -> Option<f64> {
    let mut seen_dot = false;
    let mut seen_digit = false;
    for b in text.bytes() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Sizes past `u32::MAX` pixels are treated as uninterpretable rather than clamped.
fn within_bounds(n: f64) -> Option<f64> {
    (n <= f64::from(u32::MAX)).then_some(n)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as u32)
    } else {
        format!("{n}")
    }
}
