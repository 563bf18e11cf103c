// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

const DEVICE_DIR: &str = "/dev/";

/// First `/dev/<prefix><suffix>` not present in `existing`.
///
/// Suffixes are tried `a` through `z`; only those matching `pattern` in full
/// are candidates.
pub fn next_device_name<I, S>(existing: I, prefix: &str, pattern: &str) -> Result<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("Invalid device pattern {pattern:?}"))?;
    let taken: HashSet<String> = existing
        .into_iter()
        .map(|device| device.as_ref().to_string())
        .collect();

    Ok(('a'..='z')
        .filter(|suffix| pattern.is_match(suffix.encode_utf8(&mut [0; 4])))
        .map(|suffix| format!("{DEVICE_DIR}{prefix}{suffix}"))
        .find(|candidate| !taken.contains(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_devices_in_use() {
        let next = next_device_name(["/dev/xvda", "/dev/xvdb"], "xvd", r"\w").expect("pattern");
        assert_eq!(next.as_deref(), Some("/dev/xvdc"));
    }

    #[test]
    fn empty_host_gets_first_letter() {
        let next = next_device_name(Vec::<String>::new(), "sd", r"\w").expect("pattern");
        assert_eq!(next.as_deref(), Some("/dev/sda"));
    }

    #[test]
    fn pattern_restricts_candidates() {
        let next = next_device_name(["/dev/xvdf"], "xvd", "[f-p]").expect("pattern");
        assert_eq!(next.as_deref(), Some("/dev/xvdg"));
    }

    #[test]
    fn exhausted_namespace_is_none() {
        let taken: Vec<String> = ('a'..='z').map(|c| format!("/dev/xvd{c}")).collect();
        let next = next_device_name(&taken, "xvd", r"\w").expect("pattern");
        assert_eq!(next, None);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(next_device_name(Vec::<String>::new(), "xvd", "[").is_err());
    }
}
