use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;

// @module: Discovery of episode pads on the listing page

/// Finds pad links on the listing page of the pad server
#[derive(Debug, Clone)]
pub struct PadIndex {
    /// `<base>/`, every pad URL starts with it
    base_prefix: String,
    /// Pad links carrying a `_YYYY-MM-DD` date token
    dated_link: Regex,
}

impl PadIndex {
    pub fn new(base_prefix: impl Into<String>) -> Result<Self> {
        let base_prefix = base_prefix.into();
        let pattern = format!(
            r"{}[^\s\)]*_\d{{4}}-\d{{2}}-\d{{2}}[^\s\)]*",
            regex::escape(&base_prefix)
        );
        let dated_link = Regex::new(&pattern)
            .with_context(|| format!("Failed to build pad link pattern for {}", base_prefix))?;

        Ok(Self {
            base_prefix,
            dated_link,
        })
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    /// Whether `url` points at the pad server
    pub fn is_pad_url(&self, url: &str) -> bool {
        url.starts_with(&self.base_prefix)
    }

    /// All dated pad links of the listing, deduplicated and sorted
    pub fn discover(&self, listing_text: &str) -> Vec<String> {
        self.dated_link
            .find_iter(listing_text)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First pad link written as a Markdown link target, `(<base>/...)`
    pub fn first_link(&self, listing_text: &str) -> Option<String> {
        listing_text
            .split('(')
            .skip(1)
            .filter(|candidate| candidate.starts_with(&self.base_prefix))
            .find_map(|candidate| {
                let link = candidate.split(')').next()?.trim();
                if link.len() > self.base_prefix.len() && !link.contains(char::is_whitespace) {
                    Some(link.to_string())
                } else {
                    None
                }
            })
    }
}
