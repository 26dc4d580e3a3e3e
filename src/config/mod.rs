mod raw;

use crate::price_list::PriceList;
use anyhow::{Context, Error, Result, bail};
use async_std::fs;
use regex::Regex;
use std::{convert::TryFrom, str::FromStr};

const DEFAULT_WISH_MARKERS: &[&str] = &["願望", "愿望", "wish"];

/// Words that introduce the wish line of an order.
///
/// Matching is case-insensitive so `Wish:` and `WISH` are both recognized.
/// Markers spelled in ASCII letters and digits only match as whole words, so
/// `wish` does not fire inside `Swisher`.
#[derive(Debug, Clone)]
pub struct WishMarkers {
    markers: Vec<String>,
    anywhere: Regex,
    leading: Regex,
}

impl WishMarkers {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Result<Self> {
        let markers: Vec<String> = markers
            .iter()
            .map(|m| m.as_ref().trim().to_owned())
            .filter(|m| !m.is_empty())
            .collect();
        if markers.is_empty() {
            bail!("At least one wish marker is required");
        }
        let alternatives = markers
            .iter()
            .map(|m| {
                if m.chars().all(|c| c.is_ascii_alphanumeric()) {
                    format!(r"\b{}\b", regex::escape(m))
                } else {
                    regex::escape(m)
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            anywhere: Regex::new(&format!("(?i)(?:{alternatives})"))
                .with_context(|| format!("Invalid wish markers: {markers:?}"))?,
            leading: Regex::new(&format!("(?i)^(?:{alternatives})"))
                .with_context(|| format!("Invalid wish markers: {markers:?}"))?,
            markers,
        })
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Line mentions a wish marker anywhere
    pub fn is_wish(&self, line: &str) -> bool {
        self.anywhere.is_match(line)
    }

    /// Line begins with a wish marker
    pub fn starts_with_wish(&self, line: &str) -> bool {
        self.leading.is_match(line)
    }

    /// Text following the first marker on the line, without the leading colon.
    /// `None` if the line has no marker.
    pub fn wish_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        let m = self.anywhere.find(line)?;
        Some(
            line[m.end()..]
                .trim_start_matches(|c: char| c == ':' || c == '：' || c.is_whitespace())
                .trim_end(),
        )
    }
}

impl Default for WishMarkers {
    fn default() -> Self {
        WishMarkers::new(DEFAULT_WISH_MARKERS).expect("default wish markers should be valid")
    }
}

/// Everything a parse session needs besides the input text
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub prices: PriceList,
    pub wish_markers: WishMarkers,
}

impl Config {
    pub async fn from_file(file: &str) -> Result<Self> {
        let doc = fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read config file: {file}"))?;
        doc.parse()
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = Error;

    fn try_from(raw_config: raw::Config) -> Result<Self> {
        let prices = raw_config
            .prices
            .map_or_else(PriceList::default, |prices| prices.into_iter().collect());
        let wish_markers = raw_config
            .wish_markers
            .map_or_else(|| Ok(WishMarkers::default()), |m| WishMarkers::new(m.as_slice()))?;
        Ok(Config {
            prices,
            wish_markers,
        })
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        // an empty document is a valid config with every section defaulted
        let raw_config: raw::Config = if doc.trim().is_empty() {
            raw::Config::default()
        } else {
            serde_yaml::from_str(doc)
                .with_context(|| format!("Failed to deserialize Config:\n{}", doc))?
        };
        let config: Config = raw_config
            .try_into()
            .context("Failed to convert Config")?;
        Ok(config)
    }
}
