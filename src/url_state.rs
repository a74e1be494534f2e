//! Address-bar persistence of the filter string
//!
//! The codec itself is pure; this module reads and writes its output through
//! a single reserved query parameter.

use crate::config::CodecConfig;
use crate::filter::{DomainTables, FilterCodecError, FilterDescriptor, deserialize, serialize};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Query parameter holding the filter string
pub const DEFAULT_FILTER_PARAM: &str = "filter";

/// Characters escaped when writing an href, matching `encodeURI`
const HREF_ESCAPE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// How a URL change is recorded in the browsing history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Overwrite the current entry
    Replace,
    /// Add a new entry so back navigation restores the previous view
    #[default]
    Push,
}

/// Query parameters of an href, in order. Everything after the first `?`
/// is the query; a pair without `=` has an empty value.
pub fn parse_query(href: &str) -> Vec<(String, String)> {
    let decoded = percent_decode_str(href).decode_utf8_lossy();
    let Some((_, search)) = decoded.split_once('?') else {
        return Vec::new();
    };
    if search.is_empty() {
        return Vec::new();
    }

    search
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Replace the query of `href` with `params`
pub fn build_href(href: &str, params: &[(String, String)]) -> String {
    let base = href.split_once('?').map_or(href, |(base, _)| base);
    let search = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    utf8_percent_encode(&format!("{base}?{search}"), HREF_ESCAPE_SET).to_string()
}

/// Read/write access to the page's query string
pub trait UrlState {
    fn read_param(&self, name: &str) -> Option<String>;

    /// Merge `params` into the current query; `None` removes a parameter
    fn write_params(&mut self, params: &[(&str, Option<String>)], mode: HistoryMode);
}

/// In-memory address bar with a back-navigation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBar {
    href: String,
    history: Vec<String>,
}

impl AddressBar {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            history: Vec::new(),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Go back one history entry. Returns false when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.href = previous;
                true
            }
            None => false,
        }
    }
}

impl UrlState for AddressBar {
    fn read_param(&self, name: &str) -> Option<String> {
        parse_query(&self.href)
            .into_iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn write_params(&mut self, params: &[(&str, Option<String>)], mode: HistoryMode) {
        let mut merged: Vec<(String, String)> = Vec::new();
        for (key, value) in parse_query(&self.href) {
            match merged.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => merged.push((key, value)),
            }
        }

        for (key, value) in params {
            match value {
                Some(value) => {
                    match merged
                        .iter_mut()
                        .find(|(existing, _)| existing.as_str() == *key)
                    {
                        Some(slot) => slot.1 = value.clone(),
                        None => merged.push((key.to_string(), value.clone())),
                    }
                }
                None => merged.retain(|(existing, _)| existing.as_str() != *key),
            }
        }

        let next = build_href(&self.href, &merged);
        match mode {
            HistoryMode::Push => {
                let previous = std::mem::replace(&mut self.href, next);
                self.history.push(previous);
            }
            HistoryMode::Replace => self.href = next,
        }
    }
}

/// Filter codec bound to one query parameter
#[derive(Debug, Clone)]
pub struct UrlFilterCodec<'a> {
    tables: &'a DomainTables,
    param_name: String,
    history: HistoryMode,
}

impl<'a> UrlFilterCodec<'a> {
    pub fn new(tables: &'a DomainTables) -> Self {
        Self {
            tables,
            param_name: DEFAULT_FILTER_PARAM.to_string(),
            history: HistoryMode::default(),
        }
    }

    pub fn from_config(config: &'a CodecConfig) -> Self {
        Self {
            tables: &config.domain,
            param_name: config.param_name.clone(),
            history: config.history,
        }
    }

    pub fn with_param_name(mut self, name: impl Into<String>) -> Self {
        self.param_name = name.into();
        self
    }

    pub fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = history;
        self
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Restore the stored filters.
    ///
    /// `None` means no filter is stored. A string that no longer decodes
    /// against the current domain tables yields an empty list.
    pub fn read(&self, state: &impl UrlState) -> Option<Vec<FilterDescriptor>> {
        let encoded = state.read_param(&self.param_name)?;
        if encoded.is_empty() {
            return None;
        }

        match deserialize(&encoded, self.tables) {
            Ok(descriptors) => Some(descriptors),
            Err(err) if err.is_configuration_mismatch() => {
                warn!(error = %err, "stored filter does not match the loaded results, ignoring it");
                Some(Vec::new())
            }
            Err(err) => {
                warn!(error = %err, filter = %encoded, "ignoring malformed stored filter");
                Some(Vec::new())
            }
        }
    }

    /// Store `descriptors`. `None` rewrites the URL without touching the filter;
    /// an encoding with nothing in it removes the parameter.
    pub fn write(
        &self,
        state: &mut impl UrlState,
        descriptors: Option<&[FilterDescriptor]>,
    ) -> Result<(), FilterCodecError> {
        let Some(descriptors) = descriptors else {
            state.write_params(&[], self.history);
            return Ok(());
        };

        let encoded = serialize(descriptors, self.tables)?;
        debug!(param = %self.param_name, filter = %encoded, "writing filter to url");
        let value = (!encoded.is_empty()).then_some(encoded);
        state.write_params(&[(self.param_name.as_str(), value)], self.history);
        Ok(())
    }
}
