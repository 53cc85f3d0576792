//! Option source resolution.
//!
//! A control owns one [`OptionSource`] and feeds it the field's source
//! configuration every cycle. Static configurations resolve immediately;
//! remote ones produce a [`FetchRequest`] that the host runs in the
//! background and reports back through [`OptionSource::apply`].
//!
//! Every configuration change bumps a sequence number. Fetch results carry
//! the number they were issued with, and only the latest one is applied, so
//! an overlapping request that completes late cannot overwrite fresher data.

use tracing::{debug, warn};

use super::client::OptionClient;
use super::error::Result;
use crate::form::{FieldDefinition, SelectOption};

/// Where a control's options come from.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSourceConfig {
    /// Options embedded in the field definition.
    Static(Vec<SelectOption>),
    /// Options fetched as JSON from a URL.
    Remote {
        /// The `dataSource` URL.
        url: String,
    },
}

impl OptionSourceConfig {
    /// Derive the configuration of a field.
    ///
    /// A non-empty `dataSource` wins over the static `values`.
    pub fn from_field(field: &FieldDefinition) -> Self {
        match field.remote_source() {
            Some(url) => OptionSourceConfig::Remote {
                url: url.to_string(),
            },
            None => OptionSourceConfig::Static(field.values.clone()),
        }
    }
}

/// A fetch the host should run for a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence number to hand back with the result.
    pub seq: u64,
    /// URL to fetch.
    pub url: String,
}

/// Resolved option state of a single control.
#[derive(Debug, Default)]
pub struct OptionSource {
    /// Configuration last synced.
    config: Option<OptionSourceConfig>,
    /// Last successfully resolved options.
    options: Vec<SelectOption>,
    /// Sequence number of the latest configuration.
    latest_seq: u64,
    /// Whether a fetch for the latest configuration is outstanding.
    pending: bool,
}

impl OptionSource {
    /// Create an unresolved source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a configuration to its option list.
    ///
    /// Static configurations return their options unchanged; remote ones
    /// issue a single GET.
    pub async fn resolve(
        client: &OptionClient,
        config: &OptionSourceConfig,
    ) -> Result<Vec<SelectOption>> {
        match config {
            OptionSourceConfig::Static(options) => Ok(options.clone()),
            OptionSourceConfig::Remote { url } => client.fetch_options(url).await,
        }
    }

    /// Resolve a configuration synchronously, if it is static.
    pub fn resolve_static(config: &OptionSourceConfig) -> Option<Vec<SelectOption>> {
        match config {
            OptionSourceConfig::Static(options) => Some(options.clone()),
            OptionSourceConfig::Remote { .. } => None,
        }
    }

    /// Bring the source in line with `config`.
    ///
    /// Does nothing if the configuration is unchanged by value. Otherwise the
    /// sequence advances; a static configuration is applied on the spot and a
    /// remote one returns the request to run. Until a remote request
    /// resolves, the previous options stay visible.
    pub fn sync(&mut self, config: &OptionSourceConfig) -> Option<FetchRequest> {
        if self.config.as_ref() == Some(config) {
            return None;
        }

        self.latest_seq += 1;
        self.config = Some(config.clone());

        if let Some(options) = Self::resolve_static(config) {
            debug!(seq = self.latest_seq, count = options.len(), "Resolved static options");
            self.options = options;
            self.pending = false;
            return None;
        }

        let OptionSourceConfig::Remote { url } = config else {
            return None;
        };
        debug!(seq = self.latest_seq, %url, "Requesting remote options");
        self.pending = true;
        Some(FetchRequest {
            seq: self.latest_seq,
            url: url.clone(),
        })
    }

    /// Apply the result of a fetch issued with sequence number `seq`.
    ///
    /// Returns `true` if the options were replaced. Results for superseded
    /// requests are dropped, and failures keep the last good list.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<SelectOption>>) -> bool {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding superseded option fetch");
            return false;
        }
        self.pending = false;

        match result {
            Ok(options) => {
                debug!(seq, count = options.len(), "Applied remote options");
                self.options = options;
                true
            }
            Err(e) => {
                warn!(
                    seq,
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "Option resolution failed, keeping previous options"
                );
                false
            }
        }
    }

    /// The resolved options.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Check whether a fetch for the current configuration is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Sequence number of the latest configuration.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
