use crate::{
    clients::{
        entities::Visibility,
        errors::{Error, Result},
        yandex::{DEFAULT_API_URL, YandexMusicClient},
    },
    sorter::{DEFAULT_PREFIX, DEFAULT_UNKNOWN_LABEL, SortOptions},
};

/// What a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Sort(SortOptions),
    Delete { prefix: String },
}

pub struct Config {
    pub token: String,
    pub api_url: String,
    pub mode: Mode,
}

impl Config {
    pub fn client(&self) -> Result<YandexMusicClient> {
        YandexMusicClient::new(self.token.as_str(), self.api_url.as_str())
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    token: Option<String>,
    api_url: Option<String>,
    prefix: Option<String>,
    unknown_label: Option<String>,
    visibility: Option<Visibility>,
    delete_prefix: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Switches the run to delete mode. An empty prefix keeps sort mode.
    #[must_use]
    pub fn delete_prefix(mut self, prefix: Option<String>) -> Self {
        self.delete_prefix = prefix;
        self
    }

    pub fn build(self) -> Result<Config> {
        let token = self
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::ConfigurationError("Missing Yandex Music token".into()))?;

        let mode = match self.delete_prefix.filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => Mode::Delete { prefix },
            None => Mode::Sort(SortOptions {
                prefix: self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
                unknown_label: self
                    .unknown_label
                    .unwrap_or_else(|| DEFAULT_UNKNOWN_LABEL.to_string()),
                visibility: self.visibility.unwrap_or_default(),
            }),
        };

        Ok(Config {
            token,
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            mode,
        })
    }
}
