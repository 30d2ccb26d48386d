use anyhow::{bail, Result};
use tracing::warn;

use crate::utils::constants::{IAM_URL_DEFAULT, SPEECH_URL_DEFAULT, TONE_URL_DEFAULT};

pub const SPEECH_TOTEXT_URL: &str = "SPEECH_TOTEXT_URL";
pub const SPEECH_TOTEXT_IAM_APIKEY: &str = "SPEECH_TOTEXT_IAM_APIKEY";
pub const SPEECH_TOTEXT_IAM_URL: &str = "SPEECH_TOTEXT_IAM_URL";
pub const SPEECH_TOTEXT_USERNAME: &str = "SPEECH_TOTEXT_USERNAME";
pub const SPEECH_TOTEXT_PASSWORD: &str = "SPEECH_TOTEXT_PASSWORD";
pub const TONE_ANALYZER_URL: &str = "TONE_ANALYZER_URL";
pub const TONE_ANALYZER_IAM_APIKEY: &str = "TONE_ANALYZER_IAM_APIKEY";
pub const TONE_ANALYZER_IAM_URL: &str = "TONE_ANALYZER_IAM_URL";
pub const TONE_ANALYZER_VERSION: &str = "TONE_ANALYZER_VERSION";

/// How the speech token is obtained. Picked once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Iam {
        api_key: String,
        iam_url: String,
    },
    Legacy {
        username: String,
        password: String,
        service_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// returned to the front-end alongside every token
    pub service_url: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneConfig {
    pub url: String,
    pub api_key: String,
    pub iam_url: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub speech: SpeechConfig,
    pub tone: ToneConfig,
    /// variables that were absent and got a placeholder
    pub missing: Vec<&'static str>,
}

impl UpstreamConfig {
    /// Read the upstream configuration from the process environment.
    pub fn load() -> Self {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Read the upstream configuration through `lookup`.
    ///
    /// Absent or empty values are replaced by placeholders and recorded in
    /// `missing`; nothing is validated here, bad values only show up on the
    /// first upstream call.
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let mut missing = Vec::new();
        let mut var_or = |name: &'static str, placeholder: String| -> String {
            match present(name) {
                Some(value) => value,
                None => {
                    missing.push(name);
                    placeholder
                }
            }
        };

        let service_url = present(SPEECH_TOTEXT_URL).unwrap_or_else(|| SPEECH_URL_DEFAULT.to_owned());

        let credentials = match present(SPEECH_TOTEXT_IAM_APIKEY) {
            Some(api_key) => Credentials::Iam {
                api_key,
                iam_url: var_or(SPEECH_TOTEXT_IAM_URL, undefined_var(SPEECH_TOTEXT_IAM_URL)),
            },
            None => Credentials::Legacy {
                username: var_or(SPEECH_TOTEXT_USERNAME, "<username>".to_owned()),
                password: var_or(SPEECH_TOTEXT_PASSWORD, "<password>".to_owned()),
                service_url: service_url.clone(),
            },
        };

        let tone = ToneConfig {
            url: present(TONE_ANALYZER_URL).unwrap_or_else(|| TONE_URL_DEFAULT.to_owned()),
            api_key: var_or(TONE_ANALYZER_IAM_APIKEY, undefined_var(TONE_ANALYZER_IAM_APIKEY)),
            iam_url: present(TONE_ANALYZER_IAM_URL).unwrap_or_else(|| IAM_URL_DEFAULT.to_owned()),
            version: var_or(TONE_ANALYZER_VERSION, undefined_var(TONE_ANALYZER_VERSION)),
        };

        Self {
            speech: SpeechConfig {
                service_url,
                credentials,
            },
            tone,
            missing,
        }
    }

    /// Warn about placeholders, or refuse them when `strict` is set.
    pub fn check(&self, strict: bool) -> Result<()> {
        if self.missing.is_empty() {
            return Ok(());
        }
        if strict {
            bail!("missing environment variables: {}", self.missing.join(", "));
        }
        for name in &self.missing {
            warn!("{} is not set, using a placeholder value", name);
        }
        Ok(())
    }
}

fn undefined_var(name: &str) -> String {
    format!("undefined var: {}", name)
}
