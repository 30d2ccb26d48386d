use reqwest::Client;

/// Credentials resolved by the speech to text service client.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub username: String,
    pub password: String,
    pub url: String,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Speech to text service bound to username/password credentials.
///
/// Only used to resolve the credential set the authorization service expects;
/// building it performs no request.
#[derive(Debug, Clone)]
pub struct SpeechToTextClient {
    client: Client,
    credentials: ServiceCredentials,
}

impl SpeechToTextClient {
    pub fn new(client: Client, username: &str, password: &str, url: &str) -> Self {
        Self {
            client,
            credentials: ServiceCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
                url: url.trim_end_matches('/').to_owned(),
            },
        }
    }

    pub fn credentials(&self) -> ServiceCredentials {
        self.credentials.clone()
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_credentials_without_trailing_slash() {
        let speech = SpeechToTextClient::new(
            Client::new(),
            "user",
            "pass",
            "https://stream.example.net/speech-to-text/api/",
        );
        let creds = speech.credentials();
        assert_eq!(creds.url, "https://stream.example.net/speech-to-text/api");
        assert_eq!(creds.username, "user");
        assert!(!format!("{:?}", creds).contains("pass"));
    }
}
