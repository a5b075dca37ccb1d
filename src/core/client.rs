// http client for the question endpoint

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use super::query::{Query, Reply};
use crate::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/getquestions";

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl Client {
    pub fn new(endpoint: &str) -> Result<Self, Error> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint(format!(
                "{endpoint}: scheme must be http or https"
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: url,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// One POST, one JSON parse. The status code is not looked at: a 500 with
    /// a JSON body is as good as a 200.
    pub async fn send(&self, query: &Query) -> Result<Reply, Error> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(query)
            .send()
            .await?;

        let body = response.bytes().await?;
        Reply::from_slice(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let client = Client::new(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/getquestions");
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(matches!(
            Client::new("not a url"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Client::new("ftp://localhost/getquestions"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(Client::new("https://cards.example.com/getquestions").is_ok());
    }
}
