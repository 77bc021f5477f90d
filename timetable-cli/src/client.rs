//! HTTP client for communicating with timetable-server

use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use timetable_core::sync::SlotApi;
use timetable_core::{NewSlot, Slot, SlotPatch, TimetableError, TimetableResult};

/// HTTP client for timetable-server
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

// Response types matching server API

#[derive(Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// `/api/slots/` or `/api/slots/{key}` under the base URL
    fn slots_url(&self, key: Option<&str>) -> TimetableResult<Url> {
        let invalid = || TimetableError::Config(format!("Invalid server URL '{}'", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.pop_if_empty().extend(["api", "slots"]);
            segments.push(key.unwrap_or(""));
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> TimetableResult<T> {
        let resp = request
            .send()
            .await
            .map_err(|e| TimetableError::Api(format!("Failed to connect to server: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorResponse>().await {
                Ok(err) => err.error,
                Err(_) => status.to_string(),
            };
            return Err(TimetableError::Api(message));
        }

        resp.json()
            .await
            .map_err(|e| TimetableError::Api(format!("Unexpected response from server: {e}")))
    }
}

impl SlotApi for Client {
    /// GET /api/slots/
    async fn list_all(&self) -> TimetableResult<Vec<Slot>> {
        self.send(self.http.get(self.slots_url(None)?)).await
    }

    /// GET /api/slots/:userId
    async fn list_by_user(&self, user_id: &str) -> TimetableResult<Vec<Slot>> {
        self.send(self.http.get(self.slots_url(Some(user_id))?)).await
    }

    /// POST /api/slots/
    async fn create(&self, new: &NewSlot) -> TimetableResult<Slot> {
        self.send(self.http.post(self.slots_url(None)?).json(new)).await
    }

    /// PUT /api/slots/:id
    async fn update(&self, id: &str, patch: &SlotPatch) -> TimetableResult<Slot> {
        self.send(self.http.put(self.slots_url(Some(id))?).json(patch)).await
    }

    /// DELETE /api/slots/:id
    async fn delete(&self, id: &str) -> TimetableResult<()> {
        let resp: DeleteResponse = self.send(self.http.delete(self.slots_url(Some(id))?)).await?;

        if !resp.success {
            return Err(TimetableError::Api(format!("Server refused to delete {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_url_with_trailing_slash() {
        let client = Client::new("http://127.0.0.1:5001");
        assert_eq!(
            client.slots_url(None).unwrap().as_str(),
            "http://127.0.0.1:5001/api/slots/"
        );

        let client = Client::new("http://localhost:5001/");
        assert_eq!(
            client.slots_url(None).unwrap().as_str(),
            "http://localhost:5001/api/slots/"
        );
    }

    #[test]
    fn encodes_keys() {
        let client = Client::new("http://localhost:5001");
        assert_eq!(
            client.slots_url(Some("abc123")).unwrap().as_str(),
            "http://localhost:5001/api/slots/abc123"
        );
        assert_eq!(
            client.slots_url(Some("jane doe")).unwrap().as_str(),
            "http://localhost:5001/api/slots/jane%20doe"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = Client::new("http://example.com/timetable");
        assert_eq!(
            client.slots_url(Some("x")).unwrap().as_str(),
            "http://example.com/timetable/api/slots/x"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(Client::new("not a url").slots_url(None).is_err());
        assert!(Client::new("mailto:someone@example.com").slots_url(None).is_err());
    }
}
