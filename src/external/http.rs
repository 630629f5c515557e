use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{
    CancelsAction, CancelsEditOutcome, Mapping, MappingAction, Participant, Prize, UploadOutcome,
};

#[derive(Debug, Deserialize)]
struct WireParticipant {
    registration_id: String,
    username: String,
    display_name: String,
    connpass_attending: bool,
}

impl From<WireParticipant> for Participant {
    fn from(w: WireParticipant) -> Self {
        Participant {
            registration_id: w.registration_id,
            username: w.username,
            display_name: w.display_name,
            attending: w.connpass_attending,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireMapping {
    prize_id: String,
    winner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUploadResponse {
    #[serde(alias = "parsed_participants", alias = "parsed_prizes")]
    parsed: u64,
    error: Option<String>,
}

/// REST client for the raffle data backend.
#[derive(Clone)]
pub struct HttpBackendApi {
    client: Client,
    config: BackendConfig,
}

impl HttpBackendApi {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a non-2xx response to `BackendApiError` carrying the backend's own
    /// message text, which is shown to the operator as-is.
    async fn check(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(AppError::BackendApiError(format!("{status}: {body}")))
    }

    async fn upload_csv(&self, path: &str, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        let form = Form::new().part(
            "csv",
            Part::bytes(csv)
                .file_name("upload.csv")
                .mime_str("text/csv")
                .map_err(|e| AppError::InternalError(format!("Invalid CSV part: {e}")))?,
        );
        let response = self
            .client
            .put(self.url(path))
            .multipart(form)
            .send()
            .await?;

        // A rejected upload (bad columns, duplicate IDs, edits locked while
        // winners exist) has the same response shape on a 400 status; it is
        // reported inline, not as a transport failure.
        if response.status() == StatusCode::BAD_REQUEST {
            if let Ok(parsed) = response.json::<WireUploadResponse>().await {
                return Ok(UploadOutcome::rejected(
                    parsed.error.unwrap_or_else(|| "Upload rejected".to_string()),
                ));
            }
            return Err(AppError::BackendApiError("Upload rejected".to_string()));
        }

        let parsed: WireUploadResponse = Self::check(response).await?.json().await?;
        Ok(UploadOutcome {
            count: parsed.parsed,
            error: parsed.error,
        })
    }

    async fn mapping_mutation(
        &self,
        method: Method,
        prize_id: &str,
        winner_id: Option<&str>,
    ) -> AppResult<()> {
        let mut form = vec![("prize_id", prize_id.to_string())];
        if let Some(winner) = winner_id {
            form.push(("winner_id", winner.to_string()));
        }
        let response = self
            .client
            .request(method, self.url("/v1/raffle/set"))
            .form(&form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl BackendApi for HttpBackendApi {
    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        let response = self
            .client
            .get(self.url("/v1/participants"))
            .send()
            .await?;
        let wire: Vec<WireParticipant> = Self::check(response).await?.json().await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    async fn replace_participants(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        self.upload_csv("/v1/participants", csv).await
    }

    async fn delete_all_participants(&self) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url("/v1/participants"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_prizes(&self) -> AppResult<Vec<Prize>> {
        let response = self.client.get(self.url("/v1/prizes")).send().await?;
        let wire: Vec<Prize> = Self::check(response).await?.json().await?;
        Ok(wire)
    }

    async fn replace_prizes(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        self.upload_csv("/v1/prizes", csv).await
    }

    async fn delete_all_prizes(&self) -> AppResult<()> {
        let response = self.client.delete(self.url("/v1/prizes")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_mappings(&self) -> AppResult<Vec<Mapping>> {
        let response = self.client.get(self.url("/v1/mappings")).send().await?;
        let wire: Vec<WireMapping> = Self::check(response).await?.json().await?;
        Ok(wire
            .into_iter()
            .map(|w| Mapping {
                prize_id: w.prize_id,
                winner_id: w.winner_id,
            })
            .collect())
    }

    async fn delete_all_mappings(&self) -> AppResult<()> {
        let response = self.client.delete(self.url("/v1/mappings")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn edit_mapping(
        &self,
        action: MappingAction,
        prize_id: &str,
        winner_id: Option<&str>,
    ) -> AppResult<()> {
        match action {
            MappingAction::Set => {
                let winner = winner_id.ok_or_else(|| {
                    AppError::ValidationError("SET requires a winner_id".to_string())
                })?;
                self.mapping_mutation(Method::POST, prize_id, Some(winner))
                    .await
            }
            MappingAction::Overwrite => {
                let winner = winner_id.ok_or_else(|| {
                    AppError::ValidationError("OVERWRITE requires a winner_id".to_string())
                })?;
                self.mapping_mutation(Method::PUT, prize_id, Some(winner))
                    .await
            }
            MappingAction::Delete => {
                self.mapping_mutation(Method::DELETE, prize_id, None).await
            }
        }
    }

    async fn submit_winner(&self, prize_id: &str, winner_id: &str) -> AppResult<()> {
        self.mapping_mutation(Method::POST, prize_id, Some(winner_id))
            .await
    }

    async fn list_cancels(&self) -> AppResult<Vec<String>> {
        let response = self
            .client
            .get(self.url("/v1/participants/cancels/all"))
            .send()
            .await?;
        let wire: Vec<String> = Self::check(response).await?.json().await?;
        Ok(wire)
    }

    async fn delete_all_cancels(&self) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url("/v1/participants/cancels/all"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn edit_cancels(
        &self,
        action: CancelsAction,
        ids: &[String],
    ) -> AppResult<CancelsEditOutcome> {
        let method = match action {
            CancelsAction::Add => Method::PUT,
            CancelsAction::Remove => Method::DELETE,
        };
        let response = self
            .client
            .request(method, self.url("/v1/participants/cancels/edit"))
            .json(&ids)
            .send()
            .await?;
        let outcome: CancelsEditOutcome = Self::check(response).await?.json().await?;
        Ok(outcome)
    }
}
