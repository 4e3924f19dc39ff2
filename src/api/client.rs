//! HTTP implementation of `AgencyApi`

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{AgencyApi, Session};
use crate::config::ClientConfig;
use crate::error::{DashboardError, Result};
use crate::records::{
    CustomerPayload, CustomerRecord, CustomerUpdate, DocumentPayload, DocumentRecord, NewCustomer,
    PolicyPayload, PolicyRecord,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: String,
    #[serde(default)]
    email: Option<String>,
}

/// List endpoints answer with either a bare array or `{ "data": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.url()?,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(session.token())
    }

    async fn fetch_list<T: DeserializeOwned>(&self, session: &Session, segments: &[&str]) -> Result<Vec<T>> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {}", url);
        let response = self.authorized(self.http.get(url), session).send().await?;
        let body: ListBody<T> = read_json(response).await?;
        Ok(body.into_vec())
    }
}

/// Turn a non-2xx response into `DashboardError::Api`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DashboardError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = check_status(response).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Best human-readable message from an error body
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}

impl AgencyApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let login: LoginResponse = read_json(response).await?;
        log::info!("Logged in as {}", email);
        Ok(Session::new(login.token, login.email.or_else(|| Some(email.to_string()))))
    }

    async fn list_customers(&self, session: &Session) -> Result<Vec<CustomerRecord>> {
        let rows: Vec<CustomerPayload> = self.fetch_list(session, &["customers"]).await?;
        Ok(rows.into_iter().map(CustomerRecord::from).collect())
    }

    async fn create_customer(&self, session: &Session, customer: &NewCustomer) -> Result<CustomerRecord> {
        let url = self.endpoint(&["customers"])?;
        let response = self
            .authorized(self.http.post(url), session)
            .json(customer)
            .send()
            .await?;

        let created: CustomerPayload = read_json(response).await?;
        Ok(CustomerRecord::from(created))
    }

    async fn update_customer(
        &self,
        session: &Session,
        id: &str,
        update: &CustomerUpdate,
    ) -> Result<CustomerRecord> {
        let url = self.endpoint(&["customers", id])?;
        let response = self
            .authorized(self.http.put(url), session)
            .json(update)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DashboardError::NotFound { kind: "customer", id: id.to_string() });
        }
        let updated: CustomerPayload = read_json(response).await?;
        Ok(CustomerRecord::from(updated))
    }

    async fn delete_customer(&self, session: &Session, id: &str) -> Result<()> {
        let url = self.endpoint(&["customers", id])?;
        let response = self.authorized(self.http.delete(url), session).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DashboardError::NotFound { kind: "customer", id: id.to_string() });
        }
        check_status(response).await?;
        Ok(())
    }

    async fn list_policies(&self, session: &Session) -> Result<Vec<PolicyRecord>> {
        let rows: Vec<PolicyPayload> = self.fetch_list(session, &["policies"]).await?;
        Ok(rows.into_iter().map(PolicyRecord::from).collect())
    }

    async fn list_policy_documents(&self, session: &Session, policy_id: &str) -> Result<Vec<DocumentRecord>> {
        let rows: Vec<DocumentPayload> = self
            .fetch_list(session, &["policies", policy_id, "documents"])
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| DocumentRecord::from_payload(row, policy_id))
            .collect())
    }
}
