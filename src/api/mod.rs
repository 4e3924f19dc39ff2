//! REST boundary to the agency backend
//!
//! `AgencyApi` is what the dashboard orchestrates against; `ApiClient` is
//! the HTTP implementation. Responses are parsed into the lenient payload
//! types and converted to validated records before they leave this module.

mod session;
mod client;

pub use session::Session;
pub use client::ApiClient;

use crate::error::Result;
use crate::records::{CustomerRecord, CustomerUpdate, DocumentRecord, NewCustomer, PolicyRecord};

#[allow(async_fn_in_trait)]
pub trait AgencyApi {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    async fn list_customers(&self, session: &Session) -> Result<Vec<CustomerRecord>>;

    async fn create_customer(&self, session: &Session, customer: &NewCustomer) -> Result<CustomerRecord>;

    async fn update_customer(
        &self,
        session: &Session,
        id: &str,
        update: &CustomerUpdate,
    ) -> Result<CustomerRecord>;

    async fn delete_customer(&self, session: &Session, id: &str) -> Result<()>;

    async fn list_policies(&self, session: &Session) -> Result<Vec<PolicyRecord>>;

    async fn list_policy_documents(&self, session: &Session, policy_id: &str) -> Result<Vec<DocumentRecord>>;
}
