//! Dashboard orchestration: fetch through `AgencyApi`, keep per-view state,
//! hand snapshots to the analytics.
//!
//! State only changes after an awaited call succeeds. Failures become error
//! notices (the toasts of the web front end) and leave the state as it was.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;

use crate::analytics::AnalyticsReport;
use crate::api::{AgencyApi, Session};
use crate::error::Result;
use crate::records::{CustomerRecord, CustomerUpdate, DocumentRecord, NewCustomer, PolicyRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing outcome of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Local view state for the admin screens
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub customers: Vec<CustomerRecord>,
    pub policies: Vec<PolicyRecord>,
    /// Documents keyed by policy id
    pub documents: HashMap<String, Vec<DocumentRecord>>,
    pub notices: Vec<Notice>,
}

pub struct Dashboard<A: AgencyApi> {
    api: A,
    session: Session,
    state: DashboardState,
}

impl<A: AgencyApi> Dashboard<A> {
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            state: DashboardState::default(),
        }
    }

    /// Log in through `api` and start with empty state
    pub async fn connect(api: A, email: &str, password: &str) -> Result<Self> {
        let session = api.login(email, password).await?;
        Ok(Self::new(api, session))
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drain notices accumulated since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.notices)
    }

    fn record_failure(&mut self, action: &str, err: &crate::error::DashboardError) {
        log::warn!("{} failed: {}", action, err);
        self.state.notices.push(Notice::error(format!("{} failed: {}", action, err)));
    }

    /// Fetch customers, then policies. Both lists are replaced together once
    /// both fetches succeed; on any failure the previous snapshot stays.
    pub async fn refresh(&mut self) -> Result<()> {
        let customers = match self.api.list_customers(&self.session).await {
            Ok(customers) => customers,
            Err(err) => {
                self.record_failure("Loading customers", &err);
                return Err(err);
            }
        };

        let policies = match self.api.list_policies(&self.session).await {
            Ok(policies) => policies,
            Err(err) => {
                self.record_failure("Loading policies", &err);
                return Err(err);
            }
        };

        log::info!("Fetched {} customers and {} policies", customers.len(), policies.len());
        self.state.customers = customers;
        self.state.policies = policies;
        Ok(())
    }

    /// Fetch documents for every loaded policy concurrently and join them by policy id.
    /// A policy whose fetch fails gets an empty list and an error notice.
    pub async fn load_documents(&mut self) {
        let api = &self.api;
        let session = &self.session;

        let fetches = self.state.policies.iter().map(|policy| async move {
            let result = api.list_policy_documents(session, &policy.id).await;
            (policy.id.clone(), result)
        });
        let results = join_all(fetches).await;

        let mut documents = HashMap::with_capacity(results.len());
        let mut failures = Vec::new();
        for (policy_id, result) in results {
            match result {
                Ok(docs) => {
                    documents.insert(policy_id, docs);
                }
                Err(err) => {
                    failures.push((policy_id.clone(), err));
                    documents.insert(policy_id, Vec::new());
                }
            }
        }

        for (policy_id, err) in failures {
            self.record_failure(&format!("Loading documents for policy {}", policy_id), &err);
        }

        log::info!("Fetched documents for {} policies", documents.len());
        self.state.documents = documents;
    }

    pub async fn add_customer(&mut self, customer: NewCustomer) -> Result<()> {
        match self.api.create_customer(&self.session, &customer).await {
            Ok(created) => {
                self.state
                    .notices
                    .push(Notice::success(format!("Customer {} created", created.display_name())));
                self.state.customers.push(created);
                Ok(())
            }
            Err(err) => {
                self.record_failure("Creating customer", &err);
                Err(err)
            }
        }
    }

    /// Update a customer remotely, then replace the local copy with what the API returned
    pub async fn edit_customer(&mut self, id: &str, update: CustomerUpdate) -> Result<()> {
        match self.api.update_customer(&self.session, id, &update).await {
            Ok(updated) => {
                match self.state.customers.iter_mut().find(|c| c.id == id) {
                    Some(existing) => *existing = updated,
                    None => self.state.customers.push(updated),
                }
                self.state.notices.push(Notice::success("Customer updated"));
                Ok(())
            }
            Err(err) => {
                self.record_failure("Updating customer", &err);
                Err(err)
            }
        }
    }

    pub async fn remove_customer(&mut self, id: &str) -> Result<()> {
        match self.api.delete_customer(&self.session, id).await {
            Ok(()) => {
                self.state.customers.retain(|c| c.id != id);
                self.state.notices.push(Notice::success("Customer deleted"));
                Ok(())
            }
            Err(err) => {
                self.record_failure("Deleting customer", &err);
                Err(err)
            }
        }
    }

    /// Analytics over the current snapshot
    pub fn report(&self, today: NaiveDate) -> AnalyticsReport {
        AnalyticsReport::build(&self.state.policies, &self.state.customers, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::cell::RefCell;

    /// In-memory backend; ids listed in `failing` make the matching call fail
    #[derive(Default)]
    struct FakeApi {
        customers: RefCell<Vec<CustomerRecord>>,
        policies: Vec<PolicyRecord>,
        documents: HashMap<String, Vec<DocumentRecord>>,
        failing: Vec<String>,
        fail_policies: bool,
    }

    fn api_error() -> DashboardError {
        DashboardError::Api { status: 500, message: "boom".to_string() }
    }

    impl AgencyApi for FakeApi {
        async fn login(&self, email: &str, password: &str) -> Result<Session> {
            if password == "secret" {
                Ok(Session::new("tok", Some(email.to_string())))
            } else {
                Err(DashboardError::Api { status: 401, message: "bad credentials".to_string() })
            }
        }

        async fn list_customers(&self, _session: &Session) -> Result<Vec<CustomerRecord>> {
            Ok(self.customers.borrow().clone())
        }

        async fn create_customer(&self, _session: &Session, customer: &NewCustomer) -> Result<CustomerRecord> {
            if self.failing.contains(&customer.email) {
                return Err(api_error());
            }
            let mut created = CustomerRecord::new(&format!("c{}", self.customers.borrow().len() + 1));
            created.first_name = Some(customer.first_name.clone());
            created.last_name = Some(customer.last_name.clone());
            created.email = Some(customer.email.clone());
            self.customers.borrow_mut().push(created.clone());
            Ok(created)
        }

        async fn update_customer(
            &self,
            _session: &Session,
            id: &str,
            update: &CustomerUpdate,
        ) -> Result<CustomerRecord> {
            let mut customers = self.customers.borrow_mut();
            let customer = customers
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| DashboardError::NotFound { kind: "customer", id: id.to_string() })?;
            customer.apply(update);
            Ok(customer.clone())
        }

        async fn delete_customer(&self, _session: &Session, id: &str) -> Result<()> {
            if self.failing.iter().any(|f| f == id) {
                return Err(api_error());
            }
            self.customers.borrow_mut().retain(|c| c.id != id);
            Ok(())
        }

        async fn list_policies(&self, _session: &Session) -> Result<Vec<PolicyRecord>> {
            if self.fail_policies {
                return Err(api_error());
            }
            Ok(self.policies.clone())
        }

        async fn list_policy_documents(&self, _session: &Session, policy_id: &str) -> Result<Vec<DocumentRecord>> {
            if self.failing.iter().any(|f| f == policy_id) {
                return Err(api_error());
            }
            Ok(self.documents.get(policy_id).cloned().unwrap_or_default())
        }
    }

    fn document(id: &str, policy_id: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.to_string(),
            policy_id: policy_id.to_string(),
            file_name: format!("{}.pdf", id),
            content_type: Some("application/pdf".to_string()),
            uploaded_at: None,
        }
    }

    fn seeded_api() -> FakeApi {
        FakeApi {
            customers: RefCell::new(vec![
                CustomerRecord::new("c1").with_gender("Male").with_address("Lisbon"),
                CustomerRecord::new("c2").with_gender("female").with_address("Porto"),
            ]),
            policies: vec![
                PolicyRecord::new("p1", NaiveDate::from_ymd_opt(2024, 1, 5), 100.0, "auto"),
                PolicyRecord::new("p2", NaiveDate::from_ymd_opt(2024, 1, 20), 100.0, "auto"),
                PolicyRecord::new("p3", NaiveDate::from_ymd_opt(2024, 2, 10), 200.0, "home"),
            ],
            documents: HashMap::from([
                ("p1".to_string(), vec![document("d1", "p1"), document("d2", "p1")]),
                ("p3".to_string(), vec![document("d3", "p3")]),
            ]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_connect_and_refresh() {
        let mut dashboard = Dashboard::connect(seeded_api(), "agent@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(dashboard.session().user.as_deref(), Some("agent@example.com"));

        dashboard.refresh().await.unwrap();
        assert_eq!(dashboard.state().customers.len(), 2);
        assert_eq!(dashboard.state().policies.len(), 3);
        assert!(dashboard.state().notices.is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_credentials() {
        let result = Dashboard::connect(seeded_api(), "agent@example.com", "wrong").await;
        assert!(matches!(result, Err(DashboardError::Api { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_state_and_reports() {
        let api = FakeApi { fail_policies: true, ..seeded_api() };
        let mut dashboard = Dashboard::new(api, Session::with_token("tok"));

        assert!(dashboard.refresh().await.is_err());
        // Customers arrived before the policy fetch failed but are not committed alone
        assert!(dashboard.state().customers.is_empty());
        assert!(dashboard.state().policies.is_empty());

        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.starts_with("Loading policies failed"));
        assert!(dashboard.state().notices.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let mut dashboard = Dashboard::new(seeded_api(), Session::with_token("tok"));
        dashboard.refresh().await.unwrap();

        // Backend gains a customer, then the policy endpoint starts failing
        dashboard.api.customers.borrow_mut().push(CustomerRecord::new("c9"));
        dashboard.api.fail_policies = true;

        assert!(dashboard.refresh().await.is_err());
        assert_eq!(dashboard.state().customers.len(), 2);
        assert_eq!(dashboard.state().policies.len(), 3);
    }

    #[tokio::test]
    async fn test_documents_joined_by_policy() {
        let api = FakeApi { failing: vec!["p2".to_string()], ..seeded_api() };
        let mut dashboard = Dashboard::new(api, Session::with_token("tok"));
        dashboard.refresh().await.unwrap();
        dashboard.load_documents().await;

        let docs = &dashboard.state().documents;
        assert_eq!(docs.len(), 3);
        assert_eq!(docs["p1"].len(), 2);
        assert!(docs["p2"].is_empty());
        assert_eq!(docs["p3"][0].id, "d3");

        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("p2"));
    }

    #[tokio::test]
    async fn test_customer_crud_updates_local_state() {
        let mut dashboard = Dashboard::new(seeded_api(), Session::with_token("tok"));
        dashboard.refresh().await.unwrap();

        dashboard
            .add_customer(NewCustomer {
                first_name: "Rita".into(),
                last_name: "Lopes".into(),
                email: "rita@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(dashboard.state().customers.len(), 3);
        assert_eq!(dashboard.state().customers[2].display_name(), "Rita Lopes");

        dashboard
            .edit_customer("c1", CustomerUpdate { address: Some("Faro".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(dashboard.state().customers[0].address.as_deref(), Some("Faro"));

        dashboard.remove_customer("c2").await.unwrap();
        let ids: Vec<_> = dashboard.state().customers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);

        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Success));
    }

    #[tokio::test]
    async fn test_failed_mutations_leave_state_untouched() {
        let api = FakeApi {
            failing: vec!["c1".to_string(), "dup@example.com".to_string()],
            ..seeded_api()
        };
        let mut dashboard = Dashboard::new(api, Session::with_token("tok"));
        dashboard.refresh().await.unwrap();
        let before = dashboard.state().customers.clone();

        assert!(dashboard.remove_customer("c1").await.is_err());
        assert!(dashboard
            .add_customer(NewCustomer { email: "dup@example.com".into(), ..Default::default() })
            .await
            .is_err());
        let missing = dashboard.edit_customer("nope", CustomerUpdate::default()).await;
        assert!(matches!(missing, Err(DashboardError::NotFound { .. })));

        assert_eq!(dashboard.state().customers, before);
        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
    }

    #[test]
    fn test_notice_json_shape() {
        let json = serde_json::to_string(&Notice::error("Loading policies failed: boom")).unwrap();
        assert_eq!(json, r#"{"level":"error","message":"Loading policies failed: boom"}"#);
    }

    #[tokio::test]
    async fn test_report_over_fetched_state() {
        let mut dashboard = Dashboard::new(seeded_api(), Session::with_token("tok"));
        dashboard.refresh().await.unwrap();

        let report = dashboard.report(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(report.policy_growth.len(), 1);
        assert_eq!(report.policy_growth[0].growth_rate, -50.0);
        assert_eq!(report.revenue_distribution.len(), 2);
        assert_eq!(report.revenue_distribution[0].percentage, 50.0);
        assert_eq!(report.gender_distribution.len(), 2);
        assert_eq!(report.region_distribution.len(), 2);
    }
}
