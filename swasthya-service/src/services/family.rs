//! Family request and family network store.
//!
//! Requests and networks share one lock: accepting a request flips its status
//! and appends to two networks, and that has to look atomic to everyone else.

use crate::models::{
    inverse_label, FamilyNetworkEntry, FamilyRequest, RequestStatus, RequestTarget,
};
use crate::services::directory::UserDirectory;
use crate::services::metrics::record_family_action;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FamilyError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Either toEmail or toName is required")]
    MissingTarget,

    #[error("Cannot send a family request to yourself")]
    SelfRequest,

    #[error("A pending request already exists for this family member")]
    DuplicatePending,

    #[error("This person is already in your family network")]
    AlreadyConnected,

    #[error("Family request not found")]
    NotFound,

    #[error("Request has already been {0}")]
    NotPending(RequestStatus),
}

/// Unvalidated submission, shaped like the wire body.
#[derive(Debug, Clone, Default)]
pub struct FamilyRequestDraft {
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub to_name: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestsFor {
    pub sent: Vec<FamilyRequest>,
    pub received: Vec<FamilyRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberNetwork {
    pub email: String,
    pub network: Vec<FamilyNetworkEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MutualNetwork {
    pub user1: MemberNetwork,
    pub user2: MemberNetwork,
    pub relationship: Option<FamilyNetworkEntry>,
}

#[derive(Debug, Default)]
struct FamilyState {
    requests: Vec<FamilyRequest>,
    networks: HashMap<String, Vec<FamilyNetworkEntry>>,
}

impl FamilyState {
    fn network(&self, owner: &str) -> &[FamilyNetworkEntry] {
        self.networks.get(owner).map(Vec::as_slice).unwrap_or_default()
    }
}

pub struct FamilyStore {
    directory: Arc<UserDirectory>,
    state: RwLock<FamilyState>,
}

impl FamilyStore {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self {
            directory,
            state: RwLock::new(FamilyState::default()),
        }
    }

    /// Validate and store a new pending request.
    pub async fn submit(&self, draft: FamilyRequestDraft) -> Result<FamilyRequest, FamilyError> {
        let from_email = required(draft.from_email, "fromEmail")?;
        let target =
            RequestTarget::from_parts(draft.to_email, draft.to_name).ok_or(FamilyError::MissingTarget)?;
        let relationship = required(draft.relationship, "relationship")?;

        if target.key().eq_ignore_ascii_case(&from_email) {
            return Err(FamilyError::SelfRequest);
        }

        let mut state = self.state.write().await;

        if state
            .requests
            .iter()
            .any(|r| r.duplicates(&from_email, &target, &relationship))
        {
            return Err(FamilyError::DuplicatePending);
        }

        if state
            .network(&from_email)
            .iter()
            .any(|member| target.matches(&member.email))
        {
            return Err(FamilyError::AlreadyConnected);
        }

        let request = FamilyRequest::new(from_email, target, relationship);
        state.requests.push(request.clone());
        drop(state);

        tracing::info!(
            request_id = %request.id,
            from = %request.from_email,
            to = %request.target.key(),
            relationship = %request.relationship,
            "Family request submitted"
        );
        record_family_action("submitted");

        Ok(request)
    }

    /// Accept a pending request and link both parties' networks.
    pub async fn accept(&self, id: &str) -> Result<FamilyRequest, FamilyError> {
        let mut state = self.state.write().await;
        let index = pending_index(&state, id)?;

        let request = state.requests[index].clone();
        let target_key = request.target.key().to_string();

        let target_name = request
            .target
            .email()
            .and_then(|email| self.directory.find_by_email(email))
            .map(|user| user.name.clone())
            .or_else(|| request.target.name().map(str::to_string))
            .unwrap_or_else(|| target_key.clone());

        let sender_name = self
            .directory
            .find_by_email(&request.from_email)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| request.from_email.clone());

        state
            .networks
            .entry(request.from_email.clone())
            .or_default()
            .push(FamilyNetworkEntry::accepted(
                target_key.clone(),
                target_name,
                request.relationship.clone(),
            ));

        state
            .networks
            .entry(target_key)
            .or_default()
            .push(FamilyNetworkEntry::accepted(
                request.from_email.clone(),
                sender_name,
                inverse_label(&request.relationship).to_string(),
            ));

        let stored = &mut state.requests[index];
        stored.resolve(RequestStatus::Accepted);
        let accepted = stored.clone();
        drop(state);

        tracing::info!(
            request_id = %accepted.id,
            from = %accepted.from_email,
            to = %accepted.target.key(),
            relationship = %accepted.relationship,
            "Family request accepted"
        );
        record_family_action("accepted");

        Ok(accepted)
    }

    /// Decline a pending request. Networks are untouched.
    pub async fn reject(&self, id: &str) -> Result<FamilyRequest, FamilyError> {
        let mut state = self.state.write().await;
        let index = pending_index(&state, id)?;

        let stored = &mut state.requests[index];
        stored.resolve(RequestStatus::Declined);
        let declined = stored.clone();
        drop(state);

        tracing::info!(request_id = %declined.id, "Family request declined");
        record_family_action("declined");

        Ok(declined)
    }

    /// Everything `email` sent, plus pending requests addressed to it.
    pub async fn list_for(&self, email: &str) -> RequestsFor {
        let state = self.state.read().await;

        let sent = state
            .requests
            .iter()
            .filter(|r| r.from_email == email)
            .cloned()
            .collect();

        let received = state
            .requests
            .iter()
            .filter(|r| r.is_pending() && r.is_addressed_to(email))
            .cloned()
            .collect();

        RequestsFor { sent, received }
    }

    /// Confirmed members of `email`'s network; empty when none exist.
    pub async fn network_of(&self, email: &str) -> Vec<FamilyNetworkEntry> {
        self.state.read().await.network(email).to_vec()
    }

    /// Both networks plus the entry linking the two, if any.
    pub async fn mutual_network(&self, email1: &str, email2: &str) -> MutualNetwork {
        let state = self.state.read().await;
        let network1 = state.network(email1);
        let network2 = state.network(email2);

        let relationship = network1
            .iter()
            .find(|m| m.email == email2)
            .or_else(|| network2.iter().find(|m| m.email == email1))
            .cloned();

        MutualNetwork {
            user1: MemberNetwork {
                email: email1.to_string(),
                network: network1.to_vec(),
            },
            user2: MemberNetwork {
                email: email2.to_string(),
                network: network2.to_vec(),
            },
            relationship,
        }
    }

    #[cfg(test)]
    async fn request_count(&self) -> usize {
        self.state.read().await.requests.len()
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, FamilyError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(FamilyError::MissingField(field))
}

fn pending_index(state: &FamilyState, id: &str) -> Result<usize, FamilyError> {
    let index = state
        .requests
        .iter()
        .position(|r| r.id == id)
        .ok_or(FamilyError::NotFound)?;

    match state.requests[index].status {
        RequestStatus::Pending => Ok(index),
        status => Err(FamilyError::NotPending(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOHN: &str = "john.doe@example.com";
    const JANE: &str = "jane.smith@example.com";

    fn store() -> FamilyStore {
        FamilyStore::new(Arc::new(UserDirectory::seeded()))
    }

    fn draft(from: &str, to_email: Option<&str>, to_name: Option<&str>, rel: &str) -> FamilyRequestDraft {
        FamilyRequestDraft {
            from_email: Some(from.to_string()),
            to_email: to_email.map(str::to_string),
            to_name: to_name.map(str::to_string),
            relationship: Some(rel.to_string()),
        }
    }

    #[tokio::test]
    async fn submit_creates_pending_request() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Spouse")).await.unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.from_email, JOHN);
        assert_eq!(request.target.key(), JANE);
        assert!(request.responded_at.is_none());
        assert_eq!(store.request_count().await, 1);
    }

    #[tokio::test]
    async fn submit_validates_required_fields() {
        let store = store();

        let mut missing_from = draft(JOHN, Some(JANE), None, "Spouse");
        missing_from.from_email = None;
        assert_eq!(
            store.submit(missing_from).await.unwrap_err(),
            FamilyError::MissingField("fromEmail")
        );

        assert_eq!(
            store.submit(draft(JOHN, None, Some("  "), "Spouse")).await.unwrap_err(),
            FamilyError::MissingTarget
        );

        let mut missing_rel = draft(JOHN, Some(JANE), None, "Spouse");
        missing_rel.relationship = Some(String::new());
        assert_eq!(
            store.submit(missing_rel).await.unwrap_err(),
            FamilyError::MissingField("relationship")
        );

        assert_eq!(store.request_count().await, 0);
    }

    #[tokio::test]
    async fn submit_rejects_self_request() {
        let store = store();
        let err = store
            .submit(draft(JOHN, Some("John.Doe@example.com"), None, "Friend"))
            .await
            .unwrap_err();
        assert_eq!(err, FamilyError::SelfRequest);
    }

    #[tokio::test]
    async fn duplicate_pending_request_conflicts() {
        let store = store();
        store.submit(draft(JOHN, Some(JANE), None, "Spouse")).await.unwrap();

        let err = store
            .submit(draft(JOHN, Some(JANE), None, "Spouse"))
            .await
            .unwrap_err();
        assert_eq!(err, FamilyError::DuplicatePending);
        assert_eq!(store.request_count().await, 1);

        // A different relationship is a different tuple.
        store.submit(draft(JOHN, Some(JANE), None, "Friend")).await.unwrap();
        assert_eq!(store.request_count().await, 2);
    }

    #[tokio::test]
    async fn declined_request_can_be_resubmitted() {
        let store = store();
        let first = store.submit(draft(JOHN, Some(JANE), None, "Sibling")).await.unwrap();
        store.reject(&first.id).await.unwrap();

        store.submit(draft(JOHN, Some(JANE), None, "Sibling")).await.unwrap();
        assert_eq!(store.request_count().await, 2);
    }

    #[tokio::test]
    async fn accept_links_both_networks_with_inverse() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Parent")).await.unwrap();

        let accepted = store.accept(&request.id).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert!(accepted.responded_at.is_some());

        let johns = store.network_of(JOHN).await;
        assert_eq!(johns.len(), 1);
        assert_eq!(johns[0].email, JANE);
        assert_eq!(johns[0].name, "Jane Smith");
        assert_eq!(johns[0].relationship, "Parent");

        let janes = store.network_of(JANE).await;
        assert_eq!(janes.len(), 1);
        assert_eq!(janes[0].email, JOHN);
        assert_eq!(janes[0].name, "John Doe");
        assert_eq!(janes[0].relationship, "Child");
    }

    #[tokio::test]
    async fn accept_by_name_keys_network_on_name() {
        let store = store();
        let request = store
            .submit(draft(JOHN, None, Some("Grandma Rose"), "Grandchild"))
            .await
            .unwrap();
        store.accept(&request.id).await.unwrap();

        let johns = store.network_of(JOHN).await;
        assert_eq!(johns[0].email, "Grandma Rose");
        assert_eq!(johns[0].name, "Grandma Rose");

        let roses = store.network_of("Grandma Rose").await;
        assert_eq!(roses[0].relationship, "Grandparent");
    }

    #[tokio::test]
    async fn unknown_email_falls_back_to_supplied_name() {
        let store = store();
        let request = store
            .submit(draft(JOHN, Some("aunt.may@example.org"), Some("May"), "Uncle/Aunt"))
            .await
            .unwrap();
        store.accept(&request.id).await.unwrap();

        let johns = store.network_of(JOHN).await;
        assert_eq!(johns[0].email, "aunt.may@example.org");
        assert_eq!(johns[0].name, "May");

        let mays = store.network_of("aunt.may@example.org").await;
        assert_eq!(mays[0].relationship, "Niece/Nephew");
    }

    #[tokio::test]
    async fn unmapped_relationship_inverts_to_related() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Neighbour")).await.unwrap();
        store.accept(&request.id).await.unwrap();

        assert_eq!(store.network_of(JANE).await[0].relationship, "Related");
    }

    #[tokio::test]
    async fn second_transition_fails_with_invalid_state() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Spouse")).await.unwrap();
        store.accept(&request.id).await.unwrap();

        assert_eq!(
            store.accept(&request.id).await.unwrap_err(),
            FamilyError::NotPending(RequestStatus::Accepted)
        );
        assert_eq!(
            store.reject(&request.id).await.unwrap_err(),
            FamilyError::NotPending(RequestStatus::Accepted)
        );
        assert_eq!(store.network_of(JOHN).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = store();
        assert_eq!(store.accept("nope").await.unwrap_err(), FamilyError::NotFound);
        assert_eq!(store.reject("nope").await.unwrap_err(), FamilyError::NotFound);
    }

    #[tokio::test]
    async fn reject_leaves_networks_untouched() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Cousin")).await.unwrap();
        let declined = store.reject(&request.id).await.unwrap();

        assert_eq!(declined.status, RequestStatus::Declined);
        assert!(store.network_of(JOHN).await.is_empty());
        assert!(store.network_of(JANE).await.is_empty());
    }

    #[tokio::test]
    async fn already_connected_member_conflicts() {
        let store = store();
        let request = store.submit(draft(JOHN, Some(JANE), None, "Spouse")).await.unwrap();
        store.accept(&request.id).await.unwrap();

        let err = store
            .submit(draft(JOHN, Some(JANE), None, "Friend"))
            .await
            .unwrap_err();
        assert_eq!(err, FamilyError::AlreadyConnected);

        // Loose match: a stored email also blocks a name-addressed request.
        let err = store
            .submit(draft(JOHN, None, Some(JANE), "Friend"))
            .await
            .unwrap_err();
        assert_eq!(err, FamilyError::AlreadyConnected);
    }

    #[tokio::test]
    async fn list_for_splits_sent_and_pending_received() {
        let store = store();
        let to_jane = store.submit(draft(JOHN, Some(JANE), None, "Sibling")).await.unwrap();
        let by_name = store
            .submit(draft("robert.johnson@example.com", None, Some(JANE), "Cousin"))
            .await
            .unwrap();
        let declined = store
            .submit(draft("maria.garcia@example.com", Some(JANE), None, "Friend"))
            .await
            .unwrap();
        store.reject(&declined.id).await.unwrap();

        let janes = store.list_for(JANE).await;
        assert!(janes.sent.is_empty());
        let received: Vec<_> = janes.received.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(received, vec![to_jane.id.as_str(), by_name.id.as_str()]);

        let marias = store.list_for("maria.garcia@example.com").await;
        assert_eq!(marias.sent.len(), 1);
        assert_eq!(marias.sent[0].status, RequestStatus::Declined);
    }

    #[tokio::test]
    async fn mutual_network_finds_link_from_either_side() {
        let store = store();
        assert!(store.mutual_network(JOHN, JANE).await.relationship.is_none());

        let request = store.submit(draft(JOHN, Some(JANE), None, "Parent")).await.unwrap();
        store.accept(&request.id).await.unwrap();

        let view = store.mutual_network(JOHN, JANE).await;
        assert_eq!(view.user1.network.len(), 1);
        assert_eq!(view.user2.network.len(), 1);
        assert_eq!(view.relationship.unwrap().relationship, "Parent");

        let reversed = store.mutual_network(JANE, JOHN).await;
        assert_eq!(reversed.relationship.unwrap().relationship, "Child");
    }

    #[tokio::test]
    async fn concurrent_accepts_transition_once() {
        let store = Arc::new(store());
        let request = store.submit(draft(JOHN, Some(JANE), None, "Spouse")).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = request.id.clone();
                tokio::spawn(async move { store.accept(&id).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.network_of(JOHN).await.len(), 1);
        assert_eq!(store.network_of(JANE).await.len(), 1);
    }
}
