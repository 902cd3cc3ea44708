use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::enrollment::domain::{AccountType, EnrollmentDraft, EnrollmentField};
use crate::enrollment::repository::{
    CanonicalRecord, StoreError, Submission, SubmissionId, SubmissionStore,
};
use crate::enrollment::router::{enrollment_router, EnrollmentApi};
use crate::enrollment::service::EnrollmentService;
use crate::enrollment::wizard::EnrollmentWizard;

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<Vec<Submission>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<Submission> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, record: CanonicalRecord) -> Result<Submission, StoreError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Submission {
            id: SubmissionId(format!("sub-{next:04}")),
            record,
        };
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.records())
    }

    fn set_viewed(&self, id: &SubmissionId, viewed: bool) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|submission| &submission.id == id)
            .ok_or(StoreError::NotFound)?;
        record.record.viewed = viewed;
        Ok(())
    }

    fn delete(&self, id: &SubmissionId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let before = guard.len();
        guard.retain(|submission| &submission.id != id);
        if guard.len() == before {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// Store that fails every call, for exercising retry paths.
pub(super) struct UnavailableStore;

impl SubmissionStore for UnavailableStore {
    fn insert(&self, _record: CanonicalRecord) -> Result<Submission, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_viewed(&self, _id: &SubmissionId, _viewed: bool) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &SubmissionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn complete_draft() -> EnrollmentDraft {
    EnrollmentDraft {
        company_name: "Acme Freight LLC".to_string(),
        contact_name: "Dana Ruiz".to_string(),
        email: "dana@acmefreight.com".to_string(),
        phone: "515-555-0100".to_string(),
        bank_name: "First Prairie Bank".to_string(),
        account_holder_name: "Acme Freight LLC".to_string(),
        account_type: AccountType::Checking,
        routing_number: "021000021".to_string(),
        account_number: "000123456789".to_string(),
        confirm_account_number: "000123456789".to_string(),
        accept_terms: true,
        signature_name: "Dana Ruiz".to_string(),
    }
}

pub(super) fn fill_identity(wizard: &mut EnrollmentWizard) {
    let draft = complete_draft();
    wizard
        .update(EnrollmentField::CompanyName, draft.company_name.as_str())
        .expect("company editable");
    wizard
        .update(EnrollmentField::ContactName, draft.contact_name.as_str())
        .expect("contact editable");
    wizard
        .update(EnrollmentField::Email, draft.email.as_str())
        .expect("email editable");
    wizard
        .update(EnrollmentField::Phone, draft.phone.as_str())
        .expect("phone editable");
}

pub(super) fn fill_bank_account(wizard: &mut EnrollmentWizard) {
    let draft = complete_draft();
    wizard
        .update(EnrollmentField::BankName, draft.bank_name.as_str())
        .expect("bank editable");
    wizard
        .update(
            EnrollmentField::AccountHolderName,
            draft.account_holder_name.as_str(),
        )
        .expect("holder editable");
    wizard
        .update(EnrollmentField::AccountType, AccountType::Savings)
        .expect("account type editable");
    wizard
        .update(EnrollmentField::RoutingNumber, "021-000-021")
        .expect("routing editable");
    wizard
        .update(EnrollmentField::AccountNumber, draft.account_number.as_str())
        .expect("account editable");
    wizard
        .update(
            EnrollmentField::ConfirmAccountNumber,
            draft.confirm_account_number.as_str(),
        )
        .expect("confirmation editable");
}

pub(super) fn fill_authorization(wizard: &mut EnrollmentWizard) {
    wizard
        .update(EnrollmentField::AcceptTerms, true)
        .expect("terms editable");
    wizard
        .update(EnrollmentField::SignatureName, "Dana Ruiz")
        .expect("signature editable");
}

/// Wizard parked on the authorization step with every field filled in.
pub(super) fn wizard_ready_to_submit() -> EnrollmentWizard {
    let mut wizard = EnrollmentWizard::new();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity valid");
    fill_bank_account(&mut wizard);
    wizard.advance().expect("bank account valid");
    fill_authorization(&mut wizard);
    wizard
}

pub(super) fn camel_case_payload() -> Value {
    json!({
        "companyName": "Acme Freight LLC",
        "contactName": "Dana Ruiz",
        "email": "dana@acmefreight.com",
        "phone": "515-555-0100",
        "bankName": "First Prairie Bank",
        "accountHolderName": "Acme Freight LLC",
        "accountType": "checking",
        "routingNumber": "021000021",
        "accountNumber": "000123456789",
        "confirmAccountNumber": "000123456789",
        "acceptTerms": true,
        "signatureName": "Dana Ruiz"
    })
}

pub(super) fn enrollment_api<S>(store: Arc<S>) -> Arc<EnrollmentApi<S>>
where
    S: SubmissionStore + 'static,
{
    Arc::new(EnrollmentApi {
        service: Arc::new(EnrollmentService::new(store)),
        payee_name: "Talis Premium Finance".to_string(),
    })
}

pub(super) fn router_with_store<S>(store: Arc<S>) -> axum::Router
where
    S: SubmissionStore + 'static,
{
    enrollment_router(enrollment_api(store))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
