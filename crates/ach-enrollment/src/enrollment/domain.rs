use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every input captured by the enrollment form, keyed by its camelCase form name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnrollmentField {
    CompanyName,
    ContactName,
    Email,
    Phone,
    BankName,
    AccountHolderName,
    AccountType,
    RoutingNumber,
    AccountNumber,
    ConfirmAccountNumber,
    AcceptTerms,
    SignatureName,
}

impl EnrollmentField {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CompanyName => "companyName",
            Self::ContactName => "contactName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::BankName => "bankName",
            Self::AccountHolderName => "accountHolderName",
            Self::AccountType => "accountType",
            Self::RoutingNumber => "routingNumber",
            Self::AccountNumber => "accountNumber",
            Self::ConfirmAccountNumber => "confirmAccountNumber",
            Self::AcceptTerms => "acceptTerms",
            Self::SignatureName => "signatureName",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "Company / Insured Name",
            Self::ContactName => "Contact Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::BankName => "Bank Name",
            Self::AccountHolderName => "Account Holder Name",
            Self::AccountType => "Account Type",
            Self::RoutingNumber => "Routing Number",
            Self::AccountNumber => "Account Number",
            Self::ConfirmAccountNumber => "Confirm Account Number",
            Self::AcceptTerms => "I agree to the ACH Debit Authorization Agreement",
            Self::SignatureName => "Electronic Signature (Type Full Name)",
        }
    }
}

impl fmt::Display for EnrollmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
}

impl AccountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            _ => None,
        }
    }
}

/// The three input steps plus the terminal state after a stored submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Identity,
    BankAccount,
    Authorization,
    Submitted,
}

impl WizardStep {
    pub const fn number(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::BankAccount => 2,
            Self::Authorization => 3,
            Self::Submitted => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Your Information",
            Self::BankAccount => "Bank Account",
            Self::Authorization => "Authorization",
            Self::Submitted => "Submitted",
        }
    }

    /// Fields validated when leaving this step.
    pub const fn fields(self) -> &'static [EnrollmentField] {
        match self {
            Self::Identity => &[
                EnrollmentField::CompanyName,
                EnrollmentField::ContactName,
                EnrollmentField::Email,
                EnrollmentField::Phone,
            ],
            Self::BankAccount => &[
                EnrollmentField::BankName,
                EnrollmentField::AccountHolderName,
                EnrollmentField::RoutingNumber,
                EnrollmentField::AccountNumber,
                EnrollmentField::ConfirmAccountNumber,
            ],
            Self::Authorization => &[
                EnrollmentField::AcceptTerms,
                EnrollmentField::SignatureName,
            ],
            Self::Submitted => &[],
        }
    }

    /// Fields the user may edit while on this step. Account type is chosen on the bank step
    /// but never validated.
    pub fn editable(self, field: EnrollmentField) -> bool {
        match self {
            Self::BankAccount if field == EnrollmentField::AccountType => true,
            other => other.fields().contains(&field),
        }
    }

    pub(crate) const fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::BankAccount),
            Self::BankAccount => Some(Self::Authorization),
            Self::Authorization | Self::Submitted => None,
        }
    }

    pub(crate) const fn previous(self) -> Option<Self> {
        match self {
            Self::BankAccount => Some(Self::Identity),
            Self::Authorization => Some(Self::BankAccount),
            Self::Identity | Self::Submitted => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// In-progress form state owned by a single wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentDraft {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_type: AccountType,
    pub routing_number: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub accept_terms: bool,
    pub signature_name: String,
}

impl EnrollmentDraft {
    /// Text value of a field; `None` for the non-text inputs.
    pub fn text(&self, field: EnrollmentField) -> Option<&str> {
        let value = match field {
            EnrollmentField::CompanyName => &self.company_name,
            EnrollmentField::ContactName => &self.contact_name,
            EnrollmentField::Email => &self.email,
            EnrollmentField::Phone => &self.phone,
            EnrollmentField::BankName => &self.bank_name,
            EnrollmentField::AccountHolderName => &self.account_holder_name,
            EnrollmentField::RoutingNumber => &self.routing_number,
            EnrollmentField::AccountNumber => &self.account_number,
            EnrollmentField::ConfirmAccountNumber => &self.confirm_account_number,
            EnrollmentField::SignatureName => &self.signature_name,
            EnrollmentField::AccountType | EnrollmentField::AcceptTerms => return None,
        };
        Some(value.as_str())
    }

    pub(crate) fn text_mut(&mut self, field: EnrollmentField) -> Option<&mut String> {
        let value = match field {
            EnrollmentField::CompanyName => &mut self.company_name,
            EnrollmentField::ContactName => &mut self.contact_name,
            EnrollmentField::Email => &mut self.email,
            EnrollmentField::Phone => &mut self.phone,
            EnrollmentField::BankName => &mut self.bank_name,
            EnrollmentField::AccountHolderName => &mut self.account_holder_name,
            EnrollmentField::RoutingNumber => &mut self.routing_number,
            EnrollmentField::AccountNumber => &mut self.account_number,
            EnrollmentField::ConfirmAccountNumber => &mut self.confirm_account_number,
            EnrollmentField::SignatureName => &mut self.signature_name,
            EnrollmentField::AccountType | EnrollmentField::AcceptTerms => return None,
        };
        Some(value)
    }

    pub fn account_last_four(&self) -> String {
        last_four(&self.account_number)
    }
}

/// A single edit applied to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Flag(bool),
    AccountType(AccountType),
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldInput {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<AccountType> for FieldInput {
    fn from(value: AccountType) -> Self {
        Self::AccountType(value)
    }
}

/// Field name to message map produced by a step validation pass. Empty means the step is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<EnrollmentField, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: EnrollmentField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnrollmentField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    pub(crate) fn insert(&mut self, field: EnrollmentField, message: &'static str) {
        self.0.insert(field, message);
    }

    pub(crate) fn clear_field(&mut self, field: EnrollmentField) {
        self.0.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&rendered)
    }
}

/// Confirmation details shown once the enrollment is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub company_name: String,
    pub bank_name: String,
    pub account_last4: String,
    pub signature_name: String,
}

impl SubmissionReceipt {
    pub fn from_draft(draft: &EnrollmentDraft) -> Self {
        Self {
            company_name: draft.company_name.clone(),
            bank_name: draft.bank_name.clone(),
            account_last4: draft.account_last_four(),
            signature_name: draft.signature_name.clone(),
        }
    }
}

/// Text of the debit authorization the signer agrees to on the final step.
pub fn mandate_text(payee: &str) -> String {
    format!(
        "ACH DEBIT AUTHORIZATION AGREEMENT\n\n\
         By signing this authorization, I authorize {payee} to initiate ACH debit entries from \
         the bank account indicated for payment of insurance premiums and related charges.\n\n\
         I understand that:\n\
         - This authorization remains in effect until revoked in writing\n\
         - At least 3 business days notice is required to cancel\n\
         - Returned debits may incur fees per applicable law\n\
         - All transactions comply with NACHA Operating Rules\n\n\
         I certify I am authorized to sign on this account."
    )
}

pub(crate) fn last_four(number: &str) -> String {
    let count = number.chars().count();
    number.chars().skip(count.saturating_sub(4)).collect()
}
