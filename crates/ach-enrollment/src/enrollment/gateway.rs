//! Absorbs field-name variance between submitters.
//!
//! The capture form posts camelCase keys, older integrations post snake_case, and some
//! send short free-form names. Each canonical field carries an ordered alias list; the
//! first alias holding a non-blank value wins.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::domain::{AccountType, EnrollmentDraft};
use super::repository::CanonicalRecord;

/// Canonical field name paired with the payload keys accepted for it, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

pub const STANDARD_ALIASES: &[FieldAliases] = &[
    FieldAliases {
        canonical: "company_name",
        aliases: &["company_name", "companyName", "company"],
    },
    FieldAliases {
        canonical: "contact_name",
        aliases: &["contact_name", "contactName", "name"],
    },
    FieldAliases {
        canonical: "email",
        aliases: &["email"],
    },
    FieldAliases {
        canonical: "phone",
        aliases: &["phone"],
    },
    FieldAliases {
        canonical: "bank_name",
        aliases: &["bank_name", "bankName", "bank"],
    },
    FieldAliases {
        canonical: "account_holder_name",
        aliases: &["account_holder_name", "accountHolderName", "accountName"],
    },
    FieldAliases {
        canonical: "account_type",
        aliases: &["account_type", "accountType"],
    },
    FieldAliases {
        canonical: "routing_number",
        aliases: &["routing_number", "routingNumber"],
    },
    FieldAliases {
        canonical: "account_number",
        aliases: &["account_number", "accountNumber"],
    },
    FieldAliases {
        canonical: "signature_name",
        aliases: &["signature_name", "signatureName", "signature"],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("submission payload must be a JSON object")]
    NotAnObject,
    #[error("missing required fields: {}", .0.join(", "))]
    Unresolved(Vec<&'static str>),
    #[error("unsupported account type '{0}'")]
    InvalidAccountType(String),
}

/// Single seam that maps loosely shaped payloads onto [`CanonicalRecord`].
#[derive(Debug, Clone)]
pub struct SubmissionGateway {
    aliases: &'static [FieldAliases],
}

impl Default for SubmissionGateway {
    fn default() -> Self {
        Self::standard()
    }
}

impl SubmissionGateway {
    pub fn standard() -> Self {
        Self::with_aliases(STANDARD_ALIASES)
    }

    pub fn with_aliases(aliases: &'static [FieldAliases]) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &'static [FieldAliases] {
        self.aliases
    }

    /// Resolve every canonical field from whichever alias the submitter used.
    ///
    /// Only presence is checked. Routing and account values are stored as received and
    /// are not re-validated: a JSON number loses its leading zeros (`21000021` for
    /// `021000021`) and separators are kept, so a submitter that skipped form
    /// validation can store a number that would fail the checksum.
    pub fn normalize(&self, payload: &Value) -> Result<CanonicalRecord, GatewayError> {
        self.normalize_at(payload, Utc::now())
    }

    pub fn normalize_at(
        &self,
        payload: &Value,
        submitted_at: DateTime<Utc>,
    ) -> Result<CanonicalRecord, GatewayError> {
        let object = payload.as_object().ok_or(GatewayError::NotAnObject)?;

        let mut missing = Vec::new();
        let mut take = |canonical: &'static str| -> String {
            match self.resolve(object, canonical) {
                Some(value) => value,
                None => {
                    missing.push(canonical);
                    String::new()
                }
            }
        };

        let company_name = take("company_name");
        let contact_name = take("contact_name");
        let email = take("email");
        let phone = take("phone");
        let bank_name = take("bank_name");
        let account_holder_name = take("account_holder_name");
        let routing_number = take("routing_number");
        let account_number = take("account_number");
        let signature_name = take("signature_name");

        if !missing.is_empty() {
            return Err(GatewayError::Unresolved(missing));
        }

        // Absent account type falls back to the form default.
        let account_type = match self.resolve(object, "account_type") {
            Some(raw) => AccountType::parse(&raw).ok_or(GatewayError::InvalidAccountType(raw))?,
            None => AccountType::default(),
        };

        Ok(CanonicalRecord {
            company_name,
            contact_name,
            email,
            phone,
            bank_name,
            account_holder_name,
            account_type,
            routing_number,
            account_number,
            signature_name,
            submitted_at,
            viewed: false,
        })
    }

    /// Canonical record for a draft captured by the in-process wizard.
    pub fn normalize_draft(
        &self,
        draft: &EnrollmentDraft,
        submitted_at: DateTime<Utc>,
    ) -> CanonicalRecord {
        CanonicalRecord {
            company_name: draft.company_name.trim().to_string(),
            contact_name: draft.contact_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            bank_name: draft.bank_name.trim().to_string(),
            account_holder_name: draft.account_holder_name.trim().to_string(),
            account_type: draft.account_type,
            routing_number: draft.routing_number.clone(),
            account_number: draft.account_number.clone(),
            signature_name: draft.signature_name.trim().to_string(),
            submitted_at,
            viewed: false,
        }
    }

    fn resolve(&self, object: &Map<String, Value>, canonical: &str) -> Option<String> {
        let entry = self
            .aliases
            .iter()
            .find(|entry| entry.canonical == canonical)?;

        entry
            .aliases
            .iter()
            .filter_map(|alias| object.get(*alias))
            .find_map(scalar_text)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
