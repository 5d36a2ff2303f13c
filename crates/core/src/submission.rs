//! Submission variants, snapshots, and screening outcomes.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::field_registry::{self, KEY_ONBOARDING_TYPE};
use crate::value::{payload_from_json, Entity, FieldValue, Payload, Scalar};

/// Payload key that may carry the variant instead of `onboardingType`.
pub const KEY_VARIANT: &str = "variant";

// ---------------------------------------------------------------------------
// Submission variant
// ---------------------------------------------------------------------------

/// Which questionnaire an applicant is completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionVariant {
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "self-assessment")]
    SelfAssessment,
    #[serde(rename = "combined", alias = "both")]
    Combined,
}

impl SubmissionVariant {
    pub const ALL: [Self; 3] = [Self::Business, Self::SelfAssessment, Self::Combined];

    /// Parse a wire name. `both` is accepted as the legacy name of `combined`.
    pub fn from_wire(s: &str) -> Result<Self, CoreError> {
        match s {
            "business" => Ok(Self::Business),
            "self-assessment" => Ok(Self::SelfAssessment),
            "combined" | "both" => Ok(Self::Combined),
            _ => Err(CoreError::Validation(format!(
                "Invalid onboarding type '{s}'. Must be one of: business, self-assessment, combined"
            ))),
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::SelfAssessment => "self-assessment",
            Self::Combined => "combined",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::SelfAssessment => "Self Assessment",
            Self::Combined => "Business & Self Assessment",
        }
    }
}

// ---------------------------------------------------------------------------
// Directors
// ---------------------------------------------------------------------------

/// Director/owner details as entered, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDirector {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    pub dob: Option<String>,
    pub address: Option<String>,
}

/// A director/owner held by a draft. `id` is never reused within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorEntry {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub dob: Option<String>,
    pub address: Option<String>,
}

impl DirectorEntry {
    pub fn new(id: u64, details: NewDirector) -> Self {
        Self {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            role: details.role,
            dob: details.dob,
            address: details.address,
        }
    }

    /// Report entity. Optional attributes are always present so an omitted
    /// date of birth shows as "N/A" rather than disappearing.
    pub fn to_entity(&self) -> Entity {
        let optional = |v: &Option<String>| v.clone().map_or(FieldValue::Null, FieldValue::text);
        let mut entity = Entity::new();
        entity.insert("id".into(), FieldValue::from_json(self.id.into()));
        entity.insert("firstName".into(), FieldValue::text(&self.first_name));
        entity.insert("lastName".into(), FieldValue::text(&self.last_name));
        entity.insert("role".into(), FieldValue::text(&self.role));
        entity.insert("dob".into(), optional(&self.dob));
        entity.insert("address".into(), optional(&self.address));
        entity
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// One of the two supporting-document slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSlot {
    PhotoId,
    ProofOfAddress,
}

impl DocumentSlot {
    /// Field key holding this slot's locator.
    pub fn key(self) -> &'static str {
        match self {
            Self::PhotoId => field_registry::KEY_PHOTO_ID,
            Self::ProofOfAddress => field_registry::KEY_PROOF_OF_ADDRESS,
        }
    }
}

/// A stored document: the uploaded file name and its retrievable locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub file_name: String,
    pub locator: String,
}

// ---------------------------------------------------------------------------
// Finalized submission
// ---------------------------------------------------------------------------

/// Immutable snapshot produced by a completed wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedSubmission {
    variant: SubmissionVariant,
    fields: Payload,
    finalized_at: DateTime<Utc>,
}

impl FinalizedSubmission {
    pub(crate) fn new(variant: SubmissionVariant, fields: Payload) -> Self {
        Self {
            variant,
            fields,
            finalized_at: Utc::now(),
        }
    }

    pub fn variant(&self) -> SubmissionVariant {
        self.variant
    }

    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    pub fn finalized_at(&self) -> DateTime<Utc> {
        self.finalized_at
    }

    /// Hand the snapshot to the submission pipeline.
    pub fn into_payload(self) -> SubmissionPayload {
        SubmissionPayload {
            variant: Some(self.variant),
            fields: self.fields,
        }
    }
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// What the submission pipeline receives: an optional variant plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
    pub variant: Option<SubmissionVariant>,
    pub fields: Payload,
}

impl SubmissionPayload {
    /// Build from a JSON request body.
    ///
    /// The variant is read from `variant`, falling back to `onboardingType`;
    /// both keys are removed from the fields. An unrecognised variant name
    /// is treated as absent.
    pub fn from_json(body: serde_json::Value) -> Result<Self, CoreError> {
        let serde_json::Value::Object(map) = body else {
            return Err(CoreError::Validation(
                "Submission body must be a JSON object".to_string(),
            ));
        };
        let mut fields = payload_from_json(map);

        let named = [
            fields.shift_remove(KEY_VARIANT),
            fields.shift_remove(KEY_ONBOARDING_TYPE),
        ];
        let variant = named
            .iter()
            .flatten()
            .filter_map(FieldValue::as_text)
            .find_map(|name| SubmissionVariant::from_wire(name.trim()).ok());

        Ok(Self { variant, fields })
    }

    /// Text value of `key`, if present and not blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .filter(|v| !v.is_blank())
            .and_then(FieldValue::as_text)
    }

    /// Whether `key` holds a non-blank value of any shape. Numbers,
    /// booleans and lists all count as present.
    pub fn is_present(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|v| !v.is_blank())
    }

    /// Scalar value of `key` as text, numbers included. Blank text, lists
    /// and entities yield `None`.
    pub fn scalar_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(key)? {
            FieldValue::Scalar(Scalar::Text(s)) if !s.trim().is_empty() => Some(Cow::Borrowed(s)),
            FieldValue::Scalar(Scalar::Number(n)) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Fields as the report renderer sees them, with the variant recorded
    /// under `onboardingType`.
    pub fn report_payload(&self) -> Payload {
        let mut payload = Payload::with_capacity(self.fields.len() + 1);
        if let Some(variant) = self.variant {
            payload.insert(KEY_ONBOARDING_TYPE.into(), FieldValue::text(variant.as_str()));
        }
        payload.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        payload
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Error taxonomy a rejection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The caller should fix the submission.
    InputError,
    /// The applicant was declined.
    PolicyRejection,
    /// Something unexpected failed; no details are exposed.
    InternalError,
}

/// Why a submission was not cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    #[error("Missing onboarding type")]
    MissingVariant,
    #[error("Missing company details")]
    MissingBusinessDetails,
    #[error("AML check failed: company flagged")]
    RiskFlagged,
    #[error("Internal server error")]
    InternalError,
}

impl RejectionReason {
    pub fn class(self) -> ErrorClass {
        match self {
            Self::MissingVariant | Self::MissingBusinessDetails => ErrorClass::InputError,
            Self::RiskFlagged => ErrorClass::PolicyRejection,
            Self::InternalError => ErrorClass::InternalError,
        }
    }

    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingVariant => "missing-variant",
            Self::MissingBusinessDetails => "missing-business-details",
            Self::RiskFlagged => "risk-flagged",
            Self::InternalError => "internal-error",
        }
    }

    /// Machine-readable error code for API responses.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingVariant => "MISSING_VARIANT",
            Self::MissingBusinessDetails => "MISSING_BUSINESS_DETAILS",
            Self::RiskFlagged => "RISK_FLAGGED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Result of running a submission through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Cleared,
    Rejected { reason: RejectionReason },
}

impl SubmissionOutcome {
    pub fn rejected(reason: RejectionReason) -> Self {
        Self::Rejected { reason }
    }

    pub fn is_cleared(self) -> bool {
        matches!(self, Self::Cleared)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn variant_wire_names() {
        for variant in SubmissionVariant::ALL {
            assert_eq!(SubmissionVariant::from_wire(variant.as_str()).unwrap(), variant);
        }
        assert_eq!(
            SubmissionVariant::from_wire("both").unwrap(),
            SubmissionVariant::Combined
        );
        assert!(SubmissionVariant::from_wire("partnership").is_err());
    }

    #[test]
    fn variant_deserializes_legacy_alias() {
        let v: SubmissionVariant = serde_json::from_value(json!("both")).unwrap();
        assert_eq!(v, SubmissionVariant::Combined);
        assert_eq!(serde_json::to_value(v).unwrap(), json!("combined"));
    }

    #[test]
    fn new_director_requires_names_and_role() {
        let valid = NewDirector {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: "Director".into(),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let missing_role = NewDirector {
            role: String::new(),
            ..valid.clone()
        };
        assert!(missing_role.validate().is_err());
    }

    #[test]
    fn director_entity_keeps_attribute_order() {
        let entry = DirectorEntry::new(
            3,
            NewDirector {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                role: "Director".into(),
                dob: Some("1815-12-10".into()),
                address: None,
            },
        );
        let entity = entry.to_entity();
        let keys: Vec<&str> = entity.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "firstName", "lastName", "role", "dob", "address"]);
        assert_eq!(entity["address"], FieldValue::Null);
    }

    #[test]
    fn payload_reads_variant_from_either_key() {
        let a = SubmissionPayload::from_json(json!({ "variant": "business" })).unwrap();
        assert_eq!(a.variant, Some(SubmissionVariant::Business));

        let b = SubmissionPayload::from_json(json!({ "onboardingType": "both" })).unwrap();
        assert_eq!(b.variant, Some(SubmissionVariant::Combined));
        assert!(!b.fields.contains_key("onboardingType"));
    }

    #[test]
    fn payload_with_unknown_variant_has_none() {
        let p = SubmissionPayload::from_json(json!({ "variant": "trust", "companyName": "A" }))
            .unwrap();
        assert_eq!(p.variant, None);
        assert_eq!(p.text("companyName"), Some("A"));
    }

    #[test]
    fn payload_rejects_non_object() {
        assert_matches!(
            SubmissionPayload::from_json(json!([1, 2])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn text_ignores_blank_values() {
        let p = SubmissionPayload::from_json(json!({ "companyName": "  " })).unwrap();
        assert_eq!(p.text("companyName"), None);
    }

    #[test]
    fn non_text_values_count_as_present() {
        let p = SubmissionPayload::from_json(json!({
            "registrationNumber": 1234567,
            "hasPaye": false,
            "incomeTypes": [],
            "companyName": " ",
            "utrNumber": null,
        }))
        .unwrap();
        assert!(p.is_present("registrationNumber"));
        assert!(p.is_present("hasPaye"));
        assert!(p.is_present("incomeTypes"));
        assert!(!p.is_present("companyName"));
        assert!(!p.is_present("utrNumber"));
        assert!(!p.is_present("vatNumber"));
    }

    #[test]
    fn scalar_text_includes_numbers() {
        let p = SubmissionPayload::from_json(json!({
            "companyName": 4242,
            "fullName": "Ada",
            "incomeTypes": ["Salary"],
        }))
        .unwrap();
        assert_eq!(p.scalar_text("companyName").as_deref(), Some("4242"));
        assert_eq!(p.scalar_text("fullName").as_deref(), Some("Ada"));
        assert_eq!(p.scalar_text("incomeTypes"), None);
        assert_eq!(p.text("companyName"), None);
    }

    #[test]
    fn report_payload_records_variant_first() {
        let p = SubmissionPayload::from_json(json!({ "companyName": "Acme", "variant": "business" }))
            .unwrap();
        let report = p.report_payload();
        assert_eq!(report.get_index(0).unwrap().0, "onboardingType");
        assert_eq!(report["onboardingType"], FieldValue::text("business"));
    }

    #[test]
    fn outcome_wire_shape() {
        assert_eq!(
            serde_json::to_value(SubmissionOutcome::Cleared).unwrap(),
            json!({ "status": "cleared" })
        );
        assert_eq!(
            serde_json::to_value(SubmissionOutcome::rejected(RejectionReason::RiskFlagged)).unwrap(),
            json!({ "status": "rejected", "reason": "risk-flagged" })
        );
    }

    #[test]
    fn rejection_classes() {
        assert_eq!(RejectionReason::MissingVariant.class(), ErrorClass::InputError);
        assert_eq!(RejectionReason::MissingBusinessDetails.class(), ErrorClass::InputError);
        assert_eq!(RejectionReason::RiskFlagged.class(), ErrorClass::PolicyRejection);
        assert_eq!(RejectionReason::InternalError.class(), ErrorClass::InternalError);
    }

    #[test]
    fn rejection_as_str_matches_serde() {
        for reason in [
            RejectionReason::MissingVariant,
            RejectionReason::MissingBusinessDetails,
            RejectionReason::RiskFlagged,
            RejectionReason::InternalError,
        ] {
            assert_eq!(serde_json::to_value(reason).unwrap(), json!(reason.as_str()));
        }
    }
}
