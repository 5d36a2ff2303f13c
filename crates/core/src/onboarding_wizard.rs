//! Onboarding wizard state machine.
//!
//! One [`OnboardingWizard`] drives one applicant session. It owns the
//! in-progress [`Draft`], knows the step layout of every
//! [`SubmissionVariant`], and decides when the applicant may move forward
//! or submit.
//!
//! Gating is intentionally asymmetric: identity numbers, identity documents,
//! and the final declaration are hard requirements, while narrative fields
//! (nature of business, compliance explanations, ...) never block a step.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::field_registry::{self as fields, FieldKind, FieldSpec};
use crate::submission::{
    DirectorEntry, DocumentRef, DocumentSlot, FinalizedSubmission, NewDirector, SubmissionVariant,
};
use crate::value::{FieldValue, Payload};

/// First step number (1-based).
pub const MIN_STEP: u8 = 1;

// ---------------------------------------------------------------------------
// Step layout
// ---------------------------------------------------------------------------

/// One wizard step: the fields it presents and those it hard-gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    pub title: &'static str,
    pub fields: &'static [&'static str],
    pub required: &'static [&'static str],
}

const BUSINESS_STEPS: &[StepDef] = &[
    StepDef {
        title: "Company Details & Documents",
        fields: &[
            fields::KEY_COMPANY_NAME,
            fields::KEY_REGISTRATION_NUMBER,
            fields::KEY_UTR_NUMBER,
            fields::KEY_COMPANY_AUTH_CODE,
            fields::KEY_HAS_PAYE,
            fields::KEY_ACCOUNTS_OFFICE_REF,
            fields::KEY_PAYE_REF,
            fields::KEY_IS_VAT_REGISTERED,
            fields::KEY_VAT_NUMBER,
            fields::KEY_VAT_REG_DATE,
            fields::KEY_PHOTO_ID,
            fields::KEY_PROOF_OF_ADDRESS,
        ],
        required: &[fields::KEY_COMPANY_NAME, fields::KEY_REGISTRATION_NUMBER],
    },
    StepDef {
        title: "Directors & Business Profile",
        fields: &[
            fields::KEY_DIRECTORS,
            fields::KEY_TRADING_ADDRESS,
            fields::KEY_SERVICES_REQUIRED,
            fields::KEY_NATURE_OF_BUSINESS,
            fields::KEY_SOURCE_OF_FUNDS,
        ],
        required: &[],
    },
    StepDef {
        title: "Compliance & Declaration",
        fields: &[
            fields::KEY_IS_PEP,
            fields::KEY_HAS_SANCTIONS,
            fields::KEY_HAS_COMPLEX_STRUCTURE,
            fields::KEY_STRUCTURE_DESCRIPTION,
            fields::KEY_HAS_BANKRUPTCY,
            fields::KEY_BANKRUPTCY_DESCRIPTION,
        ],
        required: &[],
    },
];

const SELF_ASSESSMENT_STEPS: &[StepDef] = &[
    StepDef {
        title: "Tax Identifiers & Documents",
        fields: &[
            fields::KEY_UTR_NUMBER,
            fields::KEY_NI_NUMBER,
            fields::KEY_PHOTO_ID,
            fields::KEY_PROOF_OF_ADDRESS,
        ],
        required: &[
            fields::KEY_UTR_NUMBER,
            fields::KEY_NI_NUMBER,
            fields::KEY_PHOTO_ID,
            fields::KEY_PROOF_OF_ADDRESS,
        ],
    },
    StepDef {
        title: "Income & Contact",
        fields: &[
            fields::KEY_INCOME_TYPES,
            fields::KEY_OTHER_INCOME,
            fields::KEY_EXPECTS_FOREIGN_INCOME,
            fields::KEY_FOREIGN_INCOME_DETAILS,
            fields::KEY_FULL_NAME_PASSPORT,
            fields::KEY_HOME_ADDRESS,
            fields::KEY_PHONE_NUMBER,
        ],
        required: &[
            fields::KEY_FULL_NAME_PASSPORT,
            fields::KEY_HOME_ADDRESS,
            fields::KEY_PHONE_NUMBER,
        ],
    },
    StepDef {
        title: "Compliance & Declaration",
        fields: &[
            fields::KEY_IS_PEP,
            fields::KEY_HAS_HIGH_RISK_INCOME,
            fields::KEY_HIGH_RISK_DETAILS,
            fields::KEY_FINANCIAL_DIFFICULTY,
            fields::KEY_FINANCIAL_DIFFICULTY_DETAILS,
        ],
        required: &[],
    },
];

const COMBINED_STEPS: &[StepDef] = &[
    StepDef {
        title: "Personal & Business Information",
        fields: &[
            fields::KEY_FULL_NAME_PASSPORT,
            fields::KEY_PERSONAL_UTR,
            fields::KEY_COMPANY_NAME,
            fields::KEY_REGISTRATION_NUMBER,
            fields::KEY_BUSINESS_UTR,
            fields::KEY_COMPANY_AUTH_CODE,
        ],
        required: &[
            fields::KEY_FULL_NAME_PASSPORT,
            fields::KEY_PERSONAL_UTR,
            fields::KEY_COMPANY_NAME,
            fields::KEY_REGISTRATION_NUMBER,
            fields::KEY_BUSINESS_UTR,
            fields::KEY_COMPANY_AUTH_CODE,
        ],
    },
    StepDef {
        title: "Business Profile & Registrations",
        fields: &[
            fields::KEY_NATURE_OF_BUSINESS,
            fields::KEY_SOURCE_OF_FUNDS,
            fields::KEY_HAS_PAYE,
            fields::KEY_ACCOUNTS_OFFICE_REF,
            fields::KEY_PAYE_REF,
            fields::KEY_IS_VAT_REGISTERED,
            fields::KEY_VAT_NUMBER,
            fields::KEY_VAT_REG_DATE,
        ],
        required: &[],
    },
    StepDef {
        title: "Personal Income",
        fields: &[fields::KEY_INCOME_TYPES],
        required: &[],
    },
    StepDef {
        title: "Directors & Trading Address",
        fields: &[fields::KEY_DIRECTORS, fields::KEY_TRADING_ADDRESS],
        required: &[],
    },
    StepDef {
        title: "Identity Documents",
        fields: &[fields::KEY_PHOTO_ID, fields::KEY_PROOF_OF_ADDRESS],
        required: &[fields::KEY_PHOTO_ID, fields::KEY_PROOF_OF_ADDRESS],
    },
    StepDef {
        title: "Compliance & Declaration",
        fields: &[
            fields::KEY_IS_PEP,
            fields::KEY_HAS_SANCTIONS,
            fields::KEY_HAS_BANKRUPTCY,
            fields::KEY_BANKRUPTCY_DESCRIPTION,
        ],
        required: &[],
    },
];

/// Step layout for a variant.
pub fn steps(variant: SubmissionVariant) -> &'static [StepDef] {
    match variant {
        SubmissionVariant::Business => BUSINESS_STEPS,
        SubmissionVariant::SelfAssessment => SELF_ASSESSMENT_STEPS,
        SubmissionVariant::Combined => COMBINED_STEPS,
    }
}

/// Number of steps for a variant. The last step is the terminal step.
pub fn step_count(variant: SubmissionVariant) -> u8 {
    steps(variant).len() as u8
}

/// Step definition for a 1-based step number.
pub fn step_def(variant: SubmissionVariant, step: u8) -> Option<&'static StepDef> {
    let index = usize::from(step).checked_sub(1)?;
    steps(variant).get(index)
}

/// Fields presented on `step`, before conditional reveal. Empty when out of range.
pub fn fields_for_step(variant: SubmissionVariant, step: u8) -> &'static [&'static str] {
    step_def(variant, step).map(|def| def.fields).unwrap_or(&[])
}

/// Completion percentage shown while on `step`.
pub fn progress_percent(variant: SubmissionVariant, step: u8) -> u8 {
    let total = u32::from(step_count(variant));
    let step = u32::from(step.min(step_count(variant)));
    ((step * 100 + total / 2) / total) as u8
}

/// Every field a variant collects, in step order.
pub fn variant_fields(variant: SubmissionVariant) -> impl Iterator<Item = &'static str> {
    steps(variant).iter().flat_map(|s| s.fields.iter().copied())
}

// ---------------------------------------------------------------------------
// Step layout (client-facing)
// ---------------------------------------------------------------------------

/// A field as presented on a step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayout {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub required: bool,
}

/// A step as presented to client forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLayout {
    pub number: u8,
    pub title: &'static str,
    pub progress_percent: u8,
    pub requires_confirmation: bool,
    pub fields: Vec<FieldLayout>,
}

/// Full step layout of a variant, for rendering forms.
pub fn step_layout(variant: SubmissionVariant) -> Vec<StepLayout> {
    let terminal = step_count(variant);
    steps(variant)
        .iter()
        .zip(MIN_STEP..)
        .map(|(def, number)| StepLayout {
            number,
            title: def.title,
            progress_percent: progress_percent(variant, number),
            requires_confirmation: number == terminal,
            fields: def
                .fields
                .iter()
                .filter_map(|key| fields::lookup(key))
                .map(|spec| FieldLayout {
                    spec: *spec,
                    required: def.required.contains(&spec.key),
                })
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Draft values
// ---------------------------------------------------------------------------

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => fields::YES,
            Self::No => fields::NO,
        }
    }
}

/// A value held by a draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DraftValue {
    Text(String),
    Choice(YesNo),
    List(Vec<String>),
    Document(Option<DocumentRef>),
}

impl DraftValue {
    /// Default value for a freshly initialized field of `kind`.
    fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::YesNo => Self::Choice(YesNo::No),
            FieldKind::Choices => Self::List(Vec::new()),
            FieldKind::Document => Self::Document(None),
            _ => Self::Text(String::new()),
        }
    }

    /// Whether the value counts as answered for gating.
    pub fn is_populated(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choice(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Document(doc) => doc.is_some(),
        }
    }

    fn is_affirmative(&self) -> bool {
        match self {
            Self::Choice(answer) => *answer == YesNo::Yes,
            Self::Text(s) => fields::is_affirmative(s),
            _ => false,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        match self {
            Self::Text(s) => FieldValue::text(s.as_str()),
            Self::Choice(answer) => FieldValue::text(answer.as_str()),
            Self::List(items) => FieldValue::text_list(items.iter().map(String::as_str)),
            Self::Document(Some(doc)) => FieldValue::text(doc.locator.as_str()),
            Self::Document(None) => FieldValue::Null,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Local, recoverable wizard failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} cannot be left yet; missing: {}", .missing.join(", "))]
    StepBlocked {
        step: u8,
        missing: Vec<&'static str>,
    },

    #[error("Submission is not ready: {0}")]
    NotReady(String),

    #[error("Invalid director: {0}")]
    InvalidDirector(String),

    #[error("Director {id} not found")]
    NotFound { id: u64 },

    #[error("Onboarding type is already '{}'; restart the draft to change it", .current.as_str())]
    VariantLocked { current: SubmissionVariant },

    #[error("No onboarding type has been selected")]
    NoDraft,

    #[error("Field '{0}' cannot be set directly")]
    ReservedField(String),
}

impl From<WizardError> for CoreError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::NotFound { id } => CoreError::NotFound {
                entity: "Director",
                key: id.to_string(),
            },
            locked @ WizardError::VariantLocked { .. } => CoreError::Conflict(locked.to_string()),
            other => CoreError::Validation(other.to_string()),
        }
    }
}

/// Keys with dedicated operations instead of `update_field`.
const RESERVED_KEYS: &[&str] = &[
    fields::KEY_DIRECTORS,
    fields::KEY_CONFIRMED,
    fields::KEY_ONBOARDING_TYPE,
    crate::submission::KEY_VARIANT,
];

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// In-progress submission owned by a single wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    variant: SubmissionVariant,
    current_step: u8,
    fields: IndexMap<String, DraftValue>,
    directors: Vec<DirectorEntry>,
    confirmed: bool,
    #[serde(skip)]
    next_director_id: u64,
}

impl Draft {
    fn new(variant: SubmissionVariant) -> Self {
        let fields = variant_fields(variant)
            .filter_map(fields::lookup)
            .filter(|spec| spec.kind != FieldKind::Directors)
            .map(|spec| (spec.key.to_string(), DraftValue::default_for(spec.kind)))
            .collect();
        Self {
            variant,
            current_step: MIN_STEP,
            fields,
            directors: Vec::new(),
            confirmed: false,
            next_director_id: 1,
        }
    }

    pub fn variant(&self) -> SubmissionVariant {
        self.variant
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn field(&self, key: &str) -> Option<&DraftValue> {
        self.fields.get(key)
    }

    pub fn directors(&self) -> &[DirectorEntry] {
        &self.directors
    }

    fn terminal_step(&self) -> u8 {
        step_count(self.variant)
    }

    /// Whether `key` is currently shown. Dependent fields are shown only
    /// while their yes/no controller is answered "yes".
    pub fn is_visible(&self, key: &str) -> bool {
        match fields::controller_of(key) {
            Some(controller) => self
                .fields
                .get(controller)
                .is_some_and(DraftValue::is_affirmative),
            None => true,
        }
    }

    fn is_populated(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(DraftValue::is_populated)
    }

    /// Required fields of `step` that are visible and still unanswered.
    pub fn missing_fields(&self, step: u8) -> Vec<&'static str> {
        let Some(def) = step_def(self.variant, step) else {
            return Vec::new();
        };
        let mut missing: Vec<&'static str> = def
            .required
            .iter()
            .copied()
            .filter(|key| self.is_visible(key) && !self.is_populated(key))
            .collect();
        if step == self.terminal_step() && !self.confirmed {
            missing.push(fields::KEY_CONFIRMED);
        }
        missing
    }

    /// Whether the requirements of `step` are met. Out-of-range steps never are.
    pub fn can_advance(&self, step: u8) -> bool {
        step_def(self.variant, step).is_some() && self.missing_fields(step).is_empty()
    }

    /// Fields presented on `step` given current answers.
    pub fn visible_fields(&self, step: u8) -> Vec<&'static str> {
        fields_for_step(self.variant, step)
            .iter()
            .copied()
            .filter(|key| self.is_visible(key))
            .collect()
    }

    /// Snapshot every collected field.
    ///
    /// Hidden dependents are omitted only while empty; anything the
    /// applicant typed before hiding a field is kept.
    fn snapshot(&self) -> Payload {
        let mut payload = Payload::new();
        for (key, value) in &self.fields {
            if !self.is_visible(key) && !value.is_populated() {
                continue;
            }
            payload.insert(key.clone(), value.to_field_value());
        }
        if variant_fields(self.variant).any(|key| key == fields::KEY_DIRECTORS) {
            payload.insert(
                fields::KEY_DIRECTORS.to_string(),
                FieldValue::EntityList(self.directors.iter().map(DirectorEntry::to_entity).collect()),
            );
        }
        payload.insert(
            fields::KEY_CONFIRMED.to_string(),
            FieldValue::Boolean(self.confirmed),
        );
        payload
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Per-session wizard. Holds at most one draft.
#[derive(Debug, Clone, Default)]
pub struct OnboardingWizard {
    draft: Option<Draft>,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Current step, or 1 before a variant is chosen.
    pub fn current_step(&self) -> u8 {
        self.draft.as_ref().map_or(MIN_STEP, Draft::current_step)
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, WizardError> {
        self.draft.as_mut().ok_or(WizardError::NoDraft)
    }

    /// Start a draft for `variant`. Allowed only on step 1; choosing again
    /// there restarts the draft from scratch.
    pub fn select_variant(&mut self, variant: SubmissionVariant) -> Result<(), WizardError> {
        if let Some(draft) = &self.draft {
            if draft.current_step > MIN_STEP {
                return Err(WizardError::VariantLocked {
                    current: draft.variant,
                });
            }
        }
        self.draft = Some(Draft::new(variant));
        Ok(())
    }

    /// Discard the draft entirely.
    pub fn reset(&mut self) {
        self.draft = None;
    }

    /// Replace the value of `key`. Never validates; gating is evaluated
    /// lazily by [`can_advance`](Self::can_advance).
    pub fn update_field(
        &mut self,
        key: impl Into<String>,
        value: DraftValue,
    ) -> Result<(), WizardError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(WizardError::ReservedField(key));
        }
        self.draft_mut()?.fields.insert(key, value);
        Ok(())
    }

    /// Record an uploaded document against its slot.
    pub fn attach_document(
        &mut self,
        slot: DocumentSlot,
        document: DocumentRef,
    ) -> Result<(), WizardError> {
        self.update_field(slot.key(), DraftValue::Document(Some(document)))
    }

    /// Append a director. Entries missing a name or role are rejected and
    /// leave the draft untouched.
    pub fn add_director(&mut self, details: NewDirector) -> Result<u64, WizardError> {
        let draft = self.draft_mut()?;
        details
            .validate()
            .map_err(|e| WizardError::InvalidDirector(e.to_string()))?;
        let id = draft.next_director_id;
        draft.next_director_id += 1;
        draft.directors.push(DirectorEntry::new(id, details));
        Ok(id)
    }

    /// Remove the director with `id`.
    pub fn remove_director(&mut self, id: u64) -> Result<DirectorEntry, WizardError> {
        let draft = self.draft_mut()?;
        let index = draft
            .directors
            .iter()
            .position(|d| d.id == id)
            .ok_or(WizardError::NotFound { id })?;
        Ok(draft.directors.remove(index))
    }

    /// Set the declaration. Confirming is only possible on the terminal step,
    /// once that step's own required fields are answered.
    pub fn set_confirmed(&mut self, confirmed: bool) -> Result<(), WizardError> {
        let draft = self.draft_mut()?;
        let terminal = draft.terminal_step();
        if confirmed {
            if draft.current_step != terminal {
                return Err(WizardError::NotReady(format!(
                    "the declaration can only be confirmed on step {terminal}"
                )));
            }
            let missing: Vec<_> = draft
                .missing_fields(terminal)
                .into_iter()
                .filter(|key| *key != fields::KEY_CONFIRMED)
                .collect();
            if !missing.is_empty() {
                return Err(WizardError::StepBlocked {
                    step: terminal,
                    missing,
                });
            }
        }
        draft.confirmed = confirmed;
        Ok(())
    }

    /// Whether `step` may be left. False before a variant is chosen.
    pub fn can_advance(&self, step: u8) -> bool {
        self.draft.as_ref().is_some_and(|d| d.can_advance(step))
    }

    /// Move to the next step.
    pub fn advance(&mut self) -> Result<u8, WizardError> {
        let draft = self.draft_mut()?;
        let step = draft.current_step;
        if step >= draft.terminal_step() || !draft.can_advance(step) {
            return Err(WizardError::StepBlocked {
                step,
                missing: draft.missing_fields(step),
            });
        }
        draft.current_step += 1;
        Ok(draft.current_step)
    }

    /// Move to the previous step, stopping at step 1. Keeps every answer.
    pub fn retreat(&mut self) -> u8 {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.current_step = draft.current_step.saturating_sub(1).max(MIN_STEP);
                draft.current_step
            }
            None => MIN_STEP,
        }
    }

    /// Produce the finalized snapshot and discard the draft.
    ///
    /// Requires the terminal step, a confirmed declaration, and every step's
    /// requirements to hold, since fields may have been edited after the
    /// earlier steps were passed.
    pub fn finalize(&mut self) -> Result<FinalizedSubmission, WizardError> {
        let draft = self.draft.as_ref().ok_or(WizardError::NoDraft)?;
        let terminal = draft.terminal_step();
        if draft.current_step != terminal {
            return Err(WizardError::NotReady(format!(
                "currently on step {} of {terminal}",
                draft.current_step
            )));
        }
        if let Some(step) = (MIN_STEP..=terminal).find(|s| !draft.can_advance(*s)) {
            return Err(WizardError::NotReady(format!(
                "step {step} is incomplete; missing: {}",
                draft.missing_fields(step).join(", ")
            )));
        }

        let submission = FinalizedSubmission::new(draft.variant, draft.snapshot());
        self.draft = None;
        Ok(submission)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
