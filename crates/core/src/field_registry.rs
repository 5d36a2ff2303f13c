//! Static field catalogue for onboarding submissions.
//!
//! Maps every field key the questionnaires collect to its display label and
//! a [`FieldKind`] formatting hint. Keys are the camelCase wire names used by
//! client forms and submission payloads.

use std::borrow::Cow;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Field keys
// ---------------------------------------------------------------------------

pub const KEY_ONBOARDING_TYPE: &str = "onboardingType";
pub const KEY_FULL_NAME_PASSPORT: &str = "fullNamePassport";
pub const KEY_FULL_NAME: &str = "fullName";
pub const KEY_EMAIL: &str = "email";
pub const KEY_PHONE_NUMBER: &str = "phoneNumber";
pub const KEY_HOME_ADDRESS: &str = "homeAddress";
pub const KEY_COMPANY_NAME: &str = "companyName";
pub const KEY_REGISTRATION_NUMBER: &str = "registrationNumber";
pub const KEY_UTR_NUMBER: &str = "utrNumber";
pub const KEY_NI_NUMBER: &str = "niNumber";
pub const KEY_PERSONAL_UTR: &str = "personalUtr";
pub const KEY_BUSINESS_UTR: &str = "businessUtr";
pub const KEY_COMPANY_AUTH_CODE: &str = "companyAuthCode";
pub const KEY_HAS_PAYE: &str = "hasPaye";
pub const KEY_ACCOUNTS_OFFICE_REF: &str = "accountsOfficeRef";
pub const KEY_PAYE_REF: &str = "payeRef";
pub const KEY_IS_VAT_REGISTERED: &str = "isVatRegistered";
pub const KEY_VAT_NUMBER: &str = "vatNumber";
pub const KEY_VAT_REG_DATE: &str = "vatRegDate";
pub const KEY_DIRECTORS: &str = "directors";
pub const KEY_TRADING_ADDRESS: &str = "tradingAddress";
pub const KEY_SERVICES_REQUIRED: &str = "servicesRequired";
pub const KEY_NATURE_OF_BUSINESS: &str = "natureOfBusiness";
pub const KEY_SOURCE_OF_FUNDS: &str = "sourceOfFunds";
pub const KEY_INCOME_TYPES: &str = "incomeTypes";
pub const KEY_OTHER_INCOME: &str = "otherIncome";
pub const KEY_EXPECTS_FOREIGN_INCOME: &str = "expectsForeignIncome";
pub const KEY_FOREIGN_INCOME_DETAILS: &str = "foreignIncomeDetails";
pub const KEY_IS_PEP: &str = "isPep";
pub const KEY_HAS_SANCTIONS: &str = "hasSanctions";
pub const KEY_HAS_HIGH_RISK_INCOME: &str = "hasHighRiskIncome";
pub const KEY_HIGH_RISK_DETAILS: &str = "highRiskDetails";
pub const KEY_HAS_COMPLEX_STRUCTURE: &str = "hasComplexStructure";
pub const KEY_STRUCTURE_DESCRIPTION: &str = "structureDescription";
pub const KEY_HAS_BANKRUPTCY: &str = "hasBankruptcy";
pub const KEY_BANKRUPTCY_DESCRIPTION: &str = "bankruptcyDescription";
pub const KEY_FINANCIAL_DIFFICULTY: &str = "financialDifficulty";
pub const KEY_FINANCIAL_DIFFICULTY_DETAILS: &str = "financialDifficultyDetails";
pub const KEY_PHOTO_ID: &str = "photoId";
pub const KEY_PROOF_OF_ADDRESS: &str = "proofOfAddress";
pub const KEY_CONFIRMED: &str = "confirmed";

/// Keys whose values are document locators. Never rendered as report rows.
pub const DOCUMENT_KEYS: &[&str] = &[KEY_PHOTO_ID, KEY_PROOF_OF_ADDRESS];

/// Value of an affirmative yes/no answer.
pub const YES: &str = "yes";

/// Value of a negative yes/no answer, and the default for every yes/no field.
pub const NO: &str = "no";

// ---------------------------------------------------------------------------
// Field specs
// ---------------------------------------------------------------------------

/// Formatting and input hint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    YesNo,
    Date,
    Choices,
    Document,
    Directors,
    Declaration,
}

/// Registry entry for a single field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Yes/no field that must be answered "yes" for this field to be shown.
    pub revealed_by: Option<&'static str>,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        revealed_by: None,
    }
}

const fn dependent(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    controller: &'static str,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        revealed_by: Some(controller),
    }
}

/// Every top-level submission field.
pub const FIELDS: &[FieldSpec] = &[
    field(KEY_ONBOARDING_TYPE, "Onboarding Type", FieldKind::Text),
    field(KEY_FULL_NAME_PASSPORT, "Full Name (as on Passport)", FieldKind::Text),
    field(KEY_FULL_NAME, "Full Name", FieldKind::Text),
    field(KEY_EMAIL, "Email", FieldKind::Text),
    field(KEY_PHONE_NUMBER, "Phone Number", FieldKind::Text),
    field(KEY_HOME_ADDRESS, "Home Address", FieldKind::LongText),
    field(KEY_COMPANY_NAME, "Company Name", FieldKind::Text),
    field(KEY_REGISTRATION_NUMBER, "Company Number", FieldKind::Text),
    field(KEY_UTR_NUMBER, "Unique Tax Reference (UTR)", FieldKind::Text),
    field(KEY_NI_NUMBER, "National Insurance Number", FieldKind::Text),
    field(KEY_PERSONAL_UTR, "Personal UTR", FieldKind::Text),
    field(KEY_BUSINESS_UTR, "Business UTR", FieldKind::Text),
    field(KEY_COMPANY_AUTH_CODE, "Company Auth Code", FieldKind::Text),
    field(KEY_HAS_PAYE, "Existing PAYE Scheme", FieldKind::YesNo),
    dependent(KEY_ACCOUNTS_OFFICE_REF, "Accounts Office Ref", FieldKind::Text, KEY_HAS_PAYE),
    dependent(KEY_PAYE_REF, "PAYE Reference", FieldKind::Text, KEY_HAS_PAYE),
    field(KEY_IS_VAT_REGISTERED, "VAT Registered", FieldKind::YesNo),
    dependent(KEY_VAT_NUMBER, "VAT Number", FieldKind::Text, KEY_IS_VAT_REGISTERED),
    dependent(KEY_VAT_REG_DATE, "VAT Registration Date", FieldKind::Date, KEY_IS_VAT_REGISTERED),
    field(KEY_DIRECTORS, "Directors / Owners", FieldKind::Directors),
    field(KEY_TRADING_ADDRESS, "Trading Address", FieldKind::LongText),
    field(KEY_SERVICES_REQUIRED, "Services Required", FieldKind::Choices),
    field(KEY_NATURE_OF_BUSINESS, "Nature of Business", FieldKind::LongText),
    field(KEY_SOURCE_OF_FUNDS, "Main Source of Funds", FieldKind::LongText),
    field(KEY_INCOME_TYPES, "Income Types", FieldKind::Choices),
    field(KEY_OTHER_INCOME, "Other Income", FieldKind::LongText),
    field(KEY_EXPECTS_FOREIGN_INCOME, "Expects Income From Outside the UK", FieldKind::YesNo),
    dependent(
        KEY_FOREIGN_INCOME_DETAILS,
        "Foreign Income Details",
        FieldKind::LongText,
        KEY_EXPECTS_FOREIGN_INCOME,
    ),
    field(KEY_IS_PEP, "Politically Exposed Person (PEP)", FieldKind::YesNo),
    field(KEY_HAS_SANCTIONS, "Links to High-Risk or Sanctioned Jurisdictions", FieldKind::YesNo),
    field(KEY_HAS_HIGH_RISK_INCOME, "Income From High-Risk Jurisdictions", FieldKind::YesNo),
    dependent(
        KEY_HIGH_RISK_DETAILS,
        "High-Risk Income Details",
        FieldKind::LongText,
        KEY_HAS_HIGH_RISK_INCOME,
    ),
    field(KEY_HAS_COMPLEX_STRUCTURE, "Complex Ownership Structure", FieldKind::YesNo),
    dependent(
        KEY_STRUCTURE_DESCRIPTION,
        "Ownership Structure Description",
        FieldKind::LongText,
        KEY_HAS_COMPLEX_STRUCTURE,
    ),
    field(KEY_HAS_BANKRUPTCY, "Bankruptcy / Disqualification History", FieldKind::YesNo),
    dependent(
        KEY_BANKRUPTCY_DESCRIPTION,
        "Bankruptcy / Disqualification Details",
        FieldKind::LongText,
        KEY_HAS_BANKRUPTCY,
    ),
    field(KEY_FINANCIAL_DIFFICULTY, "Bankruptcy or Serious Financial Difficulty", FieldKind::YesNo),
    dependent(
        KEY_FINANCIAL_DIFFICULTY_DETAILS,
        "Financial Difficulty Details",
        FieldKind::LongText,
        KEY_FINANCIAL_DIFFICULTY,
    ),
    field(KEY_PHOTO_ID, "Photo ID", FieldKind::Document),
    field(KEY_PROOF_OF_ADDRESS, "Proof of Address", FieldKind::Document),
    field(KEY_CONFIRMED, "Declaration Confirmed", FieldKind::Declaration),
];

/// Attributes of a director/owner sub-entity.
pub const DIRECTOR_FIELDS: &[FieldSpec] = &[
    field("firstName", "First Name", FieldKind::Text),
    field("lastName", "Last Name", FieldKind::Text),
    field("role", "Role", FieldKind::Text),
    field("dob", "Date of Birth", FieldKind::Date),
    field("address", "Home Address", FieldKind::LongText),
];

/// Service scope choices offered to business applicants.
pub const SERVICE_CHOICES: &[&str] = &[
    "Company Accounts & Corp Tax",
    "VAT Preparation & Submission",
    "Payroll Preparation & Submission",
    "New registration (PAYE/VAT)",
    "Other",
];

/// Income type choices offered to self-assessment applicants.
pub const INCOME_TYPE_CHOICES: &[&str] = &[
    "Employment (PAYE)",
    "Self-employment / Sole Trader",
    "Rental Income",
    "Dividends",
    "Bank Interest",
    "Capital Gains (Shares, Crypto, Property)",
    "Foreign Income",
    "Other (Pensions, Benefits, etc.)",
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Find the registry entry for a top-level or sub-entity key.
pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
    FIELDS
        .iter()
        .chain(DIRECTOR_FIELDS.iter())
        .find(|spec| spec.key == key)
}

/// Display label for `key`, derived from the key itself when unregistered.
pub fn label_for(key: &str) -> Cow<'static, str> {
    match lookup(key) {
        Some(spec) => Cow::Borrowed(spec.label),
        None => Cow::Owned(derive_label(key)),
    }
}

/// Build a label from a camelCase key: `tradingAddress` -> `Trading Address`.
///
/// Every uppercase letter after the first character starts a new word.
pub fn derive_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
            continue;
        }
        if ch.is_uppercase() {
            label.push(' ');
        }
        label.push(ch);
    }
    label
}

/// Whether `key` names one of the two document slots.
pub fn is_document(key: &str) -> bool {
    DOCUMENT_KEYS.contains(&key)
}

/// Whether a yes/no answer is affirmative. Accepts any casing of "yes".
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(YES)
}

/// Yes/no controller that reveals `key`, if `key` is a dependent field.
pub fn controller_of(key: &str) -> Option<&'static str> {
    lookup(key).and_then(|spec| spec.revealed_by)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
