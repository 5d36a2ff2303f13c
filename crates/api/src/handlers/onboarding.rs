//! Read-only wizard schema for client forms.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::Json;
use figures_core::error::CoreError;
use figures_core::onboarding_wizard::{step_count, step_layout, StepLayout};
use figures_core::submission::SubmissionVariant;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;

/// One entry of the variant listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub variant: SubmissionVariant,
    pub label: &'static str,
    pub step_count: u8,
}

/// Step layout of one variant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLayout {
    pub variant: SubmissionVariant,
    pub label: &'static str,
    pub steps: Vec<StepLayout>,
}

/// GET /api/v1/onboarding/variants
pub async fn list_variants() -> impl IntoResponse {
    let variants: Vec<_> = SubmissionVariant::ALL
        .into_iter()
        .map(|variant| VariantSummary {
            variant,
            label: variant.label(),
            step_count: step_count(variant),
        })
        .collect();

    Json(DataResponse { data: variants })
}

/// GET /api/v1/onboarding/variants/{variant}
///
/// Accepts the legacy name `both` for `combined`.
pub async fn get_variant_layout(Path(name): Path<String>) -> AppResult<impl IntoResponse> {
    let variant = SubmissionVariant::from_wire(&name).map_err(|_| CoreError::NotFound {
        entity: "Onboarding variant",
        key: name.clone(),
    })?;

    Ok(Json(DataResponse {
        data: VariantLayout {
            variant,
            label: variant.label(),
            steps: step_layout(variant),
        },
    }))
}
