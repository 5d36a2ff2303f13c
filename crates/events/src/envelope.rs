//! Reviewer-facing HTML message for a cleared submission.
//!
//! The body is a fixed envelope: a header naming the questionnaire, one
//! table row per [`ReportRow`], a "Verification Documents" block with
//! action links, and a footer disclaimer. Row values arrive pre-escaped
//! from the renderer; labels and link targets are escaped here.

use figures_core::field_registry::{KEY_COMPANY_NAME, KEY_FULL_NAME, KEY_FULL_NAME_PASSPORT};
use figures_core::report::{self, escape_html, DocumentLink, ReportRow};
use figures_core::submission::SubmissionPayload;

/// Subject prefix for every onboarding notification.
pub const SUBJECT_PREFIX: &str = "New Onboarding";

/// Used in the subject when no applicant name was supplied.
pub const UNNAMED_APPLICANT: &str = "Unnamed applicant";

const FOOTER: &str = "This is an automated notification from the Figures Onboarding System.";

const CELL_STYLE: &str = "padding: 10px; border-bottom: 1px solid #eee;";
const BUTTON_STYLE: &str = "display: inline-block; padding: 10px 20px; background: #000; \
     color: #fff; text-decoration: none; border-radius: 5px;";

/// A ready-to-send notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body_html: String,
}

/// Subject line: company name, else full name, else passport name.
pub fn subject_for(payload: &SubmissionPayload) -> String {
    let name = [KEY_COMPANY_NAME, KEY_FULL_NAME, KEY_FULL_NAME_PASSPORT]
        .iter()
        .find_map(|key| payload.scalar_text(key));
    let name = name.as_deref().map_or(UNNAMED_APPLICANT, str::trim);
    format!("{SUBJECT_PREFIX}: {name}")
}

/// Render the full message for `payload`.
pub fn build_message(payload: &SubmissionPayload) -> NotificationMessage {
    let rows = report::render(&payload.report_payload());
    let links = report::document_links(&payload.fields);
    let variant = payload.variant.map_or("onboarding", |v| v.label());

    NotificationMessage {
        subject: subject_for(payload),
        body_html: render_body(variant, &rows, &links),
    }
}

fn render_body(variant_label: &str, rows: &[ReportRow], links: &[DocumentLink]) -> String {
    let mut html = String::with_capacity(1024 + rows.len() * 160);
    html.push_str(
        "<div style=\"font-family: sans-serif; max-width: 600px; margin: 0 auto; \
         padding: 20px; border: 1px solid #eee; border-radius: 10px;\">",
    );
    html.push_str("<h2 style=\"color: #111;\">New Onboarding Submission</h2>");
    html.push_str(&format!(
        "<p>A new {} onboarding request has been submitted.</p>",
        escape_html(variant_label)
    ));

    html.push_str("<table style=\"width: 100%; border-collapse: collapse; margin: 20px 0;\">");
    for row in rows {
        html.push_str(&format!(
            "<tr><td style=\"{CELL_STYLE} font-weight: bold;\">{}</td>\
             <td style=\"{CELL_STYLE}\">{}</td></tr>",
            escape_html(&row.label),
            row.value_html
        ));
    }
    html.push_str("</table>");

    html.push_str("<h3 style=\"color: #111; margin-top: 30px;\">Verification Documents</h3>");
    html.push_str("<div style=\"display: flex; gap: 10px; margin-top: 10px;\">");
    if links.is_empty() {
        html.push_str("<p>No documents were provided.</p>");
    }
    for link in links {
        html.push_str(&format!(
            "<a href=\"{}\" style=\"{BUTTON_STYLE}\">View {}</a>",
            escape_html(&link.href),
            escape_html(link.label)
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        "<p style=\"color: #666; font-size: 12px; margin-top: 40px; \
         border-top: 1px solid #eee; padding-top: 20px;\">{FOOTER}</p></div>"
    ));
    html
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
