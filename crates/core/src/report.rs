//! Compliance report rendering.
//!
//! Turns a submission [`Payload`] into an ordered sequence of [`ReportRow`]s
//! whose values are HTML-safe. This is the only place user-supplied text is
//! escaped before it reaches reviewer-facing markup, so every string path in
//! [`format_value`] goes through [`escape_html`].

use serde::Serialize;

use crate::field_registry::{self, DOCUMENT_KEYS};
use crate::value::{Entity, FieldValue, Payload, Scalar};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rendered in place of an empty, absent, or null value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rendered in place of an empty list.
pub const NONE_LISTED: &str = "None";

/// Keys rendered first, in exactly this order, when present.
pub const PREFERRED_ORDER: &[&str] = &[
    field_registry::KEY_ONBOARDING_TYPE,
    field_registry::KEY_FULL_NAME_PASSPORT,
    field_registry::KEY_FULL_NAME,
    field_registry::KEY_EMAIL,
    field_registry::KEY_PHONE_NUMBER,
    field_registry::KEY_HOME_ADDRESS,
    field_registry::KEY_COMPANY_NAME,
    field_registry::KEY_REGISTRATION_NUMBER,
];

/// Sub-entity attribute never shown in the report.
const ENTITY_ID_KEY: &str = "id";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One labelled line of the report.
///
/// `label` is plain text; `value_html` is already escaped and may contain
/// the markup produced for sub-entity entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub key: String,
    pub label: String,
    pub value_html: String,
}

/// A document slot surfaced as an action link rather than a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    pub key: &'static str,
    pub label: &'static str,
    /// Locator, only when it is an `http`/`https` URL.
    pub href: String,
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Entity-escape `&`, `<`, `>`, `"`, and `'`.
///
/// `&` is replaced first so the ampersands introduced by the later
/// substitutions are not escaped a second time.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a single value as an escaped display string.
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => NOT_AVAILABLE.to_string(),
        FieldValue::Scalar(Scalar::Text(s)) if s.trim().is_empty() => NOT_AVAILABLE.to_string(),
        FieldValue::Scalar(scalar) => format_scalar(scalar),
        FieldValue::Boolean(true) => "Yes".to_string(),
        FieldValue::Boolean(false) => "No".to_string(),
        FieldValue::List(items) if items.is_empty() => NONE_LISTED.to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(format_scalar)
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::EntityList(entities) if entities.is_empty() => NONE_LISTED.to_string(),
        FieldValue::EntityList(entities) => entities
            .iter()
            .enumerate()
            .map(|(i, entity)| format_entry(i + 1, entity))
            .collect(),
        FieldValue::Entity(_) => escape_html(&value.to_json().to_string()),
    }
}

fn format_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Text(s) => escape_html(s),
        Scalar::Number(n) => n.to_string(),
    }
}

/// One "Entry N" block listing every attribute except `id`.
fn format_entry(position: usize, entity: &Entity) -> String {
    let mut html = format!("<div class=\"entry\"><strong>Entry {position}</strong>");
    for (key, value) in entity.iter().filter(|(k, _)| k.as_str() != ENTITY_ID_KEY) {
        html.push_str("<br>");
        html.push_str(&escape_html(&field_registry::label_for(key)));
        html.push_str(": ");
        html.push_str(&format_value(value));
    }
    html.push_str("</div>");
    html
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Report order of the payload's keys, document slots excluded.
///
/// Preferred keys come first in [`PREFERRED_ORDER`]; the rest follow in
/// case-sensitive lexicographic order.
pub fn ordered_keys(payload: &Payload) -> Vec<&str> {
    let mut keys: Vec<&str> = PREFERRED_ORDER
        .iter()
        .copied()
        .filter(|k| payload.contains_key(*k))
        .collect();

    let mut rest: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|k| !field_registry::is_document(k) && !PREFERRED_ORDER.contains(k))
        .collect();
    rest.sort_unstable();

    keys.extend(rest);
    keys
}

/// Render the payload into its ordered report rows.
pub fn render(payload: &Payload) -> Vec<ReportRow> {
    ordered_keys(payload)
        .into_iter()
        .filter_map(|key| {
            payload.get(key).map(|value| ReportRow {
                key: key.to_string(),
                label: field_registry::label_for(key).into_owned(),
                value_html: format_value(value),
            })
        })
        .collect()
}

/// Document slots with a linkable locator, in slot order.
pub fn document_links(payload: &Payload) -> Vec<DocumentLink> {
    DOCUMENT_KEYS
        .iter()
        .filter_map(|&key| {
            let href = payload.get(key)?.as_text()?.trim();
            if !is_linkable(href) {
                return None;
            }
            let label = field_registry::lookup(key).map_or(key, |spec| spec.label);
            Some(DocumentLink {
                key,
                label,
                href: href.to_string(),
            })
        })
        .collect()
}

fn is_linkable(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    fn keys(rows: &[ReportRow]) -> Vec<&str> {
        rows.iter().map(|r| r.key.as_str()).collect()
    }

    // -- escaping --

    const HOSTILE: &[&str] = &[
        "<script>alert(1)</script>",
        "\"quoted\"",
        "it's",
        "a & b",
        "&amp; already",
        "<img src=x onerror='x'>",
        "\"><svg onload=alert(1)>",
        "&lt;",
        "'\"<>&",
    ];

    fn assert_inert(html: &str) {
        assert!(!html.contains('<'), "{html}");
        assert!(!html.contains('>'), "{html}");
        assert!(!html.contains('"'), "{html}");
        assert!(!html.contains('\''), "{html}");
        for (i, _) in html.match_indices('&') {
            let rest = &html[i..];
            assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
                    .iter()
                    .any(|e| rest.starts_with(e)),
                "unescaped ampersand in {html}"
            );
        }
    }

    #[test]
    fn escape_replaces_all_five_characters() {
        assert_eq!(escape_html("'\"<>&"), "&#39;&quot;&lt;&gt;&amp;");
    }

    #[test]
    fn escape_does_not_double_escape_its_own_output() {
        assert_eq!(escape_html("<"), "&lt;");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn hostile_text_is_inert() {
        for input in HOSTILE {
            assert_inert(&format_value(&FieldValue::text(*input)));
        }
    }

    #[test]
    fn hostile_list_items_are_inert() {
        let value = FieldValue::text_list(HOSTILE.iter().copied());
        assert_inert(&format_value(&value));
    }

    #[test]
    fn hostile_nested_object_is_inert() {
        let value = FieldValue::from_json(json!({ "<k>": "<script>'x'</script>" }));
        assert_inert(&format_value(&value));
    }

    #[test]
    fn hostile_entity_attributes_are_escaped() {
        let value = FieldValue::from_json(json!([
            { "id": 1, "firstName": "<b>Ada</b>", "evil<Key>": "\"x\"" }
        ]));
        let html = format_value(&value);
        assert!(html.contains("First Name: &lt;b&gt;Ada&lt;/b&gt;"));
        assert!(html.contains("Evil&lt; Key&gt;: &quot;x&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn hostile_keys_produce_plain_labels() {
        let rows = render(&payload(json!({ "x<y": "v" })));
        assert_eq!(rows[0].label, "X<y");
        assert_eq!(rows[0].value_html, "v");
    }

    // -- formatting --

    #[test]
    fn empty_values_render_not_available() {
        assert_eq!(format_value(&FieldValue::Null), "N/A");
        assert_eq!(format_value(&FieldValue::text("")), "N/A");
    }

    #[test]
    fn booleans_render_yes_no() {
        assert_eq!(format_value(&FieldValue::Boolean(true)), "Yes");
        assert_eq!(format_value(&FieldValue::Boolean(false)), "No");
    }

    #[test]
    fn numbers_render_unmodified() {
        assert_eq!(format_value(&FieldValue::from_json(json!(42))), "42");
        assert_eq!(format_value(&FieldValue::from_json(json!(-3.25))), "-3.25");
    }

    #[test]
    fn lists_render_comma_joined_or_none() {
        let value = FieldValue::text_list(["Dividends", "Rental Income"]);
        assert_eq!(format_value(&value), "Dividends, Rental Income");
        assert_eq!(format_value(&FieldValue::List(vec![])), "None");
    }

    #[test]
    fn entity_list_renders_numbered_entries_without_id() {
        let value = FieldValue::from_json(json!([
            { "id": 7, "firstName": "Ada", "lastName": "Lovelace", "role": "Director", "dob": "" },
            { "id": 9, "firstName": "Alan", "lastName": "Turing", "role": "Owner" }
        ]));
        let html = format_value(&value);
        assert!(html.contains("<strong>Entry 1</strong><br>First Name: Ada"));
        assert!(html.contains("Date of Birth: N/A"));
        assert!(html.contains("<strong>Entry 2</strong><br>First Name: Alan"));
        assert!(!html.contains("Id:"));
        assert!(!html.contains('7'));
    }

    #[test]
    fn nested_object_falls_back_to_json_dump() {
        let value = FieldValue::from_json(json!({ "a": 1 }));
        assert_eq!(format_value(&value), "{&quot;a&quot;:1}");
    }

    // -- ordering --

    #[test]
    fn preferred_keys_come_first_in_fixed_order() {
        let rows = render(&payload(json!({
            "registrationNumber": "123",
            "companyName": "Acme",
            "email": "a@b.c"
        })));
        assert_eq!(keys(&rows), ["email", "companyName", "registrationNumber"]);
    }

    #[test]
    fn remaining_keys_sort_case_sensitively() {
        let rows = render(&payload(json!({
            "zeta": 1,
            "Beta": 2,
            "alpha": 3,
            "onboardingType": "business"
        })));
        assert_eq!(keys(&rows), ["onboardingType", "Beta", "alpha", "zeta"]);
    }

    #[test]
    fn document_keys_are_not_rows() {
        let p = payload(json!({
            "companyName": "Acme",
            "photoId": "https://blob/id.png",
            "proofOfAddress": "https://blob/poa.pdf"
        }));
        assert_eq!(keys(&render(&p)), ["companyName"]);
    }

    #[test]
    fn rendering_is_idempotent() {
        let p = payload(json!({
            "servicesRequired": ["VAT"],
            "companyName": "Acme",
            "directors": [{ "id": 1, "firstName": "A", "lastName": "B", "role": "C" }],
            "confirmed": true
        }));
        assert_eq!(render(&p), render(&p));
    }

    #[test]
    fn insertion_order_does_not_affect_output() {
        let a = payload(json!({ "b": "1", "email": "e", "a": "2" }));
        let b = payload(json!({ "a": "2", "b": "1", "email": "e" }));
        assert_eq!(render(&a), render(&b));
    }

    // -- document links --

    #[test]
    fn document_links_only_for_http_locators() {
        let p = payload(json!({
            "photoId": "https://blob.example/id.png",
            "proofOfAddress": "javascript:alert(1)"
        }));
        let links = document_links(&p);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].key, "photoId");
        assert_eq!(links[0].label, "Photo ID");
    }

    #[test]
    fn document_links_skip_missing_slots() {
        assert!(document_links(&payload(json!({ "companyName": "Acme" }))).is_empty());
    }
}
