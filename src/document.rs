//! Request and result types for the document workflows.
//!
//! Result types serialize with camelCase field names so they line up with
//! the JSON the prompts ask the model for. Deserialization degrades per
//! field: missing or `null` fields default to empty, unknown severity labels
//! read as `medium`, and unknown reference types keep their label.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Document categories offered by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Contracts,
    Corporate,
    Litigation,
    Property,
    Family,
}

/// Static guidance shown alongside a category.
#[derive(Debug)]
pub struct CategoryInfo {
    pub label: &'static str,
    pub sub_types: &'static [&'static str],
    pub procedures: &'static [&'static str],
    pub risks: &'static [&'static str],
}

const CONTRACTS: CategoryInfo = CategoryInfo {
    label: "Contracts & Agreements",
    sub_types: &[
        "Service Agreement",
        "Non-Disclosure Agreement",
        "Employment Contract",
        "License Agreement",
        "Partnership Agreement",
    ],
    procedures: &[
        "Review & Negotiation",
        "Signing & Execution",
        "Registration (if required)",
    ],
    risks: &[
        "Unfavorable Terms",
        "Ambiguous Language",
        "Missing Clauses",
        "Legal Conflicts",
    ],
};

const CORPORATE: CategoryInfo = CategoryInfo {
    label: "Corporate Documents",
    sub_types: &[
        "Articles of Incorporation",
        "Bylaws",
        "Shareholder Agreement",
        "Board Resolutions",
        "Minutes of Meeting",
    ],
    procedures: &[
        "Board Approval",
        "Filing with Authorities",
        "Annual Maintenance",
    ],
    risks: &[
        "Regulatory Non-compliance",
        "Governance Issues",
        "Shareholder Disputes",
    ],
};

const LITIGATION: CategoryInfo = CategoryInfo {
    label: "Litigation Documents",
    sub_types: &[
        "Complaint/Petition",
        "Legal Notice",
        "Affidavit",
        "Settlement Agreement",
        "Court Filing",
    ],
    procedures: &[
        "Case Analysis",
        "Document Preparation",
        "Court Submission",
        "Service of Process",
    ],
    risks: &[
        "Procedural Errors",
        "Missed Deadlines",
        "Jurisdictional Issues",
    ],
};

const PROPERTY: CategoryInfo = CategoryInfo {
    label: "Property Law",
    sub_types: &[
        "Lease Agreement",
        "Property Purchase Agreement",
        "Deed Transfer",
        "Mortgage Document",
        "Easement Agreement",
    ],
    procedures: &[
        "Title Verification",
        "Registration",
        "Notarization",
        "Stamp Duty Payment",
    ],
    risks: &[
        "Ownership Disputes",
        "Document Fraud",
        "Boundary Issues",
        "Regulatory Violations",
    ],
};

const FAMILY: CategoryInfo = CategoryInfo {
    label: "Family Law",
    sub_types: &[
        "Divorce Settlement",
        "Child Custody Agreement",
        "Will & Testament",
        "Power of Attorney",
        "Prenuptial Agreement",
    ],
    procedures: &[
        "Mediation",
        "Court Filing",
        "Document Notarization",
        "Asset Documentation",
    ],
    risks: &[
        "Asset Division Disputes",
        "Custody Challenges",
        "Inheritance Conflicts",
    ],
};

/// Checklist shown for every category.
pub const COMPLIANCE_CHECKLIST: &[&str] = &[
    "Verify jurisdiction compliance",
    "Check for required signatories",
    "Review legal terminology",
    "Assess enforceability",
];

/// Suggested jurisdictions; any non-empty jurisdiction is accepted.
pub const JURISDICTIONS: &[&str] = &[
    "Federal Law",
    "State Law - California",
    "State Law - New York",
    "State Law - Texas",
    "State Law - Florida",
    "International - EU",
    "International - UK",
    "National Law - India",
    "State Law - Maharashtra (India)",
    "State Law - Uttar Pradesh (India)",
    "State Law - Tamil Nadu (India)",
    "State Law - Delhi (India)",
    "State Law - Karnataka (India)",
];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Contracts,
        Category::Corporate,
        Category::Litigation,
        Category::Property,
        Category::Family,
    ];

    /// Return the stable string identifier used in JSON and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Contracts => "contracts",
            Category::Corporate => "corporate",
            Category::Litigation => "litigation",
            Category::Property => "property",
            Category::Family => "family",
        }
    }

    pub fn info(&self) -> &'static CategoryInfo {
        match self {
            Category::Contracts => &CONTRACTS,
            Category::Corporate => &CORPORATE,
            Category::Litigation => &LITIGATION,
            Category::Property => &PROPERTY,
            Category::Family => &FAMILY,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single missing or invalid form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw form input, before required-field checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RequestForm {
    pub category: Option<Category>,
    pub sub_type: String,
    pub jurisdiction: String,
    pub full_name: String,
    pub counterparty: Option<String>,
    pub details: String,
    pub previous_documents: Option<String>,
}

impl RequestForm {
    /// Check required fields and build an immutable request.
    ///
    /// Every problem is reported at once so the caller can show them per
    /// field; nothing reaches the model until this succeeds.
    pub fn validate(self) -> Result<DocumentRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.category.is_none() {
            errors.push(FieldError {
                field: "category",
                message: "Required".to_string(),
            });
        }
        let sub_type = required(&mut errors, "subType", self.sub_type);
        let jurisdiction = required(&mut errors, "jurisdiction", self.jurisdiction);
        let full_name = required(&mut errors, "fullName", self.full_name);
        let details = required(&mut errors, "details", self.details);

        match self.category {
            Some(category) if errors.is_empty() => Ok(DocumentRequest {
                category,
                sub_type,
                jurisdiction,
                full_name,
                counterparty: optional(self.counterparty),
                details,
                previous_documents: optional(self.previous_documents),
            }),
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError {
            field,
            message: "Required".to_string(),
        });
    }
    trimmed.to_string()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A validated document request. Construct through [`RequestForm::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    category: Category,
    sub_type: String,
    jurisdiction: String,
    full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    counterparty: Option<String>,
    details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_documents: Option<String>,
}

impl DocumentRequest {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn previous_documents(&self) -> Option<&str> {
        self.previous_documents.as_deref()
    }
}

/// The request plus the text the model drafted for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    #[serde(flatten)]
    request: DocumentRequest,
    generated_text: String,
}

impl GeneratedDocument {
    pub(crate) fn new(request: DocumentRequest, generated_text: String) -> Self {
        Self {
            request,
            generated_text,
        }
    }

    pub fn request(&self) -> &DocumentRequest {
        &self.request
    }

    pub fn text(&self) -> &str {
        &self.generated_text
    }
}

/// Three-level rating used for risk severity and step importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Map a model label onto a level; anything unrecognized is `Medium`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" | "minor" => Severity::Low,
            "high" | "critical" | "severe" => Severity::High,
            _ => Severity::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => Severity::from_label(&raw),
            _ => Severity::default(),
        })
    }
}

/// Kind of legal authority a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    Statute,
    Case,
    Regulation,
    Standard,
    /// Any other label, kept as the model wrote it.
    Other(String),
}

impl ReferenceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ReferenceKind::Statute => "statute",
            ReferenceKind::Case => "case",
            ReferenceKind::Regulation => "regulation",
            ReferenceKind::Standard => "standard",
            ReferenceKind::Other(label) => label,
        }
    }

    /// Accepts the bare label or a phrase led by it ("Case law",
    /// "statute/case/regulation/standard").
    pub fn from_label(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        let lead = lower
            .split(|ch: char| !ch.is_ascii_alphabetic())
            .find(|word| !word.is_empty())
            .unwrap_or_default();
        match lead {
            "statute" | "statutes" | "statutory" => ReferenceKind::Statute,
            "case" | "cases" => ReferenceKind::Case,
            "regulation" | "regulations" | "regulatory" => ReferenceKind::Regulation,
            "standard" | "standards" => ReferenceKind::Standard,
            "" => ReferenceKind::default(),
            _ => ReferenceKind::Other(raw.trim().to_string()),
        }
    }
}

impl Default for ReferenceKind {
    fn default() -> Self {
        ReferenceKind::Other("other".to_string())
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReferenceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReferenceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => ReferenceKind::from_label(&raw),
            _ => ReferenceKind::default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub compliance_score: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub risks: Vec<Risk>,
    #[serde(default, deserialize_with = "deserialize_text_items")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub relevant_cases: Vec<RelevantCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantCase {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub relevance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalReference {
    #[serde(rename = "type", default)]
    pub kind: ReferenceKind,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub applicability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyClause {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_default")]
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    /// 1-based position; 0 until renumbered when the model omitted it.
    #[serde(default, deserialize_with = "deserialize_step")]
    pub step: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub timeline: String,
    #[serde(default)]
    pub importance: Severity,
    #[serde(default, deserialize_with = "null_default")]
    pub details: String,
    #[serde(default, deserialize_with = "null_default")]
    pub related_cases: Vec<RelatedCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedCase {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub relevance: String,
}

/// Give steps the model left unnumbered their position in the list.
pub fn renumber_steps(steps: &mut [NextStep]) {
    for (index, step) in steps.iter_mut().enumerate() {
        if step.step == 0 {
            step.step = index as u32 + 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub issues: Vec<ValidationIssue>,
    #[serde(default, deserialize_with = "null_default")]
    pub recommendations: Vec<ValidationRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecommendation {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

/// Round and clamp a model-reported score into 0..=100.
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// An explicit `null` reads the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Leading number of a value like `87`, `"87.6%"` or `"Step 3"`.
fn leading_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let digits: String = text
                .chars()
                .skip_while(|ch| !ch.is_ascii_digit())
                .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
                .collect();
            digits.trim_end_matches('.').parse().ok()
        }
        _ => None,
    }
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(leading_number(&value).map(clamp_score).unwrap_or_default())
}

// anything without a positive number gets renumbered
fn deserialize_step<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match leading_number(&value) {
        Some(number) if number.is_finite() && number >= 1.0 => number.round() as u32,
        _ => 0,
    })
}

/// Recommendations arrive as plain strings or as `{title, description}` objects.
fn deserialize_text_items<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(text_item).collect(),
        other => text_item(other).into_iter().collect(),
    })
}

fn text_item(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Null => None,
        Value::Object(map) => {
            let parts: Vec<&str> = ["title", "recommendation", "description", "text"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(": "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_form() -> RequestForm {
        RequestForm {
            category: Some(Category::Contracts),
            sub_type: "Service Agreement".to_string(),
            jurisdiction: "Federal Law".to_string(),
            full_name: "Acme Inc".to_string(),
            counterparty: Some("  ".to_string()),
            details: "consulting services, 12 months".to_string(),
            previous_documents: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let request = complete_form().validate().unwrap();
        assert_eq!(request.category(), Category::Contracts);
        assert_eq!(request.sub_type(), "Service Agreement");
        // blank optional fields are treated as absent
        assert_eq!(request.counterparty(), None);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let form = RequestForm {
            full_name: "Acme Inc".to_string(),
            ..RequestForm::default()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["category", "subType", "jurisdiction", "details"]);
    }

    #[test]
    fn test_validate_trims_whitespace_only_fields() {
        let mut form = complete_form();
        form.details = " \n ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "details: Required");
    }

    #[test]
    fn test_request_form_from_json() {
        let form: RequestForm = serde_json::from_value(json!({
            "category": "family",
            "subType": "Power of Attorney",
            "jurisdiction": "International - UK",
            "fullName": "Jane Doe",
            "details": "durable, financial matters"
        }))
        .unwrap();
        let request = form.validate().unwrap();
        assert_eq!(request.category(), Category::Family);
        assert_eq!(request.full_name(), "Jane Doe");
    }

    #[test]
    fn test_generated_document_serializes_flat() {
        let request = complete_form().validate().unwrap();
        let doc = GeneratedDocument::new(request, "1. PARTIES".to_string());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["subType"], "Service Agreement");
        assert_eq!(value["generatedText"], "1. PARTIES");
        assert!(value.get("counterparty").is_none());
    }

    #[test]
    fn test_analysis_report_is_lenient() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "complianceScore": "87.6%",
            "risks": [{"severity": "High", "description": "No termination clause"}],
            "recommendations": [
                "Add a termination clause",
                {"title": "Governing law", "description": "Name the governing law"}
            ]
        }))
        .unwrap();
        assert_eq!(report.compliance_score, 88);
        assert_eq!(report.risks[0].severity, Severity::High);
        assert_eq!(report.recommendations[1], "Governing law: Name the governing law");
        assert!(report.relevant_cases.is_empty());
    }

    #[test]
    fn test_scores_are_clamped() {
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(-3.0), 0);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_unknown_severity_reads_as_medium() {
        let risk: Risk =
            serde_json::from_value(json!({"severity": "medium-high", "description": "x"})).unwrap();
        assert_eq!(risk.severity, Severity::Medium);
        let risk: Risk = serde_json::from_value(json!({"severity": null})).unwrap();
        assert_eq!(risk.severity, Severity::Medium);
        assert_eq!(risk.description, "");
    }

    #[test]
    fn test_reference_kind_accepts_phrases() {
        assert_eq!(ReferenceKind::from_label("Case law"), ReferenceKind::Case);
        assert_eq!(
            ReferenceKind::from_label("Regulatory guideline"),
            ReferenceKind::Regulation
        );
        assert_eq!(
            ReferenceKind::from_label("statute/case/regulation/standard"),
            ReferenceKind::Statute
        );
        assert_eq!(
            ReferenceKind::from_label("constitutional provision"),
            ReferenceKind::Other("constitutional provision".to_string())
        );
    }

    #[test]
    fn test_unknown_reference_kind_round_trips_label() {
        let reference: LegalReference = serde_json::from_value(json!({
            "type": "Treaty",
            "name": "Hague Convention",
            "description": null
        }))
        .unwrap();
        assert_eq!(reference.kind.to_string(), "Treaty");
        assert_eq!(reference.description, "");
        assert_eq!(serde_json::to_value(&reference).unwrap()["type"], "Treaty");

        let untyped: LegalReference = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(untyped.kind.to_string(), "other");
    }

    #[test]
    fn test_null_fields_read_as_missing() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "complianceScore": null,
            "risks": null,
            "recommendations": null,
            "relevantCases": null
        }))
        .unwrap();
        assert_eq!(report.compliance_score, 0);
        assert!(report.risks.is_empty());
        assert!(report.recommendations.is_empty());

        let step: NextStep = serde_json::from_value(json!({
            "step": null, "action": "Sign", "timeline": null, "relatedCases": null
        }))
        .unwrap();
        assert_eq!(step.action, "Sign");
        assert!(step.related_cases.is_empty());

        let result: ValidationResult =
            serde_json::from_value(json!({"score": "about 60", "issues": null})).unwrap();
        assert_eq!(result.score, 60);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_next_step_numbers_from_text() {
        let mut steps: Vec<NextStep> = serde_json::from_value(json!([
            {"step": "Step 2", "action": "Sign"},
            {"step": "Numbered step", "action": "File"},
            {"action": "Archive"}
        ]))
        .unwrap();
        renumber_steps(&mut steps);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step).collect();
        assert_eq!(numbers, [2, 2, 3]);
        assert_eq!(steps[2].importance, Severity::Medium);
    }

    #[test]
    fn test_catalog_covers_every_category() {
        for category in Category::ALL {
            let info = category.info();
            assert!(!info.label.is_empty());
            assert_eq!(info.sub_types.len(), 5, "{category}");
        }
    }
}
