//! Plain-text rendering of workflow results for the terminal.

use crate::auth::Session;
use crate::document::{Category, ValidationResult, COMPLIANCE_CHECKLIST, JURISDICTIONS};
use crate::workflow::DocumentPackage;

const RULE: &str = "------------------------------------------------------------";

pub fn render_package(package: &DocumentPackage) -> String {
    let request = package.document.request();
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({}, {})\n{RULE}\n",
        request.sub_type(),
        request.category().info().label,
        request.jurisdiction()
    ));
    out.push_str(package.document.text());
    out.push_str(&format!("\n{RULE}\n"));

    let analysis = &package.analysis;
    out.push_str(&format!(
        "\nANALYSIS\nCompliance score: {}/100\n",
        analysis.compliance_score
    ));
    if !analysis.risks.is_empty() {
        out.push_str("Risks:\n");
        for risk in &analysis.risks {
            out.push_str(&format!("  [{}] {}\n", risk.severity, risk.description));
        }
    }
    push_list(&mut out, "Recommendations", &analysis.recommendations);
    if !analysis.relevant_cases.is_empty() {
        out.push_str("Relevant cases:\n");
        for case in &analysis.relevant_cases {
            out.push_str(&format!("  - {}: {}\n", case.name, case.relevance));
        }
    }

    if !package.references.is_empty() {
        out.push_str("\nLEGAL REFERENCES\n");
        for reference in &package.references {
            out.push_str(&format!("  [{}] {}\n", reference.kind, reference.name));
            push_indented(&mut out, &reference.description);
            if !reference.applicability.is_empty() {
                push_indented(&mut out, &format!("Applies: {}", reference.applicability));
            }
        }
    }

    if !package.clauses.is_empty() {
        out.push_str("\nKEY CLAUSES\n");
        for clause in &package.clauses {
            if clause.importance.is_empty() {
                out.push_str(&format!("  {}\n", clause.title));
            } else {
                out.push_str(&format!("  {} ({})\n", clause.title, clause.importance));
            }
            push_indented(&mut out, &clause.summary);
        }
    }

    if !package.next_steps.is_empty() {
        out.push_str("\nNEXT STEPS\n");
        for step in &package.next_steps {
            out.push_str(&format!(
                "  {}. {} [{}]",
                step.step, step.action, step.importance
            ));
            if !step.timeline.is_empty() {
                out.push_str(&format!(" - {}", step.timeline));
            }
            out.push('\n');
            push_indented(&mut out, &step.details);
            for case in &step.related_cases {
                let mut line = format!("See: {}", case.title);
                if !case.url.is_empty() {
                    line.push_str(&format!(" <{}>", case.url));
                }
                push_indented(&mut out, &line);
            }
        }
    }

    out
}

pub fn render_validation(result: &ValidationResult) -> String {
    let mut out = format!("Document health score: {}/100\n", result.score);
    if result.issues.is_empty() {
        out.push_str("No issues found.\n");
    } else {
        out.push_str("\nISSUES\n");
        for issue in &result.issues {
            out.push_str(&format!("  [{}] {}\n", issue.severity, issue.title));
            push_indented(&mut out, &issue.description);
        }
    }
    if !result.recommendations.is_empty() {
        out.push_str("\nRECOMMENDATIONS\n");
        for recommendation in &result.recommendations {
            out.push_str(&format!("  {}\n", recommendation.title));
            push_indented(&mut out, &recommendation.description);
        }
    }
    out
}

pub fn render_categories() -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let info = category.info();
        out.push_str(&format!("{} ({})\n", info.label, category));
        out.push_str(&format!("  Sub-types:  {}\n", info.sub_types.join(", ")));
        out.push_str(&format!("  Procedures: {}\n", info.procedures.join(", ")));
        out.push_str(&format!("  Risks:      {}\n\n", info.risks.join(", ")));
    }
    push_list(&mut out, "Compliance checklist", COMPLIANCE_CHECKLIST);
    push_list(&mut out, "\nJurisdictions", JURISDICTIONS);
    out
}

pub fn render_session(session: &Session) -> String {
    format!("Signed in as {} <{}>\n", session.user.name, session.user.email)
}

fn push_list<S: AsRef<str>>(out: &mut String, heading: &str, items: &[S]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{heading}:\n"));
    for item in items {
        out.push_str(&format!("  - {}\n", item.as_ref()));
    }
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        out.push_str(&format!("      {}\n", line.trim()));
    }
}
