//! # Instruction Templates — The Versioned Output Contract
//!
//! The instruction template is versioned and the version string is
//! recorded in every audit entry, so a historical analysis can be
//! replayed against the exact contract it was generated under. Changing
//! the template text requires bumping [`INSTRUCTION_VERSION`].
//!
//! The contract: the service must answer with a single JSON object
//! `{"gaps": [...]}` where each gap carries a requested family, a
//! description, one of the four severities, and at least one evidence
//! id copied verbatim from the serialized context.

use std::fmt::Write as _;

use regent_core::ProjectProfile;
use regent_retrieval::{FamilyCoverage, ReasoningContext};

use crate::contract::ContractViolation;

/// Version tag of the analysis instruction template.
pub const INSTRUCTION_VERSION: &str = "regent.analysis.v1";

/// Build the base analysis instructions for one profile.
///
/// Derived from the advisor role and per-family assessment structure of
/// the production prompt set, narrowed to the strict JSON contract the
/// validator enforces.
pub fn analysis_instructions(profile: &ProjectProfile) -> String {
    let families: Vec<&str> = profile.families().iter().map(|f| f.as_str()).collect();
    let mut out = String::new();
    let _ = write!(
        out,
        "You are an experienced compliance advisor for blockchain and \
         FinTech projects, with deep expertise in EU regulation and \
         enforcement practice.\n\
         \n\
         Template: {INSTRUCTION_VERSION}\n\
         \n\
         Analyze the project below against these regulation families: {}.\n\
         \n\
         PROJECT: {}\n\
         DESCRIPTION:\n{}\n",
        families.join(", "),
        profile.name(),
        profile.description(),
    );

    let attrs = profile.attributes();
    if let Some(jurisdiction) = &attrs.jurisdiction {
        let _ = writeln!(out, "JURISDICTION: {jurisdiction}");
    }
    if let Some(token_model) = &attrs.token_model {
        let _ = writeln!(out, "TOKEN MODEL: {token_model}");
    }
    if let Some(custody_model) = &attrs.custody_model {
        let _ = writeln!(out, "CUSTODY MODEL: {custody_model}");
    }

    let _ = write!(
        out,
        "\nIdentify concrete compliance gaps. For every gap, cite the \
         evidence passage ids (shown in square brackets in the context) \
         that justify it. Do not invent citations; do not report gaps \
         you cannot ground in the supplied evidence. A family marked \
         \"no evidence found\" may still be discussed only if a cited \
         passage from another family justifies it, otherwise omit it.\n\
         \n\
         Respond with a single JSON object and nothing else:\n\
         {{\"gaps\": [{{\"family\": \"<one of: {}>\", \
         \"description\": \"<short finding>\", \
         \"severity\": \"low|medium|high|critical\", \
         \"evidence\": [\"<passage id>\", ...], \
         \"remediation\": \"<optional hint>\"}}]}}\n",
        families.join("|"),
    );
    out
}

/// Append a corrective addendum after a rejected response, naming the
/// exact violations so the retry can fix them.
pub fn corrective_instructions(base: &str, violations: &[ContractViolation]) -> String {
    let mut out = String::with_capacity(base.len() + 256);
    out.push_str(base);
    out.push_str(
        "\n\nYour previous response violated the output contract and was \
         rejected. Violations:\n",
    );
    for violation in violations {
        let _ = writeln!(out, "- {violation}");
    }
    out.push_str(
        "Respond again with ONLY the JSON object, citing ONLY passage \
         ids present in the context.\n",
    );
    out
}

/// Serialize the reasoning context for the request: one block per
/// passage with its citable id, plus explicit markers for families with
/// no evidence or evidence omitted by the size budget.
pub fn render_context(ctx: &ReasoningContext) -> String {
    let mut out = String::from("EVIDENCE CONTEXT\n");
    for passage in ctx.passages() {
        let _ = write!(
            out,
            "\n[{}] {} — {} ({})\n{}\n",
            passage.id, passage.family, passage.source, passage.kind, passage.excerpt,
        );
    }
    for (family, coverage) in ctx.coverage() {
        match coverage {
            FamilyCoverage::Covered => {}
            FamilyCoverage::NoEvidenceFound => {
                let _ = writeln!(out, "\n{family}: no evidence found in the corpus.");
            }
            FamilyCoverage::OmittedByBudget => {
                let _ = writeln!(
                    out,
                    "\n{family}: evidence exists but was omitted due to the context budget."
                );
            }
        }
    }
    out
}
