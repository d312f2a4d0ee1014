use super::super::domain::{ActionSeverity, ComplianceCategory, StoreId};
use serde::{Deserialize, Serialize};

/// Answer recorded against an audit question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditResult {
    #[serde(rename = "yes")]
    Yes,
    #[serde(rename = "no")]
    No,
    #[serde(rename = "na", alias = "not_applicable")]
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditQuestion {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSection {
    pub id: String,
    pub name: String,
    pub weight: u32,
    /// Compliance category corrective actions raised from this section are filed under.
    #[serde(default)]
    pub category: Option<ComplianceCategory>,
    pub questions: Vec<AuditQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub sections: Vec<AuditSection>,
}

impl AuditTemplate {
    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResponse {
    pub question_id: String,
    pub result: AuditResult,
    #[serde(default)]
    pub severity: Option<ActionSeverity>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A submitted audit: the template it was run against and the collected answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub id: String,
    pub store_id: StoreId,
    pub template: AuditTemplate,
    pub responses: Vec<AuditResponse>,
}
