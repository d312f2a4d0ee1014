use super::super::domain::ScoringError;
use super::domain::{AuditResponse, AuditResult, AuditTemplate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const HIGH_RISK_BELOW: f64 = 60.0;
const MEDIUM_RISK_BELOW: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section_id: String,
    pub name: String,
    /// Percentage of YES among YES/NO answers, one decimal.
    pub score: f64,
    pub yes: u32,
    pub no: u32,
    pub na: u32,
    pub total: u32,
    pub weight: u32,
    pub critical_failures: u32,
}

impl SectionScore {
    /// Sections without a single YES/NO answer carry no weight in the overall score.
    pub fn is_scorable(&self) -> bool {
        self.yes + self.no > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditScore {
    pub overall_score: f64,
    pub section_scores: Vec<SectionScore>,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub completion_percentage: f64,
    pub critical_failures: u32,
    pub has_critical_failure: bool,
    pub risk_level: RiskLevel,
}

pub(crate) fn score_audit(
    template: &AuditTemplate,
    responses: &[AuditResponse],
) -> Result<AuditScore, ScoringError> {
    let mut sections = Vec::with_capacity(template.sections.len());
    let mut question_index: HashMap<&str, (usize, bool)> = HashMap::new();

    for (position, section) in template.sections.iter().enumerate() {
        if section.weight == 0 {
            return Err(ScoringError::InvalidSectionWeight {
                section_id: section.id.clone(),
                weight: section.weight,
            });
        }
        for question in &section.questions {
            let previous =
                question_index.insert(question.id.as_str(), (position, question.critical));
            if previous.is_some() {
                return Err(ScoringError::DuplicateQuestion(question.id.clone()));
            }
        }
        sections.push(SectionScore {
            section_id: section.id.clone(),
            name: section.name.clone(),
            score: 0.0,
            yes: 0,
            no: 0,
            na: 0,
            total: 0,
            weight: section.weight,
            critical_failures: 0,
        });
    }

    let mut answered: HashSet<&str> = HashSet::with_capacity(responses.len());
    for response in responses {
        let question_id = response.question_id.as_str();
        let Some(&(position, critical)) = question_index.get(question_id) else {
            return Err(ScoringError::UnknownQuestion(response.question_id.clone()));
        };
        if !answered.insert(question_id) {
            return Err(ScoringError::DuplicateResponse(response.question_id.clone()));
        }

        let section = &mut sections[position];
        section.total += 1;
        match response.result {
            AuditResult::Yes => section.yes += 1,
            AuditResult::No => {
                section.no += 1;
                if critical {
                    section.critical_failures += 1;
                }
            }
            AuditResult::NotApplicable => section.na += 1,
        }
    }

    for section in &mut sections {
        let scored = section.yes + section.no;
        section.score = if scored > 0 {
            round_one_decimal(f64::from(section.yes) / f64::from(scored) * 100.0)
        } else {
            0.0
        };
    }

    let (weighted_sum, total_weight) = sections
        .iter()
        .filter(|section| section.is_scorable())
        .fold((0.0, 0u32), |(sum, weight), section| {
            (
                sum + section.score * f64::from(section.weight),
                weight + section.weight,
            )
        });
    let overall = if total_weight > 0 {
        weighted_sum / f64::from(total_weight)
    } else {
        0.0
    };

    let total_questions = template.question_count() as u32;
    let answered_questions = answered.len() as u32;
    let completion = if total_questions > 0 {
        f64::from(answered_questions) / f64::from(total_questions) * 100.0
    } else {
        0.0
    };

    let critical_failures: u32 = sections
        .iter()
        .map(|section| section.critical_failures)
        .sum();
    let has_critical_failure = critical_failures > 0;

    let risk_level = if has_critical_failure {
        RiskLevel::Critical
    } else if overall < HIGH_RISK_BELOW {
        RiskLevel::High
    } else if overall < MEDIUM_RISK_BELOW {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    Ok(AuditScore {
        overall_score: round_one_decimal(overall),
        section_scores: sections,
        total_questions,
        answered_questions,
        completion_percentage: round_one_decimal(completion),
        critical_failures,
        has_critical_failure,
        risk_level,
    })
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
