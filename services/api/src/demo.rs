use crate::infra::{parse_now, InMemoryStoreRepository};
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use store_compliance::compliance::{
    ActionSeverity, Audit, AuditQuestion, AuditReport, AuditResponse, AuditResult, AuditSection,
    AuditTemplate, ComplianceCategory, ComplianceRegisterImporter, ComplianceService,
    DashboardStats, PriorityQueue, RiskRadarView, ScoringConfig, StoreId, StoreSnapshot,
    StoreStatusView,
};
use store_compliance::config::AppConfig;
use store_compliance::error::AppError;

const SAMPLE_SNAPSHOT: &str = "2025-06-01T09:30:00Z";
const SAMPLE_REGISTER: &[u8] =
    include_bytes!("../../../crates/store-compliance/compliance_register.csv");

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Compliance register CSV export
    #[arg(long)]
    pub(crate) register: PathBuf,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = crate::infra::parse_now)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Maximum number of stores listed in the priority queue
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Include per-item status for every store
    #[arg(long)]
    pub(crate) list_items: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to the sample register's snapshot.
    #[arg(long, value_parser = crate::infra::parse_now)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Skip the audit scoring portion of the demo.
    #[arg(long)]
    pub(crate) skip_audit: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        register,
        now,
        limit,
        list_items,
    } = args;

    let config = AppConfig::load()?;
    let now = now.unwrap_or_else(Utc::now);
    let stores = ComplianceRegisterImporter::from_path(&register)?;
    let service = build_service(stores, config.scoring)?;

    println!("Compliance report for {}", register.display());
    render_portfolio(&service, now, limit, list_items)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { now, skip_audit } = args;
    let now = match now {
        Some(now) => now,
        None => sample_snapshot_instant()?,
    };

    let stores = ComplianceRegisterImporter::from_reader(SAMPLE_REGISTER)?;
    let service = build_service(stores, ScoringConfig::default())?;

    println!("Store compliance demo");
    render_portfolio(&service, now, None, true)?;

    if !skip_audit {
        let report = service.submit_audit(&sample_audit(), now)?;
        render_audit(&report);
    }

    Ok(())
}

fn sample_snapshot_instant() -> Result<DateTime<Utc>, AppError> {
    parse_now(SAMPLE_SNAPSHOT).map_err(|message| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, message))
    })
}

fn build_service(
    stores: Vec<StoreSnapshot>,
    scoring: ScoringConfig,
) -> Result<ComplianceService<InMemoryStoreRepository>, AppError> {
    let repository = Arc::new(InMemoryStoreRepository::with_stores(stores));
    Ok(ComplianceService::new(repository, scoring)?)
}

fn render_portfolio(
    service: &ComplianceService<InMemoryStoreRepository>,
    now: DateTime<Utc>,
    limit: Option<usize>,
    list_items: bool,
) -> Result<(), AppError> {
    println!("Evaluated at {}", now.to_rfc3339());

    let stats = service.dashboard(now)?;
    render_dashboard(&stats);

    let statuses = service.portfolio_statuses(now)?;
    render_statuses(&statuses, list_items);

    let queue = service.priority_queue(now, limit)?;
    render_priority_queue(&queue);

    let radar = service.risk_radar(now)?;
    render_radar(&radar);

    Ok(())
}

fn render_dashboard(stats: &DashboardStats) {
    println!("\nPortfolio snapshot");
    println!(
        "- {} stores | {}% compliant",
        stats.total_stores, stats.compliance_rate
    );
    println!(
        "- RED {} | ORANGE {} | GREEN {} | GREY {}",
        stats.red, stats.orange, stats.green, stats.grey
    );
    println!(
        "- Expiring within 7/14/30 days: {}/{}/{}",
        stats.expiring_in_7_days, stats.expiring_in_14_days, stats.expiring_in_30_days
    );
    println!(
        "- {} overdue actions ({} more than a week late)",
        stats.overdue_actions, stats.long_overdue_actions
    );
}

fn render_statuses(statuses: &[StoreStatusView], list_items: bool) {
    println!("\nStore status");
    for view in statuses {
        println!(
            "- {} {} ({}): {}",
            view.store_code, view.store_name, view.zone, view.overall_status
        );
        if list_items {
            for item in &view.items {
                let required = if item.required { "" } else { " [optional]" };
                println!(
                    "    {}{}: {} | {}",
                    item.label, required, item.status, item.expiry
                );
            }
        }
    }
}

fn render_priority_queue(queue: &PriorityQueue) {
    println!(
        "\nInspection priority ({} of {} ranked)",
        queue.stores.len(),
        queue.total_ranked
    );
    for (position, entry) in queue.stores.iter().enumerate() {
        println!(
            "{}. {} {} | score {} | {}",
            position + 1,
            entry.store_code,
            entry.zone,
            entry.priority.score,
            entry.overall_status
        );
        for reason in &entry.priority.reasons {
            println!("    - {reason}");
        }
    }
    for skipped in &queue.skipped {
        println!("! skipped {}: {}", skipped.store_id, skipped.reason);
    }
}

fn render_radar(radar: &RiskRadarView) {
    println!("\nZone risk radar (last {} days)", radar.window_days);
    if radar.zones.is_empty() {
        println!("- No store activity in the current window");
    }
    for zone in &radar.zones {
        println!(
            "- {} | risk {} | {:+} ({}%) | {}",
            zone.zone,
            zone.risk_score,
            zone.trend.delta,
            zone.trend.percentage,
            zone.driving_factors
        );
    }
}

fn render_audit(report: &AuditReport) {
    let score = &report.score;
    println!("\nAudit {} for {}", report.audit_id, report.store_id);
    println!(
        "- Overall {:.1}% | risk {} | {:.1}% complete",
        score.overall_score,
        score.risk_level.label(),
        score.completion_percentage
    );
    for section in &score.section_scores {
        if section.is_scorable() {
            println!(
                "    {} (weight {}): {:.1}%",
                section.name, section.weight, section.score
            );
        } else {
            println!("    {} (weight {}): not scored", section.name, section.weight);
        }
    }
    println!("- {}", report.summary);
    println!(
        "- Store flagged {} with priority floor {}",
        report.store_flag.overall_status, report.store_flag.priority_floor
    );
    if report.requires_escalation {
        println!("- Escalated to the compliance manager");
    }
    for action in &report.corrective_actions {
        println!(
            "    [{}] {} due {}",
            action.severity.label(),
            action.title,
            action.due_date.format("%Y-%m-%d")
        );
    }
}

fn question(id: &str, text: &str, critical: bool) -> AuditQuestion {
    AuditQuestion {
        id: id.to_string(),
        text: text.to_string(),
        critical,
    }
}

fn answer(
    question_id: &str,
    result: AuditResult,
    severity: Option<ActionSeverity>,
) -> AuditResponse {
    AuditResponse {
        question_id: question_id.to_string(),
        result,
        severity,
        notes: None,
    }
}

fn sample_audit() -> Audit {
    let template = AuditTemplate {
        id: "tpl-food-court".to_string(),
        name: "Food Court Safety Walk".to_string(),
        sections: vec![
            AuditSection {
                id: "kitchen".to_string(),
                name: "Kitchen Extraction".to_string(),
                weight: 3,
                category: Some(ComplianceCategory::ExtractionCertificate),
                questions: vec![
                    question("kx1", "Canopy filters clean", true),
                    question("kx2", "Cleaning log signed", false),
                ],
            },
            AuditSection {
                id: "front".to_string(),
                name: "Front of House".to_string(),
                weight: 1,
                category: None,
                questions: vec![
                    question("fh1", "Aisles clear", false),
                    question("fh2", "Signage displayed", false),
                ],
            },
        ],
    };

    Audit {
        id: "demo-audit-fb001".to_string(),
        store_id: StoreId("FB001".to_string()),
        template,
        responses: vec![
            answer("kx1", AuditResult::Yes, None),
            answer("kx2", AuditResult::No, Some(ActionSeverity::Medium)),
            answer("fh1", AuditResult::Yes, None),
            answer("fh2", AuditResult::NotApplicable, None),
        ],
    }
}
