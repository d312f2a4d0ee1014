//! CSV import of compliance registers into store snapshots.
//!
//! Category, store type, severity and status labels are resolved to their enum tags here, at
//! ingestion, so scoring never has to interpret free text.

mod parser;

use super::domain::{
    ActionSeverity, ActionStatus, ComplianceCategory, ComplianceItem, CorrectiveAction, StoreId,
    StoreSnapshot, StoreType, VerificationStatus,
};
use parser::{parse_datetime, parse_flag, RegisterRow};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RegisterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, message: String },
    UnknownCategory { line: u64, label: String },
}

impl std::fmt::Display for RegisterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterImportError::Io(err) => write!(f, "failed to read compliance register: {}", err),
            RegisterImportError::Csv(err) => write!(f, "invalid compliance register CSV: {}", err),
            RegisterImportError::InvalidRow { line, message } => {
                write!(f, "register line {}: {}", line, message)
            }
            RegisterImportError::UnknownCategory { line, label } => write!(
                f,
                "register line {}: required item uses unknown category '{}'",
                line, label
            ),
        }
    }
}

impl std::error::Error for RegisterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegisterImportError::Io(err) => Some(err),
            RegisterImportError::Csv(err) => Some(err),
            RegisterImportError::InvalidRow { .. } | RegisterImportError::UnknownCategory { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for RegisterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RegisterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ComplianceRegisterImporter;

impl ComplianceRegisterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<StoreSnapshot>, RegisterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Stores are returned in order of first appearance.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<StoreSnapshot>, RegisterImportError> {
        let mut stores: Vec<StoreSnapshot> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in parser::parse_records(reader)? {
            let line = record.line;
            let row = record.row;
            let updated_at = parse_datetime(&row.updated_at)
                .ok_or_else(|| invalid(line, format!("unreadable updated_at '{}'", row.updated_at)))?;

            let index = match positions.get(&row.store_code) {
                Some(index) => *index,
                None => {
                    let store = store_from_row(line, &row, updated_at)?;
                    positions.insert(row.store_code.clone(), stores.len());
                    stores.push(store);
                    stores.len() - 1
                }
            };

            let store = &mut stores[index];
            if updated_at > store.updated_at {
                store.updated_at = updated_at;
            }

            match row.record.trim().to_ascii_lowercase().as_str() {
                "item" => store.compliance_items.push(item_from_row(line, &row)?),
                "action" => store.corrective_actions.push(action_from_row(line, &row)?),
                other => {
                    return Err(invalid(line, format!("unknown record type '{other}'")));
                }
            }
        }

        Ok(stores)
    }
}

fn store_from_row(
    line: u64,
    row: &RegisterRow,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> Result<StoreSnapshot, RegisterImportError> {
    let store_type = StoreType::from_label(&row.store_type)
        .ok_or_else(|| invalid(line, format!("unknown store type '{}'", row.store_type)))?;
    let high_foot_traffic = parse_flag(row.high_foot_traffic.as_deref())
        .ok_or_else(|| invalid(line, "high_foot_traffic must be true or false".to_string()))?;
    let repeat_offender = parse_flag(row.repeat_offender.as_deref())
        .ok_or_else(|| invalid(line, "repeat_offender must be true or false".to_string()))?;

    Ok(StoreSnapshot {
        id: StoreId(row.store_code.clone()),
        code: row.store_code.clone(),
        name: row.store_name.clone().unwrap_or_else(|| row.store_code.clone()),
        zone: row.zone.clone(),
        store_type,
        high_foot_traffic,
        updated_at,
        repeat_offender,
        red_events: Vec::new(),
        compliance_items: Vec::new(),
        corrective_actions: Vec::new(),
    })
}

fn item_from_row(line: u64, row: &RegisterRow) -> Result<ComplianceItem, RegisterImportError> {
    let label = row
        .category
        .as_deref()
        .ok_or_else(|| invalid(line, "item is missing a category".to_string()))?;
    let required = match row.required.as_deref() {
        None => true,
        some => parse_flag(some)
            .ok_or_else(|| invalid(line, "required must be true or false".to_string()))?,
    };
    let category = match ComplianceCategory::from_label(label) {
        Some(category) => category,
        None if required => {
            return Err(RegisterImportError::UnknownCategory {
                line,
                label: label.to_string(),
            })
        }
        None => ComplianceCategory::Unregistered,
    };
    let has_evidence = parse_flag(row.has_evidence.as_deref())
        .ok_or_else(|| invalid(line, "has_evidence must be true or false".to_string()))?;
    let expiry_date = match row.expiry_date.as_deref() {
        Some(raw) => Some(
            parse_datetime(raw)
                .ok_or_else(|| invalid(line, format!("unreadable expiry_date '{raw}'")))?,
        ),
        None => None,
    };
    let verification_status = match row.verification_status.as_deref() {
        Some(raw) => VerificationStatus::from_label(raw)
            .ok_or_else(|| invalid(line, format!("unknown verification status '{raw}'")))?,
        None => VerificationStatus::NotSubmitted,
    };

    Ok(ComplianceItem {
        category,
        required,
        has_evidence,
        expiry_date,
        verification_status,
    })
}

fn action_from_row(line: u64, row: &RegisterRow) -> Result<CorrectiveAction, RegisterImportError> {
    let severity = row
        .severity
        .as_deref()
        .and_then(ActionSeverity::from_label)
        .ok_or_else(|| invalid(line, "action needs a severity of low, medium, high or critical".to_string()))?;
    let status = match row.action_status.as_deref() {
        Some(raw) => ActionStatus::from_label(raw)
            .ok_or_else(|| invalid(line, format!("unknown action status '{raw}'")))?,
        None => ActionStatus::Open,
    };
    let due_date = row
        .due_date
        .as_deref()
        .and_then(parse_datetime)
        .ok_or_else(|| invalid(line, "action needs a readable due_date".to_string()))?;

    Ok(CorrectiveAction {
        severity,
        status,
        due_date,
    })
}

fn invalid(line: u64, message: String) -> RegisterImportError {
    RegisterImportError::InvalidRow { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    const HEADER: &str = "store_code,store_name,zone,store_type,high_foot_traffic,repeat_offender,updated_at,record,category,required,has_evidence,expiry_date,verification_status,severity,action_status,due_date\n";

    #[test]
    fn importer_groups_rows_by_store() {
        let csv = format!(
            "{HEADER}\
FB001,Harbour Grill,Clock Tower,FB,true,,2025-06-01T08:00:00Z,item,EXTRACTION_CERT,true,false,,,,,\n\
FB001,Harbour Grill,Clock Tower,FB,true,,2025-06-02T08:00:00Z,item,first aid,true,true,2025-06-20,verified,,,\n\
RT010,Sea Threads,Quay 5,retail,false,,2025-06-01T08:00:00Z,action,,,,,,high,in progress,2025-05-20\n\
FB001,Harbour Grill,Clock Tower,FB,true,,2025-06-01T09:00:00Z,action,,,,,,critical,open,2025-05-22\n"
        );

        let stores =
            ComplianceRegisterImporter::from_reader(Cursor::new(csv)).expect("register imports");

        assert_eq!(stores.len(), 2);
        let grill = &stores[0];
        assert_eq!(grill.code, "FB001");
        assert_eq!(grill.store_type, StoreType::FoodAndBeverage);
        assert!(grill.high_foot_traffic);
        assert_eq!(grill.compliance_items.len(), 2);
        assert_eq!(grill.corrective_actions.len(), 1);
        assert_eq!(
            grill.updated_at,
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap()
        );
        assert_eq!(
            grill.compliance_items[1].category,
            ComplianceCategory::FirstAid
        );

        let threads = &stores[1];
        assert_eq!(threads.corrective_actions[0].status, ActionStatus::InProgress);
        assert_eq!(threads.corrective_actions[0].severity, ActionSeverity::High);
    }

    #[test]
    fn importer_rejects_unknown_category_on_required_item() {
        let csv = format!(
            "{HEADER}RT010,Sea Threads,Quay 5,retail,false,,2025-06-01,item,pest control,true,true,,,,,\n"
        );

        match ComplianceRegisterImporter::from_reader(Cursor::new(csv)) {
            Err(RegisterImportError::UnknownCategory { line, label }) => {
                assert_eq!(line, 2);
                assert_eq!(label, "pest control");
            }
            other => panic!("expected unknown category error, got {other:?}"),
        }
    }

    #[test]
    fn importer_tags_unknown_optional_categories_as_unregistered() {
        let csv = format!(
            "{HEADER}RT010,Sea Threads,Quay 5,retail,false,,2025-06-01,item,pest control,false,false,,,,,\n"
        );

        let stores =
            ComplianceRegisterImporter::from_reader(Cursor::new(csv)).expect("register imports");
        assert_eq!(
            stores[0].compliance_items[0].category,
            ComplianceCategory::Unregistered
        );
    }

    #[test]
    fn importer_reports_invalid_actions() {
        let csv = format!(
            "{HEADER}RT010,Sea Threads,Quay 5,retail,false,,2025-06-01,action,,,,,,urgent,open,2025-06-10\n"
        );

        match ComplianceRegisterImporter::from_reader(Cursor::new(csv)) {
            Err(RegisterImportError::InvalidRow { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("severity"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = ComplianceRegisterImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            RegisterImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
