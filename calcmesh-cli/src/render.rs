use calcmesh_core::{LogEntry, protocol::CalculateResponse};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Human readable summary: result line, one row per audit entry, totals.
pub fn calculation_table(response: &CalculateResponse) -> String {
    let mut rows = vec![[
        "#".to_string(),
        "SERVICE".to_string(),
        "HOSTNAME".to_string(),
        "STEP".to_string(),
        "DURATION".to_string(),
    ]];
    for (index, entry) in response.event_log.iter().enumerate() {
        let (hostname, step) = match entry {
            LogEntry::Parse(record) => (record.hostname.clone(), format!("parse: {}", record.result)),
            LogEntry::Operation(e) => (
                e.hostname.clone(),
                format!(
                    "{} {} {} = {}",
                    e.operands.left, e.operation, e.operands.right, e.result
                ),
            ),
        };
        rows.push([
            (index + 1).to_string(),
            entry.service().to_string(),
            hostname,
            step,
            format!("{}ms", entry.duration()),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!(
        "Expression: {}\nResult:     {}\n\n",
        response.expression, response.result
    );
    for row in &rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "\nServices: {}, total duration: {}ms",
        response.metadata.total_services, response.metadata.total_duration
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcmesh_core::{InstanceIdentity, ParseRecord, protocol::Metadata};

    #[test]
    fn test_table_lists_every_entry() {
        let record = ParseRecord::success(&InstanceIdentity::new("parser-service", "p-0"), "4", 2);
        let response = CalculateResponse {
            result: 4.0,
            expression: "4".to_string(),
            event_log: vec![record.into()],
            metadata: Metadata {
                total_services: 1,
                total_duration: 2,
            },
        };

        let table = calculation_table(&response);
        assert!(table.starts_with("Expression: 4\nResult:     4\n"));
        assert!(table.contains("parser-service  p-0"));
        assert!(table.contains("parse: AST generated"));
        assert!(table.ends_with("Services: 1, total duration: 2ms"));
    }
}
