use chrono::{DateTime, Local};
use testmate_core::{TurnRecord, UseCaseCatalog};

const PREVIEW_CHARS: usize = 60;

/// Shorten text to one line for tabular display.
pub fn preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let truncated: String = single_line.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

/// Render a stored timestamp in local time; unparsable values are shown raw.
pub fn format_timestamp(record: &TurnRecord) -> String {
    record
        .parsed_timestamp()
        .map(|ts| {
            DateTime::<Local>::from(ts)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| record.timestamp.clone())
}

/// One numbered line per record, in the order given.
pub fn history_table(records: &[TurnRecord], catalog: &UseCaseCatalog) -> String {
    if records.is_empty() {
        return "No chat history found".to_string();
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "{:>3}. [{}] {}\n     Q: {}\n     A: {}",
                i + 1,
                format_timestamp(record),
                catalog.title_for(&record.use_case),
                preview(&record.question, PREVIEW_CHARS),
                preview(&record.response.text(), PREVIEW_CHARS),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn use_case_list(catalog: &UseCaseCatalog, active: &str) -> String {
    catalog
        .iter()
        .map(|uc| {
            let marker = if uc.id == active { "*" } else { " " };
            format!("{} {:<12} {} - {}", marker, uc.id, uc.title, uc.objective)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
