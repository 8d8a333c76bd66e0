use std::io::Write;

use serde::Serialize;
use serde_json::json;

use taskdesk::format::format_date;
use taskdesk::{ListState, Project, Role, Task, User};

use crate::error::CliError;

/// An entity that can be printed as one table row.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "ROLE", "POSITION", "LEVEL", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_code.clone(),
            self.full_name.clone(),
            self.email.clone(),
            Role::from_id(self.role_id).to_string(),
            or_na(self.position_code.as_deref()),
            or_na(self.level_code.as_deref()),
            format_date(self.created_at.as_deref()),
        ]
    }
}

impl TableRow for Project {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "OWNER", "TASKS", "CREATED", "DELETABLE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.project_code.clone(),
            self.name.clone(),
            or_na(self.owner_name.as_deref()),
            self.task_count.unwrap_or(0).to_string(),
            format_date(self.created_at.as_deref()),
            if self.can_delete() { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl TableRow for Task {
    const HEADERS: &'static [&'static str] = &[
        "ID", "TITLE", "STATUS", "PRIORITY", "PROJECT", "ASSIGNEE", "UPDATED",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.task_code.clone(),
            self.title.clone(),
            self.status_name().to_string(),
            or_na(self.priority.as_deref()),
            or_na(self.project_name.as_deref()),
            or_na(self.assignee_name.as_deref()),
            format_date(self.updated_at.as_deref()),
        ]
    }
}

/// Print the visible page of a list view.
pub fn write_page<W: Write, T: TableRow>(
    writer: &mut W,
    state: &ListState<T>,
    json_mode: bool,
) -> Result<(), CliError> {
    if json_mode {
        let body = json!({
            "items": state.items,
            "page": state.current_page,
            "total_pages": state.total_pages,
            "total_items": state.total_items,
            "search": state.debounced_search,
            "filter": state.extra_filter,
            "error": state.error,
        });
        serde_json::to_writer(&mut *writer, &body)?;
        writeln!(writer)?;
        writer.flush()?;
        return Ok(());
    }

    if let Some(err) = &state.error {
        writeln!(writer, "error: {err}")?;
    }
    writeln!(writer, "{}", T::HEADERS.join("\t"))?;
    for item in &state.items {
        writeln!(writer, "{}", item.cells().join("\t"))?;
    }
    if state.items.is_empty() {
        writeln!(writer, "(no results)")?;
    }
    writeln!(
        writer,
        "-- page {} of {}, {} items{} --",
        state.current_page,
        state.total_pages,
        state.total_items,
        if state.loading { ", loading" } else { "" }
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(code: &str, status: &str) -> Task {
        serde_json::from_value(json!({
            "id": 1,
            "task_code": code,
            "title": "Write docs",
            "status": status,
            "priority": "H"
        }))
        .unwrap()
    }

    fn state(items: Vec<Task>) -> ListState<Task> {
        let mut state = ListState::new(10, None);
        state.total_items = items.len() as u64;
        state.items = items;
        state
    }

    #[test]
    fn test_table_output() {
        let mut out = Vec::new();
        write_page(&mut out, &state(vec![task("TSK-1", "I")]), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID\tTITLE\tSTATUS\tPRIORITY\tPROJECT\tASSIGNEE\tUPDATED");
        assert_eq!(lines[1], "TSK-1\tWrite docs\tIn Progress\tH\tN/A\tN/A\tN/A");
        assert_eq!(lines[2], "-- page 1 of 1, 1 items --");
    }

    #[test]
    fn test_error_banner_and_empty_list() {
        let mut s = state(Vec::new());
        s.error = Some("Server unavailable".into());
        let mut out = Vec::new();
        write_page(&mut out, &s, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("error: Server unavailable\n"));
        assert!(text.contains("(no results)"));
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        write_page(&mut out, &state(vec![task("TSK-2", "D")]), true).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["items"][0]["task_code"], "TSK-2");
        assert_eq!(v["total_pages"], 1);
        assert!(v["error"].is_null());
    }
}
