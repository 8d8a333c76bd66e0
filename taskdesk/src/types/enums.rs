use serde::{Deserialize, Serialize};

/// Workflow state of a task, sent on the wire as a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "T")]
    Todo,
    #[serde(rename = "I")]
    InProgress,
    #[serde(rename = "D")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn code(self) -> &'static str {
        match self {
            TaskStatus::Todo => "T",
            TaskStatus::InProgress => "I",
            TaskStatus::Done => "D",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for s in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_code(s.code()), Some(s));
        }
        assert_eq!(TaskStatus::from_code("X"), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"D\"");
        let s: TaskStatus = serde_json::from_str("\"I\"").unwrap();
        assert_eq!(s, TaskStatus::InProgress);
    }
}
