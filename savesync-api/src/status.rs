use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr, EnumString};

/// lifecycle shared by snapshots and jobs
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    StrumAsRefStr, EnumString,
    Serialize, Deserialize
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failed,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Failed)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn terminal_states() {
        assert!(!Status::Pending.is_terminal());
        assert!(!Status::Running.is_terminal());
        assert!(Status::Success.is_terminal());
        assert!(Status::Failed.is_terminal());
    }

    #[test]
    fn wire_names() {
        let given: Status = serde_json::from_str("\"running\"").unwrap();

        assert_eq!(given, Status::Running);
        assert_eq!(Status::from_str("failed").unwrap(), Status::Failed);
        assert_eq!(Status::Success.to_string(), "success");
    }
}
