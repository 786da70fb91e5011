use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Manager,
    Personnel,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Manager => "manager",
            MemberRole::Personnel => "personnel",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "manager" => MemberRole::Manager,
            _ => MemberRole::Personnel,
        }
    }
}
