use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scary,
    Chat,
    Tech,
}

impl Category {
    /// Tab order.
    pub const ALL: [Category; 3] = [Category::Scary, Category::Chat, Category::Tech];

    /// Directory name under the articles root and value of the `category` column.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Scary => "scary",
            Category::Chat => "chat",
            Category::Tech => "tech",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Scary => "Scary Stories",
            Category::Chat => "Chat",
            Category::Tech => "Tech",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Scary => "Scary stories go here",
            Category::Chat => "Small talk goes here",
            Category::Tech => "Tech notes go here",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Category::Scary => 0,
            Category::Chat => 1,
            Category::Tech => 2,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown category '{s}' (expected scary, chat or tech)").into())
    }
}
