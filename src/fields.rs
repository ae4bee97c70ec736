//! Enumerations shared by the domain model and the views.
//!
//! `TaskStatus` is the closed status set that decides which kanban column a
//! task lands in. `Variant` and `Theme` are the small tagged lookups the views
//! use for colours.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task status. Each value owns exactly one kanban column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[serde(alias = "Todo")]
    Todo,
    #[serde(alias = "Doing")]
    Doing,
    #[serde(alias = "Done")]
    Done,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }

    /// Next status in board order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::Doing,
            TaskStatus::Doing => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    /// Previous status in board order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::Done,
            TaskStatus::Doing => TaskStatus::Todo,
            TaskStatus::Done => TaskStatus::Doing,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour variant of a kanban column.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Blue,
    Green,
    Red,
}

impl Variant {
    /// Colour used for a status column by default.
    pub fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => Variant::Blue,
            TaskStatus::Doing => Variant::Red,
            TaskStatus::Done => Variant::Green,
        }
    }
}

/// Light or dark colour scheme for alerts and inputs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}
