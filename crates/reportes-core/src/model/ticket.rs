use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three lifecycle states of a maintenance ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
}

impl Status {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Resolved];

    /// Literal stored in the `tickets.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Short label used by the text reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" | "pendiente" => Ok(Self::Pending),
            "in_progress" | "en_proceso" | "doing" => Ok(Self::InProgress),
            "resolved" | "resuelto" | "done" => Ok(Self::Resolved),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// One row of the `tickets` table.
///
/// `status` and `date` are kept as the literal stored text: legacy rows may
/// hold values outside [`Status`] or dates in any of the accepted layouts,
/// and readers must tolerate both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub floor: i64,
    pub office: String,
    pub reporter: String,
    pub reason: String,
    pub status: String,
    pub date: String,
    #[serde(default)]
    pub resolved_by: String,
}

impl Ticket {
    /// Parsed status, or `None` when the stored literal is not recognized.
    #[must_use]
    pub fn parsed_status(&self) -> Option<Status> {
        self.status.parse().ok()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.parsed_status() == Some(Status::Resolved)
    }
}

/// Fields for inserting a new ticket. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub floor: i64,
    pub office: String,
    pub reporter: String,
    pub reason: String,
    pub change: StatusChange,
    pub date: String,
}

impl NewTicket {
    /// Validate free-text fields, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] naming the first blank required field.
    pub fn validated(mut self) -> Result<Self, FieldError> {
        for (name, value) in [
            ("office", &mut self.office),
            ("reporter", &mut self.reporter),
            ("reason", &mut self.reason),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(FieldError::Blank(name));
            }
            *value = trimmed.to_string();
        }
        Ok(self)
    }
}

/// A required text field was empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} must not be empty")]
    Blank(&'static str),
}

/// A validated status assignment with its resolver.
///
/// Moving to [`Status::Resolved`] requires at least one resolver name; moving
/// to any other status clears the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: Status,
    pub resolved_by: String,
}

/// Error returned when a status assignment is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusChangeError {
    #[error("resolved tickets need at least one resolver name")]
    MissingResolver,
}

impl StatusChange {
    /// Build a status assignment.
    ///
    /// # Errors
    ///
    /// Returns [`StatusChangeError::MissingResolver`] when `status` is
    /// resolved and `resolved_by` holds no name.
    pub fn new(status: Status, resolved_by: Option<&str>) -> Result<Self, StatusChangeError> {
        match status {
            Status::Resolved => {
                let names = resolved_by.map(str::trim).unwrap_or_default();
                if names.split(',').all(|part| part.trim().is_empty()) {
                    return Err(StatusChangeError::MissingResolver);
                }
                Ok(Self {
                    status,
                    resolved_by: names.to_string(),
                })
            }
            Status::Pending | Status::InProgress => Ok(Self {
                status,
                resolved_by: String::new(),
            }),
        }
    }

    /// Shorthand for an unresolved status.
    #[must_use]
    pub const fn open(status: Status) -> Self {
        Self {
            status,
            resolved_by: String::new(),
        }
    }
}
