use std::fmt;

/// Machine-readable error codes surfaced by the `rp` CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    TicketNotFound,
    InvalidStatus,
    MissingResolver,
    EmptyComment,
    InvalidDate,
    InvalidField,
    OfficeDirectoryUnavailable,
    DuplicateOffice,
    StoreCorrupt,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::TicketNotFound => "E2001",
            Self::InvalidStatus => "E2002",
            Self::MissingResolver => "E2003",
            Self::EmptyComment => "E2004",
            Self::InvalidDate => "E2005",
            Self::InvalidField => "E2006",
            Self::OfficeDirectoryUnavailable => "E3001",
            Self::DuplicateOffice => "E3002",
            Self::StoreCorrupt => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Ticket store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::TicketNotFound => "Ticket not found",
            Self::InvalidStatus => "Invalid ticket status",
            Self::MissingResolver => "Resolved tickets need a resolver",
            Self::EmptyComment => "Comment body is empty",
            Self::InvalidDate => "Unrecognized date format",
            Self::InvalidField => "Invalid ticket field",
            Self::OfficeDirectoryUnavailable => "Office directory unavailable",
            Self::DuplicateOffice => "Office already exists",
            Self::StoreCorrupt => "Corrupt ticket store",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `rp init` to create the ticket store."),
            Self::ConfigParseError => Some("Fix syntax in .reportes/config.toml and retry."),
            Self::TicketNotFound => Some("Use `rp list` to see existing ticket ids."),
            Self::InvalidStatus => Some("Use one of: pending, in_progress, resolved."),
            Self::MissingResolver => Some("Pass --by with one or more comma-separated names."),
            Self::EmptyComment => None,
            Self::InvalidDate => {
                Some("Use dd/mm/yy, dd/mm/yyyy, yyyy-mm-dd, dd-mm-yyyy or dd-mm-yy.")
            }
            Self::InvalidField => None,
            Self::OfficeDirectoryUnavailable => {
                Some("Check [store].offices in .reportes/config.toml or REPORTES_OFFICES_DB.")
            }
            Self::DuplicateOffice => Some("Office names are unique across all floors."),
            Self::StoreCorrupt => Some("Restore tickets.db from a backup."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }

    /// Snake-case identifier used in JSON error payloads.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::ConfigParseError => "config_parse_error",
            Self::TicketNotFound => "ticket_not_found",
            Self::InvalidStatus => "invalid_status",
            Self::MissingResolver => "missing_resolver",
            Self::EmptyComment => "empty_comment",
            Self::InvalidDate => "invalid_date",
            Self::InvalidField => "invalid_field",
            Self::OfficeDirectoryUnavailable => "office_directory_unavailable",
            Self::DuplicateOffice => "duplicate_office",
            Self::StoreCorrupt => "store_corrupt",
            Self::InternalUnexpected => "internal_unexpected",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 12] = [
        ErrorCode::NotInitialized,
        ErrorCode::ConfigParseError,
        ErrorCode::TicketNotFound,
        ErrorCode::InvalidStatus,
        ErrorCode::MissingResolver,
        ErrorCode::EmptyComment,
        ErrorCode::InvalidDate,
        ErrorCode::InvalidField,
        ErrorCode::OfficeDirectoryUnavailable,
        ErrorCode::DuplicateOffice,
        ErrorCode::StoreCorrupt,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn slugs_are_unique_snake_case() {
        let mut seen = HashSet::new();
        for code in ALL {
            let slug = code.slug();
            assert!(seen.insert(slug), "duplicate slug {slug}");
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MissingResolver.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
