#![forbid(unsafe_code)]
//! reportes-stats library.
//!
//! Pure aggregation over ticket rows: name credit splitting, tolerant date
//! parsing, rankings, monthly/daily trends and the employee-of-the-month
//! computation. Nothing here touches the store or reads the clock; callers
//! pass "today" explicitly.

pub mod date;
pub mod engine;
pub mod locale;
pub mod names;
pub mod rank;

pub use engine::TicketSet;
pub use locale::MonthLocale;
pub use rank::RankedBucket;
