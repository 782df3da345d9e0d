//! Domain records stored by reportes.

pub mod comment;
pub mod office;
pub mod ticket;

pub use comment::Comment;
pub use office::Office;
pub use ticket::{FieldError, NewTicket, ParseEnumError, Status, StatusChange, StatusChangeError, Ticket};
