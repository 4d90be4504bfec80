//! MBOX scanning: the streaming line scanner and the `Date:` header parser.

pub mod date;
pub mod mbox;
