//! Persistence split by backing file: the SQLite credential table and the
//! CSV student table.

mod connection;
mod students;
mod users;

pub use connection::{init_schema, open_user_db};
pub use students::{read_students, write_students, HEADER};
pub use users::{register, verify};
