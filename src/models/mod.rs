// Models module - Database entity representations

pub mod account;
pub mod history;
pub mod student;

pub use account::Account;
pub use history::HistoryEntry;
pub use student::Student;
