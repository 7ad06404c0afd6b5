pub mod badge;
pub mod csv;
pub mod field;
pub mod template;
