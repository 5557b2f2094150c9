pub mod extract;
pub mod generate;
pub mod templates;
pub mod validate;
