//! Domain model module declarations.

pub mod form;
pub mod question;
pub mod response;
pub mod results;
pub mod survey;
