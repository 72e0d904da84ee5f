pub mod dom;
pub mod url;
