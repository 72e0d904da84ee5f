pub mod click_handlers;
pub mod shell;
