pub mod admin_handler;
pub mod blog_handler;
pub mod public_handler;
pub mod user_handler;
