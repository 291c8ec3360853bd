pub mod catalog;
pub mod context;
pub mod export;

pub use context::generate_ai_context;
pub use export::{ blueprint_filename, generate_blueprint_markdown, generate_export_json };
