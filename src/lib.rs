pub mod image_edit;
pub mod logger;
