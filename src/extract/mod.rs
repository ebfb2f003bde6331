//! Flattening of a received commit into tables.

pub mod category;
pub mod clean;
pub mod element;
pub mod parameters;
pub mod table;

pub use category::{find_category, list_categories, schema_root, Category};
pub use clean::clean;
pub use element::{extract_parameters, ElementRecord};
pub use parameters::list_parameter_names;
pub use table::materialize;
