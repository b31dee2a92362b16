pub mod palette;
pub mod results;
pub mod scan;
pub mod settings;
