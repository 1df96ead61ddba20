pub mod array;
pub mod errors;
pub mod fieldview_config;
pub mod preview;
pub mod reference;
pub mod schema;
pub mod ui;
pub mod value;
