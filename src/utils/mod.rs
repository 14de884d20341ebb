pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;
pub mod text;

pub use constants::*;
pub use coordinates::{lat_long_to_unit, parse_coordinate, unit_to_lat_long, validate_coordinates};
pub use filename::{generate_default_output_dir, output_file};
pub use progress::ProgressReporter;
pub use text::{decode_text, escape_xml, fixed_field, title_case};
