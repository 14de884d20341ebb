pub mod country_reader;
pub mod readings_reader;
pub mod station_reader;

pub use country_reader::{attach_countries, read_countries, Countries};
pub use readings_reader::{ReadingLine, ReadingsReader};
pub use station_reader::StationReader;
