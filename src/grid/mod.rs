pub mod assignment;
pub mod sphere;

pub use assignment::{assign_stations, Assignment};
pub use sphere::{grid_cell_count, SphereGrid};
