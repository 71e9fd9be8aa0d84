/// Domain layer: requests, locations, configuration and the values they carry
pub mod entities;
pub mod value_objects;
