pub mod extract_parser;

pub use extract_parser::parse_parcels;
