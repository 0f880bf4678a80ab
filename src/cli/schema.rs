//! Schema command

use abi_data::SCHEMA_DESCRIPTION;

/// Print the table layout the business tools query
pub fn run() {
    println!("{SCHEMA_DESCRIPTION}");
}
