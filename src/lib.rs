//! `material-table` flattens a directory of Silent Gear material definition documents (JSON)
//! into a single CSV table with one row per material, ready for spreadsheet analysis.
//!
//! The primary entrypoint is [`convert::convert_directory`].
//!
//! ## What goes in
//!
//! Every regular file directly inside the input directory whose name matches `*.json` (the
//! pattern is configurable via [`convert::ConvertOptions`]). A file may hold a single material
//! object or an array of them. Files that fail to parse, documents of any other shape and array
//! elements that are not objects are reported and skipped; the rest of the run is unaffected.
//!
//! ## What comes out
//!
//! A CSV file with a fixed set of 38 columns (see [`schema`]), in this order:
//!
//! - `name` (the `name.translate` key, minus its `material.silentgear.` prefix), `tier`,
//!   `rarity`, `crafting_items`
//! - the main stats (`durability`, `armor/helmet`, `ranged_speed`, ...)
//! - `rod_durability_multiplier`, `rod_rarity`, `rod_ranged_damage_multiplier`
//! - `main_trait_{1..3}` / `main_trait_level_{1..3}`, `main_category_{1..2}`,
//!   `rod_trait_{1..3}` / `rod_trait_level_{1..3}`
//!
//! Anything missing from a document is an empty field. Arrays longer than their slots are cut
//! short and the cut is reported to the observer.
//!
//! ## Quick example
//!
//! ```no_run
//! use material_table::convert::{convert_directory, ConvertOptions};
//!
//! # fn main() -> Result<(), material_table::ConversionError> {
//! let report = convert_directory("materials/", "output.csv", &ConvertOptions::default())?;
//! println!("rows={}", report.records);
//! # Ok(())
//! # }
//! ```
//!
//! Projecting a single item:
//!
//! ```rust
//! use material_table::projection::project;
//! use material_table::types::Cell;
//!
//! let item = serde_json::json!({
//!     "name": {"translate": "material.silentgear.ingot_iron"},
//!     "stats": {"main": {"durability": 250}},
//!     "traits": {"main": [{"name": "silentgear:magnetic", "level": 1}]}
//! });
//! let record = project(&item).unwrap().record;
//! assert_eq!(record.get("name"), Some(&Cell::from("ingot_iron")));
//! assert_eq!(record.get("durability"), Some(&Cell::Int64(250)));
//! assert_eq!(record.get("main_trait_2"), Some(&Cell::Null));
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: unified entrypoints and options
//! - [`source`]: directory listing and JSON parsing
//! - [`projection`]: item → flat record
//! - [`schema`]: the fixed column tables
//! - [`lookup`]: safe nested lookups
//! - [`aggregate`]: ordered record collection and run counts
//! - [`writer`]: CSV output
//! - [`observability`]: diagnostic observers
//! - [`types`], [`error`]

pub mod aggregate;
pub mod convert;
pub mod error;
pub mod lookup;
pub mod observability;
pub mod projection;
pub mod schema;
pub mod source;
pub mod types;
pub mod writer;

pub use error::{ConversionError, ConversionResult};
