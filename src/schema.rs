//! The fixed output schema.
//!
//! The column set is declared here as two tables and never changes at runtime:
//!
//! - [`SCALAR_COLUMNS`]: single-valued columns, each read from a key path inside one of the
//!   item's [`SectionId`] sections
//! - [`EXPANSIONS`]: variable-length arrays (traits, categories) spread over a fixed number of
//!   numbered columns, padded with nulls and truncated at the limit
//!
//! [`column_schema`] derives the ordered [`ColumnSchema`] from both tables, and the projector walks
//! the same tables in the same order.

use std::sync::{Arc, LazyLock};

use crate::types::ColumnSchema;

/// Prefix stripped from the `name` column.
pub const NAME_PREFIX: &str = "material.silentgear.";

/// Known top-level sections of an item document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    /// `availability`
    Availability,
    /// `stats.main`
    MainStats,
    /// `stats.rod`
    RodStats,
    /// `name`
    Name,
    /// `crafting_items.main`
    CraftingItems,
}

impl SectionId {
    /// Every section, in resolution order.
    pub const ALL: [SectionId; 5] = [
        Self::Availability,
        Self::MainStats,
        Self::RodStats,
        Self::Name,
        Self::CraftingItems,
    ];

    /// Dot path of the section below the item root.
    pub fn path(self) -> &'static str {
        match self {
            Self::Availability => "availability",
            Self::MainStats => "stats.main",
            Self::RodStats => "stats.rod",
            Self::Name => "name",
            Self::CraftingItems => "crafting_items.main",
        }
    }

    /// Position of this section in [`SectionId::ALL`].
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// A single-valued output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarColumn {
    /// Output column name.
    pub name: &'static str,
    /// Section the value lives in.
    pub section: SectionId,
    /// Keys to follow inside the section. Usually one; two for nested multipliers.
    pub keys: &'static [&'static str],
}

const fn scalar(
    name: &'static str,
    section: SectionId,
    keys: &'static [&'static str],
) -> ScalarColumn {
    ScalarColumn {
        name,
        section,
        keys,
    }
}

/// Shorthand for a column named after its key in `stats.main`.
const fn main_stat(name: &'static [&'static str; 1]) -> ScalarColumn {
    scalar(name[0], SectionId::MainStats, name)
}

/// Single-valued columns, in output order.
pub const SCALAR_COLUMNS: &[ScalarColumn] = &[
    scalar("name", SectionId::Name, &["translate"]),
    scalar("tier", SectionId::Availability, &["tier"]),
    main_stat(&["rarity"]),
    scalar("crafting_items", SectionId::CraftingItems, &["tag"]),
    main_stat(&["charging_value"]),
    main_stat(&["durability"]),
    main_stat(&["armor"]),
    main_stat(&["armor_durability"]),
    main_stat(&["enchantment_value"]),
    main_stat(&["harvest_level"]),
    main_stat(&["harvest_speed"]),
    main_stat(&["melee_damage"]),
    main_stat(&["magic_damage"]),
    main_stat(&["attack_speed"]),
    main_stat(&["armor/helmet"]),
    main_stat(&["armor/chestplate"]),
    main_stat(&["armor/leggings"]),
    main_stat(&["armor/boots"]),
    main_stat(&["armor_toughness"]),
    main_stat(&["ranged_damage"]),
    main_stat(&["ranged_speed"]),
    scalar("rod_durability_multiplier", SectionId::RodStats, &["durability", "mul2"]),
    scalar("rod_rarity", SectionId::RodStats, &["rarity"]),
    scalar("rod_ranged_damage_multiplier", SectionId::RodStats, &["ranged_damage", "mul2"]),
];

/// How a slot column reads its value from one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValue {
    /// A key of the element (the element must be a mapping).
    Key(&'static str),
    /// The element itself.
    Element,
}

/// One column family produced per array element, named `{prefix}_{n}` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotField {
    pub prefix: &'static str,
    pub value: SlotValue,
}

/// Fixed-width expansion of a variable-length array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    /// Dot path of the array below the item root.
    pub list: &'static str,
    /// Number of slots; elements past this are dropped.
    pub limit: usize,
    /// Columns emitted for each slot, in order.
    pub fields: &'static [SlotField],
}

impl Expansion {
    /// Column name for `field` at zero-based slot `idx`.
    pub fn column_name(field: &SlotField, idx: usize) -> String {
        format!("{}_{}", field.prefix, idx + 1)
    }

    /// Column names of this expansion, slot-major.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.limit).flat_map(move |idx| {
            self.fields
                .iter()
                .map(move |field| Self::column_name(field, idx))
        })
    }
}

/// Fixed-width expansions, in output order (after [`SCALAR_COLUMNS`]).
pub const EXPANSIONS: &[Expansion] = &[
    Expansion {
        list: "traits.main",
        limit: 3,
        fields: &[
            SlotField {
                prefix: "main_trait",
                value: SlotValue::Key("name"),
            },
            SlotField {
                prefix: "main_trait_level",
                value: SlotValue::Key("level"),
            },
        ],
    },
    Expansion {
        list: "availability.categories",
        limit: 2,
        fields: &[SlotField {
            prefix: "main_category",
            value: SlotValue::Element,
        }],
    },
    Expansion {
        list: "traits.rod",
        limit: 3,
        fields: &[
            SlotField {
                prefix: "rod_trait",
                value: SlotValue::Key("name"),
            },
            SlotField {
                prefix: "rod_trait_level",
                value: SlotValue::Key("level"),
            },
        ],
    },
];

static COLUMN_SCHEMA: LazyLock<Arc<ColumnSchema>> = LazyLock::new(|| {
    let scalars = SCALAR_COLUMNS.iter().map(|c| c.name.to_string());
    let slots = EXPANSIONS.iter().flat_map(Expansion::column_names);
    Arc::new(ColumnSchema::new(scalars.chain(slots)))
});

/// The shared output schema.
pub fn column_schema() -> Arc<ColumnSchema> {
    Arc::clone(&COLUMN_SCHEMA)
}
