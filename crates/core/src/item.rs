//! Item system - blocks, tools, armor and food share one kind enumeration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every block and item the sandbox knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Dirt block
    Dirt,
    /// Grass-topped dirt block
    Grass,
    /// Water (placeable, not solid)
    Water,
    /// Unbreakable floor block
    Bedrock,
    /// Stone block
    Stone,
    /// Tree trunk block
    Wood,
    /// Tree canopy block
    Leaves,
    /// Diamond ore
    Diamond,
    /// Planks crafted from wood
    Planks,
    /// Stick crafted from planks
    Stick,
    /// Raw beef (dropped by cows)
    Beef,
    /// Raw pork (dropped by pigs)
    Pork,
    /// Stone pickaxe
    StonePickaxe,
    /// Diamond pickaxe
    DiamondPickaxe,
    /// Stone sword
    StoneSword,
    /// Diamond sword
    DiamondSword,
    /// Diamond helmet
    DiamondHelmet,
    /// Diamond chestplate
    DiamondChestplate,
    /// Diamond leggings
    DiamondLeggings,
    /// Diamond boots
    DiamondBoots,
}

impl ItemKind {
    /// All kinds in declaration order.
    pub const ALL: [ItemKind; 20] = [
        ItemKind::Dirt,
        ItemKind::Grass,
        ItemKind::Water,
        ItemKind::Bedrock,
        ItemKind::Stone,
        ItemKind::Wood,
        ItemKind::Leaves,
        ItemKind::Diamond,
        ItemKind::Planks,
        ItemKind::Stick,
        ItemKind::Beef,
        ItemKind::Pork,
        ItemKind::StonePickaxe,
        ItemKind::DiamondPickaxe,
        ItemKind::StoneSword,
        ItemKind::DiamondSword,
        ItemKind::DiamondHelmet,
        ItemKind::DiamondChestplate,
        ItemKind::DiamondLeggings,
        ItemKind::DiamondBoots,
    ];

    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemKind::Dirt => "dirt",
            ItemKind::Grass => "grass",
            ItemKind::Water => "water",
            ItemKind::Bedrock => "bedrock",
            ItemKind::Stone => "stone",
            ItemKind::Wood => "wood",
            ItemKind::Leaves => "leaves",
            ItemKind::Diamond => "diamond",
            ItemKind::Planks => "planks",
            ItemKind::Stick => "stick",
            ItemKind::Beef => "beef",
            ItemKind::Pork => "pork",
            ItemKind::StonePickaxe => "stone_pickaxe",
            ItemKind::DiamondPickaxe => "diamond_pickaxe",
            ItemKind::StoneSword => "stone_sword",
            ItemKind::DiamondSword => "diamond_sword",
            ItemKind::DiamondHelmet => "diamond_helmet",
            ItemKind::DiamondChestplate => "diamond_chestplate",
            ItemKind::DiamondLeggings => "diamond_leggings",
            ItemKind::DiamondBoots => "diamond_boots",
        }
    }

    /// Parse an item kind from a string key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    /// Block damage needed to break this kind when it stands in the world.
    ///
    /// `None` means it cannot be harvested at all.
    pub const fn hardness(self) -> Option<u32> {
        match self {
            ItemKind::Dirt | ItemKind::Grass | ItemKind::Leaves => Some(2),
            ItemKind::Wood | ItemKind::Planks => Some(3),
            ItemKind::Stone => Some(6),
            ItemKind::Diamond => Some(12),
            _ => None,
        }
    }

    /// Item handed to the player when a block of this kind breaks.
    pub const fn harvest_drop(self) -> ItemKind {
        match self {
            ItemKind::Grass => ItemKind::Dirt,
            other => other,
        }
    }
}

/// Equipment slot an armor piece occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    /// Head
    Helmet,
    /// Torso
    Chestplate,
    /// Legs
    Leggings,
    /// Feet
    Boots,
}

impl ArmorSlot {
    /// All slots in display order.
    pub const ALL: [ArmorSlot; 4] = [
        ArmorSlot::Helmet,
        ArmorSlot::Chestplate,
        ArmorSlot::Leggings,
        ArmorSlot::Boots,
    ];

    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            ArmorSlot::Helmet => "helmet",
            ArmorSlot::Chestplate => "chestplate",
            ArmorSlot::Leggings => "leggings",
            ArmorSlot::Boots => "boots",
        }
    }

    /// Position of this slot inside [`ArmorSlot::ALL`].
    pub const fn index(self) -> usize {
        match self {
            ArmorSlot::Helmet => 0,
            ArmorSlot::Chestplate => 1,
            ArmorSlot::Leggings => 2,
            ArmorSlot::Boots => 3,
        }
    }
}

/// What a tool is good at hitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// Mining blocks
    Block,
    /// Hitting creatures
    Entity,
}

/// Capability of an item kind, resolved once when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemCapability {
    /// Can be placed into the world as a block.
    Placeable,
    /// Crafting ingredient only.
    Material,
    /// Wearable armor piece.
    Armor {
        /// Slot the piece fits.
        slot: ArmorSlot,
        /// Armor points granted while worn.
        value: f32,
    },
    /// Tool with a damage bonus against one target class.
    Tool {
        /// What the tool is effective against.
        damage_kind: DamageKind,
        /// Damage dealt to that target class.
        amount: u32,
    },
    /// Food eaten over a fixed duration.
    Consumable {
        /// How long eating takes.
        eat_seconds: f32,
        /// Hit points restored when finished.
        nourishment: u32,
    },
}

/// Damage dealt by a bare hand or by a tool against the wrong target class.
pub const BARE_HAND_DAMAGE: u32 = 1;

/// Lookup table from item kind to capability.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    capabilities: HashMap<ItemKind, ItemCapability>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ItemCatalog {
    /// Create a catalog from an explicit table. Kinds not listed default to [`ItemCapability::Material`].
    pub fn new(capabilities: HashMap<ItemKind, ItemCapability>) -> Self {
        Self { capabilities }
    }

    /// Catalog with the stock sandbox stats.
    pub fn with_defaults() -> Self {
        use ItemCapability::*;

        let mut capabilities = HashMap::new();
        for kind in [
            ItemKind::Dirt,
            ItemKind::Grass,
            ItemKind::Water,
            ItemKind::Stone,
            ItemKind::Wood,
            ItemKind::Diamond,
            ItemKind::Planks,
        ] {
            capabilities.insert(kind, Placeable);
        }
        capabilities.insert(ItemKind::Bedrock, Material);
        capabilities.insert(ItemKind::Leaves, Material);
        capabilities.insert(ItemKind::Stick, Material);

        let food = Consumable {
            eat_seconds: 1.6,
            nourishment: 4,
        };
        capabilities.insert(ItemKind::Beef, food);
        capabilities.insert(ItemKind::Pork, food);

        let tool = |damage_kind, amount| Tool {
            damage_kind,
            amount,
        };
        capabilities.insert(ItemKind::StonePickaxe, tool(DamageKind::Block, 4));
        capabilities.insert(ItemKind::DiamondPickaxe, tool(DamageKind::Block, 8));
        capabilities.insert(ItemKind::StoneSword, tool(DamageKind::Entity, 5));
        capabilities.insert(ItemKind::DiamondSword, tool(DamageKind::Entity, 8));

        let armor = |slot, value| Armor { slot, value };
        capabilities.insert(ItemKind::DiamondHelmet, armor(ArmorSlot::Helmet, 10.0));
        capabilities.insert(
            ItemKind::DiamondChestplate,
            armor(ArmorSlot::Chestplate, 18.0),
        );
        capabilities.insert(ItemKind::DiamondLeggings, armor(ArmorSlot::Leggings, 14.0));
        capabilities.insert(ItemKind::DiamondBoots, armor(ArmorSlot::Boots, 8.0));

        Self { capabilities }
    }

    /// Capability of `kind`.
    pub fn capability(&self, kind: ItemKind) -> ItemCapability {
        self.capabilities
            .get(&kind)
            .copied()
            .unwrap_or(ItemCapability::Material)
    }

    /// Armor points granted by `kind` (0 for non-armor).
    pub fn armor_value(&self, kind: ItemKind) -> f32 {
        match self.capability(kind) {
            ItemCapability::Armor { value, .. } => value,
            _ => 0.0,
        }
    }

    /// Slot `kind` is worn in, if it is armor.
    pub fn armor_slot(&self, kind: ItemKind) -> Option<ArmorSlot> {
        match self.capability(kind) {
            ItemCapability::Armor { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Damage dealt to blocks when holding `kind`.
    pub fn block_damage(&self, kind: Option<ItemKind>) -> u32 {
        self.tool_damage(kind, DamageKind::Block)
    }

    /// Damage dealt to creatures when holding `kind`.
    pub fn entity_damage(&self, kind: Option<ItemKind>) -> u32 {
        self.tool_damage(kind, DamageKind::Entity)
    }

    fn tool_damage(&self, kind: Option<ItemKind>, target: DamageKind) -> u32 {
        match kind.map(|kind| self.capability(kind)) {
            Some(ItemCapability::Tool {
                damage_kind,
                amount,
            }) if damage_kind == target => amount,
            _ => BARE_HAND_DAMAGE,
        }
    }

    /// Whether `kind` can be placed as a block.
    pub fn is_placeable(&self, kind: ItemKind) -> bool {
        matches!(self.capability(kind), ItemCapability::Placeable)
    }

    /// Eating duration and nourishment, if `kind` is food.
    pub fn consumable(&self, kind: ItemKind) -> Option<(f32, u32)> {
        match self.capability(kind) {
            ItemCapability::Consumable {
                eat_seconds,
                nourishment,
            } => Some((eat_seconds, nourishment)),
            _ => None,
        }
    }
}
