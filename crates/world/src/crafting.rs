//! Shaped 3x3 crafting with JSON-loadable recipes.
//!
//! A recipe matches a crafting grid only when every cell agrees on presence and
//! kind. Stack sizes inside the grid are irrelevant to matching; claiming a result
//! always takes exactly one unit from each occupied cell.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use voxelwild_core::ItemKind;

/// Number of cells in a crafting grid.
pub const GRID_CELLS: usize = 9;

/// Kinds occupying each crafting cell, row-major.
pub type GridPattern = [Option<ItemKind>; GRID_CELLS];

/// Shaped crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftRecipe {
    /// Unique recipe identifier (e.g., "stone_pickaxe").
    pub id: String,
    /// Required kind per cell; `None` means the cell must be empty.
    pub grid: GridPattern,
    /// Item produced.
    pub result: ItemKind,
    /// Amount produced per claim.
    pub result_count: u32,
}

impl CraftRecipe {
    /// Check whether `inputs` has exactly this recipe's shape.
    pub fn matches(&self, inputs: &GridPattern) -> bool {
        self.grid.iter().zip(inputs.iter()).all(|(want, have)| want == have)
    }
}

/// Ordered recipe list. Earlier recipes win when several match.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<CraftRecipe>,
}

impl RecipeBook {
    /// Create a new empty recipe book.
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
        }
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<CraftRecipe> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;

        let mut book = Self::new();
        for recipe in recipes {
            ensure!(
                recipe.result_count > 0,
                "recipe {} produces nothing",
                recipe.id
            );
            ensure!(
                recipe.grid.iter().any(Option::is_some),
                "recipe {} has an empty grid",
                recipe.id
            );
            book.add_recipe(recipe);
        }

        Ok(book)
    }

    /// Append a recipe. A recipe with an existing id replaces it in place.
    pub fn add_recipe(&mut self, recipe: CraftRecipe) {
        if let Some(existing) = self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            tracing::warn!(id = %recipe.id, "Replacing duplicate recipe");
            *existing = recipe;
        } else {
            self.recipes.push(recipe);
        }
    }

    /// Get a recipe by ID.
    pub fn get(&self, id: &str) -> Option<&CraftRecipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// First recipe whose shape equals `inputs`.
    pub fn find_match(&self, inputs: &GridPattern) -> Option<&CraftRecipe> {
        self.recipes.iter().find(|recipe| recipe.matches(inputs))
    }

    /// All recipes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CraftRecipe> {
        self.recipes.iter()
    }

    /// Count total number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the book has no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipe book with the stock sandbox recipes.
    pub fn with_defaults() -> Self {
        use ItemKind::*;

        const E: Option<ItemKind> = None;
        let s = Some(Stone);
        let d = Some(Diamond);
        let k = Some(Stick);

        let mut book = Self::new();
        let mut recipe = |id: &str, grid: GridPattern, result: ItemKind, count: u32| {
            book.add_recipe(CraftRecipe {
                id: id.to_string(),
                grid,
                result,
                result_count: count,
            })
        };

        recipe("planks", [E, E, E, E, Some(Wood), E, E, E, E], Planks, 4);
        recipe(
            "sticks",
            [E, Some(Planks), E, E, Some(Planks), E, E, E, E],
            Stick,
            4,
        );
        recipe(
            "packed_stone",
            [Some(Dirt), Some(Dirt), Some(Dirt), E, E, E, E, E, E],
            Stone,
            1,
        );
        recipe("stone_pickaxe", [s, s, s, E, k, E, E, k, E], StonePickaxe, 1);
        recipe("diamond_pickaxe", [d, d, d, E, k, E, E, k, E], DiamondPickaxe, 1);
        recipe("stone_sword", [E, s, E, E, s, E, E, k, E], StoneSword, 1);
        recipe("diamond_sword", [E, d, E, E, d, E, E, k, E], DiamondSword, 1);
        recipe("diamond_helmet", [d, d, d, d, E, d, E, E, E], DiamondHelmet, 1);
        recipe(
            "diamond_chestplate",
            [d, E, d, d, d, d, d, d, d],
            DiamondChestplate,
            1,
        );
        recipe("diamond_leggings", [d, d, d, d, E, d, d, E, d], DiamondLeggings, 1);
        recipe("diamond_boots", [E, E, E, d, E, d, d, E, d], DiamondBoots, 1);

        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: Option<ItemKind> = None;

    #[test]
    fn match_requires_exact_presence_and_kind() {
        let book = RecipeBook::with_defaults();
        let stone_row = Some(ItemKind::Dirt);
        let mut grid = [stone_row, stone_row, stone_row, E, E, E, E, E, E];

        let recipe = book.find_match(&grid).expect("packed stone matches");
        assert_eq!(recipe.result, ItemKind::Stone);

        // An extra occupied cell breaks the shape.
        grid[4] = Some(ItemKind::Dirt);
        assert!(book.find_match(&grid).is_none());

        // A different kind in a required cell breaks it too.
        grid[4] = None;
        grid[0] = Some(ItemKind::Grass);
        assert!(book.find_match(&grid).is_none());
    }

    #[test]
    fn shape_is_positional() {
        let book = RecipeBook::with_defaults();
        let dirt = Some(ItemKind::Dirt);
        let shifted = [E, E, E, dirt, dirt, dirt, E, E, E];
        assert!(book.find_match(&shifted).is_none());
    }

    #[test]
    fn first_declared_recipe_wins() {
        let mut book = RecipeBook::new();
        let grid = [E, E, E, E, Some(ItemKind::Wood), E, E, E, E];
        book.add_recipe(CraftRecipe {
            id: "first".into(),
            grid,
            result: ItemKind::Planks,
            result_count: 4,
        });
        book.add_recipe(CraftRecipe {
            id: "second".into(),
            grid,
            result: ItemKind::Stick,
            result_count: 1,
        });

        assert_eq!(book.find_match(&grid).map(|r| r.id.as_str()), Some("first"));
    }

    #[test]
    fn recipes_load_from_json() {
        let json = r#"[
            {"id": "torchless", "grid": [null, null, null, null, "stone", null, null, null, null],
             "result": "diamond", "result_count": 2}
        ]"#;
        let book = RecipeBook::load_from_str(json).expect("valid json");
        assert_eq!(book.len(), 1);
        let recipe = book.get("torchless").expect("present");
        assert_eq!(recipe.result, ItemKind::Diamond);
        assert_eq!(recipe.result_count, 2);
    }

    #[test]
    fn recipes_with_zero_output_are_rejected() {
        let json = r#"[
            {"id": "void", "grid": ["stone", null, null, null, null, null, null, null, null],
             "result": "dirt", "result_count": 0}
        ]"#;
        assert!(RecipeBook::load_from_str(json).is_err());
    }

    #[test]
    fn default_book_has_unique_shapes() {
        let book = RecipeBook::with_defaults();
        let recipes: Vec<_> = book.iter().collect();
        for (i, a) in recipes.iter().enumerate() {
            for b in &recipes[i + 1..] {
                assert_ne!(a.grid, b.grid, "{} and {} share a shape", a.id, b.id);
            }
        }
    }
}
