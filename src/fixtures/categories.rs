//! Category Fixtures

use serde::Deserialize;

use crate::catalog::Category;

/// Wrapper for categories in YAML
#[derive(Debug, Deserialize)]
pub struct CategoriesFixture {
    /// Category tiles in display order
    pub categories: Vec<CategoryFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Route slug
    pub slug: String,

    /// Tile image
    #[serde(default)]
    pub image: String,
}

impl From<CategoryFixture> for Category {
    fn from(fixture: CategoryFixture) -> Self {
        Category {
            id: fixture.id,
            name: fixture.name,
            slug: fixture.slug,
            image: fixture.image,
        }
    }
}
