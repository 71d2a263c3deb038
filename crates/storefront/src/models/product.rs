//! Product domain types.

use devshop_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// Image used when neither the input nor the category provides one.
pub const PLACEHOLDER_IMAGE: &str = "images/product.svg";

/// Default images for the built-in categories.
const CATEGORY_IMAGES: &[(&str, &str)] = &[
    ("Shoes", "images/sneakers.svg"),
    ("Electronics", "images/headphones.svg"),
    ("Bags", "images/backpack.svg"),
    ("Accessories", "images/sunglasses.svg"),
];

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category label used for filtering.
    pub category: String,
    /// Image reference (relative path or URL).
    pub image: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Raw product form input, before defaulting.
///
/// `id` selects the product to edit; `None` or an unknown id creates a new
/// product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    /// Price as typed; parsed leniently.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// Product fields after trimming and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub description: String,
}

impl ProductInput {
    /// Trim every field and fill in defaults.
    ///
    /// - blank category becomes [`DEFAULT_CATEGORY`]
    /// - blank image comes from [`default_image_for`] the resolved category
    /// - price parse failures become zero
    #[must_use]
    pub fn normalize(&self) -> ProductFields {
        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            other => other.to_string(),
        };
        let image = match self.image.trim() {
            "" => default_image_for(&category).to_string(),
            other => other.to_string(),
        };

        ProductFields {
            name: self.name.trim().to_string(),
            price: Price::parse_lenient(&self.price),
            category,
            image,
            description: self.description.trim().to_string(),
        }
    }
}

impl Product {
    /// Build a product from normalized fields.
    #[must_use]
    pub fn from_fields(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            category: fields.category,
            image: fields.image,
            description: fields.description,
        }
    }

    /// Replace every field except `id`.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = fields.price;
        self.category = fields.category;
        self.image = fields.image;
        self.description = fields.description;
    }

    /// Lowercased text searched by the product filter.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.category).to_lowercase()
    }
}

/// Default image for a category, or [`PLACEHOLDER_IMAGE`] if unknown.
#[must_use]
pub fn default_image_for(category: &str) -> &'static str {
    CATEGORY_IMAGES
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(PLACEHOLDER_IMAGE, |(_, image)| image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_image_for_known_category() {
        assert_eq!(default_image_for("Shoes"), "images/sneakers.svg");
        assert_eq!(default_image_for("Accessories"), "images/sunglasses.svg");
    }

    #[test]
    fn test_default_image_for_unknown_category() {
        assert_eq!(default_image_for("Garden"), PLACEHOLDER_IMAGE);
        // Lookup is case-sensitive
        assert_eq!(default_image_for("shoes"), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_normalize_defaults() {
        let input = ProductInput {
            name: "  Trail Boots ".to_string(),
            price: "abc".to_string(),
            category: "   ".to_string(),
            ..ProductInput::default()
        };
        let fields = input.normalize();
        assert_eq!(fields.name, "Trail Boots");
        assert_eq!(fields.price, Price::ZERO);
        assert_eq!(fields.category, DEFAULT_CATEGORY);
        assert_eq!(fields.image, PLACEHOLDER_IMAGE);
        assert_eq!(fields.description, "");
    }

    #[test]
    fn test_normalize_uses_category_image() {
        let input = ProductInput {
            name: "Tote".to_string(),
            price: "1299".to_string(),
            category: "Bags".to_string(),
            ..ProductInput::default()
        };
        let fields = input.normalize();
        assert_eq!(fields.image, "images/backpack.svg");
        assert_eq!(fields.price, Price::from_units(1299));
    }

    #[test]
    fn test_normalize_keeps_explicit_image() {
        let input = ProductInput {
            category: "Bags".to_string(),
            image: " https://cdn.example/tote.png ".to_string(),
            ..ProductInput::default()
        };
        assert_eq!(input.normalize().image, "https://cdn.example/tote.png");
    }

    #[test]
    fn test_missing_description_deserializes_empty() {
        let json = r#"{"id":"p9","name":"Cap","price":499,"category":"Accessories","image":"x.svg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, Price::from_units(499));
    }

    #[test]
    fn test_search_text() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Aurora Headphones".to_string(),
            price: Price::from_units(3999),
            category: "Electronics".to_string(),
            image: String::new(),
            description: "Over-ear".to_string(),
        };
        assert_eq!(product.search_text(), "aurora headphones over-ear electronics");
    }
}
