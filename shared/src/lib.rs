use serde::{Deserialize, Deserializer, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_KEY_TOKEN: &str = "token";
pub const STORAGE_KEY_ROLE: &str = "role";
pub const STORAGE_KEY_AUTHENTICATED: &str = "isAuthenticated";
pub const STORAGE_KEY_LIKED_PRODUCTS: &str = "likedProducts";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const ROLE_ADMIN: &str = "admin";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// Category reference embedded in a product. The listing endpoints only
/// populate `name`; the admin endpoints also send the id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub category: CategoryRef,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A snapshot of a product taken at the moment it was liked.
///
/// Later edits of the product on the server never reach this copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    pub category_name: String,
    pub image: String,
    pub price: f64,
    pub color: String,
    pub quantity: u32,
}

impl From<&Product> for FavoriteEntry {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category_name: product.category.name.clone(),
            image: product.image.clone(),
            price: product.price,
            color: product.color.clone(),
            quantity: product.quantity,
        }
    }
}

/// The admin form sends the price as free text, the listing endpoints
/// return it as a number. Accept both.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_accepts_string_price_and_missing_fields() {
        let json = r#"{"_id":"p1","name":"Banana","price":"12.5","category":{"name":"Fruit"}}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, 12.5);
        assert_eq!(product.quantity, 0);
        assert_eq!(product.category.name, "Fruit");
        assert!(product.category.id.is_empty());
    }

    #[test]
    fn product_rejects_non_numeric_price() {
        let json = r#"{"_id":"p1","name":"Banana","price":"cheap"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn favorite_snapshot_flattens_category_and_uses_camel_case() {
        let product = Product {
            id: "p1".into(),
            name: "Banana".into(),
            color: "yellow".into(),
            price: 3.0,
            quantity: 7,
            category: CategoryRef {
                id: "c1".into(),
                name: "Fruit".into(),
            },
            image: "banana.png".into(),
        };
        let entry = FavoriteEntry::from(&product);
        assert_eq!(entry.category_name, "Fruit");

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["categoryName"], "Fruit");
        assert_eq!(value["id"], "p1");
    }
}
