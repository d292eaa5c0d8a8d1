//! REST request catalogue.
//!
//! Every endpoint the storefront talks to is described by one type that
//! implements [`ApiRequest`]. The frontend client turns these into HTTP
//! calls; nothing here knows about the browser.

use crate::{Category, Product, User};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request body shape.
///
/// `Form` is sent as `multipart/form-data`; the client may append a file
/// part next to these text fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(&'static str, String)>),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// Whether the call must carry `Authorization: Bearer <token>`.
    const AUTHENTICATED: bool = false;

    fn method(&self) -> HttpMethod;
    /// The URL path including any query string.
    fn path(&self) -> String;
    fn payload(&self) -> Payload {
        Payload::Empty
    }
}

fn with_query(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            query.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{}?{}", path, query.finish())
    } else {
        path.to_string()
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        "/login".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Json(serde_json::json!({ "email": self.email, "password": self.password }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = TokenResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        "/register".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Json(serde_json::json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        }))
    }
}

// =========================================================
// Catalogue (public)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl ProductPage {
    /// Number of pages for the given page size. An empty catalogue still has one page.
    pub fn total_pages(&self, limit: u32) -> u32 {
        let total = self.total.unwrap_or(self.products.len() as u64);
        if limit == 0 || total == 0 {
            return 1;
        }
        total.div_ceil(u64::from(limit)) as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

/// Product listing. Every filter is optional; unset filters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListProducts {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub name: Option<String>,
    pub category: Option<String>,
}

impl ListProducts {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            name: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn in_category(category_id: impl Into<String>) -> Self {
        Self {
            category: Some(category_id.into()),
            ..Self::default()
        }
    }
}

impl ApiRequest for ListProducts {
    type Response = ProductPage;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        with_query(
            "/products",
            &[
                ("page", self.page.map(|p| p.to_string())),
                ("limit", self.limit.map(|l| l.to_string())),
                ("name", self.name.clone()),
                ("category", self.category.clone()),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListCategories;

impl ApiRequest for ListCategories {
    type Response = CategoryList;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        "/categories".to_string()
    }
}

// =========================================================
// Admin
// =========================================================

/// Full product list as seen by the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdminListProducts;

impl ApiRequest for AdminListProducts {
    type Response = ProductPage;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        "/products".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdminListCategories;

impl ApiRequest for AdminListCategories {
    type Response = CategoryList;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        "/categories".to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub color: String,
    pub price: String,
    pub quantity: u32,
    /// Category id.
    pub category: String,
}

/// Create (`id == None`) or update a product.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveProduct {
    pub id: Option<String>,
    pub form: ProductForm,
}

impl ApiRequest for SaveProduct {
    type Response = IgnoredAny;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        if self.id.is_some() {
            HttpMethod::Put
        } else {
            HttpMethod::Post
        }
    }

    fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("/products/{}", id),
            None => "/products".to_string(),
        }
    }

    fn payload(&self) -> Payload {
        Payload::Form(vec![
            ("name", self.form.name.clone()),
            ("color", self.form.color.clone()),
            ("price", self.form.price.clone()),
            ("quantity", self.form.quantity.to_string()),
            ("category", self.form.category.clone()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteProduct {
    pub id: String,
}

impl ApiRequest for DeleteProduct {
    type Response = IgnoredAny;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }

    fn path(&self) -> String {
        format!("/products/{}", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

/// Create (`id == None`) or update a category.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCategory {
    pub id: Option<String>,
    pub form: CategoryForm,
}

impl ApiRequest for SaveCategory {
    type Response = IgnoredAny;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        if self.id.is_some() {
            HttpMethod::Put
        } else {
            HttpMethod::Post
        }
    }

    fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("/categories/{}", id),
            None => "/categories".to_string(),
        }
    }

    fn payload(&self) -> Payload {
        Payload::Form(vec![
            ("name", self.form.name.clone()),
            ("description", self.form.description.clone()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategory {
    pub id: String,
}

impl ApiRequest for DeleteCategory {
    type Response = IgnoredAny;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }

    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListUsers;

impl ApiRequest for ListUsers {
    type Response = Vec<User>;
    const AUTHENTICATED: bool = true;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_products_builds_query_from_set_filters_only() {
        assert_eq!(ListProducts::default().path(), "/products");
        assert_eq!(ListProducts::page(2, 3).path(), "/products?page=2&limit=3");
        assert_eq!(
            ListProducts::in_category("c 1").path(),
            "/products?category=c+1"
        );
        assert_eq!(
            ListProducts::search("green & ripe").path(),
            "/products?name=green+%26+ripe"
        );
    }

    #[test]
    fn save_product_switches_between_create_and_update() {
        let create = SaveProduct {
            id: None,
            form: ProductForm::default(),
        };
        assert_eq!(create.method(), HttpMethod::Post);
        assert_eq!(create.path(), "/products");

        let update = SaveProduct {
            id: Some("42".into()),
            ..create
        };
        assert_eq!(update.method(), HttpMethod::Put);
        assert_eq!(update.path(), "/products/42");
        assert!(SaveProduct::AUTHENTICATED);
    }

    #[test]
    fn total_pages_rounds_up_and_never_reports_zero() {
        let page = ProductPage {
            products: Vec::new(),
            total: Some(7),
        };
        assert_eq!(page.total_pages(3), 3);
        assert_eq!(ProductPage::default().total_pages(3), 1);
    }

    #[test]
    fn public_endpoints_do_not_require_a_token() {
        assert!(!LoginRequest::AUTHENTICATED);
        assert!(!ListProducts::AUTHENTICATED);
        assert!(ListUsers::AUTHENTICATED);
    }
}
