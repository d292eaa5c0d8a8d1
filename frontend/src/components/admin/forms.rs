//! 后台表单状态管理
//!
//! 与后台页面一样把零散的 signal 收拢成结构体：
//! - `*Draft` 是纯数据，负责校验和转换，可以直接测试
//! - `*FormState` 持有 signal，负责绑定、重置和编辑回填

use banana_market_shared::protocol::{CategoryForm, ProductForm, SaveCategory, SaveProduct};
use banana_market_shared::{Category, Product};
use leptos::html::Input;
use leptos::prelude::*;

/// 商品表单的原始输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub color: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            color: product.color.clone(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            category: product.category.id.clone(),
        }
    }

    /// 校验必填项和数字字段
    pub fn validate(&self) -> Result<ProductForm, &'static str> {
        let name = self.name.trim();
        let color = self.color.trim();
        let price = self.price.trim();
        let category = self.category.trim();
        if name.is_empty() || color.is_empty() || price.is_empty() || category.is_empty() {
            return Err("Please fill in all fields.");
        }
        if price.parse::<f64>().map_or(true, |p| p < 0.0) {
            return Err("Price must be a number.");
        }
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| "Quantity must be a whole number.")?;

        Ok(ProductForm {
            name: name.to_string(),
            color: color.to_string(),
            price: price.to_string(),
            quantity,
            category: category.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

impl CategoryDraft {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }

    pub fn validate(&self) -> Result<CategoryForm, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Category name is required.");
        }
        Ok(CategoryForm {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// 读取文件输入框中选中的第一个文件
fn selected_file(input: NodeRef<Input>) -> Option<web_sys::File> {
    input.get_untracked()?.files()?.get(0)
}

fn clear_file(input: NodeRef<Input>) {
    if let Some(el) = input.get_untracked() {
        el.set_value("");
    }
}

/// 商品表单状态
///
/// `editing` 为 `Some(id)` 时提交为更新，否则为创建。
#[derive(Clone, Copy)]
pub struct ProductFormState {
    pub name: RwSignal<String>,
    pub color: RwSignal<String>,
    pub price: RwSignal<String>,
    pub quantity: RwSignal<String>,
    pub category: RwSignal<String>,
    pub editing: RwSignal<Option<String>>,
    pub image_input: NodeRef<Input>,
}

impl ProductFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            color: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            quantity: RwSignal::new(String::new()),
            category: RwSignal::new(String::new()),
            editing: RwSignal::new(None),
            image_input: NodeRef::new(),
        }
    }

    fn fill(&self, draft: ProductDraft) {
        self.name.set(draft.name);
        self.color.set(draft.color);
        self.price.set(draft.price);
        self.quantity.set(draft.quantity);
        self.category.set(draft.category);
    }

    pub fn reset(&self) {
        self.fill(ProductDraft::default());
        self.editing.set(None);
        clear_file(self.image_input);
    }

    /// 编辑时回填表单
    pub fn load(&self, product: &Product) {
        self.fill(ProductDraft::from_product(product));
        self.editing.set(Some(product.id.clone()));
    }

    pub fn is_editing(&self) -> bool {
        self.editing.with(Option::is_some)
    }

    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.get_untracked(),
            color: self.color.get_untracked(),
            price: self.price.get_untracked(),
            quantity: self.quantity.get_untracked(),
            category: self.category.get_untracked(),
        }
    }

    pub fn image(&self) -> Option<web_sys::File> {
        selected_file(self.image_input)
    }

    pub fn to_request(&self) -> Result<SaveProduct, &'static str> {
        Ok(SaveProduct {
            id: self.editing.get_untracked(),
            form: self.draft().validate()?,
        })
    }
}

impl Default for ProductFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 分类表单状态
#[derive(Clone, Copy)]
pub struct CategoryFormState {
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub editing: RwSignal<Option<String>>,
    pub image_input: NodeRef<Input>,
}

impl CategoryFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            editing: RwSignal::new(None),
            image_input: NodeRef::new(),
        }
    }

    pub fn reset(&self) {
        self.name.set(String::new());
        self.description.set(String::new());
        self.editing.set(None);
        clear_file(self.image_input);
    }

    pub fn load(&self, category: &Category) {
        let draft = CategoryDraft::from_category(category);
        self.name.set(draft.name);
        self.description.set(draft.description);
        self.editing.set(Some(category.id.clone()));
    }

    pub fn is_editing(&self) -> bool {
        self.editing.with(Option::is_some)
    }

    pub fn image(&self) -> Option<web_sys::File> {
        selected_file(self.image_input)
    }

    pub fn to_request(&self) -> Result<SaveCategory, &'static str> {
        let draft = CategoryDraft {
            name: self.name.get_untracked(),
            description: self.description.get_untracked(),
        };
        Ok(SaveCategory {
            id: self.editing.get_untracked(),
            form: draft.validate()?,
        })
    }
}

impl Default for CategoryFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banana_market_shared::CategoryRef;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: " Cavendish ".into(),
            color: "yellow".into(),
            price: "12000".into(),
            quantity: "8".into(),
            category: "c1".into(),
        }
    }

    #[test]
    fn valid_product_draft_is_trimmed() {
        let form = draft().validate().unwrap();
        assert_eq!(form.name, "Cavendish");
        assert_eq!(form.quantity, 8);
        assert_eq!(form.price, "12000");
    }

    #[test]
    fn product_draft_rejects_missing_and_malformed_fields() {
        let mut missing = draft();
        missing.category.clear();
        assert!(missing.validate().is_err());

        let mut bad_price = draft();
        bad_price.price = "cheap".into();
        assert_eq!(bad_price.validate(), Err("Price must be a number."));

        let mut bad_quantity = draft();
        bad_quantity.quantity = "-1".into();
        assert_eq!(bad_quantity.validate(), Err("Quantity must be a whole number."));
    }

    #[test]
    fn edit_prefill_round_trips_through_validation() {
        let product = Product {
            id: "p1".into(),
            name: "Lady Finger".into(),
            color: "green".into(),
            price: 9.5,
            quantity: 3,
            category: CategoryRef {
                id: "c2".into(),
                name: "Fruit".into(),
            },
            image: "p1.png".into(),
        };
        let form = ProductDraft::from_product(&product).validate().unwrap();
        assert_eq!(form.price, "9.5");
        assert_eq!(form.category, "c2");
    }

    #[test]
    fn category_requires_a_name() {
        assert!(CategoryDraft::default().validate().is_err());
        let form = CategoryDraft {
            name: "Fruit".into(),
            description: "  fresh ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(form.description, "fresh");
    }
}
