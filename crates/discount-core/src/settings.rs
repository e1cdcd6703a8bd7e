//! # Settings Page
//!
//! Describes the admin "Discounts" settings page as data, and implements the
//! save action behind it. Rendering is the host's job.
//!
//! ## Page Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Discounts                                     (page: custom_discount)  │
//! │                                                                         │
//! │  Category Discounts                                                     │
//! │  ├── Select Categories      [multi-select]  custom_discount_categories  │
//! │  └── Category Discount (%)  [0..100]        custom_discount_percentage  │
//! │                                                                         │
//! │  Product Discounts                                                      │
//! │  ├── Select Products        [multi-select]  custom_discount_products    │
//! │  └── Product Discount (%)   [0..100]  custom_discount_product_percentage│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::config::DiscountConfig;
use crate::error::CoreResult;
use crate::store::SettingsStore;
use crate::types::{CategoryId, ProductId};
use crate::validation::{parse_id_list, parse_percentage_input};

// =============================================================================
// Identifiers
// =============================================================================

/// Settings page id.
pub const PAGE_ID: &str = "custom_discount";

/// Settings page tab label.
pub const PAGE_LABEL: &str = "Discounts";

/// Selected category ids.
pub const OPTION_CATEGORIES: &str = "custom_discount_categories";

/// Category discount percentage.
pub const OPTION_CATEGORY_PERCENT: &str = "custom_discount_percentage";

/// Selected product ids.
pub const OPTION_PRODUCTS: &str = "custom_discount_products";

/// Product discount percentage.
pub const OPTION_PRODUCT_PERCENT: &str = "custom_discount_product_percentage";

const CATEGORY_SECTION_ID: &str = "custom_discount_category_title";
const PRODUCT_SECTION_ID: &str = "custom_discount_product_title";

// =============================================================================
// Schema Types
// =============================================================================

/// One entry of a multi-select (catalog id and display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub id: u64,
    pub name: String,
}

impl SelectOption {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        SelectOption {
            id,
            name: name.into(),
        }
    }
}

/// The input widget of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    /// Searchable multi-select.
    Multiselect { options: Vec<SelectOption> },
    /// Numeric input with bounds.
    Number { min: u32, max: u32, step: u32 },
}

/// A single persisted setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingField {
    /// Settings store key the value is saved under.
    pub id: String,
    pub title: String,
    /// Help text shown as a tooltip.
    pub description: String,
    pub kind: FieldKind,
    /// Default value as the form shows it.
    pub default: Option<String>,
}

/// A titled group of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsSection {
    pub id: String,
    pub title: String,
    pub fields: Vec<SettingField>,
}

/// The full settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsPage {
    pub id: String,
    pub label: String,
    pub sections: Vec<SettingsSection>,
}

impl SettingsPage {
    /// Iterates all fields in display order.
    pub fn fields(&self) -> impl Iterator<Item = &SettingField> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    /// Finds a field by its settings key.
    pub fn field(&self, id: &str) -> Option<&SettingField> {
        self.fields().find(|field| field.id == id)
    }
}

/// Builds the settings page for the given catalog choices.
///
/// The category section always comes first.
///
/// ## Example
/// ```rust
/// use discount_core::settings::{settings_page, SelectOption};
///
/// let page = settings_page(
///     vec![SelectOption::new(3, "Shoes")],
///     vec![SelectOption::new(12, "Red Sneaker")],
/// );
/// assert_eq!(page.id, "custom_discount");
/// assert_eq!(page.fields().count(), 4);
/// ```
pub fn settings_page(categories: Vec<SelectOption>, products: Vec<SelectOption>) -> SettingsPage {
    SettingsPage {
        id: PAGE_ID.to_string(),
        label: PAGE_LABEL.to_string(),
        sections: vec![
            SettingsSection {
                id: CATEGORY_SECTION_ID.to_string(),
                title: "Category Discounts".to_string(),
                fields: vec![
                    multiselect_field(
                        OPTION_CATEGORIES,
                        "Select Categories",
                        "Apply discount to these categories",
                        categories,
                    ),
                    percent_field(OPTION_CATEGORY_PERCENT, "Category Discount (%)"),
                ],
            },
            SettingsSection {
                id: PRODUCT_SECTION_ID.to_string(),
                title: "Product Discounts".to_string(),
                fields: vec![
                    multiselect_field(
                        OPTION_PRODUCTS,
                        "Select Products",
                        "Apply discount to specific products",
                        products,
                    ),
                    percent_field(OPTION_PRODUCT_PERCENT, "Product Discount (%)"),
                ],
            },
        ],
    }
}

fn multiselect_field(
    id: &str,
    title: &str,
    description: &str,
    options: Vec<SelectOption>,
) -> SettingField {
    SettingField {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        kind: FieldKind::Multiselect { options },
        default: None,
    }
}

fn percent_field(id: &str, title: &str) -> SettingField {
    SettingField {
        id: id.to_string(),
        title: title.to_string(),
        description: "Enter a value from 0 to 100.".to_string(),
        kind: FieldKind::Number {
            min: 0,
            max: 100,
            step: 1,
        },
        default: Some("0".to_string()),
    }
}

// =============================================================================
// Save Action
// =============================================================================

/// Raw form values as posted by the settings page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsSubmission {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub category_percentage: String,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub product_percentage: String,
}

impl SettingsSubmission {
    /// Validates the form into a config without touching any store.
    pub fn parse(&self) -> CoreResult<DiscountConfig> {
        Ok(DiscountConfig {
            category_ids: parse_id_list(OPTION_CATEGORIES, &self.categories)?
                .into_iter()
                .map(CategoryId)
                .collect(),
            category_discount: parse_percentage_input(
                OPTION_CATEGORY_PERCENT,
                &self.category_percentage,
            )?,
            product_ids: parse_id_list(OPTION_PRODUCTS, &self.products)?
                .into_iter()
                .map(ProductId)
                .collect(),
            product_discount: parse_percentage_input(
                OPTION_PRODUCT_PERCENT,
                &self.product_percentage,
            )?,
        })
    }
}

/// Handles the settings page save action.
///
/// ## Flow
/// ```text
/// Admin clicks "Save changes"
///      │
///      ▼
/// submission.parse() ── invalid? ──► Err (store untouched)
///      │
///      ▼
/// config.write_to(store)   (all four keys)
///      │
///      ▼
/// Ok(config)
/// ```
pub fn save_settings(
    store: &dyn SettingsStore,
    submission: &SettingsSubmission,
) -> CoreResult<DiscountConfig> {
    let config = submission.parse()?;
    config.write_to(store);

    info!(
        categories = config.category_ids.len(),
        category_pct = config.category_discount.percentage(),
        products = config.product_ids.len(),
        product_pct = config.product_discount.percentage(),
        "Discount settings saved"
    );

    Ok(config)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::store::InMemorySettingsStore;
    use crate::types::DiscountPercent;
    use serde_json::json;

    fn submission() -> SettingsSubmission {
        SettingsSubmission {
            categories: vec!["3".to_string(), "4".to_string()],
            category_percentage: "10".to_string(),
            products: vec!["12".to_string()],
            product_percentage: "25".to_string(),
        }
    }

    #[test]
    fn test_page_layout() {
        let page = settings_page(
            vec![SelectOption::new(3, "Shoes"), SelectOption::new(4, "Hats")],
            vec![SelectOption::new(12, "Red Sneaker")],
        );

        assert_eq!(page.id, PAGE_ID);
        assert_eq!(page.label, "Discounts");
        assert_eq!(page.sections.len(), 2);
        assert_eq!(page.sections[0].title, "Category Discounts");
        assert_eq!(page.sections[1].title, "Product Discounts");

        let ids: Vec<&str> = page.fields().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                OPTION_CATEGORIES,
                OPTION_CATEGORY_PERCENT,
                OPTION_PRODUCTS,
                OPTION_PRODUCT_PERCENT
            ]
        );
    }

    #[test]
    fn test_percent_fields_are_bounded() {
        let page = settings_page(Vec::new(), Vec::new());
        let field = page.field(OPTION_PRODUCT_PERCENT).unwrap();
        assert_eq!(
            field.kind,
            FieldKind::Number {
                min: 0,
                max: 100,
                step: 1
            }
        );
        assert_eq!(field.default.as_deref(), Some("0"));
    }

    #[test]
    fn test_multiselect_carries_options() {
        let page = settings_page(vec![SelectOption::new(3, "Shoes")], Vec::new());
        match &page.field(OPTION_CATEGORIES).unwrap().kind {
            FieldKind::Multiselect { options } => {
                assert_eq!(options, &vec![SelectOption::new(3, "Shoes")]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_page_serializes_with_type_tag() {
        let page = settings_page(Vec::new(), Vec::new());
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["sections"][0]["fields"][1]["kind"]["type"], json!("number"));
        assert_eq!(value["sections"][0]["fields"][0]["kind"]["type"], json!("multiselect"));
    }

    #[test]
    fn test_save_writes_all_keys() {
        let store = InMemorySettingsStore::new();
        let config = save_settings(&store, &submission()).unwrap();

        assert_eq!(config.product_discount, DiscountPercent::from_bps(2500));
        assert_eq!(store.get(OPTION_CATEGORIES), Some(json!([3, 4])));
        assert_eq!(store.get(OPTION_PRODUCTS), Some(json!([12])));
        assert_eq!(DiscountConfig::load(&store), config);
    }

    #[test]
    fn test_save_clamps_percentages() {
        let store = InMemorySettingsStore::new();
        let form = SettingsSubmission {
            category_percentage: "150".to_string(),
            product_percentage: "-5".to_string(),
            ..submission()
        };
        let config = save_settings(&store, &form).unwrap();
        assert_eq!(config.category_discount, DiscountPercent::FULL);
        assert_eq!(config.product_discount, DiscountPercent::zero());
    }

    #[test]
    fn test_save_empty_form_resets_to_defaults() {
        let store = InMemorySettingsStore::new();
        save_settings(&store, &submission()).unwrap();

        let config = save_settings(&store, &SettingsSubmission::default()).unwrap();
        assert_eq!(config, DiscountConfig::default());
        assert_eq!(DiscountConfig::load(&store), DiscountConfig::default());
    }

    #[test]
    fn test_invalid_submission_leaves_store_untouched() {
        let store = InMemorySettingsStore::new();
        let form = SettingsSubmission {
            product_percentage: "a quarter".to_string(),
            ..submission()
        };

        let err = save_settings(&store, &form).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { ref field, .. })
                if field == OPTION_PRODUCT_PERCENT
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_submission_deserializes_missing_fields() {
        let form: SettingsSubmission = serde_json::from_str(r#"{"products": ["9"]}"#).unwrap();
        assert_eq!(form.products, vec!["9".to_string()]);
        assert!(form.category_percentage.is_empty());
    }
}
