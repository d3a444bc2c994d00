use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogObjectType {
    Item,
    Image,
    ModifierList,
}

impl CatalogObjectType {
    pub const ALL: [CatalogObjectType; 3] = [
        CatalogObjectType::Item,
        CatalogObjectType::Image,
        CatalogObjectType::ModifierList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CatalogObjectType::Item => "ITEM",
            CatalogObjectType::Image => "IMAGE",
            CatalogObjectType::ModifierList => "MODIFIER_LIST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
    }

    /// Parse a comma-separated list such as `ITEM,IMAGE`. Blank entries are
    /// skipped and duplicates collapse. The first unknown name is the error.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, String> {
        let mut types = Vec::new();
        for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let parsed = Self::parse(name).ok_or_else(|| name.to_string())?;
            if !types.contains(&parsed) {
                types.push(parsed);
            }
        }
        Ok(types)
    }

    pub fn join(types: &[Self]) -> String {
        types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",")
    }
}

// -------------------------
// CATALOG
// -------------------------

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One object from a catalog listing, discriminated by its `type` field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogObject {
    Item(CatalogItem),
    Image(CatalogImage),
    ModifierList(CatalogModifierList),
    /// Categories, taxes, discounts and anything else we don't enrich.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_data: ItemData,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ItemData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_list_info: Option<Vec<ModifierListInfo>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ItemData {
    pub fn first_image_id(&self) -> Option<&str> {
        self.image_ids.as_ref()?.first().map(String::as_str)
    }

    pub fn modifier_list_ids(&self) -> impl Iterator<Item = &str> {
        self.modifier_list_info
            .iter()
            .flatten()
            .map(|info| info.modifier_list_id.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModifierListInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub modifier_list_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogImage {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_data: ImageData,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogModifierList {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Body of `GET /v2/catalog/list`.
#[derive(Debug, Default, Deserialize)]
pub struct ListCatalogResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// An item flattened for display: its image resolved to a URL and, when
/// requested, its modifier lists embedded in `item_data.modifier_lists`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnrichedItem {
    pub id: String,
    pub item_data: EnrichedItemData,
    pub image_url: String,
    /// Top-level attributes such as `version` and `updated_at`, carried over as-is.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnrichedItemData {
    #[serde(flatten)]
    pub data: ItemData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_lists: Option<Vec<CatalogObject>>,
}

// -------------------------
// PAYMENTS
// -------------------------

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Money {
    pub amount: i64,
    pub currency: String,
}

/// Body of `POST /v2/payments`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatePaymentRequest {
    pub source_id: String,
    pub idempotency_key: String,
    pub amount_money: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email_address: Option<String>,
}

/// Public values the browser needs to mount the card form.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}
