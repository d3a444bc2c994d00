//! Joins IMAGE and MODIFIER_LIST objects onto the ITEM objects that reference them.

use std::collections::HashMap;

use crate::models::{CatalogItem, CatalogModifierList, CatalogObject, EnrichedItem, EnrichedItemData};

/// Shown for items with no image, or whose image is missing from the batch.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://images.unsplash.com/photo-1611591437281-460bfbe1220a?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80";

/// Per-type object counts for one catalog batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub items: usize,
    pub images: usize,
    pub modifier_lists: usize,
    pub other: usize,
}

/// Lookup tables built from a single catalog batch.
///
/// Duplicate ids overwrite; the last object in the batch wins.
struct CatalogIndex<'a> {
    items: Vec<&'a CatalogItem>,
    images: HashMap<&'a str, &'a str>,
    modifier_lists: HashMap<&'a str, &'a CatalogModifierList>,
    counts: CatalogCounts,
}

impl<'a> CatalogIndex<'a> {
    fn build(objects: &'a [CatalogObject]) -> Self {
        let mut index = CatalogIndex {
            items: Vec::new(),
            images: HashMap::new(),
            modifier_lists: HashMap::new(),
            counts: CatalogCounts::default(),
        };

        for object in objects {
            match object {
                CatalogObject::Item(item) => {
                    index.counts.items += 1;
                    index.items.push(item);
                }
                CatalogObject::Image(image) => {
                    index.counts.images += 1;
                    // An image without a URL can't be shown, so items pointing at it get the placeholder
                    if let Some(url) = image.image_data.url.as_deref() {
                        index.images.insert(image.id.as_str(), url);
                    }
                }
                CatalogObject::ModifierList(list) => {
                    index.counts.modifier_lists += 1;
                    index.modifier_lists.insert(list.id.as_str(), list);
                }
                CatalogObject::Other => index.counts.other += 1,
            }
        }

        index
    }

    fn enrich_item(&self, item: &CatalogItem, resolve_modifiers: bool) -> EnrichedItem {
        let image_url = item
            .item_data
            .first_image_id()
            .and_then(|id| self.images.get(id))
            .copied()
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
            .to_string();

        let modifier_lists = resolve_modifiers.then(|| {
            item.item_data
                .modifier_list_ids()
                .filter_map(|id| self.modifier_lists.get(id))
                .map(|list| CatalogObject::ModifierList((*list).clone()))
                .collect::<Vec<_>>()
        });

        EnrichedItem {
            id: item.id.clone(),
            item_data: EnrichedItemData {
                data: item.item_data.clone(),
                modifier_lists,
            },
            image_url,
            attributes: item.attributes.clone(),
        }
    }
}

/// Produce one display-ready item per ITEM object, in input order.
///
/// Never fails: unresolved images become [`PLACEHOLDER_IMAGE_URL`] and
/// modifier-list references with no match in the batch are dropped. Modifier
/// lists are only embedded when `resolve_modifiers` is set.
pub fn enrich(objects: &[CatalogObject], resolve_modifiers: bool) -> Vec<EnrichedItem> {
    enrich_with_counts(objects, resolve_modifiers).0
}

/// [`enrich`], also returning the per-type counts seen while indexing.
pub fn enrich_with_counts(objects: &[CatalogObject], resolve_modifiers: bool) -> (Vec<EnrichedItem>, CatalogCounts) {
    let index = CatalogIndex::build(objects);
    let items = index
        .items
        .iter()
        .map(|item| index.enrich_item(item, resolve_modifiers))
        .collect();
    (items, index.counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn objects(value: Value) -> Vec<CatalogObject> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolves_first_image() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"image_ids": ["img1"]}},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/a.png"}}
        ]));

        let enriched = enrich(&batch, false);
        assert_eq!(
            serde_json::to_value(&enriched).unwrap(),
            json!([{"id": "i1", "item_data": {"image_ids": ["img1"]}, "image_url": "http://x/a.png"}])
        );
    }

    #[test]
    fn test_only_first_image_is_used() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"image_ids": ["img2", "img1"]}},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/1.png"}},
            {"id": "img2", "type": "IMAGE", "image_data": {"url": "http://x/2.png"}}
        ]));

        let enriched = enrich(&batch, false);
        assert_eq!(enriched[0].image_url, "http://x/2.png");
    }

    #[test]
    fn test_placeholder_without_images() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"name": "Latte"}},
            {"id": "i2", "type": "ITEM", "item_data": {"image_ids": []}},
            {"id": "i3", "type": "ITEM", "item_data": {"image_ids": ["gone"]}},
            {"id": "i4", "type": "ITEM"}
        ]));

        let enriched = enrich(&batch, true);
        assert_eq!(enriched.len(), 4);
        assert!(enriched.iter().all(|item| item.image_url == PLACEHOLDER_IMAGE_URL));
    }

    #[test]
    fn test_top_level_attributes_carried_over() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "version": 42, "is_deleted": false, "item_data": {"name": "Tea"}}
        ]));

        let value = serde_json::to_value(enrich(&batch, false)).unwrap();
        assert_eq!(value[0]["version"], 42);
        assert_eq!(value[0]["is_deleted"], false);
        assert!(value[0].get("type").is_none());
    }

    #[test]
    fn test_image_without_url_falls_back() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"image_ids": ["img1"]}},
            {"id": "img1", "type": "IMAGE", "image_data": {"name": "broken"}}
        ]));

        assert_eq!(enrich(&batch, false)[0].image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_modifier_lists_resolved_in_order_and_missing_dropped() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {
                "name": "Coffee",
                "modifier_list_info": [
                    {"modifier_list_id": "m2", "enabled": true},
                    {"modifier_list_id": "missing"},
                    {"modifier_list_id": "m1"}
                ]
            }},
            {"id": "m1", "type": "MODIFIER_LIST", "version": 3, "modifier_list_data": {"name": "Milk"}},
            {"id": "m2", "type": "MODIFIER_LIST", "modifier_list_data": {"name": "Size"}}
        ]));

        let enriched = enrich(&batch, true);
        assert_eq!(enriched.len(), 1);

        let value = serde_json::to_value(&enriched[0]).unwrap();
        assert_eq!(
            value["item_data"]["modifier_lists"],
            json!([
                {"id": "m2", "type": "MODIFIER_LIST", "modifier_list_data": {"name": "Size"}},
                {"id": "m1", "type": "MODIFIER_LIST", "version": 3, "modifier_list_data": {"name": "Milk"}}
            ])
        );
        // Item references and attributes survive untouched
        assert_eq!(value["item_data"]["name"], "Coffee");
        assert_eq!(value["item_data"]["modifier_list_info"][0]["enabled"], true);
    }

    #[test]
    fn test_modifier_lists_absent_unless_requested() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"modifier_list_info": [{"modifier_list_id": "m1"}]}},
            {"id": "m1", "type": "MODIFIER_LIST", "modifier_list_data": {"name": "Milk"}}
        ]));

        let value = serde_json::to_value(enrich(&batch, false)).unwrap();
        assert!(value[0]["item_data"].get("modifier_lists").is_none());

        let value = serde_json::to_value(enrich(&batch, true)).unwrap();
        assert_eq!(value[0]["item_data"]["modifier_lists"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_item_without_modifiers_gets_empty_list() {
        let batch = objects(json!([{"id": "i1", "type": "ITEM", "item_data": {}}]));
        let value = serde_json::to_value(enrich(&batch, true)).unwrap();
        assert_eq!(value[0]["item_data"]["modifier_lists"], json!([]));
    }

    #[test]
    fn test_cardinality_and_order_preserved() {
        assert!(enrich(&[], true).is_empty());

        let batch = objects(json!([
            {"id": "c1", "type": "CATEGORY", "category_data": {"name": "Drinks"}},
            {"id": "i2", "type": "ITEM", "item_data": {}},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/a.png"}},
            {"id": "i1", "type": "ITEM", "item_data": {}},
            {"id": "i3", "type": "ITEM", "item_data": {}}
        ]));

        let ids: Vec<_> = enrich(&batch, true).into_iter().map(|item| item.id).collect();
        assert_eq!(ids, vec!["i2", "i1", "i3"]);
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {"image_ids": ["img1"]}},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/old.png"}},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/new.png"}}
        ]));

        assert_eq!(enrich(&batch, false)[0].image_url, "http://x/new.png");
    }

    #[test]
    fn test_counts_come_from_the_same_pass() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM"},
            {"id": "img1", "type": "IMAGE", "image_data": {"url": "http://x/a.png"}},
            {"id": "img2", "type": "IMAGE"},
            {"id": "m1", "type": "MODIFIER_LIST"},
            {"id": "t1", "type": "TAX", "tax_data": {}}
        ]));

        let (items, counts) = enrich_with_counts(&batch, true);
        assert_eq!(items.len(), 1);
        assert_eq!(
            counts,
            CatalogCounts { items: 1, images: 2, modifier_lists: 1, other: 1 }
        );
    }

    #[test]
    fn test_null_references_degrade() {
        let batch = objects(json!([
            {"id": "i1", "type": "ITEM", "item_data": {
                "image_ids": ["img1"],
                "modifier_list_info": [{"modifier_list_id": null}, {"modifier_list_id": "m1"}]
            }},
            {"id": "i2", "type": "ITEM", "item_data": null},
            {"id": "img1", "type": "IMAGE", "image_data": null},
            {"id": "m1", "type": "MODIFIER_LIST", "modifier_list_data": {"name": "Milk"}}
        ]));

        let enriched = enrich(&batch, true);
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(enriched[1].image_url, PLACEHOLDER_IMAGE_URL);

        let lists = enriched[0].item_data.modifier_lists.as_ref().unwrap();
        assert_eq!(lists.len(), 1);
        assert!(matches!(&lists[0], CatalogObject::ModifierList(list) if list.id == "m1"));
    }
}
