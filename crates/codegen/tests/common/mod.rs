//! Shared models for the integration tests
//!
//! Two model sets mirror a small application: users writing stories, and
//! orders holding items through a join model.

#![allow(dead_code)]

use schemaloader_ir::prelude::*;
use std::path::PathBuf;

/// A file under the working directory; rendered paths come out relative
fn under_cwd(file: &str) -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(file)
}

// ============================================================================
// Users and stories
// ============================================================================

pub struct User;

impl Model for User {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("User")
            .with_column(Column::id())
            .with_column(Column::new("name", DataType::string()))
            .with_column(Column::new("email", DataType::string()).unique())
            .with_relation(Relation::has_many("stories", "Story"))
            .defined_at(under_cwd("models/user.rs"), 9)
    }
}

pub struct Story;

impl Model for Story {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Story")
            .with_column(Column::id())
            .with_column(Column::new("title", DataType::string()))
            .with_column(Column::new("author_id", DataType::BigInt))
            .with_relation(
                Relation::belongs_to("author", "User")
                    .with_columns(["author_id"])
                    .on_delete(ReferentialAction::Cascade),
            )
            .defined_at(under_cwd("models/story.rs"), 9)
    }
}

// ============================================================================
// Orders and items
// ============================================================================

pub struct Item;

impl Model for Item {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Item")
            .with_column(Column::id())
            .with_column(Column::new("name", DataType::string()))
            .with_relation(Relation::many_to_many("orders", "Order"))
            .defined_at(under_cwd("models/item.rs"), 12)
    }
}

pub struct Order;

impl Model for Order {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Order")
            .with_column(Column::id())
            .with_column(
                Column::new("created_at", DataType::TimestampTz).with_default(DefaultValue::Now),
            )
            .with_relation(Relation::many_to_many("items", "Item"))
            .defined_at(under_cwd("models/order.rs"), 12)
    }
}

pub struct OrderToItem;

impl Model for OrderToItem {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("OrderToItem")
            .with_column(Column::new("order_id", DataType::BigInt).primary_key())
            .with_column(Column::new("item_id", DataType::BigInt).primary_key())
            .with_relation(Relation::belongs_to("order", "Order"))
            .with_relation(Relation::belongs_to("item", "Item"))
            .defined_at(under_cwd("models/order_to_item.rs"), 14)
    }
}

/// A second join model for the same pair
pub struct ItemOrder;

impl Model for ItemOrder {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("ItemOrder")
            .with_column(Column::new("item_id", DataType::BigInt))
            .with_column(Column::new("order_id", DataType::BigInt))
            .with_relation(Relation::belongs_to("item", "Item"))
            .with_relation(Relation::belongs_to("order", "Order"))
    }
}

/// Normalize line endings so fixtures compare on every platform
pub fn fixture(text: &str) -> String {
    text.replace("\r\n", "\n")
}
