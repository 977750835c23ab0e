// src/backend/services/media_service.rs
// Edits to a page's media list. Every mutation leaves `order` dense (0..N-1).

use crate::error::PageError;
use crate::models::memory_item::MemoryItem;
use candid::CandidType;
use serde::Deserialize;

#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

fn position_of(items: &[MemoryItem], id: &str) -> Result<usize, PageError> {
    items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| PageError::MediaNotFound(id.to_string()))
}

fn renumber(items: &mut [MemoryItem]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.order = position as u32;
    }
}

/// Appends validator-accepted items, keeping the list sorted by order.
pub fn merge_accepted(items: &mut Vec<MemoryItem>, accepted: Vec<MemoryItem>) {
    items.extend(accepted);
    items.sort_by_key(|item| item.order);
    renumber(items);
}

/// Removes an item and closes the gap it leaves.
pub fn remove(items: &mut Vec<MemoryItem>, id: &str) -> Result<MemoryItem, PageError> {
    let index = position_of(items, id)?;
    let removed = items.remove(index);
    renumber(items);
    Ok(removed)
}

/// Swaps an item with its neighbour. Moving past either end is a no-op.
pub fn move_item(items: &mut [MemoryItem], id: &str, direction: MoveDirection) -> Result<(), PageError> {
    let index = position_of(items, id)?;
    let target = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < items.len() => index + 1,
        _ => return Ok(()),
    };
    items.swap(index, target);
    renumber(items);
    Ok(())
}

/// Flips visibility and returns the new value.
pub fn toggle_visibility(items: &mut [MemoryItem], id: &str) -> Result<bool, PageError> {
    let index = position_of(items, id)?;
    let item = &mut items[index];
    item.visible = !item.visible;
    Ok(item.visible)
}

pub fn set_description(items: &mut [MemoryItem], id: &str, description: String) -> Result<(), PageError> {
    let index = position_of(items, id)?;
    items[index].description = description;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::MediaKind;

    fn items(n: u32) -> Vec<MemoryItem> {
        (0..n)
            .map(|i| MemoryItem {
                id: format!("m{}", i),
                kind: MediaKind::Photo,
                binary_reference: String::new(),
                description: String::new(),
                order: i,
                visible: true,
            })
            .collect()
    }

    fn ids(items: &[MemoryItem]) -> Vec<&str> {
        items.iter().map(|m| m.id.as_str()).collect()
    }

    fn assert_dense(items: &[MemoryItem]) {
        let orders: Vec<u32> = items.iter().map(|m| m.order).collect();
        assert_eq!(orders, (0..items.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn remove_redensifies() {
        let mut list = items(4);
        let removed = remove(&mut list, "m1").unwrap();
        assert_eq!(removed.id, "m1");
        assert_eq!(ids(&list), vec!["m0", "m2", "m3"]);
        assert_dense(&list);
    }

    #[test]
    fn move_swaps_neighbours_and_stops_at_ends() {
        let mut list = items(3);
        move_item(&mut list, "m2", MoveDirection::Up).unwrap();
        assert_eq!(ids(&list), vec!["m0", "m2", "m1"]);
        assert_dense(&list);

        move_item(&mut list, "m0", MoveDirection::Up).unwrap();
        move_item(&mut list, "m1", MoveDirection::Down).unwrap();
        assert_eq!(ids(&list), vec!["m0", "m2", "m1"]);
        assert_dense(&list);
    }

    #[test]
    fn merge_keeps_orders_dense() {
        let mut list = items(2);
        let mut extra = items(4).split_off(2);
        extra[0].id = "n2".to_string();
        extra[1].id = "n3".to_string();
        merge_accepted(&mut list, extra);
        assert_eq!(ids(&list), vec!["m0", "m1", "n2", "n3"]);
        assert_dense(&list);
    }

    #[test]
    fn toggle_and_describe() {
        let mut list = items(2);
        assert!(!toggle_visibility(&mut list, "m0").unwrap());
        assert!(toggle_visibility(&mut list, "m0").unwrap());
        set_description(&mut list, "m1", "Family trip, 1972".to_string()).unwrap();
        assert_eq!(list[1].description, "Family trip, 1972");
    }

    #[test]
    fn unknown_id_is_media_not_found() {
        let mut list = items(1);
        assert_eq!(
            remove(&mut list, "nope").unwrap_err(),
            PageError::MediaNotFound("nope".to_string())
        );
        assert!(move_item(&mut list, "nope", MoveDirection::Down).is_err());
        assert!(toggle_visibility(&mut list, "nope").is_err());
    }

    #[test]
    fn dense_after_mixed_operations() {
        let mut list = items(6);
        remove(&mut list, "m0").unwrap();
        move_item(&mut list, "m5", MoveDirection::Up).unwrap();
        remove(&mut list, "m3").unwrap();
        move_item(&mut list, "m1", MoveDirection::Down).unwrap();
        assert_dense(&list);
        assert_eq!(list.len(), 4);
    }
}
