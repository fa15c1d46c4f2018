use super::*;

fn users(names: &[&str]) -> Vec<User> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| User::new(id, *name, format!("{}@example.com", name.to_lowercase())))
        .collect()
}

#[test]
fn remove_drops_exactly_one_record_and_keeps_order() {
    let mut collection = Collection::new(users(&["a", "b", "c", "d"]));

    assert!(collection.remove(UserId(2)));
    let ids: Vec<_> = collection.list().iter().map(|u| u.id.0).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    assert!(!collection.remove(UserId(2)));
    assert_eq!(collection.len(), 3);
}

#[test]
fn update_returns_none_for_unknown_id() {
    let mut collection = Collection::new(users(&["a"]));
    let updated = collection.update(UserId(9), |user| user.name = "z".into());
    assert!(updated.is_none());
    assert_eq!(collection.list()[0].name, "a");
}

#[test]
fn update_mutates_in_place() {
    let mut collection = Collection::new(users(&["a", "b"]));
    let updated = collection
        .update(UserId(2), |user| user.name = "bee".into())
        .expect("updated");
    assert_eq!(updated.name, "bee");
    assert_eq!(collection.get(UserId(2)).expect("user").name, "bee");
}

#[test]
fn find_preserves_insertion_order() {
    let collection = Collection::new(users(&["ann", "bob", "anton"]));
    let found = collection.find(|user| user.name.starts_with("an"));
    let names: Vec<_> = found.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["ann", "anton"]);
}

#[test]
fn pages_of_five_over_twelve_records() {
    let names: Vec<String> = (1..=12).map(|n| format!("user{n}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let collection = Collection::new(users(&refs));

    let first = collection.page(0, 5);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.next_offset, Some(5));

    let second = collection.page(5, 5);
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.next_offset, Some(10));

    let third = collection.page(10, 5);
    assert_eq!(third.items.len(), 2);
    assert!(!third.has_more());
}

#[test]
fn page_past_the_end_is_empty() {
    let collection = Collection::new(users(&["a", "b"]));
    let page = collection.page(10, 5);
    assert!(page.items.is_empty());
    assert_eq!(page.offset, 2);
    assert_eq!(page.next_offset, None);
}

#[test]
fn zero_limit_still_advances() {
    let page = slice_page(&[1, 2, 3], 0, 0);
    assert_eq!(page.items, vec![1]);
    assert_eq!(page.next_offset, Some(1));
}

#[test]
fn max_id_of_empty_collection_is_none() {
    let collection: Collection<Task> = Collection::default();
    assert!(collection.is_empty());
    assert_eq!(collection.max_id(), None);
}
