use rb_ordered::{OrderedMap, TreeConfig};

fn main() {
    // Filling the gap between two keys with sorted data: each key goes right
    // before the upper bound, so a cursor there is a perfect hint.
    let mut map = OrderedMap::with_config(TreeConfig::new().indexed(true).capacity(1001));
    map.insert(0, 0);
    map.insert(1000, 1_000_000);
    let hint = map.find(&1000);
    for k in 1..1000u32 {
        map.insert_with_hint(k, k * k, hint);
    }
    assert_eq!(map.len(), 1001);
    assert!(map.height() <= 20);

    // order statistics
    assert_eq!(map.get_at(10), Ok((&10, &100)));
    let cursor = map.lower_bound(&500);
    assert_eq!(map.rank(cursor), Ok(500));

    // walk the top ten backwards
    let mut cursor = map.rbegin();
    let mut top = Vec::new();
    while top.len() < 10 {
        top.push(*map.key_at(cursor).unwrap());
        cursor = map.next_cursor(cursor).unwrap();
    }
    assert_eq!(top, (991..=1000).rev().collect::<Vec<_>>());
}
