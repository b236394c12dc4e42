use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use rb_ordered::OrderedMap;

/// A key type with no natural order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Session {
    user: String,
    device: u16,
}

fn main() {
    // A treeified hash bucket orders its colliding keys by hash code first,
    // then by a field-wise tiebreak for keys whose hashes are equal.
    let state = RandomState::new();
    let hash = move |s: &Session| state.hash_one(s);
    let mut bucket = OrderedMap::with_comparator(move |a: &Session, b: &Session| {
        hash(a)
            .cmp(&hash(b))
            .then_with(|| a.user.cmp(&b.user))
            .then_with(|| a.device.cmp(&b.device))
    });

    for (i, user) in ["ann", "bob", "cy", "dee", "ed", "flo", "gus", "hal"]
        .into_iter()
        .enumerate()
    {
        let session = Session {
            user: user.to_owned(),
            device: i as u16,
        };
        bucket.insert(session, i);
    }
    assert_eq!(bucket.len(), 8);

    let probe = Session {
        user: "cy".to_owned(),
        device: 2,
    };
    assert_eq!(bucket.get(&probe), Some(&2));
    assert_eq!(bucket.remove(&probe), Some(2));
    assert_eq!(bucket.len(), 7);
    println!("{bucket:?}");
}
