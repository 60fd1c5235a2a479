use confluent_list::{Cursor, ListError, VersionId, VersionedList};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn snapshot(list: &VersionedList<i32>) -> Vec<Vec<i32>> {
    (0..list.versions_count())
        .map(|v| list.to_vec(v).unwrap())
        .collect()
}

#[test]
fn test_old_versions_survive_new_edits() {
    let mut list = VersionedList::new();
    let v1 = list.push_back(0, 10).unwrap();
    let v2 = list.push_back(v1, 20).unwrap();
    let v3 = list.push_front(v2, 5).unwrap();

    assert_eq!(list.to_vec(v3).unwrap(), vec![5, 10, 20]);
    assert_eq!(list.len(0).unwrap(), 0);
    assert_eq!(list.iter(0).unwrap().count(), 0);
    assert_eq!(list.to_vec(v1).unwrap(), vec![10]);
    assert_eq!(list.to_vec(v2).unwrap(), vec![10, 20]);
}

#[test]
fn test_branching_from_same_parent() {
    let mut list = VersionedList::new();
    let base = list.push_back(0, 1).unwrap();
    let left = list.push_back(base, 2).unwrap();
    let right = list.push_front(base, 0).unwrap();

    assert_eq!(list.to_vec(left).unwrap(), vec![1, 2]);
    assert_eq!(list.to_vec(right).unwrap(), vec![0, 1]);
    assert_eq!(list.to_vec(base).unwrap(), vec![1]);
}

#[test]
fn test_cursor_past_end() {
    let mut list = VersionedList::new();
    let v1 = list.push_back(0, 'a').unwrap();
    let mut cursor = list.begin(v1).unwrap();
    cursor.advance().unwrap();
    assert_eq!(cursor, list.end());
    assert_eq!(cursor.get(), Err(ListError::IteratorOutOfRange));
}

#[test]
fn test_versions_readable_from_other_threads() {
    let mut list = VersionedList::new();
    let mut v = 0;
    for i in 0..100 {
        v = list.push_front(v, i).unwrap();
    }
    let list = std::sync::Arc::new(list);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let list = std::sync::Arc::clone(&list);
            std::thread::spawn(move || list.iter(v).unwrap().sum::<i32>())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (0..100).sum::<i32>());
    }
}

#[derive(Debug, Clone)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Insert(usize, i32),
    Erase(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::PushFront),
        any::<i32>().prop_map(Op::PushBack),
        Just(Op::PopFront),
        Just(Op::PopBack),
        (0usize..16, any::<i32>()).prop_map(|(i, x)| Op::Insert(i, x)),
        (0usize..16).prop_map(Op::Erase),
    ]
}

fn apply(list: &mut VersionedList<i32>, source: VersionId, op: &Op) -> Option<VersionId> {
    let len = list.len(source).unwrap();
    match *op {
        Op::PushFront(x) => Some(list.push_front(source, x).unwrap()),
        Op::PushBack(x) => Some(list.push_back(source, x).unwrap()),
        Op::PopFront => list.pop_front(source).unwrap(),
        Op::PopBack => list.pop_back(source).unwrap(),
        Op::Insert(i, x) => {
            let pos = list.cursor_at(source, i.min(len)).unwrap();
            Some(list.insert(source, &pos, x).unwrap().version)
        }
        Op::Erase(i) => {
            let pos = list.cursor_at(source, i.min(len)).unwrap();
            list.erase(source, &pos).unwrap().map(|edit| edit.version)
        }
    }
}

fn model(values: &[i32], op: &Op) -> Vec<i32> {
    let mut next = values.to_vec();
    match *op {
        Op::PushFront(x) => next.insert(0, x),
        Op::PushBack(x) => next.push(x),
        Op::PopFront => {
            if !next.is_empty() {
                next.remove(0);
            }
        }
        Op::PopBack => {
            next.pop();
        }
        Op::Insert(i, x) => next.insert(i.min(values.len()), x),
        Op::Erase(i) => {
            if i < next.len() {
                next.remove(i);
            }
        }
    }
    next
}

proptest! {
    /// Every edit leaves all earlier versions intact and matches a Vec model.
    #[test]
    fn prop_branching_preserves_history(
        ops in prop::collection::vec((any::<prop::sample::Index>(), arb_op()), 1..40)
    ) {
        let mut list = VersionedList::new();
        for (pick, op) in &ops {
            let before = snapshot(&list);
            let source = pick.index(list.versions_count());
            let expected = model(&before[source], op);
            match apply(&mut list, source, op) {
                Some(created) => {
                    prop_assert_eq!(created, before.len());
                    prop_assert_eq!(list.to_vec(created).unwrap(), expected);
                }
                None => prop_assert_eq!(list.versions_count(), before.len()),
            }
            prop_assert_eq!(&snapshot(&list)[..before.len()], &before[..]);
        }
    }

    /// Erasing what was just inserted gives back the source contents.
    #[test]
    fn prop_insert_then_erase_round_trip(
        values in prop::collection::vec(any::<i32>(), 0..20),
        index in any::<prop::sample::Index>(),
        x in any::<i32>(),
    ) {
        let mut list = VersionedList::new();
        let mut v = 0;
        for value in values.iter().rev() {
            v = list.push_front(v, *value).unwrap();
        }
        let pos = list.cursor_at(v, index.index(values.len() + 1)).unwrap();
        let inserted = list.insert(v, &pos, x).unwrap();
        let erased = list.erase(inserted.version, &inserted.cursor).unwrap().unwrap();
        prop_assert_eq!(list.to_vec(erased.version).unwrap(), values);
        prop_assert_eq!(erased.cursor, pos);
    }
}

#[test]
fn test_end_cursor_from_list_matches_free_end() {
    let list = VersionedList::<u8>::new();
    assert_eq!(list.end(), Cursor::end());
    assert_eq!(list.begin(0).unwrap(), Cursor::end());
}
