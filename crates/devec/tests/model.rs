//! Randomized operation sequences checked against `VecDeque`.

#![cfg(not(miri))]

use std::collections::VecDeque;

use devec::Devector;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    PushBack(i32),
    PushFront(i32),
    PopBack,
    PopFront,
    Insert(usize, i32),
    InsertIter(usize, Vec<i32>),
    Erase(usize),
    EraseRange(usize, usize),
    ReserveFront(usize),
    ReserveBack(usize),
    ShrinkToFit,
    Clear,
    TruncateFront(usize),
    ResizeBack(usize, i32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushBack),
        4 => any::<i32>().prop_map(Op::PushFront),
        2 => Just(Op::PopBack),
        2 => Just(Op::PopFront),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, x)| Op::Insert(i, x)),
        1 => (any::<usize>(), proptest::collection::vec(any::<i32>(), 0..6))
            .prop_map(|(i, xs)| Op::InsertIter(i, xs)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::EraseRange(a, b)),
        1 => (0usize..40).prop_map(Op::ReserveFront),
        1 => (0usize..40).prop_map(Op::ReserveBack),
        1 => Just(Op::ShrinkToFit),
        1 => Just(Op::Clear),
        1 => (0usize..20).prop_map(Op::TruncateFront),
        1 => ((0usize..20), any::<i32>()).prop_map(|(n, x)| Op::ResizeBack(n, x)),
    ]
}

fn apply(v: &mut Devector<i32>, model: &mut VecDeque<i32>, op: Op) {
    match op {
        Op::PushBack(x) => {
            v.push_back(x).unwrap();
            model.push_back(x);
        }
        Op::PushFront(x) => {
            v.push_front(x).unwrap();
            model.push_front(x);
        }
        Op::PopBack => assert_eq!(v.pop_back(), model.pop_back()),
        Op::PopFront => assert_eq!(v.pop_front(), model.pop_front()),
        Op::Insert(i, x) => {
            let i = i % (model.len() + 1);
            assert_eq!(v.insert(i, x).unwrap(), i);
            model.insert(i, x);
        }
        Op::InsertIter(i, xs) => {
            let i = i % (model.len() + 1);
            v.insert_iter(i, xs.iter().copied()).unwrap();
            for (k, x) in xs.into_iter().enumerate() {
                model.insert(i + k, x);
            }
        }
        Op::Erase(i) => {
            if model.is_empty() {
                assert!(v.erase(i).is_err());
            } else {
                let i = i % model.len();
                assert_eq!(v.erase(i).unwrap(), i);
                model.remove(i);
            }
        }
        Op::EraseRange(a, b) => {
            let len = model.len() + 1;
            let (a, b) = (a % len, b % len);
            let (start, end) = (a.min(b), a.max(b));
            assert_eq!(v.erase_range(start..end).unwrap(), start);
            model.drain(start..end);
        }
        Op::ReserveFront(n) => {
            let back = v.back_free_capacity();
            let fits = n <= v.len() + v.front_free_capacity();
            v.reserve_front(n).unwrap();
            assert!(v.front_free_capacity() + v.len() >= n);
            if fits {
                assert_eq!(v.back_free_capacity(), back);
            }
        }
        Op::ReserveBack(n) => {
            let front = v.front_free_capacity();
            let fits = n <= v.len() + v.back_free_capacity();
            v.reserve_back(n).unwrap();
            assert!(v.back_free_capacity() + v.len() >= n);
            if fits {
                assert_eq!(v.front_free_capacity(), front);
            }
        }
        Op::ShrinkToFit => {
            v.shrink_to_fit().unwrap();
            assert_eq!(v.capacity(), v.len());
        }
        Op::Clear => {
            v.clear();
            model.clear();
        }
        Op::TruncateFront(n) => {
            v.truncate_front(n);
            while model.len() > n {
                model.pop_front();
            }
        }
        Op::ResizeBack(n, x) => {
            v.resize_back(n, x).unwrap();
            model.resize(n, x);
        }
    }
}

fn check_invariants(v: &Devector<i32>, model: &VecDeque<i32>) {
    assert_eq!(
        v.front_free_capacity() + v.len() + v.back_free_capacity(),
        v.capacity()
    );
    assert!(v.iter().eq(model.iter()));
    if let Some(data) = v.data() {
        for (i, item) in v.iter().enumerate() {
            assert!(std::ptr::eq(item, data.as_ptr().wrapping_add(i)));
        }
    } else {
        assert!(v.is_empty());
    }
}

proptest! {
    #[test]
    fn matches_vecdeque(ops in proptest::collection::vec(arb_op(), 1..120)) {
        let mut v = Devector::new();
        let mut model = VecDeque::new();
        for op in ops {
            apply(&mut v, &mut model, op);
            check_invariants(&v, &model);
        }
    }

    #[test]
    fn push_then_pop_restores(
        items in proptest::collection::vec(any::<i32>(), 0..40),
        x in any::<i32>(),
    ) {
        let mut v: Devector<i32> = items.iter().copied().collect();
        let before = v.clone();
        v.push_back(x).unwrap();
        prop_assert_eq!(v.pop_back(), Some(x));
        prop_assert_eq!(&v, &before);
        v.push_front(x).unwrap();
        prop_assert_eq!(v.pop_front(), Some(x));
        prop_assert_eq!(&v, &before);
    }

    #[test]
    fn insert_then_erase_restores(
        items in proptest::collection::vec(any::<i32>(), 0..40),
        pos in any::<usize>(),
        x in any::<i32>(),
    ) {
        let mut v: Devector<i32> = items.iter().copied().collect();
        let pos = pos % (items.len() + 1);
        let at = v.insert(pos, x).unwrap();
        prop_assert_eq!(v[at], x);
        v.erase(at).unwrap();
        prop_assert_eq!(&v, &items);
    }
}
