use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

/// One step of a randomized workload.
#[derive(Clone, Debug)]
pub(super) enum Op<K, V> {
    Insert(K, V),
    Remove(K),
}

pub(super) type SmallIntOps = Vec<Op<u16, u16>>;

// Keys are drawn from a narrow range so that removals and duplicate inserts
// hit existing entries often.
pub(super) fn small_int_ops() -> impl Strategy<Value = SmallIntOps> {
    let op = prop_oneof![
        3 => (0u16..256, 0u16..1024).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0u16..256).prop_map(Op::<u16, u16>::Remove),
    ];
    prop::collection::vec(op, 0..512)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}
