use hashbrown::HashMap;

/// Secondary index from a foreign key to the ids that reference it, in insertion order.
pub type VecIndex<K> = HashMap<K, Vec<u64>>;

pub(crate) fn push(index: &mut VecIndex<u64>, key: u64, id: u64) {
    index.entry(key).or_default().push(id);
}

pub(crate) fn remove(index: &mut VecIndex<u64>, key: u64, id: u64) {
    if let Some(ids) = index.get_mut(&key) {
        if let Some(pos) = ids.iter().position(|x| *x == id) {
            ids.remove(pos);
        }
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

pub(crate) fn ids(index: &VecIndex<u64>, key: u64) -> &[u64] {
    index.get(&key).map(Vec::as_slice).unwrap_or(&[])
}
