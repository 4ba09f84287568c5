//! Codec implementations for maps and sets.
//!
//! A map is a compact entry count followed by alternating keys and values; a set is a compact
//! count followed by its items. Entries are written in ascending key order so equal maps always
//! encode to equal bytes, whatever their in-memory layout. Decoding rejects duplicate keys.

use crate::{
    compact,
    trace::{self, Index},
    EncodeSize, Error, RangeCfg, Read, Write,
};
use bytes::{Buf, BufMut};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::Hash,
};

fn write_entries<'a, K: Write + 'a, V: Write + 'a>(
    len: usize,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    buf: &mut impl BufMut,
) {
    compact::write_len(len, buf);
    for (key, value) in entries {
        key.write(buf);
        value.write(buf);
    }
}

fn entries_size<'a, K: EncodeSize + 'a, V: EncodeSize + 'a>(
    len: usize,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> usize {
    compact::len_size(len)
        + entries
            .map(|(key, value)| key.encode_size() + value.encode_size())
            .sum::<usize>()
}

fn read_entries<K: Read, V: Read>(
    buf: &mut impl Buf,
    (range, (key_cfg, value_cfg)): &(RangeCfg<usize>, (K::Cfg, V::Cfg)),
    context: &'static str,
    mut insert: impl FnMut(K, V) -> bool,
) -> Result<(), Error> {
    let len = compact::read_len(buf, range)?;
    for i in 0..len {
        let (key, value) = trace::decode(Index(i), buf, |buf| {
            let key = trace::decode("key", buf, |buf| K::read_cfg(buf, key_cfg))?;
            let value = trace::decode("value", buf, |buf| V::read_cfg(buf, value_cfg))?;
            Ok((key, value))
        })?;
        if !insert(key, value) {
            return Err(Error::Invalid(context, "duplicate key"));
        }
    }
    Ok(())
}

fn write_items<'a, T: Write + 'a>(
    len: usize,
    items: impl Iterator<Item = &'a T>,
    buf: &mut impl BufMut,
) {
    compact::write_len(len, buf);
    for item in items {
        item.write(buf);
    }
}

fn items_size<'a, T: EncodeSize + 'a>(len: usize, items: impl Iterator<Item = &'a T>) -> usize {
    compact::len_size(len) + items.map(EncodeSize::encode_size).sum::<usize>()
}

fn read_items<T: Read>(
    buf: &mut impl Buf,
    (range, cfg): &(RangeCfg<usize>, T::Cfg),
    context: &'static str,
    mut insert: impl FnMut(T) -> bool,
) -> Result<(), Error> {
    let len = compact::read_len(buf, range)?;
    for i in 0..len {
        let item = trace::decode(Index(i), buf, |buf| T::read_cfg(buf, cfg))?;
        if !insert(item) {
            return Err(Error::Invalid(context, "duplicate item"));
        }
    }
    Ok(())
}

/// Returns the entries of `map` sorted by key.
fn sorted<K: Ord, V>(map: &HashMap<K, V>) -> Vec<(&K, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

// BTreeMap implementation
impl<K: Write, V: Write> Write for BTreeMap<K, V> {
    fn write(&self, buf: &mut impl BufMut) {
        write_entries(self.len(), self.iter(), buf);
    }
}

impl<K: EncodeSize, V: EncodeSize> EncodeSize for BTreeMap<K, V> {
    fn encode_size(&self) -> usize {
        entries_size(self.len(), self.iter())
    }
}

impl<K: Read + Ord, V: Read> Read for BTreeMap<K, V> {
    type Cfg = (RangeCfg<usize>, (K::Cfg, V::Cfg));

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut map = BTreeMap::new();
        read_entries(buf, cfg, "BTreeMap", |key, value| {
            map.insert(key, value).is_none()
        })?;
        Ok(map)
    }
}

// HashMap implementation
impl<K: Write + Ord, V: Write> Write for HashMap<K, V> {
    fn write(&self, buf: &mut impl BufMut) {
        write_entries(self.len(), sorted(self).into_iter(), buf);
    }
}

impl<K: EncodeSize, V: EncodeSize> EncodeSize for HashMap<K, V> {
    fn encode_size(&self) -> usize {
        entries_size(self.len(), self.iter())
    }
}

impl<K: Read + Eq + Hash, V: Read> Read for HashMap<K, V> {
    type Cfg = (RangeCfg<usize>, (K::Cfg, V::Cfg));

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut map = HashMap::new();
        read_entries(buf, cfg, "HashMap", |key, value| {
            map.insert(key, value).is_none()
        })?;
        Ok(map)
    }
}

// BTreeSet implementation
impl<T: Write> Write for BTreeSet<T> {
    fn write(&self, buf: &mut impl BufMut) {
        write_items(self.len(), self.iter(), buf);
    }
}

impl<T: EncodeSize> EncodeSize for BTreeSet<T> {
    fn encode_size(&self) -> usize {
        items_size(self.len(), self.iter())
    }
}

impl<T: Read + Ord> Read for BTreeSet<T> {
    type Cfg = (RangeCfg<usize>, T::Cfg);

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut set = BTreeSet::new();
        read_items(buf, cfg, "BTreeSet", |item| set.insert(item))?;
        Ok(set)
    }
}

// HashSet implementation
impl<T: Write + Ord> Write for HashSet<T> {
    fn write(&self, buf: &mut impl BufMut) {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort();
        write_items(items.len(), items.into_iter(), buf);
    }
}

impl<T: EncodeSize> EncodeSize for HashSet<T> {
    fn encode_size(&self) -> usize {
        items_size(self.len(), self.iter())
    }
}

impl<T: Read + Eq + Hash> Read for HashSet<T> {
    type Cfg = (RangeCfg<usize>, T::Cfg);

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let mut set = HashSet::new();
        read_items(buf, cfg, "HashSet", |item| set.insert(item))?;
        Ok(set)
    }
}
