//! Minimal-hash acceleration for endpoint tables.
//!
//! When a table is built, a hash function specialized to its literal
//! endpoint prefixes is synthesized once: a set of character positions
//! and a per-byte weight table such that
//! `length + sum(weight[byte at position])` is distinct for every
//! prefix. Dispatch then resolves the first address segment with one
//! hash evaluation and one table lookup instead of a linear scan.
//!
//! Synthesis is greedy and bounded, so it can fail; a table whose hash
//! could not be synthesized simply stays on the linear path forever.
//! Either way the synthesis runs off the real-time path, at
//! construction, and the produced matcher allocates nothing when
//! queried.

use log::warn;

use crate::pattern;

const WEIGHT_RANGE: u8 = 100;
const WEIGHT_PASSES: usize = 4;

/// The per-table accelerator: literal prefixes, argument restrictions,
/// and the synthesized hash (positions, weights, remap).
///
/// An empty `positions` vector means no hash exists and lookups must
/// fall back to scanning. A populated remap satisfies
/// `remap[hash(prefix)] == index` for every endpoint; the verification
/// pass at the end of `build` enforces this, so a hash hit only ever
/// needs one hard match to confirm.
pub(crate) struct HashMatcher {
    fixed: Vec<String>,
    arg_spec: Vec<Option<String>>,
    positions: Vec<usize>,
    weights: [u8; 256],
    remap: Vec<usize>,
    is_array: Vec<bool>,
}

impl HashMatcher {
    pub(crate) fn build(names: &[&str]) -> HashMatcher {
        let mut matcher = HashMatcher {
            fixed: Vec::new(),
            arg_spec: Vec::new(),
            positions: Vec::new(),
            weights: [0; 256],
            remap: Vec::new(),
            is_array: names.iter().map(|n| pattern::is_array(n)).collect(),
        };

        // Array endpoints expand to many addresses sharing a prefix, so
        // the whole table opts out of hashing.
        if names.is_empty() || matcher.is_array.iter().any(|&a| a) {
            return matcher;
        }

        matcher.fixed = names
            .iter()
            .map(|n| pattern::fixed_prefix(n).to_string())
            .collect();
        matcher.arg_spec = names
            .iter()
            .map(|n| pattern::arg_spec(n).map(str::to_string))
            .collect();

        matcher.positions = find_positions(&matcher.fixed);
        if matcher.positions.is_empty() {
            warn!("no collision-free hash for endpoint table; staying linear");
            return matcher;
        }

        matcher.weights = find_weights(&matcher.fixed, &matcher.positions);
        matcher.remap = build_remap(&matcher.fixed, &matcher.positions, &matcher.weights);

        // The greedy weight search is bounded and may leave residual
        // collisions, in which case the remap silently dropped an
        // endpoint. Verify every prefix resolves to itself and fall back
        // to scanning otherwise.
        for (i, key) in matcher.fixed.iter().enumerate() {
            let h = hash_key(key.as_bytes(), &matcher.positions, &matcher.weights);
            if matcher.remap.get(h) != Some(&i) {
                warn!(
                    "residual hash collision on '{}'; endpoint table stays linear",
                    key
                );
                matcher.positions.clear();
                matcher.remap.clear();
                break;
            }
        }

        matcher
    }

    /// `true` when dispatch must scan the table.
    pub(crate) fn is_linear(&self) -> bool {
        self.positions.is_empty()
    }

    /// Hashes the first segment of the address and returns the remap
    /// candidate. A hash beyond the remap bounds is an ordinary miss.
    pub(crate) fn candidate(&self, path: &str) -> Option<usize> {
        let bytes = path.as_bytes();
        let len = match bytes.iter().position(|&b| b == b'/') {
            Some(i) => i + 1,
            None => bytes.len(),
        };
        let mut h = len;
        for &p in &self.positions {
            if p < len {
                h += self.weights[bytes[p] as usize] as usize;
            }
        }
        self.remap.get(h).copied()
    }

    /// Re-verifies a hash hit: the address must start with the
    /// endpoint's literal prefix and satisfy its argument restriction.
    pub(crate) fn hard_match(&self, i: usize, path: &str, types: &str) -> bool {
        if !path.as_bytes().starts_with(self.fixed[i].as_bytes()) {
            return false;
        }
        match &self.arg_spec[i] {
            Some(spec) => pattern::match_args(spec, types),
            None => true,
        }
    }
}

fn hash_key(key: &[u8], positions: &[usize], weights: &[u8; 256]) -> usize {
    let mut h = key.len();
    for &p in positions {
        if p < key.len() {
            h += weights[key[p] as usize] as usize;
        }
    }
    h
}

fn hash_all(keys: &[String], positions: &[usize], weights: &[u8; 256]) -> Vec<usize> {
    keys.iter()
        .map(|k| hash_key(k.as_bytes(), positions, weights))
        .collect()
}

// The discriminating tuple for position selection: string length plus
// the characters at the chosen offsets.
fn tuples(keys: &[String], positions: &[usize]) -> Vec<Vec<usize>> {
    keys.iter()
        .map(|k| {
            let bytes = k.as_bytes();
            let mut t = Vec::with_capacity(positions.len() + 1);
            t.push(bytes.len());
            for &p in positions {
                if p < bytes.len() {
                    t.push(bytes[p] as usize);
                }
            }
            t
        })
        .collect()
}

fn count_dups<T: PartialEq>(items: &[T]) -> usize {
    let mut dups = 0;
    let mut marked = vec![false; items.len()];
    for i in 0..items.len() {
        if marked[i] {
            continue;
        }
        for j in i + 1..items.len() {
            if items[i] == items[j] {
                dups += 1;
                marked[j] = true;
            }
        }
    }
    dups
}

// Greedily accumulates the offsets that discriminate best, stopping as
// soon as adding another offset stops reducing collisions. A nonzero
// residue means no usable hash exists for this key set.
fn find_positions(keys: &[String]) -> Vec<usize> {
    let longest = keys.iter().map(|k| k.len()).max().unwrap_or(0);
    let mut positions: Vec<usize> = Vec::new();
    let mut current_dups = keys.len();
    let mut best_pos = 0;
    let mut best_val = usize::MAX;
    loop {
        for i in 0..longest {
            if positions.contains(&i) {
                continue;
            }
            let mut trial = positions.clone();
            trial.push(i);
            let d = count_dups(&tuples(keys, &trial));
            if d < best_val {
                best_val = d;
                best_pos = i;
            }
        }
        if best_val >= current_dups {
            break;
        }
        current_dups = best_val;
        positions.push(best_pos);
    }
    if count_dups(&tuples(keys, &positions)) != 0 {
        positions.clear();
    }
    positions
}

// For every byte value present in the key set, searches the weight
// minimizing collisions of the full hash, repeating up to
// WEIGHT_PASSES rounds or until a round stops improving.
fn find_weights(keys: &[String], positions: &[usize]) -> [u8; 256] {
    let mut weights = [0u8; 256];
    let mut present: Vec<u8> = Vec::new();
    for key in keys {
        for &b in key.as_bytes() {
            if !present.contains(&b) {
                present.push(b);
            }
        }
    }

    let mut current_dups = keys.len();
    let mut best_val = usize::MAX;
    for _ in 0..WEIGHT_PASSES {
        for &c in &present {
            best_val = usize::MAX;
            let mut best = 0;
            for w in 0..WEIGHT_RANGE {
                weights[c as usize] = w;
                let d = count_dups(&hash_all(keys, positions, &weights));
                if d < best_val {
                    best_val = d;
                    best = w;
                }
            }
            weights[c as usize] = best;
        }
        if best_val >= current_dups {
            break;
        }
        current_dups = best_val;
    }
    weights
}

// Dense hash-to-index table. On a residual collision the later
// endpoint overwrites the earlier slot; `build` detects that and
// discards the hash.
fn build_remap(keys: &[String], positions: &[usize], weights: &[u8; 256]) -> Vec<usize> {
    let hashes = hash_all(keys, positions, weights);
    let size = hashes.iter().map(|h| h + 1).max().unwrap_or(0);
    let mut remap = vec![0; size];
    for (i, &h) in hashes.iter().enumerate() {
        remap[h] = i;
    }
    remap
}
