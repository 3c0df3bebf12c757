// Approximate name matching based on longest common blocks
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A catalog name accepted as an approximate match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseMatch {
    /// Row index of the candidate
    pub index: usize,
    pub name: String,
    /// Match quality in `[0, 1]`
    pub ratio: f64,
}

#[inline]
fn ratio_of(matches: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total_len as f64
    }
}

/// Query length from which popular characters are ignored
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// Query side of a comparison, indexed once and compared against many names.
///
/// Matching is case-sensitive and works on characters. The ratio of two
/// strings is `2 * M / (|a| + |b|)` where `M` counts the characters covered
/// by recursively found longest common blocks.
pub struct SequenceMatcher {
    query: Vec<char>,
    /// char -> positions in the query, ascending
    positions: AHashMap<char, Vec<usize>>,
    /// char -> occurrences in the query
    counts: AHashMap<char, usize>,
}

impl SequenceMatcher {
    /// Index `query`.
    ///
    /// For queries of [`AUTOJUNK_MIN_LEN`] characters or more, characters
    /// occurring more than `1 + len / 100` times are popular and never start
    /// or extend a common block. They still count toward
    /// [`quick_ratio`](Self::quick_ratio).
    pub fn new(query: &str) -> Self {
        let query: Vec<char> = query.chars().collect();
        let mut positions: AHashMap<char, Vec<usize>> = AHashMap::new();
        let mut counts: AHashMap<char, usize> = AHashMap::new();
        for (j, &c) in query.iter().enumerate() {
            positions.entry(c).or_default().push(j);
            *counts.entry(c).or_insert(0) += 1;
        }
        if query.len() >= AUTOJUNK_MIN_LEN {
            let limit = query.len() / 100 + 1;
            positions.retain(|_, js| js.len() <= limit);
        }
        Self { query, positions, counts }
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone
    pub fn real_quick_ratio(&self, candidate: &[char]) -> f64 {
        let (la, lb) = (candidate.len(), self.query.len());
        ratio_of(la.min(lb), la + lb)
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts
    pub fn quick_ratio(&self, candidate: &[char]) -> f64 {
        let mut available: AHashMap<char, usize> = AHashMap::new();
        let mut matches = 0;
        for c in candidate {
            let left = available
                .entry(*c)
                .or_insert_with(|| self.counts.get(c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }
        ratio_of(matches, candidate.len() + self.query.len())
    }

    pub fn ratio(&self, candidate: &[char]) -> f64 {
        ratio_of(
            self.matching_characters(candidate),
            candidate.len() + self.query.len(),
        )
    }

    /// Longest common block of `a[alo..ahi]` and `query[blo..bhi]`.
    ///
    /// Returns `(i, j, size)`. Among equally long blocks the one starting
    /// earliest in `a`, then earliest in the query, wins.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j -> length of the block ending at (i - 1, j)
        let mut run: AHashMap<usize, usize> = AHashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_run = AHashMap::new();
            if let Some(js) = self.positions.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run = next_run;
        }
        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks between `a` and the query
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut pending = vec![(0, a.len(), 0, self.query.len())];
        let mut total = 0;
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}

/// Resolves free-text queries against a list of names
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    cutoff: f64,
}

impl FuzzyMatcher {
    #[inline]
    #[must_use]
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Up to `n` names whose ratio to `query` reaches the cutoff.
    ///
    /// Ordered by ratio descending; equal ratios keep the order of `names`.
    pub fn close_matches<'a, I>(&self, query: &str, names: I, n: usize) -> Vec<CloseMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if n == 0 {
            return Vec::new();
        }
        let matcher = SequenceMatcher::new(query);
        let mut found: Vec<CloseMatch> = Vec::new();
        for (index, name) in names.into_iter().enumerate() {
            let candidate: Vec<char> = name.chars().collect();
            if matcher.real_quick_ratio(&candidate) < self.cutoff
                || matcher.quick_ratio(&candidate) < self.cutoff
            {
                continue;
            }
            let ratio = matcher.ratio(&candidate);
            if ratio >= self.cutoff {
                found.push(CloseMatch {
                    index,
                    name: name.to_string(),
                    ratio,
                });
            }
        }
        found.sort_by(|a, b| OrderedFloat(b.ratio).cmp(&OrderedFloat(a.ratio)));
        found.truncate(n);
        found
    }

    /// The single best match, if any reaches the cutoff
    pub fn best_match<'a, I>(&self, query: &str, names: I) -> Option<CloseMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.close_matches(query, names, 1).into_iter().next()
    }
}
