//! Frozen hyphenation tree.
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::builder::HyphenationTreeBuilder;
use crate::hyphenation::{ExceptionPart, Hyphenation};
use crate::tst::TernaryTree;
use crate::values::ValueSpace;
use crate::{Statistics, END_MARKER, WORD_BOUNDARY};

/// Hyphenation tree answering break points of words with the Knuth-Liang
/// algorithm.
///
/// Patterns are keys of a [`TernaryTree`] whose values point to packed
/// interletter priorities. Input words are first folded through a character
/// class map; words registered as exceptions bypass the patterns.
///
/// A [`HyphenationTree`] is created by [`HyphenationTreeBuilder`] and never
/// modified afterwards, so it can be shared among threads by reference.
#[derive(Clone, Debug)]
pub struct HyphenationTree {
    patterns: TernaryTree,
    values: ValueSpace,
    classmap: TernaryTree,
    exceptions: HashMap<String, Vec<ExceptionPart>>,
}

impl HyphenationTree {
    pub(crate) fn new(
        patterns: TernaryTree,
        values: ValueSpace,
        classmap: TernaryTree,
        exceptions: HashMap<String, Vec<ExceptionPart>>,
    ) -> Self {
        Self {
            patterns,
            values,
            classmap,
            exceptions,
        }
    }

    /// Creates a new [`HyphenationTreeBuilder`].
    pub fn builder() -> HyphenationTreeBuilder {
        HyphenationTreeBuilder::new()
    }

    /// Returns the value-space offset stored for a pattern if exists.
    #[inline]
    pub fn find<I>(&self, key: I) -> Option<u32>
    where
        I: IntoIterator<Item = char>,
    {
        self.patterns.find(key)
    }

    /// Returns the interletter priorities of a pattern as a digit string.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphtree::{HyphenationTree, PatternConsumer};
    ///
    /// let mut builder = HyphenationTree::builder();
    /// builder.add_pattern("hyph", "00100").unwrap();
    /// let tree = builder.build().unwrap();
    ///
    /// assert_eq!(tree.find_pattern("hyph").as_deref(), Some("00100"));
    /// assert_eq!(tree.find_pattern("hy"), None);
    /// ```
    pub fn find_pattern(&self, pattern: &str) -> Option<String> {
        self.find(pattern.chars())
            .map(|offset| self.values.unpack(offset))
    }

    /// Number of patterns.
    #[inline(always)]
    pub const fn num_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Representative of the class containing `c` if exists.
    #[inline]
    pub fn class_of(&self, c: char) -> Option<char> {
        self.classmap
            .find(std::iter::once(c))
            .and_then(char::from_u32)
    }

    /// Exception entry of a normalized word if exists.
    #[inline]
    pub fn exception(&self, word: &str) -> Option<&[ExceptionPart]> {
        self.exceptions.get(word).map(Vec::as_slice)
    }

    /// Computes break points of a word.
    ///
    /// Characters outside every class are skipped while they precede the
    /// letters and after them; a letter following such a character after the
    /// letters have started yields `None`.
    ///
    /// # Arguments
    ///
    /// - `word`: Word to be hyphenated.
    /// - `remain_char_count`: Minimum number of letters before a break.
    /// - `push_char_count`: Minimum number of letters after a break.
    ///
    /// # Returns
    ///
    /// `None` when the letter run is shorter than
    /// `remain_char_count + push_char_count`, when letters are interrupted, or
    /// when no break point is found. A break before the first letter is never
    /// reported, even when `remain_char_count` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphtree::{ExceptionPart, HyphenationTree, PatternConsumer};
    ///
    /// let mut builder = HyphenationTree::builder();
    /// for c in "acehijnoprty".chars() {
    ///     builder.add_class(&c.to_string()).unwrap();
    /// }
    /// builder.add_pattern("hyph", "00100").unwrap();
    /// builder.add_pattern("phen", "00300").unwrap();
    /// builder
    ///     .add_exception(
    ///         "project",
    ///         vec![
    ///             ExceptionPart::text("pro"),
    ///             ExceptionPart::hyphen(),
    ///             ExceptionPart::text("ject"),
    ///         ],
    ///     )
    ///     .unwrap();
    /// let tree = builder.build().unwrap();
    ///
    /// assert_eq!(tree.hyphenate("hyphen", 2, 2).unwrap().points(), &[0, 2, 4, 6]);
    /// assert_eq!(tree.hyphenate("project", 2, 2).unwrap().points(), &[0, 3, 7]);
    /// assert!(tree.hyphenate("chair", 2, 2).is_none());
    /// ```
    pub fn hyphenate(
        &self,
        word: &str,
        remain_char_count: usize,
        push_char_count: usize,
    ) -> Option<Hyphenation> {
        let word: Vec<char> = word.chars().collect();
        self.hyphenate_chars(&word, remain_char_count, push_char_count)
    }

    /// Computes break points of a word given as characters.
    /// See [`HyphenationTree::hyphenate`].
    pub fn hyphenate_chars(
        &self,
        word: &[char],
        remain_char_count: usize,
        push_char_count: usize,
    ) -> Option<Hyphenation> {
        // Boundary, letters, boundary, terminator.
        let mut normalized = Vec::with_capacity(word.len() + 3);
        normalized.push(WORD_BOUNDARY);
        let mut num_ignored = 0;
        let mut end_of_letters = false;
        for &c in word {
            if let Some(nc) = self.class_of(c) {
                if end_of_letters {
                    return None;
                }
                normalized.push(nc);
            } else if normalized.len() == 1 {
                num_ignored += 1;
            } else {
                end_of_letters = true;
            }
        }

        let len = normalized.len() - 1;
        if len < remain_char_count || len - remain_char_count < push_char_count {
            return None;
        }

        let letters: String = normalized[1..].iter().collect();
        let mut points = vec![0];
        if let Some(parts) = self.exceptions.get(&letters) {
            tracing::trace!(word = %letters, "hyphenating by exception");
            let mut j = 0;
            for part in parts {
                match part {
                    ExceptionPart::Text(s) => j += s.chars().count(),
                    ExceptionPart::Hyphen(_) => {
                        if j > 0 && j >= remain_char_count && j < len - push_char_count {
                            points.push(j + num_ignored);
                        }
                    }
                }
            }
        } else {
            normalized.push(WORD_BOUNDARY);
            normalized.push(END_MARKER);
            let mut levels = vec![0; len + 3];
            for i in 0..=len {
                self.search_patterns(&normalized, i, &mut levels);
            }
            // levels[i + 1] is the priority of the gap before the i-th letter.
            for i in 0..len {
                if levels[i + 1] & 1 == 1
                    && i > 0
                    && i >= remain_char_count
                    && i <= len - push_char_count
                {
                    points.push(i + num_ignored);
                }
            }
        }

        if points.len() == 1 {
            return None;
        }
        points.push(len);
        Some(Hyphenation::new(points))
    }

    /// Raises `levels` with the priorities of every pattern starting at
    /// `word[index]`.
    ///
    /// A single descent visits all such patterns: after each matched character
    /// a terminator reachable through low links marks a pattern ending there,
    /// and a compressed node matches when its tail is a prefix of the rest of
    /// the word.
    fn search_patterns(&self, word: &[char], index: usize, levels: &mut [u8]) {
        let tree = &self.patterns;
        let mut i = index;
        let mut sp = word[i];
        let mut p = tree.root;

        while p != 0 {
            let node = tree.nodes[p as usize];
            if node.is_compressed() {
                let rest = &word[i..];
                if tree
                    .suffix(node.lo)
                    .enumerate()
                    .all(|(k, t)| rest.get(k) == Some(&t))
                {
                    self.merge_priorities(node.eq, index, levels);
                }
                return;
            }
            match sp.cmp(&node.sc) {
                Ordering::Equal => {
                    if sp == END_MARKER {
                        break;
                    }
                    i += 1;
                    sp = word[i];
                    p = node.eq;

                    // Terminators sort lowest, so one ends at the bottom of the low links.
                    let mut q = p;
                    while q != 0 {
                        let nq = tree.nodes[q as usize];
                        if nq.is_compressed() {
                            break;
                        }
                        if nq.is_terminator() {
                            self.merge_priorities(nq.eq, index, levels);
                            break;
                        }
                        q = nq.lo;
                    }
                }
                Ordering::Less => p = node.lo,
                Ordering::Greater => p = node.hi,
            }
        }
    }

    #[inline(always)]
    fn merge_priorities(&self, offset: u32, index: usize, levels: &mut [u8]) {
        for (level, v) in levels[index..].iter_mut().zip(self.values.priorities(offset)) {
            *level = (*level).max(v);
        }
    }
}

impl Statistics for HyphenationTree {
    fn heap_bytes(&self) -> usize {
        self.patterns.heap_bytes()
            + self.values.heap_bytes()
            + self.classmap.heap_bytes()
            + self
                .exceptions
                .iter()
                .map(|(word, parts)| {
                    word.capacity() + parts.capacity() * std::mem::size_of::<ExceptionPart>()
                })
                .sum::<usize>()
    }

    fn num_nodes(&self) -> usize {
        self.patterns.num_nodes() + self.classmap.num_nodes()
    }

    fn num_vacants(&self) -> usize {
        self.patterns.num_vacants() + self.classmap.num_vacants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::hyphenation::Hyphen;
    use crate::PatternConsumer;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn builder_with_letters(letters: &str) -> HyphenationTreeBuilder {
        let mut builder = HyphenationTree::builder();
        for c in letters.chars() {
            let group: String = [c, c.to_ascii_uppercase()].iter().collect();
            builder.add_class(&group).unwrap();
        }
        builder
    }

    fn hyphen_tree() -> HyphenationTree {
        let mut builder = builder_with_letters("hypen");
        // hy1ph, ph3en
        builder.add_pattern("hyph", "00100").unwrap();
        builder.add_pattern("phen", "00300").unwrap();
        builder.build().unwrap()
    }

    fn points(tree: &HyphenationTree, word: &str, remain: usize, push: usize) -> Option<Vec<usize>> {
        tree.hyphenate(word, remain, push)
            .map(|h| h.points().to_vec())
    }

    #[test]
    fn test_hyphenate() {
        let tree = hyphen_tree();
        // levels of ".hyphen.": hy1ph raises the gap before 'p' to 1 and ph3en
        // the gap before 'e' to 3; both are odd.
        assert_eq!(points(&tree, "hyphen", 2, 2), Some(vec![0, 2, 4, 6]));
        assert_eq!(points(&tree, "hyphen", 1, 1), Some(vec![0, 2, 4, 6]));
        assert_eq!(points(&tree, "hyphen", 3, 2), Some(vec![0, 4, 6]));
        assert_eq!(points(&tree, "hyphen", 2, 3), Some(vec![0, 2, 6]));
        assert_eq!(points(&tree, "hyphen", 3, 3), None);
    }

    #[test]
    fn test_case_folding() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "HYPHEN", 2, 2), Some(vec![0, 2, 4, 6]));
        assert_eq!(points(&tree, "HyPhEn", 2, 2), Some(vec![0, 2, 4, 6]));
        assert_eq!(tree.class_of('H'), tree.class_of('h'));
        assert_eq!(tree.class_of('H'), Some('h'));
    }

    #[test]
    fn test_too_short() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "hyphen", 4, 3), None);
        assert_eq!(points(&tree, "hyph", 2, 3), None);
    }

    #[test]
    fn test_ignored_prefix() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "\"hyphen", 2, 2), Some(vec![0, 3, 5, 6]));
        assert_eq!(points(&tree, "((hyphen", 2, 2), Some(vec![0, 4, 6, 6]));
    }

    #[test]
    fn test_trailing_non_letters() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "hyphen,", 2, 2), Some(vec![0, 2, 4, 6]));
        assert_eq!(points(&tree, "hyphen?!", 2, 2), Some(vec![0, 2, 4, 6]));
    }

    #[test]
    fn test_embedded_non_letter() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "hy-phen", 1, 1), None);
        assert_eq!(points(&tree, "hyphen-e", 1, 1), None);
    }

    #[test]
    fn test_even_priority_inhibits() {
        let mut builder = builder_with_letters("hypen");
        builder.add_pattern("hyph", "00100").unwrap();
        builder.add_pattern("phen", "00300").unwrap();
        // y2ph raises the gap before 'p' from 1 to 2.
        builder.add_pattern("yph", "0200").unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "hyphen", 2, 2), Some(vec![0, 4, 6]));
    }

    #[test]
    fn test_word_boundary_pattern() {
        let mut builder = builder_with_letters("hypenw");
        // .h1y matches only at the start of a word.
        builder.add_pattern(".hy", "0010").unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "hyphen", 1, 1), Some(vec![0, 1, 6]));
        assert_eq!(points(&tree, "why", 1, 1), None);
        assert_eq!(points(&tree, "hyhy", 1, 1), Some(vec![0, 1, 4]));
    }

    #[test]
    fn test_pattern_prefix_of_word() {
        let mut builder = builder_with_letters("abc");
        builder.add_pattern("ab", "010").unwrap();
        let tree = builder.build().unwrap();
        // The only pattern is a single compressed node.
        assert_eq!(tree.patterns.num_nodes(), 2);
        assert!(tree.patterns.nodes[tree.patterns.root as usize].is_compressed());
        assert_eq!(points(&tree, "abc", 1, 1), Some(vec![0, 1, 3]));
        assert_eq!(points(&tree, "cab", 1, 1), Some(vec![0, 2, 3]));
        assert_eq!(points(&tree, "acb", 1, 1), None);
    }

    #[test]
    fn test_nested_patterns() {
        let mut builder = builder_with_letters("abcz");
        builder.add_pattern("ab", "010").unwrap();
        builder.add_pattern("abz", "0200").unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "abcc", 1, 1), Some(vec![0, 1, 4]));
        assert_eq!(points(&tree, "abzz", 1, 1), None);
        assert_eq!(points(&tree, "cabc", 1, 1), Some(vec![0, 2, 4]));
    }

    fn project_builder() -> HyphenationTreeBuilder {
        let mut builder = builder_with_letters("projectiv");
        // j1e alone breaks "proj-ect".
        builder.add_pattern("je", "010").unwrap();
        builder
    }

    #[test]
    fn test_exception_precedence() {
        let without = project_builder().build().unwrap();
        assert_eq!(points(&without, "project", 2, 2), Some(vec![0, 4, 7]));

        let mut builder = project_builder();
        builder
            .add_exception(
                "project",
                vec![
                    ExceptionPart::text("pro"),
                    ExceptionPart::hyphen(),
                    ExceptionPart::text("ject"),
                ],
            )
            .unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "project", 2, 2), Some(vec![0, 3, 7]));
        assert_eq!(points(&tree, "Project", 2, 2), Some(vec![0, 3, 7]));
        assert_eq!(points(&tree, "(project", 2, 2), Some(vec![0, 4, 7]));
        assert_eq!(points(&tree, "project", 4, 2), None);
        assert_eq!(points(&tree, "projective", 2, 2), Some(vec![0, 4, 10]));
    }

    #[test]
    fn test_exception_with_explicit_hyphens() {
        let mut builder = builder_with_letters("bcdkeru");
        builder
            .add_exception(
                "bucker",
                vec![
                    ExceptionPart::text("bu"),
                    ExceptionPart::Hyphen(Hyphen::new(Some("k-"), Some("ck"), Some("k"))),
                    ExceptionPart::text("cker"),
                ],
            )
            .unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "bucker", 2, 2), Some(vec![0, 2, 6]));
        assert_eq!(points(&tree, "bucker", 3, 2), None);
    }

    #[test]
    fn test_huge_bounds() {
        let tree = hyphen_tree();
        assert_eq!(points(&tree, "hyphen", usize::MAX, 1), None);
        assert_eq!(points(&tree, "hyphen", 1, usize::MAX), None);
        assert_eq!(points(&tree, "hyphen", usize::MAX, usize::MAX), None);
        assert_eq!(points(&tree, "hyphen", 0, usize::MAX), None);
    }

    #[test]
    fn test_no_break_before_first_letter() {
        let mut builder = builder_with_letters("abc");
        // .1a raises the gap before the first letter.
        builder.add_pattern(".a", "010").unwrap();
        builder.add_pattern("bc", "010").unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "abc", 0, 0), Some(vec![0, 2, 3]));
        assert_eq!(points(&tree, "(abc", 0, 0), Some(vec![0, 3, 3]));
        assert_eq!(points(&tree, "acc", 0, 0), None);

        let mut builder = builder_with_letters("abc");
        builder
            .add_exception(
                "abc",
                vec![
                    ExceptionPart::hyphen(),
                    ExceptionPart::text("a"),
                    ExceptionPart::hyphen(),
                    ExceptionPart::text("bc"),
                ],
            )
            .unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(points(&tree, "abc", 0, 0), Some(vec![0, 1, 3]));
    }

    #[test]
    fn test_empty_tree() {
        let tree = HyphenationTree::builder().build().unwrap();
        assert_eq!(tree.num_patterns(), 0);
        assert_eq!(points(&tree, "hyphen", 0, 0), None);
        assert_eq!(points(&tree, "", 0, 0), None);

        let tree = builder_with_letters("hypen").build().unwrap();
        assert_eq!(points(&tree, "hyphen", 0, 0), None);
        assert_eq!(points(&tree, "hyphen", 2, 2), None);
    }

    #[test]
    fn test_find_pattern() {
        let tree = hyphen_tree();
        assert_eq!(tree.find_pattern("hyph").as_deref(), Some("00100"));
        assert_eq!(tree.find_pattern("phen").as_deref(), Some("00300"));
        assert_eq!(tree.find_pattern("hyphen"), None);
        assert!(tree.find("hyph".chars()).is_some());
        assert_eq!(tree.find("phe".chars()), None);
    }

    #[test]
    fn test_bounds_random() {
        let letters = "abcdefgh";
        let mut rng = StdRng::seed_from_u64(29);
        let mut builder = builder_with_letters(letters);
        let letters: Vec<char> = letters.chars().collect();
        for _ in 0..400 {
            let len = rng.gen_range(1..5);
            let pattern: String = (0..len)
                .map(|_| letters[rng.gen_range(0..letters.len())])
                .collect();
            let digits: String = (0..=len)
                .map(|_| char::from(b'0' + rng.gen_range(0..6)))
                .collect();
            builder.add_pattern(&pattern, &digits).unwrap();
        }
        let tree = builder.build().unwrap();

        for _ in 0..300 {
            let len = rng.gen_range(0..12);
            let word: String = (0..len)
                .map(|_| letters[rng.gen_range(0..letters.len())])
                .collect();
            let remain = rng.gen_range(0..4);
            let push = rng.gen_range(0..4);
            if let Some(h) = tree.hyphenate(&word, remain, push) {
                let points = h.points();
                assert_eq!(points[0], 0);
                assert_eq!(points[points.len() - 1], len);
                assert!(h.interior().windows(2).all(|w| w[0] < w[1]));
                for &p in h.interior() {
                    assert!(p >= remain && p <= len - push, "{word}: {points:?}");
                }
            }
        }
    }

    #[test]
    fn test_shared_among_threads() {
        let tree = hyphen_tree();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(points(&tree, "hyphen", 2, 2), Some(vec![0, 2, 4, 6]));
                    }
                });
            }
        });
    }
}
