use crate::index::PositionSet;
use crate::tokenizer::normalize;
use crate::{Document, InvertedIndex};
use std::collections::HashMap;

impl InvertedIndex {
    /// Documents in which the terms of `phrase` occur as a contiguous run, in order.
    ///
    /// Candidates are seeded from the first term's positions; each following term keeps
    /// only the offsets directly after a surviving offset of the previous term.
    pub fn phrase_search(&self, phrase: &str) -> Vec<&Document> {
        let terms = normalize(phrase);
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };
        let Some(seed) = self.positions.get(first) else {
            return Vec::new();
        };

        let mut surviving: HashMap<&str, PositionSet> = seed
            .iter()
            .map(|(path, offsets)| (path.as_str(), offsets.clone()))
            .collect();

        for term in rest {
            if surviving.is_empty() {
                break;
            }
            let Some(per_doc) = self.positions.get(term) else {
                return Vec::new();
            };
            surviving = per_doc
                .iter()
                .filter_map(|(path, offsets)| {
                    let prev = surviving.get(path.as_str())?;
                    let next: PositionSet = offsets
                        .iter()
                        .copied()
                        .filter(|&x| x > 0 && prev.contains(&(x - 1)))
                        .collect();
                    (!next.is_empty()).then_some((path.as_str(), next))
                })
                .collect();
        }

        self.resolve(surviving.into_keys())
    }
}
