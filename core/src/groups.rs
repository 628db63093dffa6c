use crate::dataset::Example;

/// Single-pass iterator replaying a flat dataset as per-question groups.
///
/// Each step yields one contiguous slice of `group_sizes[i]` examples; the
/// slices never overlap and together cover the dataset in original order.
/// The iterator is fused: once the dataset is exhausted every further call
/// returns `None`. There is no reset; a repeated pass takes a fresh instance.
#[derive(Debug)]
pub struct GroupIter<'a> {
    examples: &'a [Example],
    group_sizes: &'a [usize],
    group_index: usize,
    position: usize,
    done: bool,
}

impl<'a> GroupIter<'a> {
    pub fn new(examples: &'a [Example], group_sizes: &'a [usize]) -> Self {
        Self {
            examples,
            group_sizes,
            group_index: 0,
            position: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for GroupIter<'a> {
    type Item = &'a [Example];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let size = match self.group_sizes.get(self.group_index) {
            Some(&size) => size,
            None => {
                self.done = true;
                return None;
            }
        };

        let start = self.position;
        let end = start + size;
        if end >= self.examples.len() {
            // Oversized tails truncate instead of ranging out
            self.done = true;
        }
        let end = end.min(self.examples.len());

        self.group_index += 1;
        self.position = end;
        Some(&self.examples[start..end])
    }
}
