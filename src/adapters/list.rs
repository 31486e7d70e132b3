use crate::adapters::thunk::Thunk;
use rand::Rng;
use std::ops::RangeInclusive;

/// How many elements [`list`] produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSize {
    Exact(usize),
    /// Inclusive bounds, in either order
    Range(usize, usize),
}

impl ListSize {
    /// Resolve to a concrete length. Ranges use the thread RNG: list
    /// overrides are built before filling, outside the seeded path.
    pub fn resolve(self) -> usize {
        match self {
            ListSize::Exact(size) => size,
            ListSize::Range(first, second) => {
                let (min, max) = if first <= second { (first, second) } else { (second, first) };
                rand::thread_rng().gen_range(min..=max)
            }
        }
    }
}

impl From<usize> for ListSize {
    fn from(size: usize) -> Self {
        ListSize::Exact(size)
    }
}

impl From<(usize, usize)> for ListSize {
    fn from((min, max): (usize, usize)) -> Self {
        ListSize::Range(min, max)
    }
}

impl From<[usize; 2]> for ListSize {
    fn from([min, max]: [usize; 2]) -> Self {
        ListSize::Range(min, max)
    }
}

impl From<RangeInclusive<usize>> for ListSize {
    fn from(range: RangeInclusive<usize>) -> Self {
        ListSize::Range(*range.start(), *range.end())
    }
}

/// An override list holding `size` copies of `template`.
///
/// Pass `Thunk::Undefined` as the template to get fully generated elements.
pub fn list(size: impl Into<ListSize>, template: impl Into<Thunk>) -> Thunk {
    let template = template.into();
    Thunk::List(vec![template; size.into().resolve()])
}
