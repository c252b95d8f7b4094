/// Generational handle: `(index, generation)`.
///
/// A slot that is freed and reused bumps its generation, so stale handles
/// held by observers stop resolving instead of aliasing the new occupant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn generation(self) -> u32 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn orders_by_index_then_generation() {
        let a = Handle::new(1, 0);
        let b = Handle::new(1, 1);
        let c = Handle::new(2, 0);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(b.index(), 1);
        assert_eq!(b.generation(), 1);
    }
}
