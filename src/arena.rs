//! Slab allocator that owns tree nodes and hands out copyable handles.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Handles are plain indices tagged with the generation of the block they were allocated from.
/// Once an object is freed, every handle to it stops resolving, even if the block is reused.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    index: usize,
    generation: u32,
}

enum Block<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next: Option<usize> },
}

/// An allocator that stores objects of a single type in one contiguous `Vec`.
///
/// Freed blocks are threaded into a free list and reused by later allocations. Each block keeps a
/// generation counter that is bumped whenever its object is freed, so a stale `Entry` yields
/// `None` from `get` instead of silently aliasing whatever now lives in the block.
///
/// # Examples
///
/// ```
/// use sentinel_rbtree::arena::TypedArena;
///
/// let mut arena = TypedArena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<usize>,
    blocks: Vec<Block<T>>,
    size: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `TypedArena<T>` with room for `capacity` objects before the
    /// backing storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            size: 0,
        }
    }

    /// Allocates an object in the arena and returns an `Entry` that can later be used to access
    /// or free the object.
    pub fn allocate(&mut self, value: T) -> Entry {
        self.size += 1;

        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied {
                    generation: 0,
                    value,
                });
                Entry {
                    index: self.blocks.len() - 1,
                    generation: 0,
                }
            },
            Some(index) => {
                let generation = match self.blocks[index] {
                    Block::Vacant { generation, next } => {
                        self.head = next;
                        generation
                    },
                    Block::Occupied { .. } => panic!("Error: free list points at an occupied block."),
                };
                self.blocks[index] = Block::Occupied { generation, value };
                Entry { index, generation }
            },
        }
    }

    /// Deallocates an object in the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the entry does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        if self.get(entry).is_none() {
            panic!("Error: attempting to free invalid or vacant block.");
        }
        let old_block = mem::replace(
            &mut self.blocks[entry.index],
            Block::Vacant {
                generation: entry.generation.wrapping_add(1),
                next: self.head.take(),
            },
        );
        self.head = Some(entry.index);
        self.size -= 1;
        match old_block {
            Block::Occupied { value, .. } => value,
            Block::Vacant { .. } => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns `None` if the entry does
    /// not correspond to a live object.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.blocks.get(entry.index) {
            Some(Block::Occupied { generation, value }) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None` if the entry does
    /// not correspond to a live object.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        match self.blocks.get_mut(entry.index) {
            Some(Block::Occupied { generation, value }) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Frees every object in the arena. Existing entries are invalidated, but the backing
    /// storage is kept for reuse.
    pub fn clear(&mut self) {
        let mut head = None;
        for (index, block) in self.blocks.iter_mut().enumerate().rev() {
            let generation = match *block {
                Block::Occupied { generation, .. } => generation.wrapping_add(1),
                Block::Vacant { generation, .. } => generation,
            };
            *block = Block::Vacant {
                generation,
                next: head,
            };
            head = Some(index);
        }
        self.head = head;
        self.size = 0;
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of objects the arena can hold without growing.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new();
        arena.free(&Entry {
            index: 0,
            generation: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        arena.free(&entry);
        arena.free(&entry);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new();
        assert_eq!(
            arena.allocate(0),
            Entry {
                index: 0,
                generation: 0
            },
        );
        assert_eq!(
            arena.allocate(0),
            Entry {
                index: 1,
                generation: 0
            },
        );
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_free_reuses_block() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        assert_eq!(arena.free(&entry), 0);
        assert!(arena.is_empty());

        let reused = arena.allocate(1);
        assert_eq!(
            reused,
            Entry {
                index: 0,
                generation: 1
            },
        );
        assert_ne!(reused, entry);
    }

    #[test]
    fn test_stale_entry() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        arena.free(&entry);
        arena.allocate(1);
        assert_eq!(arena.get(&entry), None);
        assert_eq!(arena.get_mut(&entry), None);
    }

    #[test]
    fn test_get_invalid_block() {
        let arena: TypedArena<u32> = TypedArena::new();
        assert_eq!(
            arena.get(&Entry {
                index: 0,
                generation: 0
            }),
            None,
        );
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        *arena.get_mut(&entry).unwrap() = 1;
        assert_eq!(arena.get(&entry), Some(&1));
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new();
        let x = arena.allocate(0);
        let y = arena.allocate(1);
        arena.free(&x);
        arena.clear();

        assert!(arena.is_empty());
        assert_eq!(arena.get(&y), None);

        let z = arena.allocate(2);
        assert_eq!(z.index, 0);
        assert_eq!(arena[z], 2);
        assert_eq!(arena.allocate(3).index, 1);
        assert_eq!(arena.allocate(4).index, 2);
    }
}
