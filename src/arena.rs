//! Chunked node storage addressed by copyable handles.

use std::mem;
use std::ops::{Index, IndexMut};

/// The position of a live object in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

#[derive(Clone)]
enum Block<T> {
    Occupied(T),
    // Link to the next vacant block.
    Vacant(Option<Handle>),
}

/// Node storage shared by the maps in this crate.
///
/// Linked structures store `Handle`s instead of owned pointers, so relinking a node is a handle
/// rewrite. Vacated blocks form a free list that later allocations pop from. Chunks are never
/// resized, so an object stays put for as long as it is live. A clone keeps every block and the
/// free list in place, which means a handle names the same object in both copies.
///
/// # Examples
///
/// ```
/// use randomized_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
/// let handle = arena.allocate("node");
/// arena[handle] = "relinked";
///
/// assert_eq!(arena.get(&handle), Some(&"relinked"));
/// assert_eq!(arena.free(handle), "relinked");
/// assert_eq!(arena.get(&handle), None);
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs an empty arena that grows `chunk_size` blocks at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            chunks: Vec::new(),
            chunk_size,
            free_head: None,
            len: 0,
        }
    }

    fn block_mut(&mut self, handle: Handle) -> Option<&mut Block<T>> {
        self.chunks
            .get_mut(handle.chunk_index)
            .and_then(|chunk| chunk.get_mut(handle.block_index))
    }

    /// Stores `value`, reusing the most recently vacated block if there is one.
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(handle) = self.free_head {
            let block = &mut self.chunks[handle.chunk_index][handle.block_index];
            match mem::replace(block, Block::Occupied(value)) {
                Block::Vacant(next) => self.free_head = next,
                Block::Occupied(_) => panic!("Error: free list points to an occupied block."),
            }
            return handle;
        }

        let needs_chunk = self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_size);
        if needs_chunk {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }
        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Block::Occupied(value));
        Handle {
            chunk_index,
            block_index: chunk.len() - 1,
        }
    }

    /// Removes the object behind `handle` and returns it. The block joins the free list.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to a live object.
    pub fn free(&mut self, handle: Handle) -> T {
        let next = self.free_head;
        let block = match self.block_mut(handle) {
            Some(block) => block,
            None => panic!("Error: attempting to free invalid block."),
        };
        match mem::replace(block, Block::Vacant(next)) {
            Block::Occupied(value) => {
                self.free_head = Some(handle);
                self.len -= 1;
                value
            },
            Block::Vacant(next) => {
                *block = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
        }
    }

    /// Returns the object behind `handle`, or `None` if the block is vacant or out of range.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self
            .chunks
            .get(handle.chunk_index)
            .and_then(|chunk| chunk.get(handle.block_index))
        {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.block_mut(*handle) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object and releases all chunks. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}
