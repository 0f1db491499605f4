use blockworld_blocks::{BlockType, InstanceHandle};
use blockworld_world::LocalPos;

/// Dense list of rendered cells of one block type. Slot `i` of the list is the
/// instance a renderer draws at `cells[i]`.
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    kind: BlockType,
    capacity: usize,
    cells: Vec<LocalPos>,
}

impl InstanceBatch {
    pub fn new(kind: BlockType, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> BlockType {
        self.kind
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[LocalPos] {
        &self.cells
    }

    /// Appends a cell and returns its slot, or `None` once the batch is full.
    pub fn push(&mut self, cell: LocalPos) -> Option<InstanceHandle> {
        if self.cells.len() >= self.capacity {
            return None;
        }
        let handle = InstanceHandle(self.cells.len() as u32);
        self.cells.push(cell);
        Some(handle)
    }

    /// Frees `handle` by moving the last slot into it. Returns the cell that now
    /// occupies `handle`'s slot, if a different one moved there.
    pub fn swap_remove(&mut self, handle: InstanceHandle) -> Option<LocalPos> {
        let i = handle.index();
        if i >= self.cells.len() {
            return None;
        }
        let last = self.cells.len() - 1;
        self.cells.swap_remove(i);
        if i < last { Some(self.cells[i]) } else { None }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
