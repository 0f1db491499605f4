use serde::{Deserialize, Serialize};

pub type BlockId = u8;

/// Every block kind the world knows about. Discriminants are the stable ids
/// written to save files.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Empty = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    CoalOre = 4,
    IronOre = 5,
    Tree = 6,
    Leaves = 7,
    Sand = 8,
    Cloud = 9,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::Empty,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::CoalOre,
        BlockType::IronOre,
        BlockType::Tree,
        BlockType::Leaves,
        BlockType::Sand,
        BlockType::Cloud,
    ];

    /// Solid kinds, in id order. These are the kinds that get an instance batch.
    pub const SOLID: [BlockType; 9] = [
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::CoalOre,
        BlockType::IronOre,
        BlockType::Tree,
        BlockType::Leaves,
        BlockType::Sand,
        BlockType::Cloud,
    ];

    #[inline]
    pub const fn id(self) -> BlockId {
        self as BlockId
    }

    pub fn from_id(id: BlockId) -> Option<BlockType> {
        BlockType::ALL.get(id as usize).copied()
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockType::Empty)
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockType::Empty => "empty",
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::CoalOre => "coal_ore",
            BlockType::IronOre => "iron_ore",
            BlockType::Tree => "tree",
            BlockType::Leaves => "leaves",
            BlockType::Sand => "sand",
            BlockType::Cloud => "cloud",
        }
    }

    pub fn by_name(name: &str) -> Option<BlockType> {
        BlockType::ALL.iter().copied().find(|b| b.name() == name)
    }
}

/// Slot index of a rendered cell inside its chunk's instance batch for the block's type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct InstanceHandle(pub u32);

impl InstanceHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One cell of a chunk. `instance` is set only while the block is solid and visible.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Block {
    pub kind: BlockType,
    pub instance: Option<InstanceHandle>,
}

impl Block {
    pub const EMPTY: Block = Block {
        kind: BlockType::Empty,
        instance: None,
    };

    #[inline]
    pub const fn of(kind: BlockType) -> Self {
        Block {
            kind,
            instance: None,
        }
    }

    #[inline]
    pub const fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}
