use blockworld_chunk::Chunk;
use blockworld_world::{ChunkCoord, ChunkSize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn idx_is_unique_and_dense(w in 1usize..9, h in 1usize..9) {
        let c = Chunk::new(ChunkCoord::new(0, 0), ChunkSize::new(w, h));
        let mut seen = vec![false; w * w * h];
        for y in 0..h {
            for z in 0..w {
                for x in 0..w {
                    let i = c.idx(x, y, z);
                    prop_assert!(i < seen.len());
                    prop_assert!(!seen[i]);
                    seen[i] = true;
                }
            }
        }
        prop_assert!(seen.into_iter().all(|s| s));
    }
}
