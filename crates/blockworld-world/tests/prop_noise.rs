use blockworld_world::{NoiseField, WorldRng};
use proptest::prelude::*;

proptest! {
    #[test]
    fn samples_stay_in_range_and_repeat(
        seed in any::<u64>(),
        x in -1.0e4f32..1.0e4,
        y in -1.0e3f32..1.0e3,
        z in -1.0e4f32..1.0e4,
    ) {
        let a = NoiseField::from_rng(&mut WorldRng::new(seed));
        let b = NoiseField::from_rng(&mut WorldRng::new(seed));
        let s2 = a.sample_2d(x, z);
        let s3 = a.sample_3d(x, y, z);
        prop_assert!((-1.0..=1.0).contains(&s2));
        prop_assert!((-1.0..=1.0).contains(&s3));
        prop_assert_eq!(s2, b.sample_2d(x, z));
        prop_assert_eq!(s3, b.sample_3d(x, y, z));
    }
}
