pub const DEFAULT_ITERATIONS: usize = 100;
pub const DEFAULT_READ_LEN: u32 = 36;

// zero lets rayon pick one worker per core
pub const DEFAULT_THREADS: usize = 0;

// mixing constants for per-unit seeds
pub const CHROM_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;
pub const ITERATION_SEED_MIX: u64 = 0xC2B2_AE3D_27D4_EB4F;
