pub mod chromosome;
pub mod distribution;
pub mod record;
pub mod species;

// re-export for cleaner imports
pub use self::chromosome::{ChromId, ChromosomeSet};
pub use self::distribution::{BackgroundDistribution, probability_file_path};
pub use self::record::{BedRecord, BedRecordReader};
pub use self::species::SpeciesRegistry;
