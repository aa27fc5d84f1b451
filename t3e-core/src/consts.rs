pub const PROBABILITY_FILE_SUFFIX: &str = "_prob.txt";
pub const BACKGROUND_FILE_SUFFIX: &str = "_background.txt";
pub const ENRICHMENT_FILE_SUFFIX: &str = "_enrichment.txt";
pub const DEFAULT_SPECIES: &str = "hg38";
