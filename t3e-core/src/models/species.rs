use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, T3eError};
use crate::models::chromosome::ChromosomeSet;

///
/// Maps a species/assembly name to the ordered list of chromosomes analysed
/// for it.
///
/// A registry can be read from a toml file:
///
/// ```toml
/// [species]
/// dm6 = ["chr2L", "chr2R", "chr3L", "chr3R", "chr4", "chrX", "chrY"]
/// ```
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct SpeciesRegistry {
    pub species: BTreeMap<String, Vec<String>>,
}

fn numbered_chromosomes(autosomes: usize) -> Vec<String> {
    (1..=autosomes)
        .map(|i| format!("chr{}", i))
        .chain(["chrX".to_string(), "chrY".to_string()])
        .collect()
}

impl SpeciesRegistry {
    ///
    /// The assemblies supported out of the box: hg19, hg38 and mm10.
    ///
    pub fn builtin() -> Self {
        let mut species = BTreeMap::new();
        species.insert("hg19".to_string(), numbered_chromosomes(22));
        species.insert("hg38".to_string(), numbered_chromosomes(22));
        species.insert("mm10".to_string(), numbered_chromosomes(19));
        SpeciesRegistry { species }
    }

    pub fn resolve(&self, name: &str) -> Result<ChromosomeSet> {
        match self.species.get(name) {
            Some(chromosomes) => Ok(ChromosomeSet::new(chromosomes)),
            None => Err(T3eError::UnknownSpeciesError {
                name: name.to_string(),
                supported: self.supported().join(", "),
            }),
        }
    }

    pub fn supported(&self) -> Vec<&str> {
        self.species.keys().map(String::as_str).collect()
    }
}

impl TryFrom<&Path> for SpeciesRegistry {
    type Error = T3eError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path).map_err(|source| T3eError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;
        let registry = toml::from_str(&toml_str)?;
        Ok(registry)
    }
}
