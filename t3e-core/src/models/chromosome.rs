use fxhash::FxHashMap as HashMap;

use crate::errors::{Result, T3eError};

/// Handle of a chromosome inside a [ChromosomeSet].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChromId(pub usize);

///
/// The ordered set of chromosomes a run operates on. Order is processing and
/// output order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeSet {
    names: Vec<String>,
    ids: HashMap<String, ChromId>,
}

impl ChromosomeSet {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = ChromosomeSet {
            names: Vec::with_capacity(names.len()),
            ids: HashMap::default(),
        };
        for name in names {
            let name = name.as_ref();
            if set.ids.contains_key(name) {
                continue;
            }
            set.ids.insert(name.to_string(), ChromId(set.names.len()));
            set.names.push(name.to_string());
        }
        set
    }

    pub fn get(&self, name: &str) -> Option<ChromId> {
        self.ids.get(name).copied()
    }

    ///
    /// Look up a chromosome, failing with [T3eError::UnknownChromosomeError].
    ///
    pub fn require(&self, name: &str) -> Result<ChromId> {
        self.get(name)
            .ok_or_else(|| T3eError::UnknownChromosomeError(name.to_string()))
    }

    pub fn name(&self, id: ChromId) -> &str {
        &self.names[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ChromId> + '_ {
        (0..self.names.len()).map(ChromId)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
