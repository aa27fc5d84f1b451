use std::path::Path;

use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
use log::warn;

use t3e_core::models::{BedRecord, BedRecordReader, ChromId, ChromosomeSet};
use t3e_core::{Result, T3eError};

/// Stable identifier of a repeat family, assigned on first sight of its name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(pub usize);

///
/// One annotated repeat instance, closed coordinates `[start, end]`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatInterval {
    pub start: i64,
    pub end: i64,
    pub family: FamilyId,
}

///
/// Repeat-family annotations grouped per chromosome.
///
#[derive(Debug, Clone)]
pub struct RepeatIndex {
    families: Vec<String>,
    intervals: Vec<Vec<RepeatInterval>>,
}

impl RepeatIndex {
    pub fn from_path(path: &Path, chromosomes: &ChromosomeSet) -> Result<Self> {
        let reader = BedRecordReader::from_path(path)?;
        let source_name = reader.source_name().to_string();
        Self::from_records(reader, chromosomes, &source_name)
    }

    ///
    /// Build the index from `(line number, record)` pairs whose last column is
    /// the family name. Rows on chromosomes outside `chromosomes` are skipped,
    /// but their families still receive an id.
    ///
    pub fn from_records<I>(records: I, chromosomes: &ChromosomeSet, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(usize, BedRecord)>>,
    {
        let mut families: Vec<String> = Vec::new();
        let mut family_ids: HashMap<String, FamilyId> = HashMap::default();
        let mut intervals: Vec<Vec<RepeatInterval>> = vec![Vec::new(); chromosomes.len()];
        let mut seen_chroms: HashSet<String> = HashSet::default();
        let mut current: Option<String> = None;
        let mut skipped: usize = 0;

        for record in records {
            let (line, record) = record?;

            if current.as_deref() != Some(record.chr.as_str()) {
                if seen_chroms.contains(&record.chr) {
                    return Err(T3eError::format(
                        source_name,
                        line,
                        format!("rows of {} are not contiguous", record.chr),
                    ));
                }
                seen_chroms.insert(record.chr.clone());
                current = Some(record.chr.clone());
            }

            let family = match family_ids.get(&record.name) {
                Some(&family) => family,
                None => {
                    let family = FamilyId(families.len());
                    families.push(record.name.clone());
                    family_ids.insert(record.name, family);
                    family
                }
            };

            match chromosomes.get(&record.chr) {
                Some(chrom) => intervals[chrom.0].push(RepeatInterval {
                    start: record.start,
                    end: record.end,
                    family,
                }),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} repeat annotations on chromosomes outside the analysed set",
                skipped
            );
        }

        Ok(RepeatIndex { families, intervals })
    }

    pub fn intervals_on(&self, chrom: ChromId) -> &[RepeatInterval] {
        &self.intervals[chrom.0]
    }

    ///
    /// Family names in id order.
    ///
    pub fn family_names(&self) -> &[String] {
        &self.families
    }

    pub fn n_families(&self) -> usize {
        self.families.len()
    }

    pub fn len(&self) -> usize {
        self.intervals.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
