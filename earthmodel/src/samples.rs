//! Attribute sample storage for gridded models.

use crate::ModelError;
use byteorder::{BigEndian as BE, ReadBytesExt};
use log::debug;
use memmap2::Mmap;
use std::{fs::File, io::BufReader, mem::size_of, path::Path};

/// One named attribute (vp, vs, dvs, ...) of a gridded model.
pub struct Attribute {
    name: String,
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[f64]>),
    MemMap(Mmap),
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> f64 {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<f32>();
                let end = start + size_of::<f32>();
                let mut bytes = &raw.as_ref()[start..end];
                // Slice is exactly four bytes long.
                bytes.read_f32::<BE>().map(f64::from).unwrap_or(f64::NAN)
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::InMem(samples) => samples.len(),
            Self::MemMap(raw) => raw.len() / size_of::<f32>(),
        }
    }
}

impl Attribute {
    /// Returns an attribute backed by `samples`.
    pub fn new<S: Into<String>>(name: S, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples: SampleStore::InMem(samples.into_boxed_slice()),
        }
    }

    /// Returns an attribute read into memory from a flat file of
    /// big-endian `f32` samples.
    pub fn load<S: Into<String>, P: AsRef<Path>>(name: S, path: P) -> Result<Self, ModelError> {
        let count = sample_count(&path)?;
        debug!("loading {count} samples from {:?}", path.as_ref());
        let mut file = BufReader::new(File::open(path)?);
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            samples.push(f64::from(file.read_f32::<BE>()?));
        }
        Ok(Self {
            name: name.into(),
            samples: SampleStore::InMem(samples.into_boxed_slice()),
        })
    }

    /// Returns an attribute using the memory-mapped file as storage.
    pub fn memmap<S: Into<String>, P: AsRef<Path>>(name: S, path: P) -> Result<Self, ModelError> {
        sample_count(&path)?;
        debug!("mapping {:?}", path.as_ref());
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            name: name.into(),
            samples: SampleStore::MemMap(mmap),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the sample at flat `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn get_unchecked(&self, index: usize) -> f64 {
        self.samples.get_unchecked(index)
    }

    /// Returns the sample at flat `index`, if any.
    pub fn get(&self, index: usize) -> Option<f64> {
        (index < self.len()).then(|| self.get_unchecked(index))
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

fn sample_count<P: AsRef<Path>>(path: P) -> Result<usize, ModelError> {
    let len = path.as_ref().metadata()?.len();
    if len == 0 || len % size_of::<f32>() as u64 != 0 {
        return Err(ModelError::SampleLen(len, path.as_ref().to_owned()));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok((len / size_of::<f32>() as u64) as usize)
}

#[cfg(test)]
mod tests {
    use super::Attribute;
    use crate::ModelError;
    use byteorder::{BigEndian as BE, WriteBytesExt};
    use std::io::Write;

    fn sample_file(values: &[f32]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for v in values {
            file.write_f32::<BE>(*v).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_and_memmap_agree() {
        let values = [1.5_f32, -2.25, 8.0, 0.125];
        let file = sample_file(&values);
        let loaded = Attribute::load("dvp", file.path()).unwrap();
        let mapped = Attribute::memmap("dvp", file.path()).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(mapped.len(), 4);
        for (idx, v) in values.iter().enumerate() {
            assert_eq!(loaded.get_unchecked(idx), f64::from(*v));
            assert_eq!(mapped.get_unchecked(idx), f64::from(*v));
        }
        assert_eq!(mapped.get(4), None);
        assert_eq!(mapped.name(), "dvp");
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0, 1, 2]).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            Attribute::load("vs", file.path()),
            Err(ModelError::SampleLen(3, _))
        ));
    }
}
