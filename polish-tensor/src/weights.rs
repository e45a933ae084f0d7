//! Reads a ZIP bundle of little-endian `f32` arrays keyed by parameter
//! path into an in-memory [`WeightMap`], and provides the small amount of
//! shape-checked accessor sugar every layer builder needs.

use std::collections::HashMap;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::WeightError;

/// A read-only, loaded-once mapping from parameter key to its flat `f32`
/// values.
#[derive(Debug, Default)]
pub struct WeightMap {
    entries: HashMap<String, Vec<f32>>,
}

impl WeightMap {
    /// Parses a ZIP bundle; every entry becomes a key whose value is the
    /// little-endian `f32` decoding of its bytes.
    pub fn from_zip_bytes(bytes: &[u8]) -> Result<Self, WeightError> {
        let cursor = std::io::Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor)?;
        let mut entries = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let mut raw = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut raw).map_err(|source| WeightError::Io {
                key: name.clone(),
                source,
            })?;
            if raw.len() % 4 != 0 {
                return Err(WeightError::TruncatedEntry {
                    key: name,
                    len: raw.len(),
                });
            }
            let mut cursor = std::io::Cursor::new(&raw);
            let mut values = Vec::with_capacity(raw.len() / 4);
            for _ in 0..(raw.len() / 4) {
                values.push(cursor.read_f32::<LittleEndian>().map_err(|source| {
                    WeightError::Io {
                        key: name.clone(),
                        source,
                    }
                })?);
            }
            entries.insert(name, values);
        }
        Ok(WeightMap { entries })
    }

    /// Fetches a parameter array, failing with `WeightError::MissingKey` if
    /// absent.
    pub fn get(&self, key: &str) -> Result<&[f32], WeightError> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| WeightError::MissingKey(key.to_string()))
    }

    /// Fetches a parameter array and checks its length, the shape
    /// validation every `Conv`/`Bias`/`Mul` builder needs before handing
    /// the slice to its layer constructor.
    pub fn get_sized(&self, key: &str, expected_len: usize) -> Result<&[f32], WeightError> {
        let values = self.get(key)?;
        if values.len() != expected_len {
            return Err(WeightError::WrongLength {
                key: key.to_string(),
                expected: expected_len,
                actual: values.len(),
            });
        }
        Ok(values)
    }

    /// Whether a key is present, used to distinguish the GroupNorm-style
    /// residual bundle from the running-stats (batch-norm-folded) one by
    /// checking for `running_mean`/`running_var`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_with(entries: &[(&str, &[f32])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut buf);
            let mut writer = zip::ZipWriter::new(cursor);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            for (key, values) in entries {
                writer.start_file(*key, options).unwrap();
                for v in values.iter() {
                    writer.write_all(&v.to_le_bytes()).unwrap();
                }
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn loads_little_endian_floats_by_key() {
        let bytes = zip_with(&[("conv1.weight", &[1.0, -2.5, 3.25]), ("conv1.bias", &[0.0])]);
        let map = WeightMap::from_zip_bytes(&bytes).unwrap();
        assert_eq!(map.get("conv1.weight").unwrap(), &[1.0, -2.5, 3.25]);
        assert_eq!(map.get("conv1.bias").unwrap(), &[0.0]);
    }

    #[test]
    fn missing_key_is_a_weight_error() {
        let bytes = zip_with(&[]);
        let map = WeightMap::from_zip_bytes(&bytes).unwrap();
        assert!(matches!(
            map.get("conv1.weight"),
            Err(WeightError::MissingKey(_))
        ));
    }

    #[test]
    fn wrong_length_is_a_weight_error() {
        let bytes = zip_with(&[("b", &[1.0, 2.0])]);
        let map = WeightMap::from_zip_bytes(&bytes).unwrap();
        assert!(matches!(
            map.get_sized("b", 3),
            Err(WeightError::WrongLength { .. })
        ));
    }

    #[test]
    fn malformed_zip_is_rejected() {
        let garbage = vec![0u8; 16];
        assert!(matches!(
            WeightMap::from_zip_bytes(&garbage),
            Err(WeightError::MalformedZip(_))
        ));
    }

    #[test]
    fn contains_reflects_presence() {
        let bytes = zip_with(&[("residuals.0.running_mean", &[0.0])]);
        let map = WeightMap::from_zip_bytes(&bytes).unwrap();
        assert!(map.contains("residuals.0.running_mean"));
        assert!(!map.contains("residuals.0.running_var"));
    }
}
