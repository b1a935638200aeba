//! Batch-level checks over the records of one tier.

use std::collections::HashSet;

use crate::error::{MasterError, MasterResult};

/// A record with a tier-unique key.
pub trait Keyed {
    /// The key that must be unique within the tier.
    fn key(&self) -> &str;
}

/// Fails on the first key seen twice, walking `records` in order.
///
/// # Examples
///
/// ```
/// use abr_types::{ensure_unique_keys, PrefectureBuilder};
///
/// let a = PrefectureBuilder::new(Some("011011"), Some("北海道")).unwrap().build().unwrap();
/// let b = PrefectureBuilder::new(Some("020001"), Some("青森県")).unwrap().build().unwrap();
/// assert!(ensure_unique_keys(&[a.clone(), b]).is_ok());
/// assert!(ensure_unique_keys(&[a.clone(), a]).is_err());
/// ```
pub fn ensure_unique_keys<T: Keyed>(records: &[T]) -> MasterResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let key = record.key();
        if !seen.insert(key) {
            return Err(MasterError::DuplicateKey {
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::tests::make_chome;

    struct Row(&'static str);

    impl Keyed for Row {
        fn key(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_empty_and_unique_batches_pass() {
        assert!(ensure_unique_keys::<Row>(&[]).is_ok());
        assert!(ensure_unique_keys(&[Row("a"), Row("b"), Row("c")]).is_ok());
    }

    #[test]
    fn test_duplicate_is_reported() {
        let err = ensure_unique_keys(&[Row("a"), Row("b"), Row("a"), Row("b")]).unwrap_err();
        assert_eq!(
            err,
            MasterError::DuplicateKey {
                key: "a".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_towns_name_composite_key() {
        let first = make_chome().build().unwrap();
        let second = make_chome().remarks(Some("重複")).unwrap().build().unwrap();
        let err = ensure_unique_keys(&[first, second]).unwrap_err();
        assert_eq!(err.to_string(), "[131016-0001001-0-20200401] this key is duplicated");
    }
}
