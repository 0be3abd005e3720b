use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage driver selected at startup.
///
/// `s3` and `minio` both use the S3-compatible backend; `minio` additionally
/// requires an explicit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    S3,
    Minio,
    Local,
}

impl StorageDriver {
    /// Whether this driver is backed by an S3-compatible object store.
    pub fn is_object_store(&self) -> bool {
        matches!(self, StorageDriver::S3 | StorageDriver::Minio)
    }
}

impl FromStr for StorageDriver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageDriver::S3),
            "minio" => Ok(StorageDriver::Minio),
            "local" => Ok(StorageDriver::Local),
            _ => Err(anyhow::anyhow!("Unknown storage driver: {}", s)),
        }
    }
}

impl Display for StorageDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageDriver::S3 => write!(f, "s3"),
            StorageDriver::Minio => write!(f, "minio"),
            StorageDriver::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("S3".parse::<StorageDriver>().unwrap(), StorageDriver::S3);
        assert_eq!(" MinIO ".parse::<StorageDriver>().unwrap(), StorageDriver::Minio);
        assert_eq!("local".parse::<StorageDriver>().unwrap(), StorageDriver::Local);
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let err = "gcs".parse::<StorageDriver>().unwrap_err();
        assert!(err.to_string().contains("gcs"));
    }

    #[test]
    fn test_object_store_drivers() {
        assert!(StorageDriver::S3.is_object_store());
        assert!(StorageDriver::Minio.is_object_store());
        assert!(!StorageDriver::Local.is_object_store());
    }
}
