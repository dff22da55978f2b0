use std::io;
use std::path::Path;
use storage_primitives::FreeSpace;

/// Source of free-space figures for the volume holding a path
pub trait DiskUsage: Send + Sync {
    fn available(&self, path: &Path) -> io::Result<FreeSpace>;
}

/// Queries the operating system through `fs2`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDiskUsage;

impl DiskUsage for SystemDiskUsage {
    fn available(&self, path: &Path) -> io::Result<FreeSpace> {
        fs2::available_space(path).map(FreeSpace::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_space_for_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SystemDiskUsage.available(dir.path()).is_ok());
    }

    #[test]
    fn fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(SystemDiskUsage.available(&missing).is_err());
    }
}
