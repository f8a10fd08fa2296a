//! Filesystem probes used by the resolver.

use std::time::SystemTime;

/// MTime info gathered for a file.  This also models "file is absent".
/// It's not using an Option<> just because it makes the code using it
/// easier to follow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MTime {
    Missing,
    Stamp(SystemTime),
}

/// stat() an on-disk path, producing its MTime.
pub fn stat(path: &str) -> std::io::Result<MTime> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(MTime::Stamp(meta.modified()?)),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                Ok(MTime::Missing)
            } else {
                Err(err)
            }
        }
    }
}

pub fn exists(path: &str) -> bool {
    std::fs::metadata(path).is_ok()
}
