use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use cms_export_core::make_unique_with;

/// Hands out file names that are unique within a run and absent from the
/// output directory at the moment they are allocated.
#[derive(Debug)]
pub struct FilenameAllocator {
    dir: PathBuf,
    reserved: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            reserved: HashSet::new(),
        }
    }

    pub fn allocate(&mut self, base: &str, extension: &str) -> String {
        let dir = &self.dir;
        let reserved = &self.reserved;
        let name = make_unique_with(base, extension, |candidate| {
            reserved.contains(candidate) || fs::symlink_metadata(dir.join(candidate)).is_ok()
        });
        self.reserved.insert(name.clone());
        name
    }
}
