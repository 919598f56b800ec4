use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use picomake::path::Path as OutPath;
use picomake::runtime::{self, Runtime};
use tempfile::NamedTempFile;

pub struct Host;

impl Runtime for Host {
    fn print(&self, msg: &str) {
        println!("{}", msg);
    }

    fn create_dir_all(&self, path: &OutPath) -> runtime::Result<()> {
        Ok(fs::create_dir_all(path.as_ref())?)
    }

    fn write_file(&self, path: &OutPath, data: &[u8]) -> runtime::Result<()> {
        let path = Path::new(path.as_ref());
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        // Stage next to the destination so the final rename is atomic;
        // a failed write leaves nothing behind.
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(data)?;
        staged
            .persist(path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}
