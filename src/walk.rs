use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on directory reads in flight at once.
const MAX_PENDING_READS: usize = 32;

/// Collect every non-directory file under `root`, as paths relative to it.
///
/// Sub-directories are read concurrently, bounded by `MAX_PENDING_READS`
/// pending reads. The first error aborts the walk and is returned whole; no
/// partial result leaks to the caller.
pub async fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let root = Arc::new(root.to_path_buf());
    let permits = Arc::new(Semaphore::new(MAX_PENDING_READS));
    let mut tasks = JoinSet::new();

    spawn_read(&mut tasks, root.clone(), (*root).clone(), permits.clone());

    let mut files = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        // Outstanding tasks are aborted when the set drops on error return.
        let (mut found, subdirs) = joined.map_err(io::Error::other)??;
        files.append(&mut found);
        for dir in subdirs {
            spawn_read(&mut tasks, root.clone(), dir, permits.clone());
        }
    }

    Ok(files)
}

type DirReadResult = io::Result<(Vec<PathBuf>, Vec<PathBuf>)>;

fn spawn_read(
    tasks: &mut JoinSet<DirReadResult>,
    root: Arc<PathBuf>,
    dir: PathBuf,
    permits: Arc<Semaphore>,
) {
    tasks.spawn(async move {
        let _permit = permits.acquire_owned().await.map_err(io::Error::other)?;

        let mut read_dir = tokio::fs::read_dir(&dir).await?;
        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                subdirs.push(path);
            } else {
                let rel = path
                    .strip_prefix(root.as_path())
                    .map(Path::to_path_buf)
                    .unwrap_or(path);
                files.push(rel);
            }
        }
        Ok((files, subdirs))
    });
}
