use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use recall_core::Dispose;
use recall_hooks::storage::{
    MemoryArea, StorageArea, StorageError, Subscribers, install_local_storage,
    install_session_storage,
};

/// Persistent [`StorageArea`]: one JSON object file, loaded on open and
/// rewritten on every change. A missing file is an empty store; an
/// unreadable one is an open error. Change notification covers hook
/// instances inside this process; file watching across processes is not
/// attempted.
pub struct FileArea {
    path: PathBuf,
    entries: RefCell<HashMap<String, String>>,
    subs: Subscribers,
}

impl FileArea {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
            subs: Subscribers::default(),
        })
    }

    /// Default per-app location under the OS data directory.
    pub fn default_path(app_name: &str) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_name)
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&*self.entries.borrow())?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl StorageArea for FileArea {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let prev = self
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            // roll the cache back so memory and disk agree
            let mut entries = self.entries.borrow_mut();
            match prev {
                Some(p) => {
                    entries.insert(key.to_string(), p);
                }
                None => {
                    entries.remove(key);
                }
            }
            return Err(err);
        }
        self.subs.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let prev = self.entries.borrow_mut().remove(key);
        if let Err(err) = self.flush() {
            if let Some(p) = prev {
                self.entries.borrow_mut().insert(key.to_string(), p);
            }
            return Err(err);
        }
        self.subs.notify(key);
        Ok(())
    }

    fn subscribe(&self, key: &str, f: Box<dyn Fn()>) -> Dispose {
        self.subs.add(key, f)
    }
}

/// Install the default pair for this thread: a file-backed local area under
/// the OS data directory and an in-memory session area.
pub fn init_storage(app_name: &str) -> Result<(), StorageError> {
    let area = FileArea::open(FileArea::default_path(app_name))?;
    install_local_storage(Rc::new(area));
    install_session_storage(Rc::new(MemoryArea::default()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let area = FileArea::open(dir.path().join("storage.json")).unwrap();
        assert_eq!(area.read("anything"), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let area = FileArea::open(&path).unwrap();
        area.write("count", "3").unwrap();
        drop(area);

        let area = FileArea::open(&path).unwrap();
        assert_eq!(area.read("count").as_deref(), Some("3"));
    }

    #[test]
    fn remove_deletes_the_entry_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let area = FileArea::open(&path).unwrap();
        area.write("count", "3").unwrap();
        area.remove("count").unwrap();
        drop(area);

        let area = FileArea::open(&path).unwrap();
        assert_eq!(area.read("count"), None);
    }

    #[test]
    fn unreadable_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        assert!(FileArea::open(&path).is_err());
    }

    #[test]
    fn notifies_subscribers_on_write() {
        use std::cell::Cell;

        let dir = tempfile::tempdir().unwrap();
        let area = FileArea::open(dir.path().join("storage.json")).unwrap();

        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        let sub = area.subscribe("count", Box::new(move || hits2.set(hits2.get() + 1)));

        area.write("count", "1").unwrap();
        area.write("other", "1").unwrap();
        assert_eq!(hits.get(), 1);

        sub.run();
        area.write("count", "2").unwrap();
        assert_eq!(hits.get(), 1);
    }
}
