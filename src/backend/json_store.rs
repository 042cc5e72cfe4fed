use std::{fs, io, path::{Path, PathBuf}};

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::backend::interface::{BillStore, BackendError, Result};
use crate::core::Store;

/// Keeps the whole store in one pretty-printed JSON file, rewritten on every save.
pub struct JsonStore {
    path: PathBuf
}

impl JsonStore {
    const INDENT: &'static [u8] = b"    ";

    pub fn new(path: impl AsRef<Path>) -> JsonStore {
        JsonStore { path: path.as_ref().to_owned() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> BackendError {
        BackendError::Io { path: self.path.clone(), source }
    }
}

impl BillStore for JsonStore {
    fn load(&self) -> Result<Store> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no bills saved at {} yet, starting empty", self.path.display());
                return Ok(Store::new());
            },
            Err(err) => return Err(self.io_error(err))
        };

        let store: Store = serde_json::from_str(&content)
            .map_err(|source| BackendError::Parse { path: self.path.clone(), source })?;
        debug!("loaded {} bills from {}", store.len(), self.path.display());
        return Ok(store);
    }

    fn save(&self, store: &Store) -> Result<()> {
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(Self::INDENT));
        store.serialize(&mut serializer)?;

        fs::write(&self.path, buffer).map_err(|err| self.io_error(err))?;
        debug!("saved {} bills to {}", store.len(), self.path.display());
        return Ok(());
    }
}
