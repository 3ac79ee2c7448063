use crate::model::Schedule;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistance d'un planning produit, relu plus tard par l'audit (`check`).
pub trait Storage {
    fn load(&self) -> anyhow::Result<Schedule>;
    fn save(&self, schedule: &Schedule) -> anyhow::Result<()>;
}

/// Planning complet (jours, workers avec compteurs, créneaux non pourvus) en JSON.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Schedule> {
        let data = fs::read(&self.path)
            .with_context(|| format!("reading schedule {}", self.path.display()))?;
        let schedule: Schedule = serde_json::from_slice(&data)
            .with_context(|| format!("parsing schedule {}", self.path.display()))?;
        tracing::debug!(
            path = %self.path.display(),
            days = schedule.days.len(),
            workers = schedule.workers.len(),
            "schedule loaded"
        );
        Ok(schedule)
    }

    fn save(&self, schedule: &Schedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        write_atomic(&self.path, &json)
    }
}

/// Écriture atomique commune à toutes les sorties (planning, exports, template).
///
/// Les répertoires manquants sont créés ; un fichier existant n'est remplacé
/// qu'une fois le contenu complet écrit et synchronisé.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut tmp = NamedTempFile::new_in(dir).context("creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "written");
    Ok(())
}
